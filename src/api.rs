use serde::{Deserialize, Serialize};

/// A synthesis voice offered by the backend. The voice service emits
/// PascalCase keys.
#[derive(Debug, Clone, Deserialize)]
pub struct Voice {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "LanguageCode")]
    pub language_code: String,
    #[serde(rename = "LanguageName")]
    pub language_name: String,
    #[serde(rename = "Name")]
    pub name: String,
}

/// A phrase the user saved for later playback.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPhrase {
    pub id: String,
    pub text: String,
    pub language_code: String,
    pub voice_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    text: &'a str,
    voice_id: &'a str,
    language_code: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest<'a> {
    text: &'a str,
    from_language: &'a str,
    to_language: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SavePhraseRequest<'a> {
    text: &'a str,
    voice_id: &'a str,
    language_code: &'a str,
}

pub type ApiError = Box<dyn std::error::Error + Send + Sync>;

/// Stateless client for the phrase backend. One instance is cloned into
/// every dispatched task; no retries, no timeouts beyond reqwest defaults.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Resolve an audio URL from a synthesize response. The backend may
    /// return a path relative to its own root.
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with('/') {
            self.url(url)
        } else {
            url.to_string()
        }
    }

    pub async fn voices(&self) -> Result<Vec<Voice>, ApiError> {
        let resp = self.http.get(self.url("/voices")).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Synthesize `text` with the given voice. Returns the URL of the
    /// rendered clip.
    pub async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        language_code: &str,
    ) -> Result<String, ApiError> {
        let body = SynthesizeRequest { text, voice_id, language_code };
        let resp = self
            .http
            .post(self.url("/synthesize"))
            .json(&body)
            .send()
            .await?;
        let parsed: SynthesizeResponse = check(resp).await?.json().await?;
        Ok(self.resolve_url(&parsed.audio_url))
    }

    pub async fn translate(
        &self,
        text: &str,
        from_language: &str,
        to_language: &str,
    ) -> Result<String, ApiError> {
        let body = TranslateRequest { text, from_language, to_language };
        let resp = self
            .http
            .post(self.url("/translate"))
            .json(&body)
            .send()
            .await?;
        let parsed: TranslateResponse = check(resp).await?.json().await?;
        Ok(parsed.translated_text)
    }

    pub async fn save_phrase(
        &self,
        text: &str,
        voice_id: &str,
        language_code: &str,
    ) -> Result<SavedPhrase, ApiError> {
        let body = SavePhraseRequest { text, voice_id, language_code };
        let resp = self
            .http
            .post(self.url("/phrases"))
            .json(&body)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn phrases(&self) -> Result<Vec<SavedPhrase>, ApiError> {
        let resp = self.http.get(self.url("/phrases")).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn delete_phrase(&self, id: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(self.url(&format!("/phrases/{id}")))
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into an error carrying status and body.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    Err(format!("backend error {status}: {text}").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn voice_uses_pascal_case_keys() {
        let voice: Voice = serde_json::from_value(json!({
            "Id": "Mizuki",
            "LanguageCode": "ja-JP",
            "LanguageName": "Japanese",
            "Name": "Mizuki (female)"
        }))
        .unwrap();
        assert_eq!(voice.id, "Mizuki");
        assert_eq!(voice.language_code, "ja-JP");
    }

    #[test]
    fn saved_phrase_uses_camel_case_keys() {
        let phrase: SavedPhrase = serde_json::from_value(json!({
            "id": "p1",
            "text": "こんにちは",
            "languageCode": "ja-JP",
            "voiceId": "Mizuki"
        }))
        .unwrap();
        assert_eq!(phrase.voice_id, "Mizuki");
        assert_eq!(phrase.language_code, "ja-JP");
    }

    #[test]
    fn request_bodies_match_wire_contract() {
        let translate = serde_json::to_value(TranslateRequest {
            text: "Hello",
            from_language: "en-US",
            to_language: "ja-JP",
        })
        .unwrap();
        assert_eq!(
            translate,
            json!({"text": "Hello", "fromLanguage": "en-US", "toLanguage": "ja-JP"})
        );

        let synth = serde_json::to_value(SynthesizeRequest {
            text: "Hola",
            voice_id: "Lucia",
            language_code: "es-ES",
        })
        .unwrap();
        assert_eq!(
            synth,
            json!({"text": "Hola", "voiceId": "Lucia", "languageCode": "es-ES"})
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.url("/voices"), "http://localhost:3000/voices");
    }

    #[test]
    fn relative_audio_urls_resolve_against_base() {
        let client = ApiClient::new("http://localhost:3000");
        assert_eq!(
            client.resolve_url("/audio/clip.wav"),
            "http://localhost:3000/audio/clip.wav"
        );
        assert_eq!(
            client.resolve_url("https://cdn.example.com/clip.wav"),
            "https://cdn.example.com/clip.wav"
        );
    }
}
