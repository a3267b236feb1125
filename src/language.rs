/// A supported language. The set is fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// Locale code used by the backend, e.g. "en-US".
    pub code: &'static str,
    /// Human-readable name shown in selectors.
    pub name: &'static str,
    /// Two-letter code the whisper recognizer expects.
    pub recognizer_code: &'static str,
}

pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { code: "en-US", name: "English", recognizer_code: "en" },
    Language { code: "ja-JP", name: "Japanese", recognizer_code: "ja" },
    Language { code: "es-ES", name: "Spanish", recognizer_code: "es" },
];

/// Look up a language by its locale code.
pub fn by_code(code: &str) -> Option<&'static Language> {
    SUPPORTED_LANGUAGES.iter().find(|l| l.code == code)
}

/// Display name for a locale code, falling back to the code itself for
/// anything the backend returns that we don't know.
pub fn display_name(code: &str) -> &str {
    by_code(code).map(|l| l.name).unwrap_or(code)
}

/// Recognizer language code for a locale code.
pub fn recognizer_code(code: &str) -> Option<&'static str> {
    by_code(code).map(|l| l.recognizer_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_code() {
        assert_eq!(by_code("ja-JP").unwrap().name, "Japanese");
        assert!(by_code("fr-FR").is_none());
    }

    #[test]
    fn display_name_falls_back_to_code() {
        assert_eq!(display_name("en-US"), "English");
        assert_eq!(display_name("de-DE"), "de-DE");
    }

    #[test]
    fn recognizer_codes_cover_every_language() {
        for lang in SUPPORTED_LANGUAGES {
            assert_eq!(recognizer_code(lang.code), Some(lang.recognizer_code));
        }
        assert!(recognizer_code("xx-XX").is_none());
    }
}
