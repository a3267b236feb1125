use std::sync::{Arc, Mutex};

use crate::api::{ApiClient, SavedPhrase, Voice};
use crate::config::Config;
use crate::ui::dashboard::DashboardWidgets;

/// Events sent from background tasks to the GTK main thread.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    VoicesLoaded(Vec<Voice>),
    PhrasesLoaded(Vec<SavedPhrase>),
    TranslationComplete(String),
    /// Fetched audio clip, ready to hand to playback.
    SynthesisComplete(Vec<u8>),
    PhraseSaved,
    PhraseDeleted,
    DictationResult(String),
    OperationFailed(Operation, String),
    ModelDownloadProgress(u64, u64),
    ModelDownloadComplete,
}

/// The operation a completion or failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadVoices,
    LoadPhrases,
    Translate,
    Synthesize,
    SavePhrase,
    DeletePhrase,
    Recognize,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::LoadVoices => "load voices",
            Operation::LoadPhrases => "load saved phrases",
            Operation::Translate => "translate text",
            Operation::Synthesize => "synthesize speech",
            Operation::SavePhrase => "save phrase",
            Operation::DeletePhrase => "delete phrase",
            Operation::Recognize => "recognize speech",
        };
        f.write_str(name)
    }
}

/// Progress of one class of remote call. Each class has its own state so a
/// translation in flight does not block playback, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpState {
    #[default]
    Idle,
    InFlight,
}

impl OpState {
    pub fn is_idle(self) -> bool {
        self == OpState::Idle
    }
}

/// Dictation session phase. One-shot: Idle → Recording → Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DictationState {
    #[default]
    Idle,
    Recording,
}

/// Central application state. Lives on the GTK main thread inside
/// Rc<RefCell<>>.
pub struct AppState {
    pub config: Config,
    pub api: ApiClient,

    pub voices: Vec<Voice>,
    pub phrases: Vec<SavedPhrase>,

    pub from_language: Option<String>,
    pub to_language: Option<String>,
    pub selected_voice: Option<String>,
    pub input_text: String,
    pub translated_text: String,
    pub transcript: String,
    pub pronunciation_feedback: String,

    pub translation: OpState,
    pub synthesis: OpState,
    pub dictation: DictationState,

    // Dictation capture
    pub audio_buffer: Arc<Mutex<Vec<f32>>>,
    pub capture_stream: Option<cpal::Stream>,
    pub sample_rate: u32,
    pub recognizer_ctx: Option<Arc<whisper_rs::WhisperContext>>,

    pub tokio_rt: tokio::runtime::Runtime,
    pub backend_sender: async_channel::Sender<BackendEvent>,

    // UI handles
    pub dashboard: Option<DashboardWidgets>,
}

impl AppState {
    pub fn new(sender: async_channel::Sender<BackendEvent>) -> Self {
        let config = Config::load();
        let api = ApiClient::new(&config.backend_url);
        let tokio_rt = tokio::runtime::Runtime::new()
            .expect("Failed to create tokio runtime");

        Self {
            config,
            api,
            voices: Vec::new(),
            phrases: Vec::new(),
            from_language: None,
            to_language: None,
            selected_voice: None,
            input_text: String::new(),
            translated_text: String::new(),
            transcript: String::new(),
            pronunciation_feedback: String::new(),
            translation: OpState::Idle,
            synthesis: OpState::Idle,
            dictation: DictationState::Idle,
            audio_buffer: Arc::new(Mutex::new(Vec::new())),
            capture_stream: None,
            sample_rate: 16000,
            recognizer_ctx: None,
            tokio_rt,
            backend_sender: sender,
            dashboard: None,
        }
    }

    /// Select the source language. Any dictated transcript and pronunciation
    /// feedback belong to the previous language and are cleared; the next
    /// dictation picks up the new language.
    pub fn set_from_language(&mut self, code: Option<String>) {
        self.from_language = code;
        self.transcript.clear();
        self.pronunciation_feedback.clear();
    }

    /// Select the target language and re-derive the default voice: first
    /// loaded voice whose language matches, otherwise unset.
    pub fn set_to_language(&mut self, code: Option<String>) {
        self.to_language = code;
        self.refresh_default_voice();
    }

    pub fn refresh_default_voice(&mut self) {
        self.selected_voice = self
            .to_language
            .as_deref()
            .and_then(|code| default_voice(&self.voices, code));
    }

    pub fn can_translate(&self) -> bool {
        self.from_language.is_some()
            && self.to_language.is_some()
            && !self.input_text.is_empty()
            && self.translation.is_idle()
    }

    /// Speak gating for a given text/language pair (input text with the
    /// source language, translation or saved phrase with the target's).
    pub fn can_speak(&self, text: &str, language_code: Option<&str>) -> bool {
        !text.is_empty()
            && language_code.is_some()
            && self.selected_voice.is_some()
            && self.synthesis.is_idle()
    }

    pub fn can_save(&self) -> bool {
        !self.translated_text.is_empty()
            && self.selected_voice.is_some()
            && self.to_language.is_some()
    }

    /// Dictation toggle availability; the recognizer context is checked at
    /// start time, not here, so the toggle stays a no-op rather than an
    /// error while the model loads.
    pub fn can_dictate(&self) -> bool {
        self.from_language.is_some()
    }

    /// Reset the composition fields after a successful save.
    pub fn clear_composition(&mut self) {
        self.input_text.clear();
        self.translated_text.clear();
        self.transcript.clear();
        self.pronunciation_feedback.clear();
    }
}

/// First voice matching the language code, if any.
pub fn default_voice(voices: &[Voice], language_code: &str) -> Option<String> {
    voices
        .iter()
        .find(|v| v.language_code == language_code)
        .map(|v| v.id.clone())
}

/// Helper to update the status label.
pub fn update_status(
    state: &std::rc::Rc<std::cell::RefCell<AppState>>,
    label_text: &str,
) {
    let s = state.borrow();
    if let Some(ref dash) = s.dashboard {
        dash.status_label.set_text(label_text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_state() -> AppState {
        let (tx, _rx) = async_channel::unbounded();
        AppState::new(tx)
    }

    fn voice(id: &str, language_code: &str) -> Voice {
        Voice {
            id: id.into(),
            language_code: language_code.into(),
            language_name: String::new(),
            name: id.into(),
        }
    }

    #[test]
    fn identical_source_and_target_is_translatable() {
        let mut s = make_state();
        s.set_from_language(Some("en-US".into()));
        s.set_to_language(Some("en-US".into()));
        s.input_text = "hello".into();
        assert!(s.can_translate());
    }

    #[test]
    fn translate_gates_on_fields_and_flight() {
        let mut s = make_state();
        assert!(!s.can_translate());
        s.set_from_language(Some("en-US".into()));
        s.set_to_language(Some("ja-JP".into()));
        assert!(!s.can_translate());
        s.input_text = "hello".into();
        assert!(s.can_translate());
        s.translation = OpState::InFlight;
        assert!(!s.can_translate());
    }

    #[test]
    fn target_language_derives_first_matching_voice() {
        let mut s = make_state();
        s.voices = vec![
            voice("Joanna", "en-US"),
            voice("Mizuki", "ja-JP"),
            voice("Takumi", "ja-JP"),
        ];
        s.set_to_language(Some("ja-JP".into()));
        assert_eq!(s.selected_voice.as_deref(), Some("Mizuki"));
    }

    #[test]
    fn target_language_without_voice_unsets_selection() {
        let mut s = make_state();
        s.voices = vec![voice("Joanna", "en-US")];
        s.set_to_language(Some("en-US".into()));
        assert!(s.selected_voice.is_some());
        s.set_to_language(Some("es-ES".into()));
        assert!(s.selected_voice.is_none());
        s.translated_text = "hola".into();
        assert!(!s.can_speak("hola", Some("es-ES")));
        assert!(!s.can_save());
    }

    #[test]
    fn source_language_change_clears_dictation_fields() {
        let mut s = make_state();
        s.transcript = "hello".into();
        s.pronunciation_feedback = "good".into();
        s.set_from_language(Some("ja-JP".into()));
        assert!(s.transcript.is_empty());
        assert!(s.pronunciation_feedback.is_empty());
    }

    #[test]
    fn clear_composition_resets_all_four_fields() {
        let mut s = make_state();
        s.input_text = "a".into();
        s.translated_text = "b".into();
        s.transcript = "c".into();
        s.pronunciation_feedback = "d".into();
        s.clear_composition();
        assert!(s.input_text.is_empty());
        assert!(s.translated_text.is_empty());
        assert!(s.transcript.is_empty());
        assert!(s.pronunciation_feedback.is_empty());
    }

    #[test]
    fn speak_requires_voice_text_and_idle_synthesis() {
        let mut s = make_state();
        s.voices = vec![voice("Lucia", "es-ES")];
        s.set_to_language(Some("es-ES".into()));
        assert!(s.can_speak("hola", Some("es-ES")));
        assert!(!s.can_speak("", Some("es-ES")));
        assert!(!s.can_speak("hola", None));
        s.synthesis = OpState::InFlight;
        assert!(!s.can_speak("hola", Some("es-ES")));
    }

    #[test]
    fn voices_arriving_after_target_rederive_default() {
        let mut s = make_state();
        s.set_to_language(Some("ja-JP".into()));
        assert!(s.selected_voice.is_none());
        s.voices = vec![voice("Mizuki", "ja-JP")];
        s.refresh_default_voice();
        assert_eq!(s.selected_voice.as_deref(), Some("Mizuki"));
    }
}
