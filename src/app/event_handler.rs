use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;

use super::model::load_recognizer;
use super::pipeline::dispatch_load_phrases;
use super::state::{update_status, AppState, BackendEvent, OpState, Operation};
use crate::ui::dashboard::refresh_controls;

/// Apply a backend event to state and widgets. This is the core state
/// machine: every background completion funnels through here on the GTK
/// main thread.
pub fn handle_backend_event(state: &Rc<RefCell<AppState>>, event: BackendEvent) {
    match event {
        BackendEvent::VoicesLoaded(voices) => {
            log::info!("Loaded {} voices", voices.len());
            for v in &voices {
                log::debug!("Voice {}: {} ({})", v.id, v.name, v.language_name);
            }
            let mut s = state.borrow_mut();
            s.voices = voices;
            // The user may have picked a target before the list arrived.
            s.refresh_default_voice();
            refresh_controls(&s);
        }
        BackendEvent::PhrasesLoaded(phrases) => {
            log::info!("Loaded {} saved phrases", phrases.len());
            state.borrow_mut().phrases = phrases;
            crate::ui::phrases::populate(state);
            refresh_controls(&state.borrow());
        }
        BackendEvent::TranslationComplete(text) => {
            let mut s = state.borrow_mut();
            s.translation = OpState::Idle;
            s.translated_text = text;
            if let Some(ref dash) = s.dashboard {
                dash.translated_label.set_text(&s.translated_text);
                dash.status_label.set_text("Idle");
            }
            refresh_controls(&s);
        }
        BackendEvent::SynthesisComplete(bytes) => {
            {
                let mut s = state.borrow_mut();
                s.synthesis = OpState::Idle;
                refresh_controls(&s);
            }
            update_status(state, "Idle");
            crate::playback::play_clip(bytes);
        }
        BackendEvent::PhraseSaved => {
            let (buffer, transcript_label, translated_label) = {
                let mut s = state.borrow_mut();
                s.clear_composition();
                refresh_controls(&s);
                match s.dashboard {
                    Some(ref dash) => (
                        Some(dash.input_view.buffer()),
                        Some(dash.transcript_label.clone()),
                        Some(dash.translated_label.clone()),
                    ),
                    None => (None, None, None),
                }
            };
            // Widget writes happen outside the borrow: clearing the input
            // buffer re-enters through its changed handler.
            if let Some(buffer) = buffer {
                buffer.set_text("");
            }
            if let Some(label) = transcript_label {
                label.set_text("");
            }
            if let Some(label) = translated_label {
                label.set_text("");
            }
            update_status(state, "Phrase saved");
            dispatch_load_phrases(state);
        }
        BackendEvent::PhraseDeleted => {
            dispatch_load_phrases(state);
        }
        BackendEvent::DictationResult(text) => {
            log::info!("Dictation result: {text}");
            let buffer = {
                let mut s = state.borrow_mut();
                s.transcript = text.clone();
                s.input_text = text.clone();
                if let Some(ref dash) = s.dashboard {
                    dash.transcript_label.set_text(&s.transcript);
                    dash.status_label.set_text("Idle");
                }
                refresh_controls(&s);
                s.dashboard.as_ref().map(|dash| dash.input_view.buffer())
            };
            if let Some(buffer) = buffer {
                buffer.set_text(&text);
            }
        }
        BackendEvent::OperationFailed(op, err) => {
            // One category: log it, clear the operation's in-flight state,
            // leave everything else as it was.
            log::error!("Failed to {op}: {err}");
            let mut s = state.borrow_mut();
            match op {
                Operation::Translate => s.translation = OpState::Idle,
                Operation::Synthesize => s.synthesis = OpState::Idle,
                _ => {}
            }
            if let Some(ref dash) = s.dashboard {
                dash.status_label.set_text("Idle");
                dash.progress_bar.set_visible(false);
            }
            refresh_controls(&s);
        }
        BackendEvent::ModelDownloadProgress(downloaded, total) => {
            if let Some(ref dash) = state.borrow().dashboard {
                dash.progress_bar.set_visible(true);
                if total > 0 {
                    dash.progress_bar
                        .set_fraction(downloaded as f64 / total as f64);
                    let mb_done = downloaded as f64 / 1_048_576.0;
                    let mb_total = total as f64 / 1_048_576.0;
                    dash.progress_bar.set_text(Some(&format!(
                        "Downloading recognizer: {mb_done:.1} / {mb_total:.1} MB"
                    )));
                } else {
                    dash.progress_bar.pulse();
                }
            }
        }
        BackendEvent::ModelDownloadComplete => {
            if let Some(ref dash) = state.borrow().dashboard {
                dash.progress_bar.set_visible(false);
            }
            load_recognizer(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_state() -> Rc<RefCell<AppState>> {
        let (tx, _rx) = async_channel::unbounded();
        Rc::new(RefCell::new(AppState::new(tx)))
    }

    #[test]
    fn translation_complete_replaces_prior_result() {
        let state = make_state();
        {
            let mut s = state.borrow_mut();
            s.translated_text = "old".into();
            s.translation = OpState::InFlight;
        }
        handle_backend_event(&state, BackendEvent::TranslationComplete("新しい".into()));
        let s = state.borrow();
        assert_eq!(s.translated_text, "新しい");
        assert_eq!(s.translation, OpState::Idle);
    }

    #[test]
    fn failed_translation_keeps_previous_text() {
        let state = make_state();
        {
            let mut s = state.borrow_mut();
            s.translated_text = "previous".into();
            s.translation = OpState::InFlight;
        }
        handle_backend_event(
            &state,
            BackendEvent::OperationFailed(Operation::Translate, "backend error 500".into()),
        );
        let s = state.borrow();
        assert_eq!(s.translated_text, "previous");
        assert_eq!(s.translation, OpState::Idle);
    }

    #[test]
    fn failed_delete_leaves_phrase_list_unchanged() {
        let state = make_state();
        state.borrow_mut().phrases = vec![crate::api::SavedPhrase {
            id: "p1".into(),
            text: "hola".into(),
            language_code: "es-ES".into(),
            voice_id: "Lucia".into(),
        }];
        handle_backend_event(
            &state,
            BackendEvent::OperationFailed(Operation::DeletePhrase, "backend error 404".into()),
        );
        assert_eq!(state.borrow().phrases.len(), 1);
    }

    #[test]
    fn dictation_result_mirrors_into_input_and_transcript() {
        let state = make_state();
        handle_backend_event(&state, BackendEvent::DictationResult("hello there".into()));
        let s = state.borrow();
        assert_eq!(s.transcript, "hello there");
        assert_eq!(s.input_text, "hello there");
    }

    #[test]
    fn phrase_saved_clears_composition() {
        let state = make_state();
        {
            let mut s = state.borrow_mut();
            s.input_text = "Hello".into();
            s.translated_text = "こんにちは".into();
            s.transcript = "Hello".into();
            s.pronunciation_feedback = "ok".into();
        }
        handle_backend_event(&state, BackendEvent::PhraseSaved);
        let s = state.borrow();
        assert!(s.input_text.is_empty());
        assert!(s.translated_text.is_empty());
        assert!(s.transcript.is_empty());
        assert!(s.pronunciation_feedback.is_empty());
    }

    #[test]
    fn translate_speak_save_scenario() {
        let state = make_state();
        {
            let mut s = state.borrow_mut();
            s.voices = vec![crate::api::Voice {
                id: "Mizuki".into(),
                language_code: "ja-JP".into(),
                language_name: "Japanese".into(),
                name: "Mizuki".into(),
            }];
            s.set_from_language(Some("en-US".into()));
            s.set_to_language(Some("ja-JP".into()));
            s.input_text = "Hello".into();
            assert!(s.can_translate());
        }

        handle_backend_event(&state, BackendEvent::TranslationComplete("こんにちは".into()));
        {
            let s = state.borrow();
            assert_eq!(s.translated_text, "こんにちは");
            assert!(s.can_speak(&s.translated_text, s.to_language.as_deref()));
            assert!(s.can_save());
        }

        handle_backend_event(&state, BackendEvent::PhraseSaved);
        let s = state.borrow();
        assert!(s.input_text.is_empty());
        assert!(s.translated_text.is_empty());
    }

    #[test]
    fn voices_loaded_rederives_voice_for_pending_target() {
        let state = make_state();
        state.borrow_mut().set_to_language(Some("ja-JP".into()));
        assert!(state.borrow().selected_voice.is_none());

        let voices = vec![crate::api::Voice {
            id: "Mizuki".into(),
            language_code: "ja-JP".into(),
            language_name: "Japanese".into(),
            name: "Mizuki".into(),
        }];
        handle_backend_event(&state, BackendEvent::VoicesLoaded(voices));
        assert_eq!(state.borrow().selected_voice.as_deref(), Some("Mizuki"));
    }
}
