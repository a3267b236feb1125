use std::cell::RefCell;
use std::rc::Rc;

use super::state::{update_status, AppState, BackendEvent, OpState, Operation};

/// Fetch the voice list. Fired once at startup.
pub fn dispatch_load_voices(state: &Rc<RefCell<AppState>>) {
    let s = state.borrow();
    let api = s.api.clone();
    let sender = s.backend_sender.clone();

    s.tokio_rt.spawn(async move {
        match api.voices().await {
            Ok(voices) => {
                let _ = sender.send(BackendEvent::VoicesLoaded(voices)).await;
            }
            Err(e) => {
                let _ = sender
                    .send(BackendEvent::OperationFailed(
                        Operation::LoadVoices,
                        e.to_string(),
                    ))
                    .await;
            }
        }
    });
}

/// Refetch the full saved-phrase list. Fired at startup and after every
/// save or delete.
pub fn dispatch_load_phrases(state: &Rc<RefCell<AppState>>) {
    let s = state.borrow();
    let api = s.api.clone();
    let sender = s.backend_sender.clone();

    s.tokio_rt.spawn(async move {
        match api.phrases().await {
            Ok(phrases) => {
                let _ = sender.send(BackendEvent::PhrasesLoaded(phrases)).await;
            }
            Err(e) => {
                let _ = sender
                    .send(BackendEvent::OperationFailed(
                        Operation::LoadPhrases,
                        e.to_string(),
                    ))
                    .await;
            }
        }
    });
}

/// Translate the input text. Skipped unless the preconditions hold and no
/// translation is already in flight.
pub fn dispatch_translate(state: &Rc<RefCell<AppState>>) {
    if !state.borrow().can_translate() {
        return;
    }

    let (api, sender, text, from, to) = {
        let mut s = state.borrow_mut();
        s.translation = OpState::InFlight;
        (
            s.api.clone(),
            s.backend_sender.clone(),
            s.input_text.clone(),
            s.from_language.clone().unwrap_or_default(),
            s.to_language.clone().unwrap_or_default(),
        )
    };
    update_status(state, "Translating...");

    state.borrow().tokio_rt.spawn(async move {
        match api.translate(&text, &from, &to).await {
            Ok(translated) => {
                let _ = sender
                    .send(BackendEvent::TranslationComplete(translated))
                    .await;
            }
            Err(e) => {
                let _ = sender
                    .send(BackendEvent::OperationFailed(
                        Operation::Translate,
                        e.to_string(),
                    ))
                    .await;
            }
        }
    });
}

/// Synthesize `text` with the currently selected voice and fetch the clip.
/// Used for the input text, the translation, and saved-phrase playback.
pub fn dispatch_speak(state: &Rc<RefCell<AppState>>, text: String, language_code: Option<String>) {
    if !state.borrow().can_speak(&text, language_code.as_deref()) {
        return;
    }
    let language_code = language_code.unwrap_or_default();

    let (api, sender, voice_id) = {
        let mut s = state.borrow_mut();
        s.synthesis = OpState::InFlight;
        (
            s.api.clone(),
            s.backend_sender.clone(),
            s.selected_voice.clone().unwrap_or_default(),
        )
    };
    update_status(state, "Synthesizing...");

    state.borrow().tokio_rt.spawn(async move {
        let result = async {
            let url = api.synthesize(&text, &voice_id, &language_code).await?;
            crate::playback::fetch_clip(&url).await
        }
        .await;

        match result {
            Ok(bytes) => {
                let _ = sender.send(BackendEvent::SynthesisComplete(bytes)).await;
            }
            Err(e) => {
                let _ = sender
                    .send(BackendEvent::OperationFailed(
                        Operation::Synthesize,
                        e.to_string(),
                    ))
                    .await;
            }
        }
    });
}

/// Persist the current translation as a saved phrase.
pub fn dispatch_save(state: &Rc<RefCell<AppState>>) {
    if !state.borrow().can_save() {
        return;
    }

    let s = state.borrow();
    let api = s.api.clone();
    let sender = s.backend_sender.clone();
    let text = s.translated_text.clone();
    let voice_id = s.selected_voice.clone().unwrap_or_default();
    let language_code = s.to_language.clone().unwrap_or_default();

    s.tokio_rt.spawn(async move {
        match api.save_phrase(&text, &voice_id, &language_code).await {
            Ok(_) => {
                let _ = sender.send(BackendEvent::PhraseSaved).await;
            }
            Err(e) => {
                let _ = sender
                    .send(BackendEvent::OperationFailed(
                        Operation::SavePhrase,
                        e.to_string(),
                    ))
                    .await;
            }
        }
    });
}

/// Delete one saved phrase server-side.
pub fn dispatch_delete(state: &Rc<RefCell<AppState>>, id: String) {
    let s = state.borrow();
    let api = s.api.clone();
    let sender = s.backend_sender.clone();

    s.tokio_rt.spawn(async move {
        match api.delete_phrase(&id).await {
            Ok(()) => {
                let _ = sender.send(BackendEvent::PhraseDeleted).await;
            }
            Err(e) => {
                let _ = sender
                    .send(BackendEvent::OperationFailed(
                        Operation::DeletePhrase,
                        e.to_string(),
                    ))
                    .await;
            }
        }
    });
}

/// Run whisper recognition on a finished capture, scoped to the selected
/// source language.
pub fn dispatch_recognition(state: &Rc<RefCell<AppState>>, samples: Vec<f32>) {
    let s = state.borrow();
    let ctx = match &s.recognizer_ctx {
        Some(ctx) => ctx.clone(),
        None => {
            drop(s);
            update_status(state, "Recognizer not ready");
            return;
        }
    };
    let sender = s.backend_sender.clone();
    let language = s
        .from_language
        .as_deref()
        .and_then(crate::language::recognizer_code)
        .unwrap_or("en");

    s.tokio_rt.spawn(async move {
        let result = tokio::task::spawn_blocking(move || {
            crate::recognizer::recognize(&ctx, &samples, language)
        })
        .await;

        match result {
            Ok(Ok(text)) => {
                let _ = sender.send(BackendEvent::DictationResult(text)).await;
            }
            Ok(Err(e)) => {
                let _ = sender
                    .send(BackendEvent::OperationFailed(
                        Operation::Recognize,
                        e.to_string(),
                    ))
                    .await;
            }
            Err(e) => {
                let _ = sender
                    .send(BackendEvent::OperationFailed(
                        Operation::Recognize,
                        format!("recognition task panicked: {e}"),
                    ))
                    .await;
            }
        }
    });
}
