use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;

use super::pipeline::dispatch_recognition;
use super::state::{update_status, AppState, DictationState};
use crate::ui::dashboard::refresh_controls;

/// Toggle the one-shot dictation session. The button swaps semantics on the
/// current state; there is no separate "start while recording" action.
pub fn toggle_dictation(state: &Rc<RefCell<AppState>>) {
    match state.borrow().dictation {
        DictationState::Idle => start_dictation(state),
        DictationState::Recording => stop_dictation(state),
    }
}

fn start_dictation(state: &Rc<RefCell<AppState>>) {
    if !state.borrow().can_dictate() {
        return;
    }
    if state.borrow().recognizer_ctx.is_none() {
        // Model still downloading or failed to load; stay idle.
        log::info!("Dictation requested before recognizer is ready");
        update_status(state, "Recognizer not ready");
        return;
    }

    log::info!("Starting dictation");

    {
        let mut s = state.borrow_mut();
        s.transcript.clear();
        s.pronunciation_feedback.clear();
        s.audio_buffer.lock().unwrap().clear();
    }

    let buffer = state.borrow().audio_buffer.clone();
    match crate::recorder::start_capture(buffer) {
        Ok((stream, sample_rate)) => {
            let mut s = state.borrow_mut();
            s.capture_stream = Some(stream);
            s.sample_rate = sample_rate;
            s.dictation = DictationState::Recording;
            if let Some(ref dash) = s.dashboard {
                dash.record_button.set_label("Stop");
                dash.status_label.set_text("Recording...");
                dash.transcript_label.set_text("");
            }
            refresh_controls(&s);
        }
        Err(e) => {
            log::error!("Failed to start dictation: {e}");
            update_status(state, &format!("Mic error: {e}"));
        }
    }
}

fn stop_dictation(state: &Rc<RefCell<AppState>>) {
    log::info!("Stopping dictation");

    let samples: Vec<f32> = {
        let mut s = state.borrow_mut();
        s.capture_stream = None;
        s.dictation = DictationState::Idle;
        if let Some(ref dash) = s.dashboard {
            dash.record_button.set_label("Dictate");
        }
        refresh_controls(&s);
        let captured = s.audio_buffer.lock().unwrap().clone();
        captured
    };

    if samples.is_empty() {
        update_status(state, "No audio captured");
        return;
    }

    let sample_rate = state.borrow().sample_rate;
    log::info!(
        "Captured {} samples ({:.1}s at {}Hz)",
        samples.len(),
        samples.len() as f32 / sample_rate as f32,
        sample_rate
    );

    update_status(state, "Recognizing...");
    dispatch_recognition(state, samples);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_without_recognizer_is_a_quiet_no_op() {
        let (tx, _rx) = async_channel::unbounded();
        let state = Rc::new(RefCell::new(AppState::new(tx)));
        state
            .borrow_mut()
            .set_from_language(Some("en-US".into()));

        toggle_dictation(&state);
        assert_eq!(state.borrow().dictation, DictationState::Idle);
    }

    #[test]
    fn toggle_without_source_language_is_a_no_op() {
        let (tx, _rx) = async_channel::unbounded();
        let state = Rc::new(RefCell::new(AppState::new(tx)));

        toggle_dictation(&state);
        assert_eq!(state.borrow().dictation, DictationState::Idle);
    }
}
