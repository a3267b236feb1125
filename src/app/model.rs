use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use gtk4::glib;

use super::state::{update_status, AppState, BackendEvent};

/// Download the recognizer model if missing, then load it.
pub fn ensure_recognizer(state: &Rc<RefCell<AppState>>) {
    if crate::recognizer::model_exists() {
        load_recognizer(state);
        return;
    }

    log::info!("Recognizer model not found, starting download");
    update_status(state, "Downloading recognizer model...");
    let sender = state.borrow().backend_sender.clone();
    let progress_sender = sender.clone();

    state.borrow().tokio_rt.spawn(async move {
        let result = crate::recognizer::download_model(move |downloaded, total| {
            let _ = progress_sender
                .try_send(BackendEvent::ModelDownloadProgress(downloaded, total));
        })
        .await;

        match result {
            Ok(()) => {
                let _ = sender.send(BackendEvent::ModelDownloadComplete).await;
            }
            Err(e) => {
                let _ = sender
                    .send(BackendEvent::OperationFailed(
                        super::state::Operation::Recognize,
                        format!("model download failed: {e}"),
                    ))
                    .await;
            }
        }
    });
}

/// Load the model in a blocking task, then install the context on the main
/// thread. We can't send Rc<RefCell> into tokio, so a dedicated channel
/// carries the loaded context back.
pub fn load_recognizer(state: &Rc<RefCell<AppState>>) {
    log::info!("Loading recognizer model...");
    update_status(state, "Loading recognizer...");

    let sender = state.borrow().backend_sender.clone();
    let (ctx_tx, ctx_rx) = async_channel::bounded::<whisper_rs::WhisperContext>(1);

    state.borrow().tokio_rt.spawn(async move {
        let result =
            tokio::task::spawn_blocking(crate::recognizer::load_model).await;

        match result {
            Ok(Ok(ctx)) => {
                let _ = ctx_tx.send(ctx).await;
            }
            Ok(Err(e)) => {
                let _ = sender
                    .send(BackendEvent::OperationFailed(
                        super::state::Operation::Recognize,
                        format!("model load failed: {e}"),
                    ))
                    .await;
            }
            Err(e) => {
                let _ = sender
                    .send(BackendEvent::OperationFailed(
                        super::state::Operation::Recognize,
                        format!("model load panicked: {e}"),
                    ))
                    .await;
            }
        }
    });

    let state_clone = state.clone();
    glib::spawn_future_local(async move {
        if let Ok(ctx) = ctx_rx.recv().await {
            state_clone.borrow_mut().recognizer_ctx = Some(Arc::new(ctx));
            update_status(&state_clone, "Idle");
            log::info!("Recognizer ready");
        }
    });
}
