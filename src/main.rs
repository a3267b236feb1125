mod api;
mod app;
mod config;
mod language;
mod playback;
mod recognizer;
mod recorder;
mod ui;

use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;
use libadwaita::prelude::*;

use app::{AppState, BackendEvent};
use language::SUPPORTED_LANGUAGES;

fn main() {
    env_logger::init();
    log::info!("Phrase Tutor starting");

    let application = libadwaita::Application::builder()
        .application_id("com.github.phrasetutor.phrase-tutor")
        .build();

    application.connect_activate(on_activate);
    application.run();
}

/// Map a dropdown index to a language code; index 0 is the placeholder.
fn language_for_index(index: u32) -> Option<String> {
    if index == 0 || index == gtk4::INVALID_LIST_POSITION {
        return None;
    }
    SUPPORTED_LANGUAGES
        .get(index as usize - 1)
        .map(|l| l.code.to_string())
}

fn on_activate(app: &libadwaita::Application) {
    // Async channel for backend → UI communication
    let (backend_tx, backend_rx) = async_channel::unbounded::<BackendEvent>();

    let state = Rc::new(RefCell::new(AppState::new(backend_tx)));

    // Build UI
    let dashboard = ui::dashboard::build_dashboard(
        app,
        "Starting...",
        &state.borrow().config.backend_url,
    );

    // Wire up language selectors
    {
        let state_clone = state.clone();
        dashboard.from_dropdown.connect_selected_notify(move |dd| {
            let mut s = state_clone.borrow_mut();
            s.set_from_language(language_for_index(dd.selected()));
            if let Some(ref dash) = s.dashboard {
                dash.transcript_label.set_text("");
            }
            ui::dashboard::refresh_controls(&s);
        });
    }
    {
        let state_clone = state.clone();
        dashboard.to_dropdown.connect_selected_notify(move |dd| {
            let mut s = state_clone.borrow_mut();
            s.set_to_language(language_for_index(dd.selected()));
            ui::dashboard::refresh_controls(&s);
        });
    }

    // Mirror the input buffer into state
    {
        let state_clone = state.clone();
        dashboard.input_view.buffer().connect_changed(move |buf| {
            let text = buf
                .text(&buf.start_iter(), &buf.end_iter(), false)
                .to_string();
            let mut s = state_clone.borrow_mut();
            s.input_text = text;
            ui::dashboard::refresh_controls(&s);
        });
    }

    // Wire up actions
    {
        let state_clone = state.clone();
        dashboard.record_button.connect_clicked(move |_| {
            app::toggle_dictation(&state_clone);
        });
    }
    {
        let state_clone = state.clone();
        dashboard.listen_input_button.connect_clicked(move |_| {
            let (text, language) = {
                let s = state_clone.borrow();
                (s.input_text.clone(), s.from_language.clone())
            };
            app::dispatch_speak(&state_clone, text, language);
        });
    }
    {
        let state_clone = state.clone();
        dashboard.translate_button.connect_clicked(move |_| {
            app::dispatch_translate(&state_clone);
        });
    }
    {
        let state_clone = state.clone();
        dashboard
            .listen_translation_button
            .connect_clicked(move |_| {
                let (text, language) = {
                    let s = state_clone.borrow();
                    (s.translated_text.clone(), s.to_language.clone())
                };
                app::dispatch_speak(&state_clone, text, language);
            });
    }
    {
        let state_clone = state.clone();
        dashboard.save_button.connect_clicked(move |_| {
            app::dispatch_save(&state_clone);
        });
    }

    // Persist backend URL edits and rebuild the client
    {
        let state_clone = state.clone();
        dashboard
            .backend_url_row
            .connect_changed(move |row: &libadwaita::EntryRow| {
                let url = row.text().to_string();
                let mut s = state_clone.borrow_mut();
                s.config.backend_url = url;
                s.api = api::ApiClient::new(&s.config.backend_url);
                if let Err(e) = s.config.save() {
                    log::warn!("Failed to save config: {e}");
                }
            });
    }

    // Store UI handles in state
    state.borrow_mut().dashboard = Some(dashboard);

    // Show the dashboard
    state.borrow().dashboard.as_ref().unwrap().window.present();

    // Attach backend event handler
    {
        let state_clone = state.clone();
        gtk4::glib::spawn_future_local(async move {
            while let Ok(event) = backend_rx.recv().await {
                app::handle_backend_event(&state_clone, event);
            }
        });
    }

    // Initial loads and recognizer bootstrap
    app::dispatch_load_voices(&state);
    app::dispatch_load_phrases(&state);
    app::ensure_recognizer(&state);
}
