mod dictation;
mod event_handler;
mod model;
mod pipeline;
mod state;

pub use dictation::toggle_dictation;
pub use event_handler::handle_backend_event;
pub use model::ensure_recognizer;
pub use pipeline::{
    dispatch_delete, dispatch_load_phrases, dispatch_load_voices, dispatch_save,
    dispatch_speak, dispatch_translate,
};
pub use state::{AppState, BackendEvent};
