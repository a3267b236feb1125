use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;
use libadwaita::prelude::*;

use crate::api::SavedPhrase;
use crate::app::{dispatch_delete, dispatch_speak, AppState};

/// Rebuild the saved-phrases list from state. Called after every refetch.
pub fn populate(state: &Rc<RefCell<AppState>>) {
    let (list, phrases) = {
        let s = state.borrow();
        let Some(ref dash) = s.dashboard else { return };
        (dash.phrases_list.clone(), s.phrases.clone())
    };

    while let Some(child) = list.first_child() {
        list.remove(&child);
    }

    if phrases.is_empty() {
        let empty_label = gtk4::Label::new(Some("No saved phrases yet"));
        empty_label.add_css_class("dim-label");
        empty_label.set_margin_top(12);
        empty_label.set_margin_bottom(12);
        list.append(&empty_label);
        return;
    }

    for phrase in &phrases {
        list.append(&build_phrase_row(state, phrase));
    }
}

/// Build one row: phrase text, language subtitle, play and delete buttons.
fn build_phrase_row(state: &Rc<RefCell<AppState>>, phrase: &SavedPhrase) -> libadwaita::ActionRow {
    let row = libadwaita::ActionRow::new();
    row.set_use_markup(false);
    row.set_title(&phrase.text);
    row.set_subtitle(&format!(
        "{} · {}",
        crate::language::display_name(&phrase.language_code),
        phrase.voice_id
    ));

    let play_btn = gtk4::Button::from_icon_name("media-playback-start-symbolic");
    play_btn.set_valign(gtk4::Align::Center);
    play_btn.set_tooltip_text(Some("Play"));
    play_btn.add_css_class("flat");

    // Playback uses the currently selected voice, same as the rest of the
    // speak actions.
    let state_for_play = state.clone();
    let text = phrase.text.clone();
    let language_code = phrase.language_code.clone();
    play_btn.connect_clicked(move |_| {
        dispatch_speak(
            &state_for_play,
            text.clone(),
            Some(language_code.clone()),
        );
    });
    row.add_suffix(&play_btn);

    let delete_btn = gtk4::Button::from_icon_name("user-trash-symbolic");
    delete_btn.set_valign(gtk4::Align::Center);
    delete_btn.set_tooltip_text(Some("Delete"));
    delete_btn.add_css_class("flat");

    let state_for_delete = state.clone();
    let id = phrase.id.clone();
    delete_btn.connect_clicked(move |_| {
        dispatch_delete(&state_for_delete, id.clone());
    });
    row.add_suffix(&delete_btn);

    row
}
