use gtk4::prelude::*;
use libadwaita::prelude::*;

use crate::app::AppState;
use crate::language::SUPPORTED_LANGUAGES;

/// Handles returned from building the dashboard window.
pub struct DashboardWidgets {
    pub window: libadwaita::ApplicationWindow,
    pub status_label: gtk4::Label,
    pub from_dropdown: gtk4::DropDown,
    pub to_dropdown: gtk4::DropDown,
    pub record_button: gtk4::Button,
    pub transcript_label: gtk4::Label,
    pub input_view: gtk4::TextView,
    pub listen_input_button: gtk4::Button,
    pub translate_button: gtk4::Button,
    pub translated_label: gtk4::Label,
    pub listen_translation_button: gtk4::Button,
    pub save_button: gtk4::Button,
    pub phrases_list: gtk4::ListBox,
    pub backend_url_row: libadwaita::EntryRow,
    pub progress_bar: gtk4::ProgressBar,
}

/// Recompute widget sensitivity from the gating rules. Called after every
/// state transition.
pub fn refresh_controls(s: &AppState) {
    let Some(ref dash) = s.dashboard else { return };
    dash.translate_button.set_sensitive(s.can_translate());
    dash.record_button.set_sensitive(s.can_dictate());
    dash.listen_input_button
        .set_sensitive(s.can_speak(&s.input_text, s.from_language.as_deref()));
    dash.listen_translation_button
        .set_sensitive(s.can_speak(&s.translated_text, s.to_language.as_deref()));
    dash.save_button.set_sensitive(s.can_save());
}

fn language_dropdown() -> gtk4::DropDown {
    let mut names: Vec<&str> = vec!["Select language"];
    names.extend(SUPPORTED_LANGUAGES.iter().map(|l| l.name));
    let dropdown = gtk4::DropDown::from_strings(&names);
    dropdown.set_valign(gtk4::Align::Center);
    dropdown
}

/// Build the main dashboard window.
pub fn build_dashboard(
    app: &libadwaita::Application,
    initial_status: &str,
    initial_backend_url: &str,
) -> DashboardWidgets {
    let window = libadwaita::ApplicationWindow::builder()
        .application(app)
        .title("Phrase Tutor")
        .default_width(520)
        .default_height(680)
        .build();

    let toolbar_view = libadwaita::ToolbarView::new();
    let header = libadwaita::HeaderBar::new();
    toolbar_view.add_top_bar(&header);

    let content = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    content.set_margin_start(16);
    content.set_margin_end(16);
    content.set_margin_top(12);
    content.set_margin_bottom(12);

    // --- Status group ---
    let status_group = libadwaita::PreferencesGroup::new();
    status_group.set_title("Status");

    let status_row = libadwaita::ActionRow::builder()
        .title("Current State")
        .build();
    let status_label = gtk4::Label::new(Some(initial_status));
    status_label.add_css_class("dim-label");
    status_row.add_suffix(&status_label);
    status_group.add(&status_row);

    content.append(&status_group);

    // --- Languages group ---
    let language_group = libadwaita::PreferencesGroup::new();
    language_group.set_title("Languages");
    language_group.set_margin_top(12);

    let from_row = libadwaita::ActionRow::builder()
        .title("From")
        .build();
    let from_dropdown = language_dropdown();
    from_row.add_suffix(&from_dropdown);
    language_group.add(&from_row);

    let to_row = libadwaita::ActionRow::builder()
        .title("To")
        .build();
    let to_dropdown = language_dropdown();
    to_row.add_suffix(&to_dropdown);
    language_group.add(&to_row);

    content.append(&language_group);

    // --- Input group ---
    let input_group = libadwaita::PreferencesGroup::new();
    input_group.set_title("Enter Text");
    input_group.set_margin_top(12);

    let record_button = gtk4::Button::builder()
        .label("Dictate")
        .valign(gtk4::Align::Center)
        .sensitive(false)
        .build();
    input_group.set_header_suffix(Some(&record_button));

    let transcript_label = gtk4::Label::new(None);
    transcript_label.add_css_class("dim-label");
    transcript_label.set_xalign(0.0);
    transcript_label.set_wrap(true);
    input_group.add(&transcript_label);

    let input_view = gtk4::TextView::new();
    input_view.set_wrap_mode(gtk4::WrapMode::WordChar);
    input_view.set_top_margin(8);
    input_view.set_bottom_margin(8);
    input_view.set_left_margin(8);
    input_view.set_right_margin(8);

    let input_frame = gtk4::Frame::new(None);
    let input_scroll = gtk4::ScrolledWindow::builder()
        .hscrollbar_policy(gtk4::PolicyType::Never)
        .min_content_height(96)
        .child(&input_view)
        .build();
    input_frame.set_child(Some(&input_scroll));
    input_group.add(&input_frame);

    let input_actions = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
    input_actions.set_halign(gtk4::Align::End);
    input_actions.set_margin_top(8);

    let listen_input_button = gtk4::Button::builder()
        .label("Listen")
        .sensitive(false)
        .build();
    input_actions.append(&listen_input_button);

    let translate_button = gtk4::Button::builder()
        .label("Translate")
        .sensitive(false)
        .build();
    translate_button.add_css_class("suggested-action");
    input_actions.append(&translate_button);

    input_group.add(&input_actions);
    content.append(&input_group);

    // --- Translation group ---
    let translation_group = libadwaita::PreferencesGroup::new();
    translation_group.set_title("Translation");
    translation_group.set_margin_top(12);

    let translated_label = gtk4::Label::new(None);
    translated_label.set_wrap(true);
    translated_label.set_xalign(0.0);
    translated_label.set_selectable(true);
    translation_group.add(&translated_label);

    let translation_actions = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
    translation_actions.set_halign(gtk4::Align::End);
    translation_actions.set_margin_top(8);

    let listen_translation_button = gtk4::Button::builder()
        .label("Listen")
        .sensitive(false)
        .build();
    translation_actions.append(&listen_translation_button);

    let save_button = gtk4::Button::builder()
        .label("Save")
        .sensitive(false)
        .build();
    translation_actions.append(&save_button);

    translation_group.add(&translation_actions);
    content.append(&translation_group);

    // --- Saved phrases group ---
    let phrases_group = libadwaita::PreferencesGroup::new();
    phrases_group.set_title("Saved Phrases");
    phrases_group.set_margin_top(12);

    let phrases_list = gtk4::ListBox::new();
    phrases_list.set_selection_mode(gtk4::SelectionMode::None);
    phrases_list.add_css_class("boxed-list");
    phrases_group.add(&phrases_list);

    content.append(&phrases_group);

    // --- Backend group ---
    let backend_group = libadwaita::PreferencesGroup::new();
    backend_group.set_title("Backend");
    backend_group.set_margin_top(12);

    let backend_url_row = libadwaita::EntryRow::builder()
        .title("Base URL")
        .text(initial_backend_url)
        .build();
    backend_group.add(&backend_url_row);

    content.append(&backend_group);

    // --- Download progress bar ---
    let progress_bar = gtk4::ProgressBar::new();
    progress_bar.set_margin_top(16);
    progress_bar.set_visible(false);
    progress_bar.set_show_text(true);
    progress_bar.set_text(Some("Downloading recognizer model..."));
    content.append(&progress_bar);

    // Assemble
    let scrolled = gtk4::ScrolledWindow::builder()
        .hscrollbar_policy(gtk4::PolicyType::Never)
        .child(&content)
        .build();
    toolbar_view.set_content(Some(&scrolled));
    window.set_content(Some(&toolbar_view));

    DashboardWidgets {
        window,
        status_label,
        from_dropdown,
        to_dropdown,
        record_button,
        transcript_label,
        input_view,
        listen_input_button,
        translate_button,
        translated_label,
        listen_translation_button,
        save_button,
        phrases_list,
        backend_url_row,
        progress_bar,
    }
}
