pub mod description_editor;
pub mod empty_state;
pub mod help_bar;
pub mod help_popup;
pub mod loading_indicator;
pub mod picker;
pub mod popup;
pub mod screen_title;
pub mod toast;
