pub mod components;
pub mod layouts;
pub mod screens;
pub mod theme;
pub mod utils;

use crate::log_buffer::LogBuffer;
use crate::state::{AppState, InputMode};
use ratatui::Frame;
use screens::*;

/// Pure render dispatcher - routes to appropriate screen renderer
/// This function is read-only and never mutates state
pub fn render_app(f: &mut Frame, state: &AppState, log_buffer: &LogBuffer) {
    match state.current_screen() {
        Screen::Dashboard(dashboard) => {
            dashboard_screen::render(f, dashboard);

            match dashboard.input_mode {
                InputMode::CategoryPicker | InputMode::SubcategoryPicker => {
                    if let Some(ref picker) = dashboard.picker {
                        components::picker::render_picker(f, picker, &dashboard.input_mode);
                    }
                }
                InputMode::DescriptionEdit => {
                    if let Some(ref edit) = dashboard.description_edit {
                        components::description_editor::render_description_editor(f, edit);
                    }
                }
                _ => {}
            }
        }
        Screen::Logs(logs_state) => {
            logs_screen::render(f, logs_state, log_buffer);
        }
    }

    if let Some(ref toast) = state.toast {
        components::toast::render_toast(f, toast);
    }

    // Render help popup on top if visible
    if state.help_visible {
        components::help_popup::render_help_popup(f, state.current_screen());
    }
}
