pub mod app;
pub mod app_core;
pub mod background;
pub mod cache;
pub mod commands;
pub mod events;
pub mod hooks;
pub mod input;
pub mod log_buffer;
pub mod logging;
pub mod settings;
pub mod state;
pub mod testing;
pub mod ui;

pub use app::App;
pub use settings::Settings;
