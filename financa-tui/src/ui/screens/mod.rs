pub mod dashboard_screen;
pub mod logs_screen;

use crate::state::{DashboardState, LogsState};

#[derive(Debug, Clone)]
pub enum Screen {
    Dashboard(Box<DashboardState>),
    Logs(LogsState),
}
