use crate::commands::handlers;
use crate::events::{AppCommand, DataEvent};
use crate::input::KeyEvent;
use crate::state::{reducer, AppState};

/// Executes commands produced by key handling.
///
/// The real application spawns background tasks here; tests plug in a
/// synchronous handler instead, keeping the core free of terminal and
/// runtime concerns.
pub trait DataEventHandler {
    fn execute_with_context(&mut self, command: AppCommand, state: &mut AppState);
}

/// Terminal-free application core: key events in, state out.
pub struct AppCore<H: DataEventHandler> {
    state: AppState,
    handler: H,
}

impl<H: DataEventHandler> AppCore<H> {
    pub fn new(handler: H) -> Self {
        Self {
            state: AppState::new(),
            handler,
        }
    }

    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if let Some(command) = handlers::handle_key_input(key_event, &self.state) {
            self.handler.execute_with_context(command, &mut self.state);
        }
    }

    pub fn handle_data_event(&mut self, event: DataEvent) {
        reducer::reduce_data_event(&mut self.state, event);
    }

    pub fn execute(&mut self, command: AppCommand) {
        self.handler.execute_with_context(command, &mut self.state);
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit
    }
}
