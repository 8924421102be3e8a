//! Test harness for driving the application without a terminal or a
//! running server. Commands execute synchronously and background effects
//! are dropped, so tests inject server responses as data events.

use crate::app_core::{AppCore, DataEventHandler};
use crate::commands::executor;
use crate::events::{AppCommand, DataEvent};
use crate::input::{Key, KeyEvent};
use crate::state::AppState;

/// Handler that applies commands synchronously with no background tasks.
pub struct MockDataHandler;

impl DataEventHandler for MockDataHandler {
    fn execute_with_context(&mut self, command: AppCommand, state: &mut AppState) {
        executor::execute_command_sync(command, state);
    }
}

pub struct TestApp {
    core: AppCore<MockDataHandler>,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            core: AppCore::new(MockDataHandler),
        }
    }

    pub fn send_key(&mut self, key: Key) {
        self.core.handle_key(KeyEvent::new(key));
    }

    pub fn send_keys(&mut self, keys: &[Key]) {
        for key in keys {
            self.send_key(*key);
        }
    }

    /// Type a string as individual character keys.
    pub fn type_str(&mut self, text: &str) {
        for c in text.chars() {
            self.send_key(Key::Char(c));
        }
    }

    pub fn send_data_event(&mut self, event: DataEvent) {
        self.core.handle_data_event(event);
    }

    pub fn execute(&mut self, command: AppCommand) {
        self.core.execute(command);
    }

    pub fn state(&self) -> &AppState {
        self.core.state()
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        self.core.state_mut()
    }

    pub fn assert_should_quit(&self) {
        assert!(self.core.should_quit(), "expected the app to be quitting");
    }

    pub fn assert_not_quit(&self) {
        assert!(!self.core.should_quit(), "expected the app to keep running");
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
