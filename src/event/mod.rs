mod bus;
mod events;

pub use bus::EventBus;
pub use events::*;

pub trait EventHandler {
    fn handle_event(&mut self, event: &EditorEvent);
}

/// Writes every editor event to the debug log
#[derive(Debug, Default)]
pub struct LoggingHandler;

impl EventHandler for LoggingHandler {
    fn handle_event(&mut self, event: &EditorEvent) {
        log::debug!("Editor event: {:?}", event);
    }
}
