use std::cell::RefCell;
use crate::event::{EditorEvent, EventHandler};

/// A simple event bus for broadcasting editor events to registered handlers
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.borrow().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    /// Emit an event to all registered handlers.
    /// Handlers must not emit from inside `handle_event`.
    pub fn emit(&self, event: EditorEvent) {
        for handler in &mut *self.handlers.borrow_mut() {
            handler.handle_event(&event);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::SelectionEvent;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counter(Rc<Cell<usize>>);

    impl EventHandler for Counter {
        fn handle_event(&mut self, _event: &EditorEvent) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_every_handler_sees_event() {
        let seen = Rc::new(Cell::new(0));
        let bus = EventBus::new();
        bus.subscribe(Box::new(Counter(Rc::clone(&seen))));
        bus.subscribe(Box::new(Counter(Rc::clone(&seen))));

        bus.emit(EditorEvent::SelectionChanged(SelectionEvent::Cleared));
        assert_eq!(seen.get(), 2);
        assert_eq!(bus.handler_count(), 2);
    }
}
