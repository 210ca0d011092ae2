//! Handler registry for live transcription events.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::events::{EventKind, LiveEvent};

/// Callback invoked for each event of a registered kind.
pub type EventHandler = Arc<dyn Fn(&LiveEvent) + Send + Sync>;

/// Mapping from event kind to an ordered list of callbacks.
///
/// Insertion order is invocation order; the same handler may be registered
/// more than once and will be invoked once per registration.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<EventKind, Vec<EventHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for an event kind.
    pub fn on(&mut self, kind: EventKind, handler: EventHandler) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Invoke all handlers registered for this event's kind, in registration
    /// order.
    pub fn dispatch(&self, event: &LiveEvent) {
        match self.handlers.get(&event.kind()) {
            Some(handlers) => {
                for handler in handlers {
                    handler(event);
                }
            }
            None => debug!("no handlers registered for {} event", event.kind()),
        }
    }

    /// Number of handlers registered for a kind.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_handlers_invoked_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HandlerRegistry::new();

        for label in ["first", "second", "third"] {
            let order = order.clone();
            registry.on(
                EventKind::Open,
                Arc::new(move |_| order.lock().push(label)),
            );
        }

        registry.dispatch(&LiveEvent::Open);
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_no_deduplication() {
        let count = Arc::new(Mutex::new(0usize));
        let mut registry = HandlerRegistry::new();

        let handler: EventHandler = {
            let count = count.clone();
            Arc::new(move |_| *count.lock() += 1)
        };
        registry.on(EventKind::Close, handler.clone());
        registry.on(EventKind::Close, handler);

        assert_eq!(registry.handler_count(EventKind::Close), 2);
        registry.dispatch(&LiveEvent::Close);
        assert_eq!(*count.lock(), 2);
    }

    #[test]
    fn test_dispatch_only_matching_kind() {
        let hits = Arc::new(Mutex::new(0usize));
        let mut registry = HandlerRegistry::new();
        {
            let hits = hits.clone();
            registry.on(EventKind::Close, Arc::new(move |_| *hits.lock() += 1));
        }

        registry.dispatch(&LiveEvent::Open);
        assert_eq!(*hits.lock(), 0);
        registry.dispatch(&LiveEvent::Close);
        assert_eq!(*hits.lock(), 1);
    }
}
