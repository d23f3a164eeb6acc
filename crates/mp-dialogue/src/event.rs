//! Events fired when a dialogue node becomes active.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named side effect implemented outside the dialogue engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueEvent {
    /// Registry key of the handler.
    pub name: String,
    /// Free-form arguments for the handler.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
}

impl DialogueEvent {
    /// Create an event with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Map::new(),
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Get a string parameter.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }
}

/// Implementation of a dialogue event.
pub trait EventHandler<P: ?Sized, N: ?Sized> {
    /// Called when a node carrying the event is entered.
    fn on_triggered(&mut self, event: &DialogueEvent, player: &P, npc: &N);
}

impl<P: ?Sized, N: ?Sized, F> EventHandler<P, N> for F
where
    F: FnMut(&DialogueEvent, &P, &N),
{
    fn on_triggered(&mut self, event: &DialogueEvent, player: &P, npc: &N) {
        self(event, player, npc)
    }
}

/// Event handlers by name.
pub struct EventRegistry<P: ?Sized, N: ?Sized> {
    handlers: HashMap<String, Box<dyn EventHandler<P, N>>>,
}

impl<P: ?Sized, N: ?Sized> EventRegistry<P, N> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a closure under `name`, replacing any previous handler.
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: FnMut(&DialogueEvent, &P, &N) + 'static,
    {
        self.handlers.insert(name.into(), Box::new(handler));
        self
    }

    /// Register a handler type under `name`, replacing any previous one.
    pub fn register_handler<H>(&mut self, name: impl Into<String>, handler: H) -> &mut Self
    where
        H: EventHandler<P, N> + 'static,
    {
        self.handlers.insert(name.into(), Box::new(handler));
        self
    }

    /// Fire one event. Returns false if no handler is registered for it.
    pub fn trigger(&mut self, event: &DialogueEvent, player: &P, npc: &N) -> bool {
        match self.handlers.get_mut(&event.name) {
            Some(handler) => {
                handler.on_triggered(event, player, npc);
                true
            }
            None => {
                tracing::warn!(event = %event.name, "no handler registered for event");
                false
            }
        }
    }

    /// Fire events in order. Returns how many reached a handler.
    pub fn trigger_all(&mut self, events: &[DialogueEvent], player: &P, npc: &N) -> usize {
        events
            .iter()
            .filter(|event| self.trigger(event, player, npc))
            .count()
    }
}

impl<P: ?Sized, N: ?Sized> Default for EventRegistry<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized, N: ?Sized> fmt::Debug for EventRegistry<P, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("EventRegistry")
            .field("handlers", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Journal {
        entries: Rc<RefCell<Vec<String>>>,
    }

    impl EventHandler<str, str> for Journal {
        fn on_triggered(&mut self, event: &DialogueEvent, player: &str, npc: &str) {
            self.entries
                .borrow_mut()
                .push(format!("{player}/{npc}: {}", event.name));
        }
    }

    #[test]
    fn trigger_all_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry: EventRegistry<str, str> = EventRegistry::new();
        let sink = Rc::clone(&log);
        registry.register("give_item", move |event: &DialogueEvent, _: &str, _: &str| {
            sink.borrow_mut()
                .push(format!("give {}", event.param_str("item").unwrap_or("?")));
        });
        registry.register_handler(
            "note",
            Journal {
                entries: Rc::clone(&log),
            },
        );

        let events = vec![
            DialogueEvent::new("note"),
            DialogueEvent::new("give_item").with_param("item", "lantern"),
            DialogueEvent::new("unknown"),
        ];
        let fired = registry.trigger_all(&events, "hero", "smith");

        assert_eq!(fired, 2);
        assert_eq!(
            *log.borrow(),
            vec!["hero/smith: note".to_string(), "give lantern".to_string()]
        );
    }

    #[test]
    fn handlers_keep_state() {
        let mut count = 0;
        let mut registry: EventRegistry<(), ()> = EventRegistry::new();
        let counter = Rc::new(RefCell::new(0));
        let c = Rc::clone(&counter);
        registry.register("tick", move |_: &DialogueEvent, _: &(), _: &()| {
            *c.borrow_mut() += 1;
        });

        for _ in 0..3 {
            if registry.trigger(&DialogueEvent::new("tick"), &(), &()) {
                count += 1;
            }
        }
        assert_eq!(count, 3);
        assert_eq!(*counter.borrow(), 3);
    }
}
