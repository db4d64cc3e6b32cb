use serde_json::{Map, Value};

use crate::{CONTEXT_KEY, CURRENT_STEP_KEY, EVENT_KEY};

/// The mutable data object threaded through a chain run.
///
/// Seeded with the opaque `event` and `context` values when the run starts.
/// Steps receive it by mutable reference and may add, overwrite, or remove
/// keys in place; a step that prefers wholesale replacement hands the new map
/// to its continuation via [`Next::advance_with`](crate::Next::advance_with)
/// instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunningContext {
    entries: Map<String, Value>,
}

impl RunningContext {
    /// Seed a fresh context from the invocation pair.
    pub(crate) fn seeded(event: Value, context: Value) -> Self {
        let mut entries = Map::new();
        entries.insert(EVENT_KEY.to_string(), event);
        entries.insert(CONTEXT_KEY.to_string(), context);
        Self { entries }
    }

    /// Build a context directly from a map, as when a step replaces the
    /// running context through its continuation.
    pub fn from_map(entries: Map<String, Value>) -> Self {
        Self { entries }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read access to the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// The name of the step currently being driven, if any.
    pub fn current_step(&self) -> Option<&str> {
        self.entries.get(CURRENT_STEP_KEY).and_then(Value::as_str)
    }

    pub(crate) fn set_current_step(&mut self, name: &str) {
        self.entries
            .insert(CURRENT_STEP_KEY.to_string(), Value::String(name.to_string()));
    }

    /// The success payload: every accumulated key except the seed pair and
    /// the bookkeeping entry.
    pub(crate) fn into_payload(mut self) -> Map<String, Value> {
        self.entries.remove(EVENT_KEY);
        self.entries.remove(CONTEXT_KEY);
        self.entries.remove(CURRENT_STEP_KEY);
        self.entries
    }
}

impl From<Map<String, Value>> for RunningContext {
    fn from(entries: Map<String, Value>) -> Self {
        Self::from_map(entries)
    }
}
