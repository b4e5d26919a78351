//! Reactive per-form field-state store.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use regform_model::{Choice, FieldState};

/// Handle returned by [`FieldStateStore::subscribe`].
pub type SubscriptionId = u64;

/// Delivered to subscribers after every effective write.
#[derive(Debug, Clone)]
pub struct FieldEvent {
    pub field: String,
    pub state: FieldState,
}

/// A multi-field write applied atomically: one comparison against the
/// current state, one notification. The resolver uses this so a level
/// never passes through a transient visible-with-one-option state.
#[derive(Debug, Clone, Default)]
pub struct FieldPatch {
    value: Option<String>,
    visible: Option<bool>,
    enabled: Option<bool>,
    options: Option<Vec<Choice>>,
    touched: Option<bool>,
    validation_error: Option<Option<String>>,
}

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn options(mut self, options: Vec<Choice>) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub fn touched(mut self, touched: bool) -> Self {
        self.touched = Some(touched);
        self
    }

    #[must_use]
    pub fn validation_error(mut self, error: Option<String>) -> Self {
        self.validation_error = Some(error);
        self
    }

    /// The collapse state for a level whose ancestor is unset or whose
    /// data is unavailable: hidden, disabled, empty value, no options,
    /// no stale validation message.
    pub fn collapse() -> Self {
        Self::new()
            .value(String::new())
            .visible(false)
            .enabled(false)
            .options(Vec::new())
            .validation_error(None)
    }
}

type Callback = Rc<RefCell<dyn FnMut(&FieldEvent)>>;

struct Subscriber {
    id: SubscriptionId,
    filter: Option<String>,
    callback: Callback,
}

struct StoreInner {
    fields: BTreeMap<String, FieldState>,
    initial: BTreeMap<String, FieldState>,
    subscribers: Vec<Subscriber>,
    next_id: SubscriptionId,
}

/// Reactive key/value store of [`FieldState`] per field name.
///
/// One store per form instance, never shared between forms. The handle
/// is a cheap clone; the resolver and the rendering adapter hold clones
/// of the same store within one event loop.
///
/// All mutators are synchronous and last-write-wins. Subscribers are
/// notified synchronously after each write that changed state; writes
/// that change nothing notify nobody, which is what makes repeated
/// resolution passes observably idempotent.
///
/// # Panics
///
/// Every accessor and mutator panics when given a field name that was
/// not declared at construction time. That is a programming error in
/// the hosting integration, surfaced loudly during development rather
/// than silently creating fields.
#[derive(Clone)]
pub struct FieldStateStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl FieldStateStore {
    /// Create a store over the declared fields and their initial states.
    pub fn new(fields: impl IntoIterator<Item = (String, FieldState)>) -> Self {
        let fields: BTreeMap<String, FieldState> = fields.into_iter().collect();
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                initial: fields.clone(),
                fields,
                subscribers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Current state of a field (cloned snapshot).
    pub fn get(&self, name: &str) -> FieldState {
        self.inner
            .borrow()
            .fields
            .get(name)
            .cloned()
            .unwrap_or_else(|| undeclared(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.borrow().fields.contains_key(name)
    }

    /// Snapshot of every field's current state.
    pub fn snapshot(&self) -> BTreeMap<String, FieldState> {
        self.inner.borrow().fields.clone()
    }

    /// Apply a patch atomically. Returns whether anything changed;
    /// subscribers are notified only in that case.
    pub fn apply(&self, name: &str, patch: FieldPatch) -> bool {
        let event = {
            let mut inner = self.inner.borrow_mut();
            let Some(state) = inner.fields.get_mut(name) else {
                undeclared(name)
            };
            let mut next = state.clone();
            if let Some(value) = patch.value {
                next.value = value;
            }
            if let Some(visible) = patch.visible {
                next.visible = visible;
            }
            if let Some(enabled) = patch.enabled {
                next.enabled = enabled;
            }
            if let Some(options) = patch.options {
                next.options = options;
            }
            if let Some(touched) = patch.touched {
                next.touched = touched;
            }
            if let Some(error) = patch.validation_error {
                next.validation_error = error;
            }
            if next == *state {
                return false;
            }
            *state = next.clone();
            FieldEvent {
                field: name.to_string(),
                state: next,
            }
        };
        self.notify(&event);
        true
    }

    pub fn set_value(&self, name: &str, value: impl Into<String>) {
        self.apply(name, FieldPatch::new().value(value));
    }

    pub fn set_visible(&self, name: &str, visible: bool) {
        self.apply(name, FieldPatch::new().visible(visible));
    }

    pub fn set_enabled(&self, name: &str, enabled: bool) {
        self.apply(name, FieldPatch::new().enabled(enabled));
    }

    pub fn set_options(&self, name: &str, options: Vec<Choice>) {
        self.apply(name, FieldPatch::new().options(options));
    }

    pub fn set_touched(&self, name: &str) {
        self.apply(name, FieldPatch::new().touched(true));
    }

    pub fn set_validation_error(&self, name: &str, error: Option<String>) {
        self.apply(name, FieldPatch::new().validation_error(error));
    }

    /// Restore every field to its declared initial state, notifying per
    /// changed field. Fields are never deleted during a session.
    pub fn reset(&self) {
        let events = {
            let mut inner = self.inner.borrow_mut();
            let initial = inner.initial.clone();
            let mut events = Vec::new();
            for (name, init) in initial {
                if let Some(state) = inner.fields.get_mut(&name) {
                    if *state != init {
                        *state = init.clone();
                        events.push(FieldEvent {
                            field: name,
                            state: init,
                        });
                    }
                }
            }
            events
        };
        for event in &events {
            self.notify(event);
        }
    }

    /// Subscribe to one field (`Some(name)`) or to every field (`None`).
    ///
    /// The callback runs synchronously after each effective write and
    /// may read the store; it must not mutate the field it is being
    /// notified about.
    pub fn subscribe<F>(&self, field: Option<&str>, callback: F) -> SubscriptionId
    where
        F: FnMut(&FieldEvent) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push(Subscriber {
            id,
            filter: field.map(str::to_string),
            callback: Rc::new(RefCell::new(callback)),
        });
        id
    }

    /// Detach a subscriber. A destroyed form adapter must call this; it
    /// stops consuming updates without affecting in-flight data loads.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .borrow_mut()
            .subscribers
            .retain(|subscriber| subscriber.id != id);
    }

    fn notify(&self, event: &FieldEvent) {
        // Collect matching callbacks first so the store borrow is
        // released before user code runs and reads back.
        let callbacks: Vec<Callback> = {
            let inner = self.inner.borrow();
            inner
                .subscribers
                .iter()
                .filter(|subscriber| {
                    subscriber
                        .filter
                        .as_deref()
                        .is_none_or(|field| field == event.field)
                })
                .map(|subscriber| Rc::clone(&subscriber.callback))
                .collect()
        };
        for callback in callbacks {
            (callback.borrow_mut())(event);
        }
    }
}

fn undeclared(name: &str) -> ! {
    panic!("field '{name}' is not declared in the form schema");
}
