//! Priority-ordered routing of key events between independent UI regions.
//!
//! Each region registers an [`InputHandler`] under an id. On every dispatch
//! the active handlers are snapshotted and ordered by priority (highest
//! first, registration order on ties), then tried until one reports the
//! event as handled.
//!
//! Handlers receive the caller's context `C` mutably, never the dispatcher,
//! so the registry cannot change mid-dispatch. A handler that needs another
//! region registered or removed records the request in `C`; the owner applies
//! it between dispatches, which makes the change visible from the next
//! dispatch on.

use std::cmp::Reverse;

use proto::KeyInput;
use tracing::debug;

/// One UI region competing for key events.
pub trait InputHandler<C> {
    /// Higher priorities are tried first.
    fn priority(&self) -> i32;

    /// Re-evaluated on every dispatch, before any handler runs.
    fn is_active(&self, ctx: &C) -> bool;

    /// Returns `true` when the event was consumed.
    fn handle(&mut self, event: &KeyInput, ctx: &mut C) -> bool;
}

/// Closure-backed [`InputHandler`].
pub struct FnHandler<A, H> {
    priority: i32,
    active: A,
    handle: H,
}

/// Builds a handler from an activity predicate and a handling closure.
pub fn handler_fn<C, A, H>(priority: i32, active: A, handle: H) -> FnHandler<A, H>
where
    A: Fn(&C) -> bool,
    H: FnMut(&KeyInput, &mut C) -> bool,
{
    FnHandler {
        priority,
        active,
        handle,
    }
}

impl<C, A, H> InputHandler<C> for FnHandler<A, H>
where
    A: Fn(&C) -> bool,
    H: FnMut(&KeyInput, &mut C) -> bool,
{
    fn priority(&self) -> i32 {
        self.priority
    }

    fn is_active(&self, ctx: &C) -> bool {
        (self.active)(ctx)
    }

    fn handle(&mut self, event: &KeyInput, ctx: &mut C) -> bool {
        (self.handle)(event, ctx)
    }
}

struct Registration<C> {
    id: String,
    handler: Box<dyn InputHandler<C>>,
}

/// Registry of input handlers keyed by id, in registration order.
pub struct InputDispatcher<C> {
    handlers: Vec<Registration<C>>,
}

impl<C> InputDispatcher<C> {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Registers `handler` under `id`, replacing any handler already there
    /// while keeping its registration position.
    pub fn register(&mut self, id: impl Into<String>, handler: impl InputHandler<C> + 'static) {
        let id = id.into();
        let handler: Box<dyn InputHandler<C>> = Box::new(handler);
        if let Some(existing) = self.handlers.iter_mut().find(|r| r.id == id) {
            debug!(id = %id, "Replacing input handler");
            existing.handler = handler;
        } else {
            debug!(id = %id, "Registering input handler");
            self.handlers.push(Registration { id, handler });
        }
    }

    /// Removes the handler under `id`; returns whether one existed.
    pub fn unregister(&mut self, id: &str) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|r| r.id != id);
        let removed = self.handlers.len() != before;
        if removed {
            debug!(id = %id, "Unregistered input handler");
        }
        removed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.handlers.iter().any(|r| r.id == id)
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> Vec<&str> {
        self.handlers.iter().map(|r| r.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Offers `event` to active handlers in priority order until one
    /// consumes it.
    pub fn dispatch(&mut self, event: &KeyInput, ctx: &mut C) -> bool {
        let mut order: Vec<(i32, usize)> = self
            .handlers
            .iter()
            .enumerate()
            .filter(|(_, r)| r.handler.is_active(ctx))
            .map(|(index, r)| (r.handler.priority(), index))
            .collect();
        // stable: ties keep registration order
        order.sort_by_key(|&(priority, _)| Reverse(priority));

        for (_, index) in order {
            let registration = &mut self.handlers[index];
            if registration.handler.handle(event, ctx) {
                debug!(id = %registration.id, "Key event handled");
                return true;
            }
        }
        false
    }
}

impl<C> Default for InputDispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}
