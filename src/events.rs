//! Per-entity publish/subscribe.
//!
//! An [`Emitter`] fans each event out to registered observers and also keeps it in a bounded
//! pending queue, so owners that poll (controllers, hosts, tests) can [`Emitter::drain`] instead
//! of subscribing.

use std::{collections::VecDeque, fmt};

/// Maximum number of undrained events kept per emitter; older ones are dropped first.
pub const MAX_PENDING_EVENTS: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer<E> = Box<dyn FnMut(&E) + Send>;

pub struct Emitter<E> {
    observers: Vec<(SubscriptionId, Observer<E>)>,
    pending: VecDeque<E>,
    next_id: u64,
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self {
            observers: Vec::new(),
            pending: VecDeque::new(),
            next_id: 0,
        }
    }
}

impl<E> fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("observers", &self.observers.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl<E> Emitter<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&E) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn emit(&mut self, event: E) {
        for (_, observer) in &mut self.observers {
            observer(&event);
        }
        if self.pending.len() == MAX_PENDING_EVENTS {
            self.pending.pop_front();
            tracing::trace!("event queue full, dropping oldest");
        }
        self.pending.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<E> {
        self.pending.drain(..).collect()
    }

    pub fn pending(&self) -> impl Iterator<Item = &E> {
        self.pending.iter()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}
