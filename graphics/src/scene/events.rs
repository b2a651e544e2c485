//! Per-frame camera notifications.
//!
//! A [`CameraEvents`] hub is owned by a renderer and cloned to whoever wants
//! to contribute passes. Subscribing returns a [`Subscription`]; dropping it
//! removes the listener, so a listener never outlives its owner.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::frame::PassQueue;

use super::Camera;

/// Context handed to listeners once per camera per frame.
#[derive(Debug)]
pub struct CameraFrame<'a> {
    /// The camera about to render.
    pub camera: &'a Camera,
    /// Passes to record for this camera.
    pub queue: PassQueue,
}

impl<'a> CameraFrame<'a> {
    /// Create a frame context with an empty queue.
    pub fn new(camera: &'a Camera) -> Self {
        Self {
            camera,
            queue: PassQueue::new(),
        }
    }
}

type Listener = dyn Fn(&mut CameraFrame<'_>) + Send + Sync;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Arc<Listener>)>,
}

/// Notification hub for the start of each camera's frame.
#[derive(Clone, Default)]
pub struct CameraEvents {
    listeners: Arc<Mutex<Listeners>>,
}

impl CameraEvents {
    /// Create a hub with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`; it stays registered until the returned
    /// [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(
        &self,
        listener: impl Fn(&mut CameraFrame<'_>) + Send + Sync + 'static,
    ) -> Subscription {
        let mut listeners = self.listeners.lock();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));
        log::debug!("CameraEvents: listener {id} subscribed");
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Notify every listener, in subscription order.
    ///
    /// The hub lock is released before any listener runs, so listeners may
    /// subscribe or drop subscriptions.
    pub fn notify(&self, frame: &mut CameraFrame<'_>) {
        let snapshot: Vec<Arc<Listener>> = self
            .listeners
            .lock()
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(frame);
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().entries.len()
    }
}

impl std::fmt::Debug for CameraEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraEvents")
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

/// Scoped registration with a [`CameraEvents`] hub.
///
/// Dropping the subscription unregisters the listener. If the hub is gone
/// first, dropping does nothing.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    /// Check whether the hub still exists.
    pub fn is_connected(&self) -> bool {
        self.listeners.strong_count() > 0
    }

    /// Unregister now. Equivalent to dropping.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().entries.retain(|(id, _)| *id != self.id);
            log::debug!("CameraEvents: listener {} unsubscribed", self.id);
        }
    }
}

static_assertions::assert_impl_all!(CameraEvents: Send, Sync, Clone);
static_assertions::assert_impl_all!(Subscription: Send, Sync);
