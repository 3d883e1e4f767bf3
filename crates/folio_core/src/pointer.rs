//! # Pointer Bus
//!
//! Window-level pointer events fanned out to per-component subscriptions.
//!
//! The host publishes every global pointer event once. Each component that
//! cares holds its own [`PointerSubscription`] and drains it from `on_frame`.
//! The subscription is the listener: dropping it detaches it from the bus,
//! so attach and detach are always paired with the component's lifetime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use parking_lot::Mutex;

use crate::error::{CoreError, CoreResult};
use crate::math::Vec2;

/// Pointer location in both coordinate spaces.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerPosition {
    /// Viewport coordinates.
    pub client: Vec2,
    /// Document coordinates (client plus scroll offset).
    pub page: Vec2,
}

impl PointerPosition {
    /// Builds a position from client coordinates and the current scroll offset.
    #[must_use]
    pub fn from_client(client: Vec2, scroll: Vec2) -> Self {
        Self {
            client,
            page: client + scroll,
        }
    }
}

/// A window-level pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer moved.
    Moved(PointerPosition),
    /// Primary button or touch released anywhere in the window.
    Released,
    /// Pointer left the window.
    Left,
}

type SubscriberList = Mutex<Vec<(u64, Sender<PointerEvent>)>>;

/// Fan-out of window pointer events.
#[derive(Debug)]
pub struct PointerBus {
    subscribers: Arc<SubscriberList>,
    next_id: AtomicU64,
    capacity: usize,
}

impl PointerBus {
    /// Default per-subscription queue depth. A frame rarely sees more than a
    /// handful of moves; anything past this is stale by the time it is read.
    pub const DEFAULT_CAPACITY: usize = 64;

    /// Creates a bus with the default queue depth.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(1),
            capacity: Self::DEFAULT_CAPACITY,
        }
    }

    /// Creates a bus with a custom per-subscription queue depth.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ZeroCapacity`] for a zero capacity.
    pub fn with_capacity(capacity: usize) -> CoreResult<Self> {
        if capacity == 0 {
            return Err(CoreError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            ..Self::new()
        })
    }

    /// Attaches a new listener.
    pub fn subscribe(&self) -> PointerSubscription {
        let (sender, receiver) = bounded(self.capacity);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.lock().push((id, sender));

        tracing::debug!(subscription = id, "pointer listener attached");

        PointerSubscription {
            id,
            receiver,
            bus: Arc::downgrade(&self.subscribers),
        }
    }

    /// Delivers an event to every listener.
    ///
    /// A listener whose queue is full misses this event. Release and leave
    /// events are rare and never crowded out by the per-frame drain, so in
    /// practice only surplus moves are dropped.
    pub fn publish(&self, event: PointerEvent) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|(id, sender)| match sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::trace!(subscription = id, "pointer queue full, event dropped");
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    /// Number of attached listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

impl Default for PointerBus {
    fn default() -> Self {
        Self::new()
    }
}

/// One component's view of the pointer bus.
#[derive(Debug)]
pub struct PointerSubscription {
    id: u64,
    receiver: Receiver<PointerEvent>,
    bus: Weak<SubscriberList>,
}

impl PointerSubscription {
    /// Takes every queued event, oldest first.
    pub fn drain(&self) -> impl Iterator<Item = PointerEvent> + '_ {
        std::iter::from_fn(move || match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        })
    }

    /// Subscription id, unique per bus.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for PointerSubscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.bus.upgrade() {
            subscribers.lock().retain(|(id, _)| *id != self.id);
            tracing::debug!(subscription = self.id, "pointer listener detached");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Moved(PointerPosition::from_client(Vec2::new(x, y), Vec2::ZERO))
    }

    #[test]
    fn test_events_arrive_in_order() {
        let bus = PointerBus::new();
        let sub = bus.subscribe();

        bus.publish(moved(1.0, 1.0));
        bus.publish(PointerEvent::Released);

        let events: Vec<_> = sub.drain().collect();
        assert_eq!(events, vec![moved(1.0, 1.0), PointerEvent::Released]);
        assert_eq!(sub.drain().count(), 0);
    }

    #[test]
    fn test_drop_detaches() {
        let bus = PointerBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(a);
        assert_eq!(bus.subscriber_count(), 1);

        bus.publish(PointerEvent::Left);
        assert_eq!(b.drain().count(), 1);
    }

    #[test]
    fn test_full_queue_drops_without_detaching() {
        let bus = PointerBus::with_capacity(2).unwrap();
        let sub = bus.subscribe();

        for i in 0..5 {
            bus.publish(moved(i as f32, 0.0));
        }

        assert_eq!(bus.subscriber_count(), 1);
        let events: Vec<_> = sub.drain().collect();
        assert_eq!(events, vec![moved(0.0, 0.0), moved(1.0, 0.0)]);
    }

    #[test]
    fn test_page_position_includes_scroll() {
        let pos = PointerPosition::from_client(Vec2::new(10.0, 20.0), Vec2::new(0.0, 300.0));
        assert_eq!(pos.page, Vec2::new(10.0, 320.0));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(PointerBus::with_capacity(0).unwrap_err(), CoreError::ZeroCapacity);
    }
}
