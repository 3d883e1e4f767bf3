//! Shared per-frame dispatcher.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};

/// Timing information handed to every component once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContext {
    /// Frame number, starting at 1 for the first dispatched frame.
    pub frame: u64,
    /// Host time of this frame, measured from an arbitrary origin.
    pub now: Duration,
    /// Time since the previous frame (zero on the first frame).
    pub delta: Duration,
}

/// A component that advances its state once per frame.
pub trait Animated: Send {
    /// Advances the component by one frame.
    fn on_frame(&mut self, frame: &FrameContext);
}

/// Handle to a registered component.
///
/// Lower 32 bits index the slot, upper 32 bits carry the slot generation so
/// a stale handle never reaches a component mounted later in the same slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct AnimationId(u64);

impl AnimationId {
    /// Creates an id from slot index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Slot generation.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }
}

type SharedComponent = Arc<Mutex<dyn Animated>>;

struct Slot {
    generation: u32,
    component: Option<SharedComponent>,
}

#[derive(Default)]
struct Registry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl Registry {
    fn insert(&mut self, component: SharedComponent) -> AnimationId {
        self.live += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.component = Some(component);
            return AnimationId::new(index, slot.generation);
        }

        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            component: Some(component),
        });
        AnimationId::new(index, 0)
    }

    fn remove(&mut self, id: AnimationId) -> bool {
        let Some(slot) = self.slots.get_mut(id.index() as usize) else {
            return false;
        };
        if slot.generation != id.generation() || slot.component.is_none() {
            return false;
        }

        slot.component = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        self.live -= 1;
        true
    }
}

/// Drives every mounted component once per frame.
pub struct FrameDispatcher {
    registry: Arc<Mutex<Registry>>,
    frame: u64,
    last_now: Option<Duration>,
    /// Reused between frames so dispatch does not allocate.
    scratch: Vec<SharedComponent>,
}

impl FrameDispatcher {
    /// Creates an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            frame: 0,
            last_now: None,
            scratch: Vec::new(),
        }
    }

    /// Registers a component and returns the guard that keeps it mounted.
    pub fn mount<T: Animated + 'static>(&self, component: T) -> Mounted<T> {
        let component = Arc::new(Mutex::new(component));
        let erased: SharedComponent = component.clone();
        let id = self.registry.lock().insert(erased);

        tracing::debug!(index = id.index(), generation = id.generation(), "component mounted");

        Mounted {
            component,
            registration: FrameRegistration {
                id,
                registry: Arc::downgrade(&self.registry),
            },
        }
    }

    /// Runs one frame: every mounted component sees `on_frame` exactly once,
    /// in slot order.
    ///
    /// Components unmounted while the frame is running still receive this
    /// frame and none after it.
    pub fn dispatch(&mut self, now: Duration) -> FrameContext {
        self.frame += 1;
        let delta = self
            .last_now
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last_now = Some(now);

        let ctx = FrameContext {
            frame: self.frame,
            now,
            delta,
        };

        {
            let registry = self.registry.lock();
            self.scratch.extend(
                registry
                    .slots
                    .iter()
                    .filter_map(|slot| slot.component.clone()),
            );
        }

        for component in self.scratch.drain(..) {
            component.lock().on_frame(&ctx);
        }

        ctx
    }

    /// Number of mounted components.
    #[must_use]
    pub fn registered(&self) -> usize {
        self.registry.lock().live
    }

    /// Number of frames dispatched so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Default for FrameDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameDispatcher")
            .field("frame", &self.frame)
            .field("registered", &self.registered())
            .finish_non_exhaustive()
    }
}

/// Membership in a dispatcher. Dropping it deregisters the component.
#[derive(Debug)]
pub struct FrameRegistration {
    id: AnimationId,
    registry: Weak<Mutex<Registry>>,
}

impl FrameRegistration {
    /// The id assigned at mount time.
    #[must_use]
    pub fn id(&self) -> AnimationId {
        self.id
    }
}

impl Drop for FrameRegistration {
    fn drop(&mut self) {
        // Dispatcher already gone: nothing left to detach from.
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        if registry.lock().remove(self.id) {
            tracing::debug!(
                index = self.id.index(),
                generation = self.id.generation(),
                "component unmounted"
            );
        }
    }
}

/// A component owned jointly by its host and the dispatcher.
///
/// The host uses [`Mounted::lock`] to feed element-local input; the
/// dispatcher advances it every frame until this guard is dropped.
pub struct Mounted<T> {
    component: Arc<Mutex<T>>,
    registration: FrameRegistration,
}

impl<T> Mounted<T> {
    /// Locks the component for direct access.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.component.lock()
    }

    /// The dispatcher id of this component.
    #[must_use]
    pub fn id(&self) -> AnimationId {
        self.registration.id()
    }

    /// Tears the component down. Equivalent to dropping the guard.
    pub fn unmount(self) {
        drop(self);
    }
}

impl<T> std::fmt::Debug for Mounted<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mounted")
            .field("id", &self.registration.id)
            .finish_non_exhaustive()
    }
}
