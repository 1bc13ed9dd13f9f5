//! Process-wide observed UI state.
//!
//! Scroll position, viewport size and pointer capability are owned by the
//! host event wiring (the only writer) and handed to panels and the cursor as
//! read-only views. A view can read the current value or subscribe; the
//! returned [`Subscription`] unsubscribes when dropped, so a panel that goes
//! away takes its listener with it.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use glam::Vec2;

use crate::geometry::Viewport;

type Callback<T> = Rc<dyn Fn(&T)>;

struct Slot<T> {
    value: T,
    next_id: u64,
    subscribers: Vec<(u64, Callback<T>)>,
}

/// Writable end of an observed value.
pub struct Signal<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

/// Read-only end of an observed value.
pub struct SignalView<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for SignalView<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot {
                value,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn get(&self) -> T {
        self.slot.borrow().value.clone()
    }

    /// Store `value` and notify subscribers. Returns false (and notifies
    /// nobody) when the value did not change.
    pub fn set(&self, value: T) -> bool {
        let callbacks = {
            let mut slot = self.slot.borrow_mut();
            if slot.value == value {
                return false;
            }
            slot.value = value.clone();
            slot.subscribers
                .iter()
                .map(|(id, cb)| (*id, cb.clone()))
                .collect::<Vec<_>>()
        };
        // Borrow released: callbacks may read the signal or (un)subscribe.
        for (id, cb) in callbacks {
            // skip subscribers an earlier callback dropped
            let live = self.slot.borrow().subscribers.iter().any(|(sid, _)| *sid == id);
            if live {
                cb(&value);
            }
        }
        true
    }

    pub fn view(&self) -> SignalView<T> {
        SignalView {
            slot: self.slot.clone(),
        }
    }
}

impl<T: Clone + 'static> SignalView<T> {
    pub fn get(&self) -> T {
        self.slot.borrow().value.clone()
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut slot = self.slot.borrow_mut();
            let id = slot.next_id;
            slot.next_id += 1;
            slot.subscribers.push((id, Rc::new(callback)));
            id
        };
        let weak: Weak<RefCell<Slot<T>>> = Rc::downgrade(&self.slot);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(slot) = weak.upgrade() {
                    slot.borrow_mut().subscribers.retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.slot.borrow().subscribers.len()
    }
}

/// Live registration on a [`SignalView`]; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Unsubscribe now rather than at end of scope.
    pub fn cancel(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.release.is_some())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerCapability {
    /// Hover-capable precise pointer (mouse, trackpad).
    Fine,
    /// Touch-primary or otherwise imprecise input.
    Coarse,
}

/// All observed UI state, writer side. Owned by the host event wiring.
pub struct UiSignals {
    pub scroll: Signal<Vec2>,
    pub viewport: Signal<Viewport>,
    pub pointer: Signal<PointerCapability>,
}

impl UiSignals {
    pub fn new(scroll: Vec2, viewport: Viewport, pointer: PointerCapability) -> Self {
        Self {
            scroll: Signal::new(scroll),
            viewport: Signal::new(viewport),
            pointer: Signal::new(pointer),
        }
    }

    pub fn view(&self) -> UiSignalsView {
        UiSignalsView {
            scroll: self.scroll.view(),
            viewport: self.viewport.view(),
            pointer: self.pointer.view(),
        }
    }
}

/// All observed UI state, reader side. Cheap to clone.
#[derive(Clone)]
pub struct UiSignalsView {
    pub scroll: SignalView<Vec2>,
    pub viewport: SignalView<Viewport>,
    pub pointer: SignalView<PointerCapability>,
}
