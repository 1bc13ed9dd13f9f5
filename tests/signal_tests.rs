// Host-side tests for observed UI state.

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::{PointerCapability, Signal, Subscription, UiSignals, Viewport};
use glam::Vec2;

#[test]
fn set_notifies_only_on_change() {
    let signal = Signal::new(1);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let _sub = {
        let seen = seen.clone();
        signal.view().subscribe(move |v| seen.borrow_mut().push(*v))
    };
    assert!(signal.set(2));
    assert!(!signal.set(2));
    assert!(signal.set(3));
    assert_eq!(*seen.borrow(), vec![2, 3]);
    assert_eq!(signal.get(), 3);
    assert_eq!(signal.view().get(), 3);
}

#[test]
fn dropping_or_cancelling_unsubscribes() {
    let signal = Signal::new(0);
    let view = signal.view();
    let first = view.subscribe(|_| {});
    let second = view.subscribe(|_| {});
    assert_eq!(view.subscriber_count(), 2);

    drop(first);
    assert_eq!(view.subscriber_count(), 1);
    second.cancel();
    assert_eq!(view.subscriber_count(), 0);
}

#[test]
fn subscription_outliving_its_signal_is_harmless() {
    let sub = {
        let signal = Signal::new(Vec2::ZERO);
        let view = signal.view();
        let sub = view.subscribe(|_| {});
        drop(view);
        sub
    };
    drop(sub);
}

#[test]
fn callbacks_may_unsubscribe_themselves() {
    let signal = Signal::new(0);
    let view = signal.view();
    let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let calls = Rc::new(RefCell::new(0));
    let sub = {
        let slot = slot.clone();
        let calls = calls.clone();
        view.subscribe(move |_| {
            *calls.borrow_mut() += 1;
            if let Some(sub) = slot.borrow_mut().take() {
                sub.cancel();
            }
        })
    };
    *slot.borrow_mut() = Some(sub);

    signal.set(1);
    signal.set(2);
    assert_eq!(*calls.borrow(), 1);
    assert_eq!(view.subscriber_count(), 0);
}

#[test]
fn subscriber_dropped_mid_dispatch_is_not_called() {
    let signal = Signal::new(0);
    let view = signal.view();
    let later: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let later_calls = Rc::new(RefCell::new(Vec::new()));

    let _first = {
        let later = later.clone();
        view.subscribe(move |_| {
            later.borrow_mut().take();
        })
    };
    let second = {
        let later_calls = later_calls.clone();
        view.subscribe(move |v| later_calls.borrow_mut().push(*v))
    };
    *later.borrow_mut() = Some(second);

    signal.set(1);
    signal.set(2);
    assert!(later_calls.borrow().is_empty());
    assert_eq!(view.subscriber_count(), 1);
}

#[test]
fn ui_views_share_the_writer_state() {
    let signals = UiSignals::new(
        Vec2::ZERO,
        Viewport::new(1440.0, 900.0),
        PointerCapability::Coarse,
    );
    let view = signals.view();
    let copy = view.clone();
    signals.pointer.set(PointerCapability::Fine);
    signals.viewport.set(Viewport::new(800.0, 600.0));
    assert_eq!(copy.pointer.get(), PointerCapability::Fine);
    assert_eq!(view.viewport.get().width, 800.0);
}
