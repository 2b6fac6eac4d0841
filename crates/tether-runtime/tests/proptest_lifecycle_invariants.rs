//! Property-based invariant tests for the interaction lifecycle.
//!
//! Random sequences of hit-tested events, clock advances, polls and
//! disable toggles are fed to a `Floating`. After every step:
//!
//! 1. At most one pending timer, and only in a pending state.
//! 2. A position is exposed only while the panel is shown.
//! 3. Hub listeners: none while not shown, at most one per kind while shown.
//! 4. A disabled instance is `Hidden`.
//! 5. Teardown (drop) leaves the hub empty whatever the state.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use proptest::prelude::*;
use tether_core::event::ScrollerId;
use tether_core::geometry::{BoundingBox, Size, Viewport};
use tether_layout::Placed;
use tether_runtime::{
    Floating, FloatingConfig, Instant, InteractionEvent, Measure, PanelMount, Region, Signal,
    SignalHub, SignalKind, TriggerMode, VisibilityState,
};

// ── Host doubles ────────────────────────────────────────────────────────

struct Fixed;

impl Measure for Fixed {
    fn anchor_box(&self) -> BoundingBox {
        BoundingBox::new(200.0, 200.0, 40.0, 20.0)
    }
    fn panel_size(&self) -> Size {
        Size::new(150.0, 90.0)
    }
    fn viewport(&self) -> Viewport {
        Viewport::new(800.0, 600.0)
    }
}

#[derive(Default)]
struct Counting {
    shows: usize,
    hides: usize,
}

impl PanelMount for Counting {
    fn show(&mut self, _: Placed) {
        self.shows += 1;
    }
    fn hide(&mut self) {
        self.hides += 1;
    }
}

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Step {
    Input(InteractionEvent),
    Advance(u64),
    Poll,
    Open,
    Close,
    SetDisabled(bool),
    Scroll,
    Resize,
    Frame,
}

fn region_strategy() -> impl Strategy<Value = Region> {
    prop_oneof![
        Just(Region::Trigger),
        Just(Region::Panel),
        Just(Region::Outside)
    ]
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => region_strategy().prop_map(|r| Step::Input(InteractionEvent::PointerEnter(r))),
        4 => region_strategy().prop_map(|r| Step::Input(InteractionEvent::PointerLeave(r))),
        3 => region_strategy().prop_map(|r| Step::Input(InteractionEvent::PointerDown(r))),
        3 => region_strategy().prop_map(|r| Step::Input(InteractionEvent::Click(r))),
        1 => Just(Step::Input(InteractionEvent::Escape)),
        4 => (0u64..600).prop_map(Step::Advance),
        3 => Just(Step::Poll),
        1 => Just(Step::Open),
        1 => Just(Step::Close),
        1 => any::<bool>().prop_map(Step::SetDisabled),
        2 => Just(Step::Scroll),
        1 => Just(Step::Resize),
        1 => Just(Step::Frame),
    ]
}

fn config_strategy() -> impl Strategy<Value = FloatingConfig> {
    (
        prop_oneof![Just(TriggerMode::Hover), Just(TriggerMode::Click)],
        0u64..500,
        0u64..500,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(mode, open, close, outside, inner, throttle)| {
            FloatingConfig::popover()
                .trigger_mode(mode)
                .open_delay(Duration::from_millis(open))
                .close_delay(Duration::from_millis(close))
                .close_on_outside_interaction(outside)
                .close_on_inner_click(inner)
                .throttle_resize(throttle)
        })
}

fn check(f: &Floating, hub: &SignalHub) -> Result<(), TestCaseError> {
    let state = f.state();
    prop_assert!(f.pending_timers() <= 1);
    prop_assert_eq!(f.pending_timers() == 1, state.is_pending(), "state {}", state);
    prop_assert_eq!(f.position().is_some(), state.is_shown());
    if state.is_shown() {
        for kind in [SignalKind::Scroll, SignalKind::Resize, SignalKind::Frame] {
            prop_assert!(hub.listener_count(kind) <= 1);
        }
        prop_assert!(f.listener_count() >= 2);
    } else {
        prop_assert_eq!(hub.total_listeners(), 0);
    }
    if f.config().disabled {
        prop_assert_eq!(state, VisibilityState::Hidden);
    }
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// Lifecycle invariants
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn invariants_hold_after_every_step(
        config in config_strategy(),
        steps in prop::collection::vec(step_strategy(), 1..60),
    ) {
        let hub = SignalHub::new();
        let mount = Rc::new(RefCell::new(Counting::default()));
        let mut f = Floating::new(config, &hub, Rc::new(Fixed), mount.clone()).unwrap();
        let mut now = Instant::now();

        for step in steps {
            match step {
                Step::Input(event) => { f.handle(event, now); }
                Step::Advance(ms) => now += Duration::from_millis(ms),
                Step::Poll => { f.poll(now); }
                Step::Open => { f.open(now); }
                Step::Close => { f.close(now); }
                Step::SetDisabled(d) => { f.set_disabled(d); }
                Step::Scroll => { hub.emit(&Signal::Scroll(ScrollerId::ROOT)); }
                Step::Resize => { hub.emit(&Signal::Resize(Viewport::new(800.0, 600.0))); }
                Step::Frame => { hub.emit(&Signal::Frame); }
            }
            check(&f, &hub)?;
        }

        drop(f);
        prop_assert_eq!(hub.total_listeners(), 0);
        let m = mount.borrow();
        // Every hide follows at least one paint.
        prop_assert!(m.hides <= m.shows);
    }

    #[test]
    fn poll_before_deadline_never_transitions(
        config in config_strategy(),
        early in 0u64..100,
    ) {
        let hub = SignalHub::new();
        let config = config.open_delay(Duration::from_millis(100 + early));
        let mut f = Floating::new(config, &hub, Rc::new(Fixed), Rc::new(RefCell::new(Counting::default()))).unwrap();
        let t0 = Instant::now();
        f.open(t0);
        prop_assert_eq!(f.state(), VisibilityState::PendingShow);
        prop_assert_eq!(f.poll(t0 + Duration::from_millis(early)), None);
        prop_assert!(f.poll(t0 + Duration::from_millis(100 + early)).is_some());
        prop_assert_eq!(f.state(), VisibilityState::Visible);
    }
}
