#![forbid(unsafe_code)]

//! One floating panel bound to one trigger.
//!
//! [`Floating`] is the adapter between the host and the engine. It turns
//! raw [`Event`]s into hit-tested [`InteractionEvent`]s, feeds them to its
//! [`Interaction`], and reacts to the resulting [`Transition`]s:
//!
//! - panel becomes shown: place it, paint it through [`PanelMount::show`],
//!   attach the tracker;
//! - panel stops being shown: detach the tracker, [`PanelMount::hide`].
//!
//! Scroll and resize never pass through here; the host emits them on the
//! shared [`SignalHub`] and the attached tracker picks them up.
//!
//! Dropping a `Floating` tears it down synchronously: the pending timer is
//! cleared, the tracker detached, and the panel hidden if it was shown.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_time::Instant;

use tether_core::event::{Event, PointerButton, PointerEventKind};
use tether_core::geometry::{BoundingBox, Position};
use tether_layout::Placed;

use crate::config::{ConfigError, FloatingConfig};
use crate::host::{Measure, PanelMount};
use crate::interaction::{Interaction, InteractionEvent, Region, Transition, VisibilityState};
use crate::signal::SignalHub;
use crate::tracker::{Attachment, Tracker};

/// Controller for one trigger/panel pair.
pub struct Floating {
    config: FloatingConfig,
    interaction: Interaction,
    tracker: Tracker,
    hub: SignalHub,
    measure: Rc<dyn Measure>,
    mount: Rc<RefCell<dyn PanelMount>>,
    placed: Rc<Cell<Option<Placed>>>,
    attachment: Attachment,
    hover: Option<Region>,
}

impl std::fmt::Debug for Floating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Floating")
            .field("state", &self.state())
            .field("placed", &self.placed.get())
            .field("attachment", &self.attachment)
            .finish_non_exhaustive()
    }
}

impl Floating {
    /// Validate `config` and bind a hidden panel to the host.
    pub fn new(
        config: FloatingConfig,
        hub: &SignalHub,
        measure: Rc<dyn Measure>,
        mount: Rc<RefCell<dyn PanelMount>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::debug!(
            message = "floating.mount",
            mode = %config.trigger_mode,
            placement = %config.placement
        );
        Ok(Self {
            interaction: Interaction::new(&config),
            tracker: Tracker::new(Rc::clone(&measure), config.track_options()),
            hub: hub.clone(),
            measure,
            mount,
            placed: Rc::new(Cell::new(None)),
            attachment: Attachment::detached(),
            hover: None,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &FloatingConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> VisibilityState {
        self.interaction.state()
    }

    /// Where the panel is painted. `None` unless the panel is shown.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.placed().map(|placed| placed.position)
    }

    /// Position plus effective placement. `None` unless the panel is shown.
    #[must_use]
    pub fn placed(&self) -> Option<Placed> {
        if self.state().is_shown() {
            self.placed.get()
        } else {
            None
        }
    }

    /// Hub listeners currently held for this instance.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.attachment.listener_count()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.interaction.pending_timers()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.interaction.next_deadline()
    }

    /// The panel's painted box, if shown. Measured fresh.
    #[must_use]
    pub fn panel_box(&self) -> Option<BoundingBox> {
        self.placed()
            .map(|placed| placed.bounds(self.measure.panel_size()))
    }

    /// Hit-test a viewport point against the panel, then the trigger.
    #[must_use]
    pub fn region_at(&self, x: f64, y: f64) -> Region {
        if self.panel_box().is_some_and(|panel| panel.contains(x, y)) {
            Region::Panel
        } else if self.measure.anchor_box().contains(x, y) {
            Region::Trigger
        } else {
            Region::Outside
        }
    }

    /// Whether the point is on the trigger or the shown panel.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.region_at(x, y) != Region::Outside
    }

    /// Feed a raw input event. Layout events and focus gain are ignored.
    pub fn handle_event(&mut self, event: &Event, now: Instant) -> Vec<Transition> {
        match event {
            Event::Key(key) if key.is_escape() => {
                self.handle(InteractionEvent::Escape, now).into_iter().collect()
            }
            // Focus moved off the surface: an outside interaction.
            Event::Focus(false) if self.config.close_on_outside_interaction => {
                self.hover = None;
                self.dismiss().into_iter().collect()
            }
            Event::Pointer(pointer) => {
                let (x, y) = pointer.position();
                match pointer.kind {
                    PointerEventKind::Moved => self.pointer_moved(self.region_at(x, y), now),
                    PointerEventKind::Exited => self.pointer_moved(Region::Outside, now),
                    PointerEventKind::Down(_) => {
                        let region = self.region_at(x, y);
                        self.handle(InteractionEvent::PointerDown(region), now)
                            .into_iter()
                            .collect()
                    }
                    PointerEventKind::Click(PointerButton::Left) => {
                        let region = self.region_at(x, y);
                        self.handle(InteractionEvent::Click(region), now)
                            .into_iter()
                            .collect()
                    }
                    PointerEventKind::Click(_) | PointerEventKind::Up(_) => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }

    /// Track the hovered region, synthesising leave-then-enter on change.
    pub fn pointer_moved(&mut self, region: Region, now: Instant) -> Vec<Transition> {
        let next = (region != Region::Outside).then_some(region);
        if next == self.hover {
            return Vec::new();
        }
        let prev = std::mem::replace(&mut self.hover, next);
        let mut out = Vec::new();
        if let Some(prev) = prev {
            out.extend(self.handle(InteractionEvent::PointerLeave(prev), now));
        }
        if let Some(next) = next {
            out.extend(self.handle(InteractionEvent::PointerEnter(next), now));
        }
        out
    }

    /// Feed an already hit-tested event.
    pub fn handle(&mut self, event: InteractionEvent, now: Instant) -> Option<Transition> {
        let transition = self.interaction.handle(event, now);
        self.apply(transition)
    }

    /// Programmatic open, honouring the open delay.
    pub fn open(&mut self, now: Instant) -> Option<Transition> {
        let transition = self.interaction.open(now);
        self.apply(transition)
    }

    /// Programmatic close, honouring the close delay.
    pub fn close(&mut self, now: Instant) -> Option<Transition> {
        let transition = self.interaction.close(now);
        self.apply(transition)
    }

    /// Close immediately.
    pub fn dismiss(&mut self) -> Option<Transition> {
        let transition = self.interaction.dismiss();
        self.apply(transition)
    }

    /// Fire an elapsed open or close delay.
    pub fn poll(&mut self, now: Instant) -> Option<Transition> {
        let transition = self.interaction.poll(now);
        self.apply(transition)
    }

    pub fn set_disabled(&mut self, disabled: bool) -> Option<Transition> {
        self.config.disabled = disabled;
        let transition = self.interaction.set_disabled(disabled);
        self.apply(transition)
    }

    /// Re-measure and repaint now, e.g. after the panel content changed.
    pub fn refresh(&self) -> Option<Placed> {
        self.attachment.refresh()
    }

    fn apply(&mut self, transition: Option<Transition>) -> Option<Transition> {
        let t = transition?;
        if t.shows() {
            self.show();
        } else if t.hides() {
            self.hide();
        }
        tracing::debug!(
            message = "floating.transition",
            from = %t.from,
            to = %t.to,
            cause = ?t.cause,
            listeners = self.attachment.listener_count()
        );
        Some(t)
    }

    fn show(&mut self) {
        let placed = self.tracker.recompute();
        self.placed.set(Some(placed));
        paint(&self.mount, placed);

        let cell = Rc::clone(&self.placed);
        let mount = Rc::clone(&self.mount);
        self.attachment = self.tracker.attach(&self.hub, move |placed| {
            cell.set(Some(placed));
            paint(&mount, placed);
        });
    }

    fn hide(&mut self) {
        self.attachment.detach();
        self.placed.set(None);
        match self.mount.try_borrow_mut() {
            Ok(mut mount) => mount.hide(),
            Err(_) => tracing::warn!(message = "floating.mount_busy", op = "hide"),
        }
    }
}

fn paint(mount: &Rc<RefCell<dyn PanelMount>>, placed: Placed) {
    match mount.try_borrow_mut() {
        Ok(mut mount) => mount.show(placed),
        Err(_) => tracing::warn!(message = "floating.mount_busy", op = "show"),
    }
}

impl Drop for Floating {
    fn drop(&mut self) {
        let transition = self.interaction.teardown();
        self.apply(transition);
        self.attachment.detach();
    }
}
