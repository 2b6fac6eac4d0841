#![forbid(unsafe_code)]

//! Nested floating panels: a submenu inside a dropdown, a tooltip inside a
//! popover.
//!
//! [`LayerStack`] owns a set of [`Floating`] instances with optional parent
//! links and routes input so that the **innermost open layer closes first**.
//!
//! # Routing rules
//!
//! - **Escape** dismisses only the most recently opened layer.
//! - **Pointer-down** is routed to open layers innermost-first. A point
//!   inside an open descendant counts as inside the panel of every
//!   ancestor, so clicking in a child never dismisses its parent.
//! - **Click** belongs to the innermost box it hits: a layer sees
//!   `Click(Panel)` only if no open descendant was hit.
//! - **Focus loss** reaches every open layer, innermost first.
//! - **Pointer-move** is hit-tested per layer with the same descendant rule,
//!   so travelling from a parent panel onto a child panel keeps the parent
//!   open in hover mode.
//!
//! Whenever a layer closes, its open descendants are dismissed with it,
//! innermost first. A layer whose ancestor is not shown cannot open: its
//! trigger sits inside a panel that is off screen.

use web_time::Instant;

use tether_core::event::{Event, PointerButton, PointerEventKind};

use crate::floating::Floating;
use crate::interaction::{InteractionEvent, Region, Transition, VisibilityState};

/// Handle to a layer inside a [`LayerStack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(u64);

#[derive(Debug)]
struct Layer {
    id: LayerId,
    parent: Option<LayerId>,
    floating: Floating,
}

/// Owner of nested floating panels.
#[derive(Debug, Default)]
pub struct LayerStack {
    layers: Vec<Layer>,
    /// Non-hidden layers, oldest first.
    open_order: Vec<LayerId>,
    next_id: u64,
}

impl LayerStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer. An unknown `parent` makes it a root layer.
    pub fn push(&mut self, floating: Floating, parent: Option<LayerId>) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        let parent = parent.filter(|p| self.index(*p).is_some());
        let shown = floating.state() != VisibilityState::Hidden;
        self.layers.push(Layer {
            id,
            parent,
            floating,
        });
        if shown {
            self.open_order.push(id);
        }
        id
    }

    /// Remove a layer and all its descendants; returns the layer itself.
    ///
    /// Descendants are dropped, which tears them down.
    pub fn remove(&mut self, id: LayerId) -> Option<Floating> {
        let idx = self.index(id)?;
        for child in self.descendants(id).into_iter().rev() {
            if let Some(i) = self.index(child) {
                self.open_order.retain(|o| *o != child);
                drop(self.layers.remove(i));
            }
        }
        let idx = self.index(id).unwrap_or(idx);
        self.open_order.retain(|o| *o != id);
        Some(self.layers.remove(idx).floating)
    }

    #[must_use]
    pub fn get(&self, id: LayerId) -> Option<&Floating> {
        self.index(id).map(|i| &self.layers[i].floating)
    }

    #[must_use]
    pub fn parent(&self, id: LayerId) -> Option<LayerId> {
        self.index(id).and_then(|i| self.layers[i].parent)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// The most recently opened non-hidden layer.
    #[must_use]
    pub fn topmost(&self) -> Option<LayerId> {
        self.open_order.last().copied()
    }

    /// Non-hidden layers, oldest first.
    #[must_use]
    pub fn open_layers(&self) -> &[LayerId] {
        &self.open_order
    }

    /// Earliest pending deadline across all layers.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.layers
            .iter()
            .filter_map(|l| l.floating.next_deadline())
            .min()
    }

    /// Open one layer programmatically. Ignored while an ancestor is not
    /// shown, since the layer's trigger lives inside that ancestor's panel.
    pub fn open(&mut self, id: LayerId, now: Instant) -> Vec<(LayerId, Transition)> {
        if !self.ancestors_shown(id) {
            return Vec::new();
        }
        self.run(id, |f| f.open(now))
    }

    /// Close one layer programmatically, honouring its close delay.
    pub fn close(&mut self, id: LayerId, now: Instant) -> Vec<(LayerId, Transition)> {
        self.run(id, |f| f.close(now))
    }

    /// Close one layer and its descendants immediately.
    pub fn dismiss(&mut self, id: LayerId) -> Vec<(LayerId, Transition)> {
        self.run(id, Floating::dismiss)
    }

    /// Fire elapsed delays on every layer.
    pub fn poll(&mut self, now: Instant) -> Vec<(LayerId, Transition)> {
        let ids: Vec<LayerId> = self.layers.iter().map(|l| l.id).collect();
        let mut out = Vec::new();
        for id in ids {
            out.extend(self.run(id, |f| f.poll(now)));
        }
        out
    }

    /// Route one raw input event.
    pub fn handle_event(&mut self, event: &Event, now: Instant) -> Vec<(LayerId, Transition)> {
        match event {
            Event::Key(key) if key.is_escape() => match self.topmost() {
                Some(top) => {
                    tracing::debug!(message = "stack.escape", layer = top.0);
                    self.run(top, |f| f.handle(InteractionEvent::Escape, now))
                }
                None => Vec::new(),
            },
            Event::Focus(false) => self.focus_lost(now),
            Event::Pointer(pointer) => {
                let (x, y) = pointer.position();
                match pointer.kind {
                    PointerEventKind::Down(_) => self.pointer_down(x, y, now),
                    PointerEventKind::Click(PointerButton::Left) => self.click(x, y, now),
                    PointerEventKind::Moved => self.pointer_moved(Some((x, y)), now),
                    PointerEventKind::Exited => self.pointer_moved(None, now),
                    PointerEventKind::Click(_) | PointerEventKind::Up(_) => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }

    fn pointer_down(&mut self, x: f64, y: f64, now: Instant) -> Vec<(LayerId, Transition)> {
        let mut out = Vec::new();
        let innermost_first: Vec<LayerId> = self.open_order.iter().rev().copied().collect();
        for id in innermost_first {
            // An earlier iteration may have closed this layer by cascade.
            if !self.open_order.contains(&id) {
                continue;
            }
            let region = self.region_with_descendants(id, x, y);
            out.extend(self.run(id, |f| f.handle(InteractionEvent::PointerDown(region), now)));
        }
        out
    }

    fn focus_lost(&mut self, now: Instant) -> Vec<(LayerId, Transition)> {
        let mut out = Vec::new();
        let innermost_first: Vec<LayerId> = self.open_order.iter().rev().copied().collect();
        for id in innermost_first {
            if !self.open_order.contains(&id) {
                continue;
            }
            out.extend(self.run_many(id, |f| f.handle_event(&Event::Focus(false), now)));
        }
        out
    }

    fn click(&mut self, x: f64, y: f64, now: Instant) -> Vec<(LayerId, Transition)> {
        let ids: Vec<LayerId> = self.layers.iter().map(|l| l.id).collect();
        let mut out = Vec::new();
        for id in ids {
            let Some(idx) = self.index(id) else {
                continue;
            };
            if !self.ancestors_shown(id) {
                continue;
            }
            let own = self.layers[idx].floating.region_at(x, y);
            let region = match own {
                Region::Panel if self.hits_open_descendant(id, x, y) => Region::Outside,
                other => other,
            };
            if region == Region::Outside {
                continue;
            }
            out.extend(self.run(id, |f| f.handle(InteractionEvent::Click(region), now)));
        }
        out
    }

    fn pointer_moved(&mut self, at: Option<(f64, f64)>, now: Instant) -> Vec<(LayerId, Transition)> {
        let ids: Vec<LayerId> = self.layers.iter().map(|l| l.id).collect();
        let mut out = Vec::new();
        for id in ids {
            if self.index(id).is_none() {
                continue;
            }
            // A layer under a hidden ancestor is off screen.
            let region = match at {
                Some((x, y)) if self.ancestors_shown(id) => self.region_with_descendants(id, x, y),
                _ => Region::Outside,
            };
            out.extend(self.run_many(id, |f| f.pointer_moved(region, now)));
        }
        out
    }

    /// Own region, with any open descendant hit counting as `Panel`.
    fn region_with_descendants(&self, id: LayerId, x: f64, y: f64) -> Region {
        let Some(idx) = self.index(id) else {
            return Region::Outside;
        };
        match self.layers[idx].floating.region_at(x, y) {
            Region::Outside if self.hits_open_descendant(id, x, y) => Region::Panel,
            region => region,
        }
    }

    fn hits_open_descendant(&self, id: LayerId, x: f64, y: f64) -> bool {
        self.descendants(id).into_iter().any(|d| {
            self.get(d).is_some_and(|f| {
                f.state() != VisibilityState::Hidden && f.contains(x, y)
            })
        })
    }

    /// Whether every ancestor of `id` is shown.
    fn ancestors_shown(&self, id: LayerId) -> bool {
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if !self.get(parent).is_some_and(|f| f.state().is_shown()) {
                return false;
            }
            current = self.parent(parent);
        }
        true
    }

    /// Every layer below `id`, parents before children.
    fn descendants(&self, id: LayerId) -> Vec<LayerId> {
        let mut out = Vec::new();
        let mut frontier = vec![id];
        while let Some(current) = frontier.pop() {
            for layer in &self.layers {
                if layer.parent == Some(current) {
                    out.push(layer.id);
                    frontier.push(layer.id);
                }
            }
        }
        out
    }

    fn index(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    fn run(
        &mut self,
        id: LayerId,
        op: impl FnOnce(&mut Floating) -> Option<Transition>,
    ) -> Vec<(LayerId, Transition)> {
        self.run_many(id, |f| op(f).into_iter().collect())
    }

    fn run_many(
        &mut self,
        id: LayerId,
        op: impl FnOnce(&mut Floating) -> Vec<Transition>,
    ) -> Vec<(LayerId, Transition)> {
        let Some(idx) = self.index(id) else {
            return Vec::new();
        };
        let transitions = op(&mut self.layers[idx].floating);
        let mut out = Vec::new();
        for t in transitions {
            out.push((id, t));
            out.extend(self.record(id, t));
        }
        out
    }

    /// Keep `open_order` current and cascade closes to descendants.
    fn record(&mut self, id: LayerId, t: Transition) -> Vec<(LayerId, Transition)> {
        let mut cascaded = Vec::new();
        if t.from == VisibilityState::Hidden && t.to != VisibilityState::Hidden {
            self.open_order.retain(|o| *o != id);
            self.open_order.push(id);
        } else if t.to == VisibilityState::Hidden {
            self.open_order.retain(|o| *o != id);
            let mut open_children: Vec<LayerId> = self
                .descendants(id)
                .into_iter()
                .filter(|d| self.open_order.contains(d))
                .collect();
            // Innermost first.
            open_children.sort_by_key(|d| {
                std::cmp::Reverse(self.open_order.iter().position(|o| o == d))
            });
            for child in open_children {
                if let Some(idx) = self.index(child)
                    && let Some(ct) = self.layers[idx].floating.dismiss()
                {
                    self.open_order.retain(|o| *o != child);
                    tracing::debug!(message = "stack.cascade", parent = id.0, layer = child.0);
                    cascaded.push((child, ct));
                }
            }
        }
        cascaded
    }
}
