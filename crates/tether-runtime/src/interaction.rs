#![forbid(unsafe_code)]

//! Interaction state machine: when is the panel visible?
//!
//! [`Interaction`] owns the open/closed lifecycle of one trigger. It is
//! sans-IO: callers pass the current time into every method and poll
//! [`Interaction::next_deadline`] to know when to call back. Hover-intent
//! delays are plain deadlines stored inside the machine, so there is no
//! timer handle that could outlive it.
//!
//! # State Machine
//!
//! ```text
//!            open (delay > 0)           timer
//!   Hidden ────────────────▶ PendingShow ────▶ Visible
//!     ▲  ▲        close          │              │  ▲
//!     │  └───────────────────────┘              │  │ open
//!     │                          close (delay > 0)  │
//!     │          timer                          ▼  │
//!     └──────────────────────────────────── PendingHide
//! ```
//!
//! Zero delays skip the pending states. Escape, disabling and teardown go
//! straight to `Hidden` from anywhere.
//!
//! # Invariants
//!
//! 1. At most one pending timer, and only in `PendingShow` or `PendingHide`.
//! 2. Every transition replaces the timer, so leaving a pending state
//!    cancels its timer before anything else happens.
//! 3. A disabled machine never leaves `Hidden`.
//! 4. After [`Interaction::teardown`] no event, open request or poll can
//!    produce a transition.

use std::fmt;
use std::time::Duration;

use web_time::Instant;

use crate::config::{FloatingConfig, TriggerMode};

/// Lifecycle of one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisibilityState {
    #[default]
    Hidden,
    /// Waiting for the open delay.
    PendingShow,
    Visible,
    /// Still on screen, waiting for the close delay.
    PendingHide,
}

impl VisibilityState {
    /// Whether the panel is painted (`Visible` or `PendingHide`).
    #[must_use]
    pub const fn is_shown(self) -> bool {
        matches!(self, Self::Visible | Self::PendingHide)
    }

    /// Whether a delay is running.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::PendingShow | Self::PendingHide)
    }
}

impl fmt::Display for VisibilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hidden => "hidden",
            Self::PendingShow => "pending-show",
            Self::Visible => "visible",
            Self::PendingHide => "pending-hide",
        })
    }
}

/// Where a pointer event landed, resolved by hit-testing measured boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Trigger,
    Panel,
    Outside,
}

/// Input to the state machine after hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEvent {
    PointerEnter(Region),
    PointerLeave(Region),
    PointerDown(Region),
    Click(Region),
    Escape,
}

/// What caused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    /// An open trigger (pointer-enter, click, programmatic open).
    Open,
    /// A close trigger (pointer-leave, outside interaction, toggle).
    Close,
    /// A pending delay elapsed.
    Timer,
    Escape,
    /// The instance was disabled while open.
    Disabled,
    /// Closed from outside the instance, e.g. a parent layer closed.
    Dismiss,
    Teardown,
}

/// A state change reported to the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: VisibilityState,
    pub to: VisibilityState,
    pub cause: Cause,
}

impl Transition {
    /// The panel went from not painted to painted.
    #[must_use]
    pub fn shows(&self) -> bool {
        !self.from.is_shown() && self.to.is_shown()
    }

    /// The panel went from painted to not painted.
    #[must_use]
    pub fn hides(&self) -> bool {
        self.from.is_shown() && !self.to.is_shown()
    }
}

/// Per-trigger visibility state machine.
#[derive(Debug, Clone)]
pub struct Interaction {
    mode: TriggerMode,
    open_delay: Duration,
    close_delay: Duration,
    close_on_outside: bool,
    close_on_inner_click: bool,
    disabled: bool,
    torn_down: bool,
    state: VisibilityState,
    deadline: Option<Instant>,
}

impl Interaction {
    #[must_use]
    pub fn new(config: &FloatingConfig) -> Self {
        Self {
            mode: config.trigger_mode,
            open_delay: config.open_delay,
            close_delay: config.close_delay,
            close_on_outside: config.close_on_outside_interaction,
            close_on_inner_click: config.close_on_inner_click,
            disabled: config.disabled,
            torn_down: false,
            state: VisibilityState::Hidden,
            deadline: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> VisibilityState {
        self.state
    }

    #[must_use]
    pub fn mode(&self) -> TriggerMode {
        self.mode
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// When [`poll`](Self::poll) next needs to run, if a delay is pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Number of pending timers (0 or 1).
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        usize::from(self.deadline.is_some())
    }

    /// Feed one hit-tested input event.
    pub fn handle(&mut self, event: InteractionEvent, now: Instant) -> Option<Transition> {
        if event == InteractionEvent::Escape {
            return self.close_now(Cause::Escape);
        }
        match self.mode {
            TriggerMode::Hover => self.handle_hover(event, now),
            TriggerMode::Click => self.handle_click(event, now),
        }
    }

    fn handle_hover(&mut self, event: InteractionEvent, now: Instant) -> Option<Transition> {
        match event {
            InteractionEvent::PointerEnter(Region::Trigger) => self.open(now),
            // The pointer travelled from the trigger onto the panel.
            InteractionEvent::PointerEnter(Region::Panel)
                if self.state == VisibilityState::PendingHide =>
            {
                self.open(now)
            }
            InteractionEvent::PointerLeave(Region::Trigger | Region::Panel) => self.close(now),
            _ => None,
        }
    }

    fn handle_click(&mut self, event: InteractionEvent, now: Instant) -> Option<Transition> {
        match event {
            InteractionEvent::Click(Region::Trigger) => match self.state {
                VisibilityState::Hidden | VisibilityState::PendingHide => self.open(now),
                VisibilityState::PendingShow | VisibilityState::Visible => self.close(now),
            },
            InteractionEvent::Click(Region::Panel) if self.close_on_inner_click => self.close(now),
            InteractionEvent::PointerDown(Region::Outside) if self.close_on_outside => {
                self.close(now)
            }
            _ => None,
        }
    }

    /// Apply an open trigger.
    pub fn open(&mut self, now: Instant) -> Option<Transition> {
        if self.disabled || self.torn_down {
            return None;
        }
        match self.state {
            VisibilityState::Hidden if self.open_delay.is_zero() => {
                self.go(VisibilityState::Visible, Cause::Open, None)
            }
            VisibilityState::Hidden => {
                let deadline = now + self.open_delay;
                self.go(VisibilityState::PendingShow, Cause::Open, Some(deadline))
            }
            VisibilityState::PendingHide => self.go(VisibilityState::Visible, Cause::Open, None),
            VisibilityState::PendingShow | VisibilityState::Visible => None,
        }
    }

    /// Apply a close trigger.
    pub fn close(&mut self, now: Instant) -> Option<Transition> {
        match self.state {
            VisibilityState::PendingShow => self.go(VisibilityState::Hidden, Cause::Close, None),
            VisibilityState::Visible if self.close_delay.is_zero() => {
                self.go(VisibilityState::Hidden, Cause::Close, None)
            }
            VisibilityState::Visible => {
                let deadline = now + self.close_delay;
                self.go(VisibilityState::PendingHide, Cause::Close, Some(deadline))
            }
            VisibilityState::Hidden | VisibilityState::PendingHide => None,
        }
    }

    /// Close immediately, ignoring the close delay.
    pub fn dismiss(&mut self) -> Option<Transition> {
        self.close_now(Cause::Dismiss)
    }

    /// Fire the pending timer if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<Transition> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        match self.state {
            VisibilityState::PendingShow => self.go(VisibilityState::Visible, Cause::Timer, None),
            VisibilityState::PendingHide => self.go(VisibilityState::Hidden, Cause::Timer, None),
            VisibilityState::Hidden | VisibilityState::Visible => {
                // Unreachable while invariant 1 holds; drop the stray deadline.
                self.deadline = None;
                None
            }
        }
    }

    /// Enable or disable. Disabling an open instance closes it immediately.
    pub fn set_disabled(&mut self, disabled: bool) -> Option<Transition> {
        self.disabled = disabled;
        if disabled {
            self.close_now(Cause::Disabled)
        } else {
            None
        }
    }

    /// Final close. Nothing can reopen the machine afterwards.
    pub fn teardown(&mut self) -> Option<Transition> {
        self.torn_down = true;
        self.close_now(Cause::Teardown)
    }

    fn close_now(&mut self, cause: Cause) -> Option<Transition> {
        if self.state == VisibilityState::Hidden {
            return None;
        }
        self.go(VisibilityState::Hidden, cause, None)
    }

    fn go(
        &mut self,
        to: VisibilityState,
        cause: Cause,
        deadline: Option<Instant>,
    ) -> Option<Transition> {
        let from = self.state;
        self.deadline = deadline;
        self.state = to;
        tracing::debug!(
            message = "interaction.transition",
            %from,
            %to,
            ?cause,
            timer = deadline.is_some()
        );
        Some(Transition { from, to, cause })
    }
}
