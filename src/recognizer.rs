//! Single-contact gesture recognition
//!
//! Classifies one touch surface's contact stream into taps, double taps,
//! long presses and four-way swipes:
//! - Long press: contact held within the tap threshold for the long-press delay
//! - Tap: released within the tap threshold, reported once the double-tap
//!   window passes without a second tap
//! - Double tap: a second tap ending near the first inside the window
//! - Swipe: released at least the swipe threshold away, along the dominant axis
//!
//! Releases between the tap and swipe thresholds are a dead zone and produce
//! nothing. A second simultaneous contact drops the current one and all input
//! is ignored until every finger is lifted.
//!
//! Time is supplied by the host in milliseconds. Timers due at or before an
//! incoming start/end are fired before that event is handled; hosts with a
//! real clock arm a timer for `next_deadline()` and call `advance()`.

use std::mem;

use tracing::{debug, trace};

use crate::config::GestureConfig;
use crate::dispatch::GestureHandlers;
use crate::error::Result;
use crate::gesture::{Disposition, GestureEvent, GestureKind, SwipeDirection};
use crate::timers::{Expired, TimerId, TimerQueue};

/// Where the recognizer is within a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// No finger down
    Idle,
    /// Finger down, still within the tap threshold
    Pressed,
    /// Finger moved past the tap threshold
    Dragging,
    /// Long press already reported, finger not yet lifted
    Held,
    /// More than one finger down, waiting for a full release
    Suppressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    LongPress,
    DeferredTap,
}

#[derive(Debug)]
struct Contact<T> {
    x: f64,
    y: f64,
    start_time: u64,
    target: T,
}

/// The last unmatched tap, waiting to become half of a double tap
#[derive(Debug)]
struct PendingTap<T> {
    time: u64,
    x: f64,
    y: f64,
    start_x: f64,
    start_y: f64,
    start_time: u64,
    target: T,
    timer: TimerId,
}

#[derive(Debug)]
enum ContactState<T> {
    Idle,
    Active {
        contact: Contact<T>,
        dragging: bool,
        long_press: TimerId,
    },
    /// The contact produced a long press; its release is swallowed
    Held,
    Suppressed {
        contacts: u32,
    },
}

/// Gesture recognizer for one input surface
pub struct GestureRecognizer<T> {
    config: GestureConfig,
    state: ContactState<T>,
    pending_tap: Option<PendingTap<T>>,
    timers: TimerQueue<TimerKind>,
    handlers: GestureHandlers<T>,
}

impl<T> GestureRecognizer<T> {
    pub fn new(config: GestureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: ContactState::Idle,
            pending_tap: None,
            timers: TimerQueue::new(),
            handlers: GestureHandlers::new(),
        })
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Swap thresholds at runtime. Toggling `disabled` behaves like
    /// `set_disabled`.
    pub fn set_config(&mut self, config: GestureConfig) -> Result<()> {
        config.validate()?;
        let disabled = config.disabled;
        self.config = GestureConfig {
            disabled: self.config.disabled,
            ..config
        };
        self.set_disabled(disabled);
        Ok(())
    }

    pub fn is_disabled(&self) -> bool {
        self.config.disabled
    }

    /// Disabling drops the active contact, the pending tap and every timer,
    /// so nothing scheduled before the switch can fire afterwards.
    pub fn set_disabled(&mut self, disabled: bool) {
        if self.config.disabled == disabled {
            return;
        }
        self.config.disabled = disabled;
        if disabled {
            self.reset();
            debug!("Gesture recognizer disabled");
        } else {
            debug!("Gesture recognizer enabled");
        }
    }

    pub fn phase(&self) -> ContactPhase {
        match &self.state {
            ContactState::Idle => ContactPhase::Idle,
            ContactState::Active { dragging: false, .. } => ContactPhase::Pressed,
            ContactState::Active { dragging: true, .. } => ContactPhase::Dragging,
            ContactState::Held => ContactPhase::Held,
            ContactState::Suppressed { .. } => ContactPhase::Suppressed,
        }
    }

    pub fn has_pending_tap(&self) -> bool {
        self.pending_tap.is_some()
    }

    pub fn handlers_mut(&mut self) -> &mut GestureHandlers<T> {
        &mut self.handlers
    }

    pub fn on<F>(&mut self, kind: GestureKind, handler: F)
    where
        F: FnMut(&GestureEvent<T>) + 'static,
    {
        self.handlers.add(kind, handler);
    }

    pub fn on_tap<F: FnMut(&GestureEvent<T>) + 'static>(&mut self, handler: F) {
        self.on(GestureKind::Tap, handler);
    }

    pub fn on_double_tap<F: FnMut(&GestureEvent<T>) + 'static>(&mut self, handler: F) {
        self.on(GestureKind::DoubleTap, handler);
    }

    pub fn on_long_press<F: FnMut(&GestureEvent<T>) + 'static>(&mut self, handler: F) {
        self.on(GestureKind::LongPress, handler);
    }

    pub fn on_swipe_left<F: FnMut(&GestureEvent<T>) + 'static>(&mut self, handler: F) {
        self.on(GestureKind::SwipeLeft, handler);
    }

    pub fn on_swipe_right<F: FnMut(&GestureEvent<T>) + 'static>(&mut self, handler: F) {
        self.on(GestureKind::SwipeRight, handler);
    }

    pub fn on_swipe_up<F: FnMut(&GestureEvent<T>) + 'static>(&mut self, handler: F) {
        self.on(GestureKind::SwipeUp, handler);
    }

    pub fn on_swipe_down<F: FnMut(&GestureEvent<T>) + 'static>(&mut self, handler: F) {
        self.on(GestureKind::SwipeDown, handler);
    }

    /// Catch-all, called for every gesture after the kind-specific handlers
    pub fn on_gesture<F: FnMut(&GestureEvent<T>) + 'static>(&mut self, handler: F) {
        self.handlers.set_catch_all(handler);
    }

    /// Handle a finger touching down
    pub fn contact_start(&mut self, x: f64, y: f64, time: u64, target: T) -> Disposition {
        self.advance(time);
        if self.config.disabled {
            return Disposition::Ignored;
        }

        match mem::replace(&mut self.state, ContactState::Idle) {
            ContactState::Idle => {
                let deadline = time.saturating_add(self.config.long_press_delay_ms);
                let long_press = self.timers.schedule(deadline, TimerKind::LongPress);
                trace!(x, y, time, deadline, "Contact started");

                self.state = ContactState::Active {
                    contact: Contact {
                        x,
                        y,
                        start_time: time,
                        target,
                    },
                    dragging: false,
                    long_press,
                };
                Disposition::Consumed
            }
            ContactState::Active { long_press, .. } => {
                self.timers.cancel(long_press);
                debug!(x, y, time, "Second contact, dropping active gesture");
                self.state = ContactState::Suppressed { contacts: 2 };
                Disposition::Ignored
            }
            ContactState::Held => {
                debug!(x, y, time, "Second contact during held long press");
                self.state = ContactState::Suppressed { contacts: 2 };
                Disposition::Ignored
            }
            ContactState::Suppressed { contacts } => {
                self.state = ContactState::Suppressed {
                    contacts: contacts.saturating_add(1),
                };
                Disposition::Ignored
            }
        }
    }

    /// Handle finger motion
    pub fn contact_move(&mut self, x: f64, y: f64) -> Disposition {
        if self.config.disabled {
            return Disposition::Ignored;
        }

        match &mut self.state {
            ContactState::Active {
                contact,
                dragging,
                long_press,
            } => {
                let threshold = self.config.tap_threshold;
                if !*dragging
                    && ((x - contact.x).abs() > threshold || (y - contact.y).abs() > threshold)
                {
                    *dragging = true;
                    self.timers.cancel(*long_press);
                    trace!(x, y, "Contact became a drag");
                }
                Disposition::Consumed
            }
            _ => Disposition::Ignored,
        }
    }

    /// Handle a finger lifting and classify the contact
    pub fn contact_end(&mut self, x: f64, y: f64, time: u64, target: T) -> Disposition {
        self.advance(time);
        if self.config.disabled {
            return Disposition::Ignored;
        }

        let (contact, dragging, long_press) =
            match mem::replace(&mut self.state, ContactState::Idle) {
                ContactState::Idle => return Disposition::Ignored,
                ContactState::Held => {
                    trace!("Long-pressed contact released");
                    return Disposition::Ignored;
                }
                ContactState::Suppressed { contacts } => {
                    if contacts > 1 {
                        self.state = ContactState::Suppressed {
                            contacts: contacts - 1,
                        };
                    } else {
                        debug!("All contacts released");
                    }
                    return Disposition::Ignored;
                }
                ContactState::Active {
                    contact,
                    dragging,
                    long_press,
                } => (contact, dragging, long_press),
            };

        self.timers.cancel(long_press);

        let delta_x = x - contact.x;
        let delta_y = y - contact.y;
        let distance = delta_x.hypot(delta_y);

        if !dragging && distance <= self.config.tap_threshold {
            self.classify_tap(&contact, x, y, time, target);
        } else if distance >= self.config.swipe_threshold {
            let kind = GestureKind::from(SwipeDirection::from_delta(delta_x, delta_y));
            let event = GestureEvent::new(
                kind,
                (contact.x, contact.y),
                (x, y),
                contact.start_time,
                time,
                target,
            );
            self.emit(event);
        } else {
            trace!(distance, dragging, "Contact ended in dead zone");
        }

        Disposition::Consumed
    }

    /// Platform cancelled the touch sequence. The pending tap survives.
    pub fn contact_cancel(&mut self) {
        if let ContactState::Active { long_press, .. } =
            mem::replace(&mut self.state, ContactState::Idle)
        {
            self.timers.cancel(long_press);
        }
        trace!("Contact cancelled");
    }

    /// Fire every timer due at `now`. Returns the number of gestures emitted.
    pub fn advance(&mut self, now: u64) -> usize {
        let mut emitted = 0;
        while let Some(expired) = self.timers.pop_due(now) {
            if self.fire(expired) {
                emitted += 1;
            }
        }
        emitted
    }

    /// Earliest pending timer deadline
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Run every outstanding timer at its own deadline
    pub fn flush(&mut self) -> usize {
        let mut emitted = 0;
        while let Some(deadline) = self.timers.next_deadline() {
            emitted += self.advance(deadline);
        }
        emitted
    }

    /// Drop all contact state, the pending tap and every timer
    pub fn reset(&mut self) {
        self.state = ContactState::Idle;
        self.pending_tap = None;
        self.timers.clear();
    }

    fn classify_tap(&mut self, contact: &Contact<T>, x: f64, y: f64, time: u64, target: T) {
        let threshold = self.config.tap_threshold;
        let window = self.config.double_tap_window_ms;
        let is_second_tap = self.pending_tap.as_ref().is_some_and(|pending| {
            time.saturating_sub(pending.time) < window
                && (x - pending.x).abs() < threshold
                && (y - pending.y).abs() < threshold
        });

        if is_second_tap {
            if let Some(pending) = self.pending_tap.take() {
                self.timers.cancel(pending.timer);
            }
            let event = GestureEvent::new(
                GestureKind::DoubleTap,
                (contact.x, contact.y),
                (x, y),
                contact.start_time,
                time,
                target,
            );
            self.emit(event);
            return;
        }

        // A newer tap replaces the old one; the old one is never reported
        if let Some(stale) = self.pending_tap.take() {
            self.timers.cancel(stale.timer);
            trace!(time = stale.time, "Pending tap superseded");
        }

        let timer = self
            .timers
            .schedule(time.saturating_add(window), TimerKind::DeferredTap);
        self.pending_tap = Some(PendingTap {
            time,
            x,
            y,
            start_x: contact.x,
            start_y: contact.y,
            start_time: contact.start_time,
            target,
            timer,
        });
    }

    fn fire(&mut self, expired: Expired<TimerKind>) -> bool {
        if self.config.disabled {
            trace!(kind = ?expired.kind, "Timer fired while disabled");
            return false;
        }

        match expired.kind {
            TimerKind::LongPress => {
                let armed = matches!(
                    &self.state,
                    ContactState::Active { dragging: false, long_press, .. }
                        if *long_press == expired.id
                );
                if !armed {
                    return false;
                }
                let ContactState::Active { contact, .. } =
                    mem::replace(&mut self.state, ContactState::Held)
                else {
                    return false;
                };

                let position = (contact.x, contact.y);
                let event = GestureEvent::new(
                    GestureKind::LongPress,
                    position,
                    position,
                    contact.start_time,
                    expired.deadline,
                    contact.target,
                );
                self.emit(event);
                true
            }
            TimerKind::DeferredTap => match self.pending_tap.take() {
                Some(pending) if pending.timer == expired.id => {
                    let event = GestureEvent::new(
                        GestureKind::Tap,
                        (pending.start_x, pending.start_y),
                        (pending.x, pending.y),
                        pending.start_time,
                        expired.deadline,
                        pending.target,
                    );
                    self.emit(event);
                    true
                }
                other => {
                    self.pending_tap = other;
                    false
                }
            },
        }
    }

    fn emit(&mut self, event: GestureEvent<T>) {
        debug!(
            kind = %event.kind,
            distance = event.distance,
            duration = event.duration,
            "Gesture recognized"
        );
        self.handlers.dispatch(&event);
    }
}

impl<T> std::fmt::Debug for GestureRecognizer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureRecognizer")
            .field("config", &self.config)
            .field("pending_timers", &self.timers.len())
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}
