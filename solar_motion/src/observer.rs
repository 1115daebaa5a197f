// Scroll-position observers. Pure geometry over viewport-relative bounds, so they can be
// driven from real layout or from test fixtures.

use crate::types::*;

/// Crossing reported by an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    /// Start line crossed while scrolling down.
    Enter,
    /// Start line crossed back while scrolling up.
    LeaveBack,
}

/// What an observer does after its first `Enter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerPolicy {
    /// Play forward on enter, reverse on leave-back.
    Reversible,
    /// Play once, never reverse; the observer detaches.
    Once,
}

/// Watches a single start line.
#[derive(Debug, Clone)]
pub struct ScrollObserver {
    start: TriggerPoint,
    policy: TriggerPolicy,
    active: bool,
    detached: bool,
}

impl ScrollObserver {
    pub fn new(start: TriggerPoint, policy: TriggerPolicy) -> Self {
        ScrollObserver {
            start,
            policy,
            active: false,
            detached: false,
        }
    }

    /// Re-evaluate against the trigger's current bounds.
    pub fn update(&mut self, bounds: Bounds, viewport_height: f64) -> Option<TriggerEvent> {
        if self.detached {
            return None;
        }
        // Reaching the line exactly is not crossing it; a "top top" trigger stays idle at load.
        let past = self.start.distance(bounds, viewport_height) < 0.0;
        match (self.active, past) {
            (false, true) => {
                self.active = true;
                if self.policy == TriggerPolicy::Once {
                    self.detached = true;
                }
                Some(TriggerEvent::Enter)
            }
            (true, false) => {
                self.active = false;
                Some(TriggerEvent::LeaveBack)
            }
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }
}

/// Maps scroll position onto 0..=1 progress between a start and an end point.
#[derive(Debug, Clone)]
pub struct ScrubObserver {
    start: TriggerPoint,
    end: TriggerPoint,
    inner: ScrollObserver,
}

impl ScrubObserver {
    pub fn new(start: TriggerPoint, end: TriggerPoint) -> Self {
        ScrubObserver {
            start,
            end,
            inner: ScrollObserver::new(start, TriggerPolicy::Reversible),
        }
    }

    /// Progress for the given bounds. Both distances shrink at the same rate as the page
    /// scrolls, so their difference is the scroll distance the scrub spans.
    pub fn progress(&self, bounds: Bounds, viewport_height: f64) -> f64 {
        let s = self.start.distance(bounds, viewport_height);
        let e = self.end.distance(bounds, viewport_height);
        let span = s - e;
        if span.abs() < f64::EPSILON {
            return if s <= 0.0 { 1.0 } else { 0.0 };
        }
        (s / span).clamp(0.0, 1.0)
    }

    /// Progress plus any crossing of the start line.
    pub fn update(&mut self, bounds: Bounds, viewport_height: f64) -> (f64, Option<TriggerEvent>) {
        let event = self.inner.update(bounds, viewport_height);
        (self.progress(bounds, viewport_height), event)
    }
}
