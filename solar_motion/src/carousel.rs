// Image carousel: a fixed image sequence with a locked two-phase transition and a
// suspendable autoplay cadence. Timestamp-driven; the site applies the returned effects.

use tracing::debug;

use crate::error::SiteError;
use crate::types::{CarouselConfig, Timestamp};

/// DOM change requested by the carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselEffect {
    /// Fade and blur the image out.
    FadeOut,
    /// Replace the image source.
    Swap(String),
    /// Fade the new image back in.
    FadeIn,
}

/// Why autoplay is currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suspension {
    Hover,
    Touch,
    Hidden,
}

/// Observable carousel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselState {
    pub current_index: usize,
    pub is_animating: bool,
    pub autoplay_active: bool,
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    started: Timestamp,
    swapped: bool,
}

#[derive(Debug, Clone)]
pub struct Carousel {
    images: Vec<String>,
    index: usize,
    interval_us: u64,
    transition_us: u64,
    touch_resume_us: u64,
    transition: Option<Transition>,
    pending: Vec<CarouselEffect>,
    hover: bool,
    touch: bool,
    hidden: bool,
    touch_resume_at: Option<Timestamp>,
    next_autoplay: Timestamp,
}

impl Carousel {
    pub fn new(config: &CarouselConfig, now: Timestamp) -> Result<Self, SiteError> {
        if config.images.is_empty() {
            return Err(SiteError::InvalidConfig(
                "carousel needs at least one image".to_string(),
            ));
        }
        Ok(Carousel {
            images: config.images.clone(),
            index: 0,
            interval_us: config.interval_ms.saturating_mul(1000),
            transition_us: config.transition_ms.saturating_mul(1000),
            touch_resume_us: config.touch_resume_ms.saturating_mul(1000),
            transition: None,
            pending: Vec::new(),
            hover: false,
            touch: false,
            hidden: false,
            touch_resume_at: None,
            next_autoplay: now.after_millis(config.interval_ms),
        })
    }

    pub fn state(&self) -> CarouselState {
        CarouselState {
            current_index: self.index,
            is_animating: self.transition.is_some(),
            autoplay_active: self.autoplay_active(),
        }
    }

    pub fn current_image(&self) -> &str {
        &self.images[self.index]
    }

    pub fn autoplay_active(&self) -> bool {
        !(self.hover || self.touch || self.hidden)
    }

    /// Start a transition to the next image. Ignored while one is in flight.
    pub fn advance(&mut self, now: Timestamp) -> bool {
        self.settle(now);
        if self.transition.is_some() {
            debug!(index = self.index, "carousel advance ignored mid-transition");
            return false;
        }
        self.index = (self.index + 1) % self.images.len();
        self.transition = Some(Transition {
            started: now,
            swapped: false,
        });
        self.pending.push(CarouselEffect::FadeOut);
        true
    }

    /// Click or keyboard advance. Restarts the autoplay cadence.
    pub fn advance_manual(&mut self, now: Timestamp) -> bool {
        self.restart_cadence(now);
        self.advance(now)
    }

    /// Enter or Space on the focused carousel. Returns whether the key was handled.
    pub fn on_key(&mut self, key: &str, now: Timestamp) -> bool {
        match key {
            "Enter" | " " | "Spacebar" => {
                self.advance_manual(now);
                true
            }
            _ => false,
        }
    }

    pub fn suspend(&mut self, reason: Suspension) {
        match reason {
            Suspension::Hover => self.hover = true,
            Suspension::Touch => {
                self.touch = true;
                self.touch_resume_at = None;
            }
            Suspension::Hidden => self.hidden = true,
        }
    }

    /// Lift a suspension. Touch is lifted after the debounce, on a later `tick`.
    pub fn resume(&mut self, reason: Suspension, now: Timestamp) {
        match reason {
            Suspension::Hover => self.hover = false,
            Suspension::Touch => {
                self.touch_resume_at = Some(now.after_micros(self.touch_resume_us));
                return;
            }
            Suspension::Hidden => self.hidden = false,
        }
        self.restart_cadence(now);
    }

    pub fn set_hidden(&mut self, hidden: bool, now: Timestamp) {
        if hidden {
            self.suspend(Suspension::Hidden);
        } else {
            self.resume(Suspension::Hidden, now);
        }
    }

    /// Advance time: finish transitions, lift debounced touch suspension, fire autoplay.
    pub fn tick(&mut self, now: Timestamp) -> Vec<CarouselEffect> {
        if let Some(at) = self.touch_resume_at {
            if now >= at {
                self.touch = false;
                self.touch_resume_at = None;
                self.restart_cadence(now);
            }
        }

        if self.autoplay_active() && now >= self.next_autoplay {
            self.restart_cadence(now);
            self.advance(now);
        }

        self.settle(now);
        std::mem::take(&mut self.pending)
    }

    /// Swap at the transition midpoint and release the lock once it has run its course.
    fn settle(&mut self, now: Timestamp) {
        let Some(mut transition) = self.transition else {
            return;
        };
        let elapsed = now.saturating_since(transition.started);
        if !transition.swapped && elapsed >= self.transition_us / 2 {
            transition.swapped = true;
            self.pending
                .push(CarouselEffect::Swap(self.images[self.index].clone()));
            self.pending.push(CarouselEffect::FadeIn);
        }
        self.transition = if elapsed >= self.transition_us {
            None
        } else {
            Some(transition)
        };
    }

    fn restart_cadence(&mut self, now: Timestamp) {
        self.next_autoplay = now.after_micros(self.interval_us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn carousel(images: &[&str]) -> Carousel {
        let config = CarouselConfig {
            images: images.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        Carousel::new(&config, Timestamp::from_millis(0)).unwrap()
    }

    fn ms(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let config = CarouselConfig::default();
        assert!(Carousel::new(&config, ms(0)).is_err());
    }

    #[test]
    fn double_advance_inside_lock_changes_index_once() {
        let mut c = carousel(&["a", "b", "c"]);
        assert!(c.advance(ms(10)));
        assert!(!c.advance(ms(200)));
        assert_eq!(c.state().current_index, 1);
        assert!(c.state().is_animating);
    }

    #[test]
    fn three_advances_visit_each_image() {
        let mut c = carousel(&["a", "b", "c"]);
        let mut seen = Vec::new();
        let mut t = 0;
        for _ in 0..3 {
            c.advance(ms(t));
            t += 600;
            c.tick(ms(t));
            seen.push(c.state().current_index);
        }
        assert_eq!(seen, vec![1, 2, 0]);
    }

    #[test]
    fn advance_unlocks_without_ticks() {
        let mut c = carousel(&["a", "b", "c"]);
        let mut seen = Vec::new();
        for t in [0, 600, 1200] {
            assert!(c.advance(ms(t)));
            seen.push(c.state().current_index);
        }
        assert_eq!(seen, vec![1, 2, 0]);
        assert_eq!(
            c.tick(ms(1200)),
            vec![
                CarouselEffect::FadeOut,
                CarouselEffect::Swap("b".to_string()),
                CarouselEffect::FadeIn,
                CarouselEffect::FadeOut,
                CarouselEffect::Swap("c".to_string()),
                CarouselEffect::FadeIn,
                CarouselEffect::FadeOut,
            ]
        );
    }

    #[test]
    fn huge_timings_do_not_overflow() {
        let config = CarouselConfig {
            images: vec!["a".to_string(), "b".to_string()],
            interval_ms: 18_446_744_073_709_551,
            transition_ms: u64::MAX,
            touch_resume_ms: u64::MAX,
            ..Default::default()
        };
        let mut c = Carousel::new(&config, ms(5)).unwrap();
        assert!(c.advance_manual(ms(10)));
        c.suspend(Suspension::Touch);
        c.resume(Suspension::Touch, ms(20));
        c.tick(Timestamp::from_micros(u64::MAX));
        assert_eq!(c.state().current_index, 1);
    }

    #[test]
    fn transition_fades_swaps_at_midpoint_and_unlocks() {
        let mut c = carousel(&["a", "b"]);
        c.advance(ms(1000));
        assert_eq!(c.tick(ms(1000)), vec![CarouselEffect::FadeOut]);
        assert!(c.tick(ms(1200)).is_empty());
        assert_eq!(
            c.tick(ms(1260)),
            vec![CarouselEffect::Swap("b".to_string()), CarouselEffect::FadeIn]
        );
        assert!(c.state().is_animating);
        c.tick(ms(1520));
        assert!(!c.state().is_animating);
        assert_eq!(c.current_image(), "b");
    }

    #[test]
    fn autoplay_fires_on_interval() {
        let mut c = carousel(&["a", "b", "c"]);
        assert!(c.tick(ms(2999)).is_empty());
        assert_eq!(c.tick(ms(3000)), vec![CarouselEffect::FadeOut]);
        assert_eq!(c.state().current_index, 1);
        c.tick(ms(3600));
        c.tick(ms(6000));
        assert_eq!(c.state().current_index, 2);
    }

    #[test]
    fn hover_holds_autoplay_until_leave() {
        let mut c = carousel(&["a", "b"]);
        c.suspend(Suspension::Hover);
        assert!(!c.state().autoplay_active);
        c.tick(ms(9000));
        assert_eq!(c.state().current_index, 0);
        c.resume(Suspension::Hover, ms(9000));
        c.tick(ms(11_999));
        assert_eq!(c.state().current_index, 0);
        c.tick(ms(12_000));
        assert_eq!(c.state().current_index, 1);
    }

    #[test]
    fn touch_resume_is_debounced() {
        let mut c = carousel(&["a", "b"]);
        c.suspend(Suspension::Touch);
        c.resume(Suspension::Touch, ms(1000));
        c.tick(ms(1300));
        assert!(!c.state().autoplay_active);
        // A new touch inside the debounce cancels the pending resume.
        c.suspend(Suspension::Touch);
        c.tick(ms(1500));
        assert!(!c.state().autoplay_active);
        c.resume(Suspension::Touch, ms(2000));
        c.tick(ms(2400));
        assert!(c.state().autoplay_active);
    }

    #[test]
    fn hidden_tab_suspends() {
        let mut c = carousel(&["a", "b"]);
        c.set_hidden(true, ms(100));
        c.tick(ms(5000));
        assert_eq!(c.state().current_index, 0);
        c.set_hidden(false, ms(5000));
        c.tick(ms(8000));
        assert_eq!(c.state().current_index, 1);
    }

    #[test]
    fn manual_advance_restarts_cadence() {
        let mut c = carousel(&["a", "b", "c"]);
        assert!(c.on_key("Enter", ms(2500)));
        c.tick(ms(3100));
        // Autoplay would have fired at 3000; it now waits until 5500.
        assert_eq!(c.state().current_index, 1);
        c.tick(ms(5500));
        assert_eq!(c.state().current_index, 2);
        assert!(!c.on_key("Tab", ms(6000)));
    }

    proptest! {
        #[test]
        fn index_stays_valid_and_wraps(
            len in 1usize..8,
            steps in proptest::collection::vec(0u64..1500, 0..40),
        ) {
            let names: Vec<String> = (0..len).map(|i| format!("img{i}.jpg")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let mut c = carousel(&refs);
            let mut t = 0;
            for step in steps {
                t += step;
                c.advance(ms(t));
                c.tick(ms(t));
                prop_assert!(c.state().current_index < len);
            }

            let mut fresh = carousel(&refs);
            fresh.suspend(Suspension::Hover);
            let mut t = 0;
            for _ in 0..len {
                prop_assert!(fresh.advance(ms(t)));
                t += 600;
                fresh.tick(ms(t));
            }
            prop_assert_eq!(fresh.state().current_index, 0);
        }
    }
}
