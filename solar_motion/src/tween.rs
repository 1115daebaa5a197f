// Tween engine with a per-target override rule.
// Issuing a tween on a target strips the same properties from every in-flight tween on that
// target, so at most one tween drives any (target, property) pair and the last issued wins.

use std::collections::{BTreeSet, HashMap};

use crate::easing::Easing;
use crate::types::*;

/// Handle to an issued tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TweenId(u64);

/// Repetition behaviour of a tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repeat {
    #[default]
    Once,
    /// Repeat forever; with `yoyo` every other cycle plays backwards.
    Forever { yoyo: bool },
}

/// What to animate and how.
#[derive(Debug, Clone, PartialEq)]
pub struct TweenSpec {
    /// Explicit start values, rendered immediately. `None` starts from the current values.
    pub from: Option<StyleMap>,
    pub to: StyleMap,
    pub duration_secs: f64,
    pub delay_secs: f64,
    pub easing: Easing,
    pub repeat: Repeat,
}

impl TweenSpec {
    pub fn to(to: StyleMap, duration_secs: f64, easing: Easing) -> Self {
        TweenSpec {
            from: None,
            to,
            duration_secs,
            delay_secs: 0.0,
            easing,
            repeat: Repeat::Once,
        }
    }

    pub fn from_to(from: StyleMap, to: StyleMap, duration_secs: f64, easing: Easing) -> Self {
        TweenSpec {
            from: Some(from),
            ..TweenSpec::to(to, duration_secs, easing)
        }
    }

    pub fn delayed(mut self, delay_secs: f64) -> Self {
        self.delay_secs = delay_secs;
        self
    }

    pub fn repeating(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }
}

#[derive(Debug, Clone)]
struct Track {
    prop: StyleProp,
    /// Captured when the tween starts unless given explicitly.
    from: Option<f64>,
    to: f64,
}

#[derive(Debug, Clone)]
struct Tween {
    id: TweenId,
    target: NodeId,
    tracks: Vec<Track>,
    start: Timestamp,
    duration_us: u64,
    easing: Easing,
    repeat: Repeat,
}

impl Tween {
    /// Eased progress at `now`, and whether the tween has finished.
    fn progress(&self, now: Timestamp) -> (f64, bool) {
        let elapsed = now.saturating_since(self.start);
        if self.duration_us == 0 {
            return (1.0, self.repeat == Repeat::Once);
        }
        match self.repeat {
            Repeat::Once => {
                if elapsed >= self.duration_us {
                    (1.0, true)
                } else {
                    let t = elapsed as f64 / self.duration_us as f64;
                    (self.easing.apply(t), false)
                }
            }
            Repeat::Forever { yoyo } => {
                let cycle = elapsed / self.duration_us;
                let t = (elapsed % self.duration_us) as f64 / self.duration_us as f64;
                let t = if yoyo && cycle % 2 == 1 { 1.0 - t } else { t };
                (self.easing.apply(t), false)
            }
        }
    }
}

/// Owns every running tween and the last rendered style of each target.
#[derive(Debug, Default)]
pub struct Tweener {
    tweens: Vec<Tween>,
    values: HashMap<NodeId, StyleMap>,
    dirty: BTreeSet<NodeId>,
    next_id: u64,
}

impl Tweener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a tween on `target` starting at `now` plus `spec.delay_secs`.
    pub fn animate(&mut self, target: NodeId, spec: TweenSpec, now: Timestamp) -> TweenId {
        self.override_props(target, &spec.to);

        if let Some(from) = &spec.from {
            self.values.entry(target).or_default().merge(&from.project(&spec.to));
            self.dirty.insert(target);
        }

        let tracks = spec
            .to
            .iter()
            .map(|(prop, to)| Track {
                prop,
                from: spec.from.as_ref().map(|f| f.resolve(prop)),
                to,
            })
            .collect();

        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.push(Tween {
            id,
            target,
            tracks,
            start: now.after_secs(spec.delay_secs),
            duration_us: secs_to_micros(spec.duration_secs),
            easing: spec.easing,
            repeat: spec.repeat,
        });
        id
    }

    /// Jump `target` to `style` immediately, cancelling tweens on those properties.
    pub fn set(&mut self, target: NodeId, style: &StyleMap) {
        self.override_props(target, style);
        self.values.entry(target).or_default().merge(style);
        self.dirty.insert(target);
    }

    /// Cancel every tween on `target`, leaving its style where it is.
    pub fn kill(&mut self, target: NodeId) {
        self.tweens.retain(|t| t.target != target);
    }

    fn override_props(&mut self, target: NodeId, props: &StyleMap) {
        for tween in self.tweens.iter_mut().filter(|t| t.target == target) {
            tween.tracks.retain(|track| !props.contains(track.prop));
        }
        self.tweens.retain(|t| !t.tracks.is_empty());
    }

    /// Advance every tween to `now`. Returns the full style of each target that changed.
    pub fn tick(&mut self, now: Timestamp) -> Vec<(NodeId, StyleMap)> {
        let mut finished = Vec::new();

        for tween in &mut self.tweens {
            if now < tween.start {
                continue;
            }
            let current = self.values.entry(tween.target).or_default();
            for track in &mut tween.tracks {
                if track.from.is_none() {
                    track.from = Some(current.resolve(track.prop));
                }
            }

            let (eased, done) = tween.progress(now);
            for track in &tween.tracks {
                let from = track.from.unwrap_or(track.to);
                let value = if done { track.to } else { from + (track.to - from) * eased };
                current.set(track.prop, value);
            }
            self.dirty.insert(tween.target);

            if done {
                finished.push(tween.id);
            }
        }

        if !finished.is_empty() {
            self.tweens.retain(|t| !finished.contains(&t.id));
        }

        self.drain_dirty()
    }

    /// Styles changed by `set`/`animate` since the last drain, without advancing time.
    pub fn drain_dirty(&mut self) -> Vec<(NodeId, StyleMap)> {
        std::mem::take(&mut self.dirty)
            .into_iter()
            .map(|node| (node, self.current(node)))
            .collect()
    }

    /// Last rendered style of `target` (empty if never touched).
    pub fn current(&self, target: NodeId) -> StyleMap {
        self.values.get(&target).cloned().unwrap_or_default()
    }

    pub fn is_animating(&self, target: NodeId) -> bool {
        self.tweens.iter().any(|t| t.target == target)
    }

    /// Tweens currently driving `(target, prop)`. Never more than one.
    pub fn drivers(&self, target: NodeId, prop: StyleProp) -> usize {
        self.tweens
            .iter()
            .filter(|t| t.target == target && t.tracks.iter().any(|tr| tr.prop == prop))
            .count()
    }

    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::EaseDirection;
    use proptest::prelude::*;

    const NODE: NodeId = NodeId::new(0);

    fn ms(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    #[test]
    fn from_to_renders_start_immediately_and_lands_on_target() {
        let mut tweener = Tweener::new();
        let from = StyleMap::new().with(StyleProp::Opacity, 0.0).with(StyleProp::Y, 50.0);
        let to = StyleMap::new().with(StyleProp::Opacity, 1.0).with(StyleProp::Y, 0.0);
        tweener.animate(
            NODE,
            TweenSpec::from_to(from.clone(), to.clone(), 1.0, Easing::power(3, EaseDirection::Out)),
            ms(0),
        );

        let dirty = tweener.drain_dirty();
        assert_eq!(dirty, vec![(NODE, from)]);

        let mid = tweener.tick(ms(500));
        let y = mid[0].1.resolve(StyleProp::Y);
        assert!(y > 0.0 && y < 50.0);

        let end = tweener.tick(ms(1000));
        assert_eq!(end, vec![(NODE, to)]);
        assert!(!tweener.is_animating(NODE));
    }

    #[test]
    fn to_tween_captures_start_values_when_it_begins() {
        let mut tweener = Tweener::new();
        tweener.set(NODE, &StyleMap::new().with(StyleProp::Scale, 2.0));
        tweener.animate(
            NODE,
            TweenSpec::to(StyleMap::new().with(StyleProp::Scale, 1.0), 1.0, Easing::Linear)
                .delayed(1.0),
            ms(0),
        );

        // Still waiting for the delay.
        tweener.tick(ms(500));
        assert_eq!(tweener.current(NODE).resolve(StyleProp::Scale), 2.0);

        tweener.tick(ms(1500));
        assert!((tweener.current(NODE).resolve(StyleProp::Scale) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn new_tween_overrides_shared_properties_only() {
        let mut tweener = Tweener::new();
        let first = StyleMap::new().with(StyleProp::Opacity, 1.0).with(StyleProp::Y, 0.0);
        tweener.animate(
            NODE,
            TweenSpec::from_to(
                StyleMap::new().with(StyleProp::Opacity, 0.0).with(StyleProp::Y, 80.0),
                first,
                1.0,
                Easing::Linear,
            ),
            ms(0),
        );
        tweener.tick(ms(200));

        tweener.animate(
            NODE,
            TweenSpec::to(StyleMap::new().with(StyleProp::Y, -10.0), 0.5, Easing::Linear),
            ms(200),
        );
        assert_eq!(tweener.drivers(NODE, StyleProp::Y), 1);
        assert_eq!(tweener.drivers(NODE, StyleProp::Opacity), 1);
        assert_eq!(tweener.active_count(), 2);

        tweener.tick(ms(2000));
        let style = tweener.current(NODE);
        assert_eq!(style.resolve(StyleProp::Y), -10.0);
        assert_eq!(style.resolve(StyleProp::Opacity), 1.0);
    }

    #[test]
    fn yoyo_loop_swings_back_and_never_finishes() {
        let mut tweener = Tweener::new();
        tweener.animate(
            NODE,
            TweenSpec::from_to(
                StyleMap::new().with(StyleProp::Glow, 0.0),
                StyleMap::new().with(StyleProp::Glow, 1.0),
                1.0,
                Easing::Linear,
            )
            .repeating(Repeat::Forever { yoyo: true }),
            ms(0),
        );

        tweener.tick(ms(750));
        assert!((tweener.current(NODE).resolve(StyleProp::Glow) - 0.75).abs() < 1e-9);
        tweener.tick(ms(1250));
        assert!((tweener.current(NODE).resolve(StyleProp::Glow) - 0.75).abs() < 1e-9);
        tweener.tick(ms(60_000));
        assert!(tweener.is_animating(NODE));
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut tweener = Tweener::new();
        tweener.animate(
            NODE,
            TweenSpec::to(StyleMap::new().with(StyleProp::X, 12.0), 0.0, Easing::Linear),
            ms(10),
        );
        tweener.tick(ms(10));
        assert_eq!(tweener.current(NODE).get(StyleProp::X), Some(12.0));
        assert_eq!(tweener.active_count(), 0);
    }

    proptest! {
        /// However tweens on one property interleave, the value settles on the last one issued.
        #[test]
        fn last_issued_tween_wins(
            steps in prop::collection::vec((-100.0f64..100.0, 0u64..800, 0.0f64..1.0), 1..12)
        ) {
            let mut tweener = Tweener::new();
            let mut now = 0u64;
            let mut last = 0.0;
            for (target, gap_ms, duration) in steps {
                now += gap_ms;
                tweener.animate(
                    NODE,
                    TweenSpec::to(StyleMap::new().with(StyleProp::Y, target), duration, Easing::Linear),
                    ms(now),
                );
                tweener.tick(ms(now));
                prop_assert!(tweener.drivers(NODE, StyleProp::Y) <= 1);
                last = target;
            }
            tweener.tick(ms(now + 5_000));
            prop_assert_eq!(tweener.current(NODE).resolve(StyleProp::Y), last);
        }
    }
}
