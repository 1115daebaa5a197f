// Strong typing over strings. Newtypes for timestamps, node handles, and style properties.
// Every engine is driven by explicit timestamps; nothing in here reads a clock.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::SiteError;

/// Timestamp in microseconds. Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_micros(us: u64) -> Self {
        Timestamp(us)
    }

    pub fn from_millis(ms: u64) -> Self {
        Timestamp(ms.saturating_mul(1000))
    }

    /// Converts a `DOMHighResTimeStamp` (fractional milliseconds).
    pub fn from_dom_millis(ms: f64) -> Self {
        Timestamp((ms.max(0.0) * 1000.0) as u64)
    }

    pub fn as_micros(&self) -> u64 {
        self.0
    }

    pub fn as_millis(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    pub fn as_secs(&self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    pub fn after_secs(&self, secs: f64) -> Self {
        self.after_micros(secs_to_micros(secs))
    }

    pub fn after_millis(&self, ms: u64) -> Self {
        self.after_micros(ms.saturating_mul(1000))
    }

    /// Saturates at the end of time instead of wrapping.
    pub fn after_micros(&self, us: u64) -> Self {
        Timestamp(self.0.saturating_add(us))
    }

    pub fn saturating_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Non-finite and negative inputs map to zero; huge ones saturate.
pub(crate) fn secs_to_micros(secs: f64) -> u64 {
    if !secs.is_finite() || secs <= 0.0 {
        return 0;
    }
    // Float-to-int `as` saturates at u64::MAX.
    (secs * 1_000_000.0).round() as u64
}

/// Handle to a DOM node owned by a [`Dom`](crate::dom::Dom) implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Animatable style property. Transforms compose into a single CSS `transform`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleProp {
    Opacity,
    /// Horizontal translation in px.
    X,
    /// Vertical translation in px.
    Y,
    Scale,
    /// Rotation around Z in degrees.
    Rotation,
    RotationX,
    RotationY,
    /// Gaussian blur radius in px.
    Blur,
    /// Text glow strength (0 = none, 1 = full solar glow).
    Glow,
}

impl StyleProp {
    /// Value of the property when nothing has been animated.
    pub fn neutral(self) -> f64 {
        match self {
            StyleProp::Opacity | StyleProp::Scale => 1.0,
            _ => 0.0,
        }
    }
}

/// Property → value mapping. Ordered so rendering and comparison are deterministic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap(BTreeMap<StyleProp, f64>);

impl StyleMap {
    pub fn new() -> Self {
        StyleMap(BTreeMap::new())
    }

    pub fn with(mut self, prop: StyleProp, value: f64) -> Self {
        self.0.insert(prop, value);
        self
    }

    pub fn set(&mut self, prop: StyleProp, value: f64) {
        self.0.insert(prop, value);
    }

    pub fn get(&self, prop: StyleProp) -> Option<f64> {
        self.0.get(&prop).copied()
    }

    /// Value of `prop`, falling back to its neutral value.
    pub fn resolve(&self, prop: StyleProp) -> f64 {
        self.get(prop).unwrap_or_else(|| prop.neutral())
    }

    pub fn contains(&self, prop: StyleProp) -> bool {
        self.0.contains_key(&prop)
    }

    pub fn props(&self) -> impl Iterator<Item = StyleProp> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleProp, f64)> + '_ {
        self.0.iter().map(|(p, v)| (*p, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Overwrites the properties present in `other`.
    pub fn merge(&mut self, other: &StyleMap) {
        for (prop, value) in other.iter() {
            self.0.insert(prop, value);
        }
    }

    /// Restricts this map to the properties present in `keys`.
    pub fn project(&self, keys: &StyleMap) -> StyleMap {
        StyleMap(
            keys.props()
                .map(|p| (p, self.resolve(p)))
                .collect(),
        )
    }
}

impl FromIterator<(StyleProp, f64)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (StyleProp, f64)>>(iter: I) -> Self {
        StyleMap(iter.into_iter().collect())
    }
}

/// Viewport-relative vertical bounds of an element, in CSS px.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn new(top: f64, bottom: f64) -> Self {
        Bounds { top, bottom }
    }

    pub fn edge(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Top => self.top,
            Edge::Center => (self.top + self.bottom) / 2.0,
            Edge::Bottom => self.bottom,
        }
    }
}

/// Edge of the trigger element that a [`TriggerPoint`] follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Center,
    Bottom,
}

/// "element edge meets viewport line", e.g. `top 80%` or `bottom top`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TriggerPoint {
    pub edge: Edge,
    /// Viewport line as a percentage of viewport height from the top.
    pub percent: f64,
}

impl TriggerPoint {
    pub fn new(edge: Edge, viewport_percent: f64) -> Self {
        TriggerPoint {
            edge,
            percent: viewport_percent.clamp(0.0, 100.0),
        }
    }

    /// Signed distance (px) of the element edge below the viewport line.
    /// Positive before the point is reached, zero or negative after.
    pub fn distance(&self, bounds: Bounds, viewport_height: f64) -> f64 {
        bounds.edge(self.edge) - viewport_height * self.percent / 100.0
    }
}

impl FromStr for TriggerPoint {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(edge), Some(line), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(SiteError::InvalidConfig(format!(
                "trigger point must be \"<edge> <line>\", got {s:?}"
            )));
        };
        let edge = match edge {
            "top" => Edge::Top,
            "center" => Edge::Center,
            "bottom" => Edge::Bottom,
            other => {
                return Err(SiteError::InvalidConfig(format!(
                    "unknown trigger edge {other:?}"
                )))
            }
        };
        let percent = match line {
            "top" => 0.0,
            "center" => 50.0,
            "bottom" => 100.0,
            pct => pct
                .strip_suffix('%')
                .and_then(|n| n.parse::<f64>().ok())
                .ok_or_else(|| {
                    SiteError::InvalidConfig(format!("unknown viewport line {pct:?}"))
                })?,
        };
        Ok(TriggerPoint::new(edge, percent))
    }
}

impl TryFrom<String> for TriggerPoint {
    type Error = SiteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TriggerPoint> for String {
    fn from(point: TriggerPoint) -> Self {
        point.to_string()
    }
}

impl fmt::Display for TriggerPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edge = match self.edge {
            Edge::Top => "top",
            Edge::Center => "center",
            Edge::Bottom => "bottom",
        };
        write!(f, "{edge} {}%", self.percent)
    }
}

/// Where a stagger sequence starts counting from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StaggerFrom {
    #[default]
    Start,
    End,
    Center,
    Random,
}

/// Per-item delay offset across a group of targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stagger {
    /// Seconds between consecutive items.
    pub each: f64,
    #[serde(default)]
    pub from: StaggerFrom,
}

impl Stagger {
    pub fn each(each: f64) -> Self {
        Stagger {
            each,
            from: StaggerFrom::Start,
        }
    }

    /// Delay (seconds) for every item of a group of `count`.
    /// `random` must yield values in `[0, 1)`; it is only consulted for [`StaggerFrom::Random`].
    pub fn offsets(&self, count: usize, random: &mut dyn FnMut() -> f64) -> Vec<f64> {
        match self.from {
            StaggerFrom::Start => (0..count).map(|i| i as f64 * self.each).collect(),
            StaggerFrom::End => (0..count)
                .map(|i| (count - 1 - i) as f64 * self.each)
                .collect(),
            StaggerFrom::Center => {
                let mid = (count as f64 - 1.0) / 2.0;
                (0..count)
                    .map(|i| (i as f64 - mid).abs() * self.each)
                    .collect()
            }
            StaggerFrom::Random => {
                // Shuffle the slot order, then hand each item its slot's delay.
                let mut slots: Vec<usize> = (0..count).collect();
                for i in (1..count).rev() {
                    let j = ((random() * (i + 1) as f64) as usize).min(i);
                    slots.swap(i, j);
                }
                slots.into_iter().map(|s| s as f64 * self.each).collect()
            }
        }
    }
}

/// Scroll-triggered entrance animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealBinding {
    pub selector: String,
    /// When set, `selector` is resolved inside every match of `scope`, and the
    /// scope element becomes the trigger.
    #[serde(default)]
    pub scope: Option<String>,
    /// Leading scope (or selector) matches to ignore.
    #[serde(default)]
    pub skip: usize,
    pub initial: StyleMap,
    pub target: StyleMap,
    pub duration_secs: f64,
    #[serde(default)]
    pub delay_secs: f64,
    pub easing: Easing,
    pub start: TriggerPoint,
    #[serde(default = "default_true")]
    pub reversible: bool,
    #[serde(default)]
    pub stagger: Option<Stagger>,
    /// Animate one `span.char` per character instead of the element itself.
    #[serde(default)]
    pub split_letters: bool,
}

impl RevealBinding {
    pub fn trigger_offset_percent(&self) -> f64 {
        self.start.percent
    }
}

/// Scroll-scrubbed animation: style follows scroll progress between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrubBinding {
    pub selector: String,
    /// Trigger element selector. `None` uses the animated element itself.
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub skip: usize,
    pub start: TriggerPoint,
    pub end: TriggerPoint,
    pub target: StyleMap,
    #[serde(default = "default_scrub_easing")]
    pub easing: Easing,
    /// Seconds the style takes to catch up with the scroll position.
    #[serde(default)]
    pub lag_secs: f64,
    #[serde(default)]
    pub disable_pointer_while_active: bool,
}

/// Pointer hover animation. Always wired; inert under reduced motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverBinding {
    pub selector: String,
    /// Child of the hovered element to animate instead of the element itself.
    #[serde(default)]
    pub target: Option<String>,
    pub enter: StyleMap,
    #[serde(default)]
    pub leave: Option<StyleMap>,
    pub duration_secs: f64,
    pub easing: Easing,
}

/// Ambient, infinitely repeating animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopBinding {
    pub selector: String,
    #[serde(default)]
    pub from: Option<StyleMap>,
    pub to: StyleMap,
    pub duration_secs: f64,
    pub easing: Easing,
    #[serde(default = "default_true")]
    pub yoyo: bool,
    #[serde(default)]
    pub stagger: Option<Stagger>,
}

/// Audio controller variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AudioMode {
    /// Clicking while playing flips mute in place.
    #[default]
    MuteToggle,
    /// Clicking while playing pauses.
    PauseToggle,
}

/// Site configuration passed from JS.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SiteConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl SiteConfig {
    pub fn from_json(json: &str) -> Result<Self, SiteError> {
        let config: SiteConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SiteError> {
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(SiteError::InvalidConfig(format!(
                "audio volume {} outside 0..=1",
                self.audio.volume
            )));
        }

        let carousel = &self.carousel;
        if carousel.interval_ms == 0 {
            return Err(SiteError::InvalidConfig(
                "carousel interval must be positive".to_string(),
            ));
        }
        check_millis("carousel interval_ms", carousel.interval_ms)?;
        check_millis("carousel transition_ms", carousel.transition_ms)?;
        check_millis("carousel touch_resume_ms", carousel.touch_resume_ms)?;

        let motion = &self.motion;
        for reveal in &motion.reveals {
            let what = format!("reveal {:?}", reveal.selector);
            check_secs(&what, "duration_secs", reveal.duration_secs)?;
            check_secs(&what, "delay_secs", reveal.delay_secs)?;
            if let Some(stagger) = &reveal.stagger {
                check_secs(&what, "stagger each", stagger.each)?;
            }
        }
        for scrub in &motion.scrubs {
            check_secs(&format!("scrub {:?}", scrub.selector), "lag_secs", scrub.lag_secs)?;
        }
        for hover in &motion.hovers {
            let what = format!("hover {:?}", hover.selector);
            check_secs(&what, "duration_secs", hover.duration_secs)?;
        }
        for looped in &motion.loops {
            let what = format!("loop {:?}", looped.selector);
            check_secs(&what, "duration_secs", looped.duration_secs)?;
            if let Some(stagger) = &looped.stagger {
                check_secs(&what, "stagger each", stagger.each)?;
            }
        }
        Ok(())
    }
}

/// Upper bound on any configured duration or delay.
const MAX_TIMING_SECS: f64 = 3600.0;

fn check_secs(what: &str, field: &str, value: f64) -> Result<(), SiteError> {
    if value.is_finite() && (0.0..=MAX_TIMING_SECS).contains(&value) {
        return Ok(());
    }
    Err(SiteError::InvalidConfig(format!(
        "{what}: {field} {value} outside 0..={MAX_TIMING_SECS}"
    )))
}

const MAX_TIMING_MS: u64 = 3_600_000;

fn check_millis(field: &str, value: u64) -> Result<(), SiteError> {
    if value <= MAX_TIMING_MS {
        return Ok(());
    }
    Err(SiteError::InvalidConfig(format!(
        "{field} {value} exceeds {MAX_TIMING_MS}"
    )))
}

/// Background music settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_audio_element")]
    pub element_id: String,
    #[serde(default = "default_audio_button")]
    pub button_id: String,
    #[serde(default)]
    pub mode: AudioMode,
    #[serde(default = "default_volume")]
    pub volume: f64,
    /// Scroll offset (px) below which the button always stays visible.
    #[serde(default = "default_hide_after")]
    pub hide_after_px: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            enabled: true,
            element_id: default_audio_element(),
            button_id: default_audio_button(),
            mode: AudioMode::default(),
            volume: default_volume(),
            hide_after_px: default_hide_after(),
        }
    }
}

fn default_audio_element() -> String {
    "bgMusic".to_string()
}

fn default_audio_button() -> String {
    "audioToggleBtn".to_string()
}

fn default_volume() -> f64 {
    0.3
}

fn default_hide_after() -> f64 {
    100.0
}

/// Image carousel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    #[serde(default = "default_carousel_container")]
    pub container: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_interval")]
    pub interval_ms: u64,
    #[serde(default = "default_transition")]
    pub transition_ms: u64,
    #[serde(default = "default_touch_resume")]
    pub touch_resume_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        CarouselConfig {
            container: default_carousel_container(),
            images: Vec::new(),
            interval_ms: default_interval(),
            transition_ms: default_transition(),
            touch_resume_ms: default_touch_resume(),
        }
    }
}

fn default_carousel_container() -> String {
    ".carousel".to_string()
}

fn default_interval() -> u64 {
    3000
}

fn default_transition() -> u64 {
    520
}

fn default_touch_resume() -> u64 {
    400
}

/// Animation tables. Each defaults to the built-in catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    #[serde(default = "crate::catalog::reveals")]
    pub reveals: Vec<RevealBinding>,
    #[serde(default = "crate::catalog::scrubs")]
    pub scrubs: Vec<ScrubBinding>,
    #[serde(default = "crate::catalog::hovers")]
    pub hovers: Vec<HoverBinding>,
    #[serde(default = "crate::catalog::loops")]
    pub loops: Vec<LoopBinding>,
}

impl Default for MotionConfig {
    fn default() -> Self {
        MotionConfig {
            reveals: crate::catalog::reveals(),
            scrubs: crate::catalog::scrubs(),
            hovers: crate::catalog::hovers(),
            loops: crate::catalog::loops(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_scrub_easing() -> Easing {
    Easing::Linear
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_conversions() {
        let ts = Timestamp::from_micros(1_500_000);
        assert_eq!(ts.as_micros(), 1_500_000);
        assert!((ts.as_secs() - 1.5).abs() < 0.0001);
        assert_eq!(Timestamp::from_dom_millis(2.5).as_micros(), 2500);
        assert_eq!(ts.after_secs(0.5), Timestamp::from_millis(2000));
    }

    #[test]
    fn timestamp_arithmetic_saturates() {
        let end = Timestamp::from_micros(u64::MAX - 10);
        assert_eq!(end.after_secs(1e300).as_micros(), u64::MAX);
        assert_eq!(end.after_millis(u64::MAX).as_micros(), u64::MAX);
        assert_eq!(Timestamp::from_millis(u64::MAX).as_micros(), u64::MAX);
        assert_eq!(Timestamp::from_micros(0).after_secs(f64::NAN), Timestamp::from_micros(0));
        assert_eq!(Timestamp::from_micros(0).after_secs(f64::INFINITY), Timestamp::from_micros(0));
    }

    #[test]
    fn trigger_point_parses_keywords_and_percentages() {
        let p: TriggerPoint = "top 80%".parse().unwrap();
        assert_eq!(p.edge, Edge::Top);
        assert_eq!(p.percent, 80.0);
        assert_eq!(p.to_string(), "top 80%");

        let p: TriggerPoint = "bottom top".parse().unwrap();
        assert_eq!(p.edge, Edge::Bottom);
        assert_eq!(p.percent, 0.0);

        assert!("middle 10%".parse::<TriggerPoint>().is_err());
        assert!("top".parse::<TriggerPoint>().is_err());
        assert!("top eighty".parse::<TriggerPoint>().is_err());
    }

    #[test]
    fn trigger_distance_is_signed() {
        let p = TriggerPoint::new(Edge::Top, 80.0);
        assert_eq!(p.distance(Bounds::new(900.0, 1200.0), 1000.0), 100.0);
        assert_eq!(p.distance(Bounds::new(700.0, 1000.0), 1000.0), -100.0);
    }

    #[test]
    fn style_map_resolves_neutral_values() {
        let style = StyleMap::new().with(StyleProp::Y, 40.0);
        assert_eq!(style.resolve(StyleProp::Y), 40.0);
        assert_eq!(style.resolve(StyleProp::Opacity), 1.0);
        assert_eq!(style.resolve(StyleProp::Blur), 0.0);

        let keys = StyleMap::new().with(StyleProp::Scale, 0.0);
        assert_eq!(style.project(&keys), StyleMap::new().with(StyleProp::Scale, 1.0));
    }

    #[test]
    fn stagger_offsets_cover_every_slot() {
        let stagger = Stagger::each(0.1);
        assert_eq!(stagger.offsets(3, &mut || 0.0), vec![0.0, 0.1, 0.2]);

        let centered = Stagger {
            each: 1.0,
            from: StaggerFrom::Center,
        };
        assert_eq!(centered.offsets(3, &mut || 0.0), vec![1.0, 0.0, 1.0]);

        let random = Stagger {
            each: 1.0,
            from: StaggerFrom::Random,
        };
        let mut seq = [0.9, 0.1, 0.5, 0.3].into_iter().cycle();
        let mut offsets = random.offsets(5, &mut || seq.next().unwrap_or(0.0));
        offsets.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(offsets, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn empty_config_uses_catalog() {
        let config = SiteConfig::from_json("{}").unwrap();
        assert_eq!(config.audio.element_id, "bgMusic");
        assert_eq!(config.audio.mode, AudioMode::MuteToggle);
        assert_eq!(config.carousel.interval_ms, 3000);
        assert_eq!(config.carousel.transition_ms, 520);
        assert!(!config.motion.reveals.is_empty());
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn config_rejects_bad_volume() {
        let err = SiteConfig::from_json(r#"{"audio":{"volume":2.0}}"#).unwrap_err();
        assert!(err.to_string().contains("volume"));
    }

    #[test]
    fn config_rejects_huge_reveal_delay() {
        let json = r#"{"motion":{"reveals":[{
            "selector": ".fact-box",
            "initial": {"opacity": 0},
            "target": {"opacity": 1},
            "duration_secs": 1.0,
            "delay_secs": 1e300,
            "easing": "power2.out",
            "start": "top 80%"
        }]}}"#;
        let err = SiteConfig::from_json(json).unwrap_err();
        assert!(matches!(err, SiteError::InvalidConfig(_)));
        assert!(err.to_string().contains("delay_secs"));
    }

    #[test]
    fn config_rejects_huge_carousel_timing() {
        let err = SiteConfig::from_json(r#"{"carousel":{"interval_ms":18446744073709551}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("interval_ms"));
        let err = SiteConfig::from_json(r#"{"carousel":{"transition_ms":18446744073709551615}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("transition_ms"));
    }

    #[test]
    fn config_bounds_every_motion_timing() {
        let mut config = SiteConfig::default();
        config.motion.loops[0].duration_secs = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = SiteConfig::default();
        config.motion.hovers[0].duration_secs = -0.5;
        assert!(config.validate().is_err());

        let mut config = SiteConfig::default();
        config.motion.scrubs[0].lag_secs = 1e9;
        assert!(config.validate().is_err());

        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn reveal_binding_from_json() {
        let json = r#"{
            "selector": ".importance-box",
            "initial": {"opacity": 0, "y": 50},
            "target": {"opacity": 1, "y": 0},
            "duration_secs": 1.0,
            "easing": "power3.out",
            "start": "top 85%"
        }"#;
        let binding: RevealBinding = serde_json::from_str(json).unwrap();
        assert!(binding.reversible);
        assert_eq!(binding.trigger_offset_percent(), 85.0);
        assert_eq!(binding.initial.get(StyleProp::Y), Some(50.0));
    }
}
