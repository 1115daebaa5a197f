// Built-in animation tables for the Sun explainer page. Pure data; the registrar consumes it.
// Selectors are the class names the page markup provides.

use crate::easing::{EaseDirection, Easing};
use crate::types::*;
use crate::types::StyleProp::*;

fn style(entries: &[(StyleProp, f64)]) -> StyleMap {
    entries.iter().copied().collect()
}

fn point(edge: Edge, percent: f64) -> TriggerPoint {
    TriggerPoint::new(edge, percent)
}

fn power(degree: u8) -> Easing {
    Easing::power(degree, EaseDirection::Out)
}

struct Reveal {
    selector: &'static str,
    scope: Option<&'static str>,
    skip: usize,
    initial: StyleMap,
    target: StyleMap,
    duration: f64,
    delay: f64,
    easing: Easing,
    start: f64,
    reversible: bool,
    stagger: Option<Stagger>,
    split: bool,
}

impl Reveal {
    fn new(selector: &'static str, initial: StyleMap, target: StyleMap, duration: f64, easing: Easing, start: f64) -> Self {
        Reveal {
            selector,
            scope: None,
            skip: 0,
            initial,
            target,
            duration,
            delay: 0.0,
            easing,
            start,
            reversible: true,
            stagger: None,
            split: false,
        }
    }

    fn within(mut self, scope: &'static str) -> Self {
        self.scope = Some(scope);
        self
    }

    fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    fn delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    fn stagger(mut self, stagger: Stagger) -> Self {
        self.stagger = Some(stagger);
        self
    }

    fn once(mut self) -> Self {
        self.reversible = false;
        self
    }

    fn split(mut self) -> Self {
        self.split = true;
        self
    }

    fn build(self) -> RevealBinding {
        RevealBinding {
            selector: self.selector.to_string(),
            scope: self.scope.map(str::to_string),
            skip: self.skip,
            initial: self.initial,
            target: self.target,
            duration_secs: self.duration,
            delay_secs: self.delay,
            easing: self.easing,
            start: point(Edge::Top, self.start),
            reversible: self.reversible,
            stagger: self.stagger,
            split_letters: self.split,
        }
    }
}

/// Scroll-triggered entrances.
pub fn reveals() -> Vec<RevealBinding> {
    let settled = |props: &[StyleProp]| -> StyleMap {
        props.iter().map(|p| (*p, p.neutral())).collect()
    };

    vec![
        // Hero entrances play once, as soon as the page loads.
        Reveal::new(
            ".sun-image-container",
            style(&[(Opacity, 0.0), (Scale, 0.5), (Y, 50.0)]),
            settled(&[Opacity, Scale, Y]),
            1.5,
            power(3),
            100.0,
        )
        .delay(0.3)
        .once(),
        Reveal::new(
            ".scroll-indicator",
            style(&[(Opacity, 0.0), (Y, -20.0)]),
            settled(&[Opacity, Y]),
            1.0,
            power(2),
            100.0,
        )
        .delay(2.2)
        .once(),
        Reveal::new(
            ".main-title",
            style(&[
                (Y, 100.0),
                (RotationX, -90.0),
                (Rotation, -12.0),
                (Opacity, 0.0),
                (Scale, 0.7),
                (Blur, 10.0),
            ]),
            settled(&[Y, RotationX, Rotation, Opacity, Scale, Blur]),
            1.2,
            Easing::elastic(EaseDirection::Out, 1.0, 0.6),
            80.0,
        )
        .delay(0.8)
        .stagger(Stagger {
            each: 0.03,
            from: StaggerFrom::Random,
        })
        .split(),
        Reveal::new(
            ".intro-text",
            style(&[(Opacity, 0.0), (Y, 50.0), (Scale, 0.95), (RotationX, -15.0)]),
            settled(&[Opacity, Y, Scale, RotationX]),
            1.4,
            power(3),
            85.0,
        )
        .delay(1.2),
        // Numbered sections, hero excluded.
        Reveal::new(
            ".section-number",
            style(&[(Scale, 0.5), (Opacity, 0.0), (Rotation, -180.0)]),
            style(&[(Scale, 1.0), (Opacity, 0.04), (Rotation, 0.0)]),
            1.5,
            Easing::back(EaseDirection::Out, 1.5),
            75.0,
        )
        .within(".fullscreen")
        .skip(1),
        Reveal::new(
            ".section-title",
            style(&[
                (Y, 80.0),
                (Opacity, 0.0),
                (RotationY, 180.0),
                (Scale, 0.5),
                (Blur, 10.0),
            ]),
            settled(&[Y, Opacity, RotationY, Scale, Blur]),
            1.0,
            Easing::back(EaseDirection::Out, 1.4),
            70.0,
        )
        .within(".fullscreen")
        .skip(1)
        .stagger(Stagger::each(0.025))
        .split(),
        Reveal::new(
            ".concept-explanation",
            style(&[(Opacity, 0.0), (Y, 60.0), (Scale, 0.95)]),
            settled(&[Opacity, Y, Scale]),
            1.2,
            power(3),
            80.0,
        ),
        Reveal::new(
            ".concept-icon",
            style(&[(Scale, 0.0), (Rotation, -180.0), (Opacity, 0.0)]),
            settled(&[Scale, Rotation, Opacity]),
            1.0,
            Easing::elastic(EaseDirection::Out, 1.0, 0.5),
            80.0,
        )
        .within(".concept-explanation"),
        Reveal::new(
            ".comparison-card",
            style(&[(Opacity, 0.0), (Y, 80.0), (RotationX, -30.0), (Scale, 0.9)]),
            settled(&[Opacity, Y, RotationX, Scale]),
            0.8,
            power(3),
            85.0,
        )
        .stagger(Stagger::each(0.1)),
        Reveal::new(
            ".card-visual",
            style(&[(Scale, 0.0), (Rotation, -90.0), (Opacity, 0.0)]),
            settled(&[Scale, Rotation, Opacity]),
            0.6,
            Easing::back(EaseDirection::Out, 1.5),
            85.0,
        )
        .within(".comparison-card")
        .delay(0.3)
        .stagger(Stagger::each(0.1)),
        Reveal::new(
            ".importance-box",
            style(&[(Opacity, 0.0), (Y, 50.0), (Scale, 0.95)]),
            settled(&[Opacity, Y, Scale]),
            1.0,
            power(3),
            85.0,
        ),
        Reveal::new(
            ".sun-description",
            style(&[(Opacity, 0.0), (Scale, 0.9), (Y, 50.0)]),
            settled(&[Opacity, Scale, Y]),
            1.2,
            power(3),
            80.0,
        ),
        Reveal::new(
            ".stat-item",
            style(&[(Opacity, 0.0), (X, -30.0), (Scale, 0.9)]),
            settled(&[Opacity, X, Scale]),
            0.6,
            power(2),
            75.0,
        )
        .within(".sun-description")
        .stagger(Stagger::each(0.1)),
        Reveal::new(
            ".culture-card",
            style(&[(Opacity, 0.0), (Y, 60.0), (RotationY, -20.0), (Scale, 0.95)]),
            settled(&[Opacity, Y, RotationY, Scale]),
            0.8,
            power(3),
            85.0,
        )
        .stagger(Stagger::each(0.1)),
        Reveal::new(
            ".culture-icon",
            style(&[(Scale, 0.0), (Rotation, -180.0)]),
            settled(&[Scale, Rotation]),
            0.6,
            Easing::elastic(EaseDirection::Out, 1.0, 0.5),
            85.0,
        )
        .within(".culture-card")
        .delay(0.2)
        .stagger(Stagger::each(0.1)),
        Reveal::new(
            ".celestial-table",
            style(&[(Opacity, 0.0), (Y, 50.0)]),
            settled(&[Opacity, Y]),
            1.0,
            power(3),
            85.0,
        ),
        Reveal::new(
            "tbody tr",
            style(&[(Opacity, 0.0), (X, -30.0)]),
            settled(&[Opacity, X]),
            0.5,
            power(2),
            80.0,
        )
        .within(".celestial-table")
        .stagger(Stagger::each(0.08)),
        Reveal::new(
            ".note-item",
            style(&[(Opacity, 0.0), (Y, 30.0), (Scale, 0.9)]),
            settled(&[Opacity, Y, Scale]),
            0.6,
            power(2),
            90.0,
        )
        .stagger(Stagger::each(0.1)),
    ]
    .into_iter()
    .map(Reveal::build)
    .collect()
}

/// Scroll-scrubbed parallax and fade-outs.
pub fn scrubs() -> Vec<ScrubBinding> {
    vec![
        ScrubBinding {
            selector: ".sun-image-container".to_string(),
            trigger: Some(".hero-section".to_string()),
            skip: 0,
            start: point(Edge::Top, 0.0),
            end: point(Edge::Bottom, 0.0),
            target: style(&[(Opacity, 0.0), (Scale, 0.7), (Y, -100.0), (Blur, 20.0)]),
            easing: Easing::power(2, EaseDirection::In),
            lag_secs: 1.0,
            disable_pointer_while_active: true,
        },
        ScrubBinding {
            selector: ".fullscreen".to_string(),
            trigger: None,
            skip: 1,
            start: point(Edge::Top, 100.0),
            end: point(Edge::Bottom, 0.0),
            target: style(&[(Y, -80.0)]),
            easing: Easing::Linear,
            lag_secs: 1.5,
            disable_pointer_while_active: false,
        },
    ]
}

/// Pointer hover feedback.
pub fn hovers() -> Vec<HoverBinding> {
    vec![
        HoverBinding {
            selector: ".comparison-card".to_string(),
            target: None,
            enter: style(&[(Scale, 1.05)]),
            leave: Some(style(&[(Scale, 1.0)])),
            duration_secs: 0.3,
            easing: power(2),
        },
        HoverBinding {
            selector: ".culture-card".to_string(),
            target: Some(".culture-icon".to_string()),
            enter: style(&[(Rotation, 360.0)]),
            leave: None,
            duration_secs: 0.6,
            easing: power(2),
        },
        HoverBinding {
            selector: ".stat-item".to_string(),
            target: None,
            enter: style(&[(Y, -5.0)]),
            leave: Some(style(&[(Y, 0.0)])),
            duration_secs: 0.3,
            easing: power(2),
        },
    ]
}

/// Ambient glow pulses.
pub fn loops() -> Vec<LoopBinding> {
    let pulse = |selector: &str, from: f64, to: f64, duration: f64| LoopBinding {
        selector: selector.to_string(),
        from: Some(style(&[(Glow, from)])),
        to: style(&[(Glow, to)]),
        duration_secs: duration,
        easing: Easing::Sine(EaseDirection::InOut),
        yoyo: true,
        stagger: None,
    };

    vec![
        pulse(".main-title", 0.4, 1.0, 2.5),
        pulse(".section-title", 0.3, 0.85, 2.0),
        pulse(".highlight", 0.0, 0.6, 1.5),
        LoopBinding {
            selector: ".title-glow".to_string(),
            from: Some(style(&[(Scale, 0.8), (Opacity, 0.0)])),
            to: style(&[(Scale, 1.2), (Opacity, 0.4)]),
            duration_secs: 2.0,
            easing: Easing::Sine(EaseDirection::InOut),
            yoyo: true,
            stagger: None,
        },
    ]
}
