// Site controller: owns the tween engine, the registrar, the carousel and the audio button
// affordance, and routes page events to them. Generic over `Dom`, so the whole page
// behaviour runs against the in-memory document in tests.

use tracing::{debug, info};

use crate::audio::{AudioState, ScrollAffordance};
use crate::carousel::{Carousel, CarouselEffect, Suspension};
use crate::dom::Dom;
use crate::error::SiteError;
use crate::reveal::{HoverPhase, Registrar};
use crate::tween::Tweener;
use crate::types::*;

#[derive(Debug)]
struct CarouselView {
    container: NodeId,
    image: NodeId,
    carousel: Carousel,
}

#[derive(Debug)]
struct AudioButton {
    node: NodeId,
    affordance: ScrollAffordance,
}

#[derive(Debug)]
pub struct Site<D: Dom> {
    dom: D,
    tweener: Tweener,
    registrar: Registrar,
    carousel: Option<CarouselView>,
    audio_button: Option<AudioButton>,
}

impl<D: Dom> Site<D> {
    /// Bind everything `config` describes against `dom` and render the initial styles.
    pub fn boot(
        config: &SiteConfig,
        mut dom: D,
        now: Timestamp,
        random: &mut dyn FnMut() -> f64,
    ) -> Result<Self, SiteError> {
        config.validate()?;

        let mut tweener = Tweener::new();
        let registrar = Registrar::register(&config.motion, &mut dom, &mut tweener, now, random);

        let audio_button = if config.audio.enabled {
            let selector = format!("#{}", config.audio.button_id);
            match dom.query_all(&selector).first() {
                Some(&node) => Some(AudioButton {
                    node,
                    affordance: ScrollAffordance::new(dom.scroll_y(), config.audio.hide_after_px),
                }),
                None => {
                    debug!(%selector, "audio button not found");
                    None
                }
            }
        } else {
            None
        };

        let carousel = bind_carousel(&config.carousel, &mut dom, now)?;

        info!(
            observers = registrar.observer_count(),
            carousel = carousel.is_some(),
            audio_button = audio_button.is_some(),
            "site ready"
        );

        let mut site = Site {
            dom,
            tweener,
            registrar,
            carousel,
            audio_button,
        };
        site.flush();
        if let Some(button) = site.audio_button.as_ref().map(|b| b.node) {
            site.dom.set_text(button, AudioState::Unstarted.label());
        }
        Ok(site)
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn registrar(&self) -> &Registrar {
        &self.registrar
    }

    pub fn tweener(&self) -> &Tweener {
        &self.tweener
    }

    pub fn carousel(&self) -> Option<&Carousel> {
        self.carousel.as_ref().map(|view| &view.carousel)
    }

    pub fn carousel_node(&self) -> Option<NodeId> {
        self.carousel.as_ref().map(|view| view.container)
    }

    pub fn audio_button(&self) -> Option<NodeId> {
        self.audio_button.as_ref().map(|button| button.node)
    }

    /// Nodes that need pointer enter/leave listeners.
    pub fn pointer_targets(&self) -> Vec<NodeId> {
        let mut nodes = self.registrar.hover_listeners();
        if let Some(container) = self.carousel_node() {
            if !nodes.contains(&container) {
                nodes.push(container);
            }
        }
        nodes
    }

    /// Page scrolled or resized.
    pub fn on_scroll(&mut self, now: Timestamp) {
        self.registrar.on_scroll(&mut self.dom, &mut self.tweener, now);

        if let Some(button) = &mut self.audio_button {
            let was_visible = button.affordance.is_visible();
            if button.affordance.on_scroll(self.dom.scroll_y()) != was_visible {
                for (name, value) in button.affordance.css() {
                    self.dom.set_property(button.node, name, value);
                }
            }
        }

        self.flush();
    }

    /// Animation frame: advance tweens and the carousel.
    pub fn frame(&mut self, now: Timestamp) {
        for (node, style) in self.tweener.tick(now) {
            self.dom.apply_style(node, &style);
        }

        if let Some(view) = &mut self.carousel {
            for effect in view.carousel.tick(now) {
                apply_carousel_effect(&mut self.dom, view.image, &effect);
            }
        }
    }

    pub fn on_pointer(&mut self, node: NodeId, phase: HoverPhase, now: Timestamp) {
        self.registrar.on_hover(node, phase, &mut self.tweener, now);

        if let Some(view) = self.carousel.as_mut().filter(|v| v.container == node) {
            match phase {
                HoverPhase::Enter => view.carousel.suspend(Suspension::Hover),
                HoverPhase::Leave => view.carousel.resume(Suspension::Hover, now),
            }
        }
        self.flush();
    }

    pub fn on_touch(&mut self, node: NodeId, started: bool, now: Timestamp) {
        if let Some(view) = self.carousel.as_mut().filter(|v| v.container == node) {
            if started {
                view.carousel.suspend(Suspension::Touch);
            } else {
                view.carousel.resume(Suspension::Touch, now);
            }
        }
    }

    /// Click on `node`. Returns whether the carousel advanced.
    pub fn on_click(&mut self, node: NodeId, now: Timestamp) -> bool {
        match self.carousel.as_mut().filter(|v| v.container == node) {
            Some(view) => view.carousel.advance_manual(now),
            None => false,
        }
    }

    /// Key pressed on `node`. Returns whether the key was handled.
    pub fn on_key(&mut self, node: NodeId, key: &str, now: Timestamp) -> bool {
        match self.carousel.as_mut().filter(|v| v.container == node) {
            Some(view) => view.carousel.on_key(key, now),
            None => false,
        }
    }

    pub fn on_visibility(&mut self, hidden: bool, now: Timestamp) {
        if let Some(view) = &mut self.carousel {
            view.carousel.set_hidden(hidden, now);
        }
    }

    /// Reflect the audio session state on the toggle button.
    pub fn show_audio_state(&mut self, state: AudioState) {
        if let Some(button) = &self.audio_button {
            self.dom.set_text(button.node, state.label());
            self.dom.set_attribute(
                button.node,
                "aria-pressed",
                if state.is_playing() { "true" } else { "false" },
            );
        }
    }

    /// Write styles changed outside of a frame (initial styles, `set` calls).
    fn flush(&mut self) {
        for (node, style) in self.tweener.drain_dirty() {
            self.dom.apply_style(node, &style);
        }
    }
}

fn bind_carousel<D: Dom>(
    config: &CarouselConfig,
    dom: &mut D,
    now: Timestamp,
) -> Result<Option<CarouselView>, SiteError> {
    if config.images.is_empty() {
        debug!("no carousel images configured");
        return Ok(None);
    }
    let Some(&container) = dom.query_all(&config.container).first() else {
        debug!(selector = %config.container, "carousel container not found");
        return Ok(None);
    };
    let Some(&image) = dom.query_within(container, "img").first() else {
        debug!(selector = %config.container, "carousel has no img");
        return Ok(None);
    };

    let carousel = Carousel::new(config, now)?;
    let half = config.transition_ms / 2;
    dom.set_attribute(container, "tabindex", "0");
    dom.set_attribute(container, "role", "button");
    dom.set_attribute(image, "src", carousel.current_image());
    dom.set_property(
        image,
        "transition",
        &format!("opacity {half}ms ease, filter {half}ms ease"),
    );

    Ok(Some(CarouselView {
        container,
        image,
        carousel,
    }))
}

fn apply_carousel_effect<D: Dom>(dom: &mut D, image: NodeId, effect: &CarouselEffect) {
    match effect {
        CarouselEffect::FadeOut => {
            dom.set_property(image, "opacity", "0");
            dom.set_property(image, "filter", "blur(8px)");
        }
        CarouselEffect::Swap(src) => dom.set_attribute(image, "src", src),
        CarouselEffect::FadeIn => {
            dom.set_property(image, "opacity", "1");
            dom.set_property(image, "filter", "blur(0px)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::fake::FakeDom;

    const NO_MOTION: &str = r#""motion": {"reveals": [], "scrubs": [], "hovers": [], "loops": []}"#;

    fn ms(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    fn config(body: &str) -> SiteConfig {
        SiteConfig::from_json(&format!("{{{NO_MOTION}{body}}}")).unwrap()
    }

    fn carousel_page() -> (FakeDom, NodeId, NodeId) {
        let mut dom = FakeDom::new();
        let container = dom.add("carousel", None, 2000.0);
        let image = dom.add("img", Some(container), 2000.0);
        (dom, container, image)
    }

    #[test]
    fn empty_page_boots_with_built_in_config() {
        let site = Site::boot(&SiteConfig::default(), FakeDom::new(), ms(0), &mut || 0.5).unwrap();
        assert_eq!(site.registrar().observer_count(), 0);
        assert!(site.carousel().is_none());
        assert!(site.audio_button().is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = config("");
        config.audio.volume = -1.0;
        assert!(Site::boot(&config, FakeDom::new(), ms(0), &mut || 0.5).is_err());
    }

    #[test]
    fn reveal_runs_through_frames() {
        let mut dom = FakeDom::new();
        let box_node = dom.add("importance-box", None, 3000.0);
        let config = SiteConfig::from_json(
            r#"{"motion": {"scrubs": [], "hovers": [], "loops": [], "reveals": [{
                "selector": ".importance-box",
                "initial": {"opacity": 0, "y": 50},
                "target": {"opacity": 1, "y": 0},
                "duration_secs": 1.0,
                "easing": "power2.out",
                "start": "top 80%"
            }]}}"#,
        )
        .unwrap();
        let mut site = Site::boot(&config, dom, ms(0), &mut || 0.5).unwrap();
        assert_eq!(site.dom().style(box_node).get(StyleProp::Opacity), Some(0.0));

        site.dom.scroll = 2500.0;
        site.on_scroll(ms(100));
        site.frame(ms(600));
        site.frame(ms(1100));
        assert_eq!(site.dom().style(box_node).get(StyleProp::Y), Some(0.0));
        assert_eq!(site.dom().style(box_node).get(StyleProp::Opacity), Some(1.0));
    }

    #[test]
    fn carousel_effects_reach_the_image() {
        let (dom, container, image) = carousel_page();
        let config = config(r#", "carousel": {"images": ["sun.jpg", "corona.jpg"]}"#);
        let mut site = Site::boot(&config, dom, ms(0), &mut || 0.5).unwrap();
        assert_eq!(site.dom().attribute(image, "src"), Some("sun.jpg"));
        assert_eq!(site.dom().attribute(container, "tabindex"), Some("0"));

        assert!(site.on_click(container, ms(100)));
        site.frame(ms(100));
        assert_eq!(site.dom().property(image, "opacity"), Some("0"));
        site.frame(ms(400));
        assert_eq!(site.dom().attribute(image, "src"), Some("corona.jpg"));
        assert_eq!(site.dom().property(image, "opacity"), Some("1"));
    }

    #[test]
    fn carousel_keys_and_hover() {
        let (dom, container, _) = carousel_page();
        let config = config(r#", "carousel": {"images": ["a.jpg", "b.jpg", "c.jpg"]}"#);
        let mut site = Site::boot(&config, dom, ms(0), &mut || 0.5).unwrap();

        assert!(site.pointer_targets().contains(&container));
        site.on_pointer(container, HoverPhase::Enter, ms(10));
        site.frame(ms(5000));
        assert_eq!(site.carousel().map(|c| c.state().current_index), Some(0));

        assert!(site.on_key(container, " ", ms(5000)));
        assert!(!site.on_key(container, "a", ms(5100)));
        assert_eq!(site.carousel().map(|c| c.state().current_index), Some(1));
    }

    #[test]
    fn carousel_runs_under_reduced_motion() {
        let (mut dom, _, _) = carousel_page();
        dom.reduced_motion = true;
        let config = config(r#", "carousel": {"images": ["a.jpg", "b.jpg"]}"#);
        let mut site = Site::boot(&config, dom, ms(0), &mut || 0.5).unwrap();
        assert!(site.registrar().is_inert());
        site.frame(ms(3000));
        assert_eq!(site.carousel().map(|c| c.state().current_index), Some(1));
    }

    #[test]
    fn carousel_without_image_is_skipped() {
        let mut dom = FakeDom::new();
        dom.add("carousel", None, 0.0);
        let config = config(r#", "carousel": {"images": ["a.jpg"]}"#);
        let site = Site::boot(&config, dom, ms(0), &mut || 0.5).unwrap();
        assert!(site.carousel().is_none());
    }

    #[test]
    fn audio_button_hides_while_scrolling_down() {
        let mut dom = FakeDom::new();
        let button = dom.add("audioToggleBtn", None, 0.0);
        let mut site = Site::boot(&config(""), dom, ms(0), &mut || 0.5).unwrap();
        assert_eq!(site.dom().text(button), "🔇");

        site.dom.scroll = 400.0;
        site.on_scroll(ms(10));
        assert_eq!(site.dom().property(button, "opacity"), Some("0"));
        assert_eq!(site.dom().property(button, "pointer-events"), Some("none"));

        site.dom.scroll = 200.0;
        site.on_scroll(ms(20));
        assert_eq!(site.dom().property(button, "opacity"), Some("1"));

        site.show_audio_state(AudioState::PlayingAudible);
        assert_eq!(site.dom().text(button), "🔊");
        assert_eq!(site.dom().attribute(button, "aria-pressed"), Some("true"));
    }
}
