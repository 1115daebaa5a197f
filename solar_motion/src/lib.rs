// solar_motion: client-side interactivity for the Sun site, compiled to WebAssembly.
// Page behaviour lives in the `Dom`-generic core; this file only wires it to the browser.

mod audio;
mod carousel;
mod catalog;
mod dom;
mod easing;
mod error;
mod logging;
mod observer;
mod raf;
mod reveal;
mod site;
mod tween;
mod types;
mod web;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, KeyboardEvent, VisibilityState};

pub use audio::{AudioController, AudioState, MediaPlayer, ScrollAffordance};
pub use carousel::{Carousel, CarouselEffect, CarouselState, Suspension};
pub use dom::{render_css, Dom};
pub use easing::{EaseDirection, Easing};
pub use error::{PlaybackRejected, SiteError};
pub use observer::{ScrollObserver, ScrubObserver, TriggerEvent, TriggerPolicy};
pub use raf::RafLoop;
pub use reveal::{HoverPhase, Registrar};
pub use site::Site;
pub use tween::{Repeat, TweenId, TweenSpec, Tweener};
pub use types::*;
pub use web::{HtmlAudioPlayer, Listeners, WebDom};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// The built-in site configuration as JSON, for JS callers that want to tweak it.
#[wasm_bindgen]
pub fn default_config_json() -> Result<String, JsValue> {
    Ok(default_config()?)
}

fn default_config() -> Result<String, SiteError> {
    Ok(serde_json::to_string_pretty(&SiteConfig::default())?)
}

/// Handle to the running site. Listeners and the frame loop stop when it is freed.
#[wasm_bindgen]
pub struct SolarSite {
    site: Rc<RefCell<Site<WebDom>>>,
    audio: Option<Rc<AudioController<HtmlAudioPlayer>>>,
    raf: RafLoop,
    listeners: Listeners,
}

#[wasm_bindgen]
impl SolarSite {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<SolarSite, JsValue> {
        Ok(boot(config_json)?)
    }

    /// Scroll observers bound at load; zero under reduced motion.
    pub fn observer_count(&self) -> usize {
        self.site.borrow().registrar().observer_count()
    }

    /// Icon for the current audio session state.
    pub fn audio_label(&self) -> String {
        let state = self.audio.as_ref().map(|audio| audio.state()).unwrap_or_default();
        state.label().to_string()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Pause the frame loop (tweens and carousel freeze).
    pub fn stop(&self) {
        self.raf.stop();
    }

    pub fn start(&self) {
        self.raf.start();
    }
}

fn boot(config_json: &str) -> Result<SolarSite, SiteError> {
    let config = SiteConfig::from_json(config_json)?;
    logging::init(&config.log_filter)?;

    let dom = WebDom::new()?;
    let window = dom.window().clone();
    let document = dom.document().clone();

    let player = if config.audio.enabled {
        Some(HtmlAudioPlayer::find(&document, &config.audio.element_id)?)
    } else {
        None
    };

    let site = Site::boot(&config, dom, raf::now(), &mut js_sys::Math::random)?;
    let site = Rc::new(RefCell::new(site));
    let audio = player
        .map(|player| Rc::new(AudioController::new(player, config.audio.mode, config.audio.volume)));

    let mut listeners = Listeners::new();

    for event in ["scroll", "resize"] {
        let site = Rc::clone(&site);
        listeners.listen(&window, event, move |_: Event| {
            site.borrow_mut().on_scroll(raf::now())
        })?;
    }

    let pointer_targets = site.borrow().pointer_targets();
    for node in pointer_targets {
        let element = site.borrow().dom().element(node);
        let Some(element) = element else {
            continue;
        };
        for (event, phase) in [("mouseenter", HoverPhase::Enter), ("mouseleave", HoverPhase::Leave)] {
            let site = Rc::clone(&site);
            listeners.listen(&element, event, move |_: Event| {
                site.borrow_mut().on_pointer(node, phase, raf::now())
            })?;
        }
    }

    let carousel = site.borrow().carousel_node();
    if let Some(node) = carousel {
        let element = site.borrow().dom().element(node);
        if let Some(element) = element {
            bind_carousel(&mut listeners, &site, node, &element)?;
        }
    }

    {
        let site = Rc::clone(&site);
        let audio = audio.clone();
        let doc = document.clone();
        listeners.listen(&document, "visibilitychange", move |_: Event| {
            let hidden = doc.visibility_state() == VisibilityState::Hidden;
            site.borrow_mut().on_visibility(hidden, raf::now());
            if let Some(audio) = &audio {
                audio.on_visibility(hidden);
            }
        })?;
    }

    if let Some(audio) = &audio {
        let button = site.borrow().audio_button();
        let button = button.and_then(|node| site.borrow().dom().element(node));
        if let Some(button) = button {
            let site = Rc::clone(&site);
            let audio = Rc::clone(audio);
            listeners.listen(&button, "click", move |_: Event| {
                let site = Rc::clone(&site);
                let audio = Rc::clone(&audio);
                spawn_local(async move {
                    let state = audio.toggle().await;
                    site.borrow_mut().show_audio_state(state);
                });
            })?;
        }

        let site = Rc::clone(&site);
        let audio = Rc::clone(audio);
        spawn_local(async move {
            let state = audio.autoplay().await;
            site.borrow_mut().show_audio_state(state);
        });
    }

    let raf = {
        let site = Rc::clone(&site);
        RafLoop::new(move |now| site.borrow_mut().frame(now))
    };
    raf.start();

    Ok(SolarSite {
        site,
        audio,
        raf,
        listeners,
    })
}

fn bind_carousel(
    listeners: &mut Listeners,
    site: &Rc<RefCell<Site<WebDom>>>,
    node: NodeId,
    element: &web_sys::Element,
) -> Result<(), SiteError> {
    let click_site = Rc::clone(site);
    listeners.listen(element, "click", move |_: Event| {
        click_site.borrow_mut().on_click(node, raf::now());
    })?;

    let key_site = Rc::clone(site);
    listeners.listen(element, "keydown", move |event: Event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
            return;
        };
        if key_site.borrow_mut().on_key(node, &key, raf::now()) {
            event.prevent_default();
        }
    })?;

    for (event, started) in [("touchstart", true), ("touchend", false)] {
        let site = Rc::clone(site);
        listeners.listen(element, event, move |_: Event| {
            site.borrow_mut().on_touch(node, started, raf::now());
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips() {
        let json = default_config().unwrap();
        let config = SiteConfig::from_json(&json).unwrap();
        assert_eq!(config.motion.reveals, catalog::reveals());
        assert_eq!(config.audio.volume, 0.3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_json_is_a_typed_error() {
        let err = SiteConfig::from_json("{\"audio\": 7}").unwrap_err();
        assert!(matches!(err, SiteError::Serialization(_)));
    }
}
