// Browser bindings: the `Dom` and `MediaPlayer` implementations over web-sys, plus the
// event listener registry owned by the wasm handle.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;

use tracing::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CssStyleDeclaration, Document, Element, Event, EventTarget, HtmlAudioElement, HtmlElement,
    NodeList, Window,
};

use crate::audio::MediaPlayer;
use crate::dom::{render_css, Dom};
use crate::error::{describe_js, PlaybackRejected, SiteError};
use crate::types::*;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// The live document. Elements get a `NodeId` the first time a query returns them.
#[derive(Debug)]
pub struct WebDom {
    window: Window,
    document: Document,
    nodes: RefCell<Vec<Element>>,
    letters: HashMap<NodeId, Vec<NodeId>>,
    reduced_motion: bool,
}

impl WebDom {
    pub fn new() -> Result<Self, SiteError> {
        let window = web_sys::window().ok_or(SiteError::BrowserApi("window"))?;
        let document = window.document().ok_or(SiteError::BrowserApi("document"))?;
        let reduced_motion = window
            .match_media(REDUCED_MOTION_QUERY)?
            .map(|query| query.matches())
            .unwrap_or(false);

        Ok(WebDom {
            window,
            document,
            nodes: RefCell::new(Vec::new()),
            letters: HashMap::new(),
            reduced_motion,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn element(&self, node: NodeId) -> Option<Element> {
        self.nodes.borrow().get(node.index()).cloned()
    }

    fn intern(&self, element: Element) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(index) = nodes.iter().position(|known| *known == element) {
            return NodeId::new(index as u32);
        }
        nodes.push(element);
        NodeId::new((nodes.len() - 1) as u32)
    }

    fn collect(&self, selector: &str, list: Result<NodeList, JsValue>) -> Vec<NodeId> {
        let list = match list {
            Ok(list) => list,
            Err(err) => {
                debug!(selector, error = %describe_js(&err), "selector rejected");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.intern(element))
            .collect()
    }

    fn style(&self, node: NodeId) -> Option<CssStyleDeclaration> {
        let element = self.element(node)?;
        element.dyn_ref::<HtmlElement>().map(HtmlElement::style)
    }

    fn write_style(&self, node: NodeId, name: &str, value: &str) {
        let Some(style) = self.style(node) else {
            return;
        };
        if let Err(err) = style.set_property(name, value) {
            debug!(name, value, error = %describe_js(&err), "style write rejected");
        }
    }

    fn letter_span(&self, ch: char) -> Result<Element, JsValue> {
        let span = self.document.create_element("span")?;
        span.set_class_name("char");
        let glyph = if ch == ' ' { '\u{a0}' } else { ch };
        span.set_text_content(Some(&glyph.to_string()));
        if let Some(html) = span.dyn_ref::<HtmlElement>() {
            html.style().set_property("display", "inline-block")?;
        }
        Ok(span)
    }
}

impl Dom for WebDom {
    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.collect(selector, self.document.query_selector_all(selector))
    }

    fn query_within(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        match self.element(scope) {
            Some(element) => self.collect(selector, element.query_selector_all(selector)),
            None => Vec::new(),
        }
    }

    fn split_letters(&mut self, node: NodeId) -> Vec<NodeId> {
        if let Some(letters) = self.letters.get(&node) {
            return letters.clone();
        }
        let Some(element) = self.element(node) else {
            return Vec::new();
        };

        let text = element.text_content().unwrap_or_default();
        element.set_text_content(None);
        let mut letters = Vec::with_capacity(text.len());
        for ch in text.chars() {
            let span = match self.letter_span(ch) {
                Ok(span) => span,
                Err(err) => {
                    debug!(error = %describe_js(&err), "letter span not created");
                    continue;
                }
            };
            if let Err(err) = element.append_child(&span) {
                debug!(error = %describe_js(&err), "letter span not attached");
                continue;
            }
            letters.push(self.intern(span));
        }
        self.letters.insert(node, letters.clone());
        letters
    }

    fn bounds(&self, node: NodeId) -> Option<Bounds> {
        let element = self.element(node)?;
        if !element.is_connected() {
            return None;
        }
        let rect = element.get_bounding_client_rect();
        Some(Bounds::new(rect.top(), rect.bottom()))
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|height| height.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn apply_style(&mut self, node: NodeId, style: &StyleMap) {
        for (name, value) in render_css(style) {
            self.write_style(node, name, &value);
        }
    }

    fn set_property(&mut self, node: NodeId, name: &str, value: &str) {
        self.write_style(node, name, value);
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(element) = self.element(node) else {
            return;
        };
        if let Err(err) = element.set_attribute(name, value) {
            debug!(name, error = %describe_js(&err), "attribute write rejected");
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(element) = self.element(node) {
            element.set_text_content(Some(text));
        }
    }
}

/// `<audio>` element driven by the audio controller.
#[derive(Debug, Clone)]
pub struct HtmlAudioPlayer {
    element: HtmlAudioElement,
}

impl HtmlAudioPlayer {
    pub fn find(document: &Document, id: &str) -> Result<Self, SiteError> {
        let element = document
            .get_element_by_id(id)
            .ok_or_else(|| SiteError::MissingElement(format!("#{id}")))?
            .dyn_into::<HtmlAudioElement>()
            .map_err(|_| SiteError::MissingElement(format!("#{id} (not an <audio> element)")))?;
        Ok(HtmlAudioPlayer { element })
    }
}

impl MediaPlayer for HtmlAudioPlayer {
    fn play(&self) -> impl Future<Output = Result<(), PlaybackRejected>> {
        let promise = self.element.play();
        async move {
            let promise = promise.map_err(|err| PlaybackRejected(describe_js(&err)))?;
            JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|err| PlaybackRejected(describe_js(&err)))
        }
    }

    fn pause(&self) {
        if let Err(err) = self.element.pause() {
            debug!(error = %describe_js(&err), "pause rejected");
        }
    }

    fn set_muted(&self, muted: bool) {
        self.element.set_muted(muted);
    }

    fn set_volume(&self, volume: f64) {
        self.element.set_volume(volume);
    }

    fn set_looping(&self, looping: bool) {
        self.element.set_loop(looping);
    }
}

type Listener = Closure<dyn FnMut(Event)>;

/// Event listeners owned by the wasm handle. Dropping the registry detaches them.
#[derive(Default)]
pub struct Listeners {
    entries: Vec<(EventTarget, &'static str, Listener)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), SiteError> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.entries.push((target.clone(), event, closure));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        for (target, event, closure) in self.entries.drain(..) {
            // Nothing left to do if the target refuses; the closure is freed either way.
            let _ = target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
