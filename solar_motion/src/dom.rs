// The one seam between the motion engines and the document.
// The browser implementation lives in `web`; tests drive the engines through a fake.

use crate::types::*;

/// Document access needed by the registrar and the site controller.
pub trait Dom {
    /// Every element matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<NodeId>;

    /// Descendants of `scope` matching `selector`, in document order.
    fn query_within(&self, scope: NodeId, selector: &str) -> Vec<NodeId>;

    /// Replace the text of `node` with one `span.char` per character and return the spans.
    /// Calling it twice on the same node returns the spans created the first time.
    fn split_letters(&mut self, node: NodeId) -> Vec<NodeId>;

    /// Viewport-relative bounds, `None` if the node is detached.
    fn bounds(&self, node: NodeId) -> Option<Bounds>;

    fn viewport_height(&self) -> f64;

    /// Current vertical scroll offset of the page.
    fn scroll_y(&self) -> f64;

    fn prefers_reduced_motion(&self) -> bool;

    /// Write the rendered form of `style` into the node's inline style.
    fn apply_style(&mut self, node: NodeId, style: &StyleMap);

    /// Set a raw inline style property.
    fn set_property(&mut self, node: NodeId, name: &str, value: &str);

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Replace the node's text content.
    fn set_text(&mut self, node: NodeId, text: &str);
}

/// Inline CSS for a style map. Only the properties present in `style` are written, so
/// properties owned by the stylesheet are left alone.
pub fn render_css(style: &StyleMap) -> Vec<(&'static str, String)> {
    let mut out = Vec::new();

    if style.contains(StyleProp::Opacity) {
        out.push(("opacity", num(style.resolve(StyleProp::Opacity))));
    }

    let transform_props = [
        StyleProp::X,
        StyleProp::Y,
        StyleProp::Rotation,
        StyleProp::RotationX,
        StyleProp::RotationY,
        StyleProp::Scale,
    ];
    if transform_props.iter().any(|p| style.contains(*p)) {
        out.push((
            "transform",
            format!(
                "translate3d({}px, {}px, 0px) rotate({}deg) rotateX({}deg) rotateY({}deg) scale({})",
                num(style.resolve(StyleProp::X)),
                num(style.resolve(StyleProp::Y)),
                num(style.resolve(StyleProp::Rotation)),
                num(style.resolve(StyleProp::RotationX)),
                num(style.resolve(StyleProp::RotationY)),
                num(style.resolve(StyleProp::Scale)),
            ),
        ));
    }

    if style.contains(StyleProp::Blur) {
        out.push((
            "filter",
            format!("blur({}px)", num(style.resolve(StyleProp::Blur).max(0.0))),
        ));
    }

    if style.contains(StyleProp::Glow) {
        let glow = style.resolve(StyleProp::Glow).clamp(0.0, 1.0);
        let shadow = if glow == 0.0 {
            "none".to_string()
        } else {
            format!(
                "0 0 {}px rgba(255,140,66,{}), 0 0 {}px rgba(255,200,55,{})",
                num(20.0 + 20.0 * glow),
                num(glow),
                num(30.0 + 30.0 * glow),
                num(0.8 * glow),
            )
        };
        out.push(("text-shadow", shadow));
    }

    out
}

fn num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    // Avoid "-0" in the output.
    format!("{}", if rounded == 0.0 { 0.0 } else { rounded })
}
