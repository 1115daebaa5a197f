// Scroll reveal registrar: walks the animation tables once at load, binds one observer per
// matched element, then turns observer crossings into tweens.
// Missing elements are skipped silently. Under reduced motion the registrar is inert.

use tracing::{debug, info};

use crate::dom::Dom;
use crate::easing::{EaseDirection, Easing};
use crate::observer::{ScrollObserver, ScrubObserver, TriggerEvent, TriggerPolicy};
use crate::tween::{Repeat, TweenSpec, Tweener};
use crate::types::*;

/// Pointer transition delivered to [`Registrar::on_hover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverPhase {
    Enter,
    Leave,
}

#[derive(Debug)]
struct ObservedReveal {
    binding: usize,
    trigger: NodeId,
    /// Animated nodes with their start delay (binding delay plus stagger offset).
    targets: Vec<(NodeId, f64)>,
    observer: ScrollObserver,
}

#[derive(Debug)]
struct ScrubbedNode {
    binding: usize,
    element: NodeId,
    trigger: NodeId,
    observer: ScrubObserver,
    /// Style at progress 0.
    rest: StyleMap,
    last_progress: f64,
}

#[derive(Debug)]
struct HoverTarget {
    binding: usize,
    listen: NodeId,
    animate: Vec<NodeId>,
}

/// Owns every binding and the observers created for them.
#[derive(Debug, Default)]
pub struct Registrar {
    reveals: Vec<RevealBinding>,
    observed: Vec<ObservedReveal>,
    scrubs: Vec<ScrubBinding>,
    scrubbed: Vec<ScrubbedNode>,
    hovers: Vec<HoverBinding>,
    hover_targets: Vec<HoverTarget>,
    loops_started: usize,
    inert: bool,
}

impl Registrar {
    /// Bind every table in `motion` against the current document.
    ///
    /// Initial styles are handed to `tweener` straight away and every observer is evaluated
    /// once, so elements already past their start line begin animating immediately.
    /// `random` feeds random stagger orders and must yield values in `[0, 1)`.
    pub fn register<D: Dom>(
        motion: &MotionConfig,
        dom: &mut D,
        tweener: &mut Tweener,
        now: Timestamp,
        random: &mut dyn FnMut() -> f64,
    ) -> Self {
        let mut registrar = Registrar {
            reveals: motion.reveals.clone(),
            scrubs: motion.scrubs.clone(),
            hovers: motion.hovers.clone(),
            inert: dom.prefers_reduced_motion(),
            ..Default::default()
        };

        // Hover listeners are wired regardless; `on_hover` is what goes inert.
        registrar.bind_hovers(dom);

        if registrar.inert {
            info!("reduced motion preferred; scroll animations disabled");
            return registrar;
        }

        registrar.bind_reveals(dom, tweener, random);
        registrar.bind_scrubs(dom);
        registrar.start_loops(&motion.loops, dom, tweener, now, random);
        registrar.on_scroll(dom, tweener, now);

        info!(
            reveals = registrar.observed.len(),
            scrubs = registrar.scrubbed.len(),
            hovers = registrar.hover_targets.len(),
            loops = registrar.loops_started,
            "motion bindings registered"
        );
        registrar
    }

    fn bind_reveals<D: Dom>(
        &mut self,
        dom: &mut D,
        tweener: &mut Tweener,
        random: &mut dyn FnMut() -> f64,
    ) {
        for (index, binding) in self.reveals.iter().enumerate() {
            let pairs = resolve(&*dom, &binding.selector, binding.scope.as_deref(), binding.skip);
            if pairs.is_empty() {
                debug!(selector = %binding.selector, "reveal binding matched nothing");
                continue;
            }

            let element_offsets = match (&binding.stagger, binding.split_letters) {
                (Some(stagger), false) => stagger.offsets(pairs.len(), random),
                _ => vec![0.0; pairs.len()],
            };

            let policy = if binding.reversible {
                TriggerPolicy::Reversible
            } else {
                TriggerPolicy::Once
            };

            for ((trigger, element), offset) in pairs.into_iter().zip(element_offsets) {
                let targets: Vec<(NodeId, f64)> = if binding.split_letters {
                    let letters = dom.split_letters(element);
                    let offsets = match &binding.stagger {
                        Some(stagger) => stagger.offsets(letters.len(), random),
                        None => vec![0.0; letters.len()],
                    };
                    letters
                        .into_iter()
                        .zip(offsets)
                        .map(|(letter, o)| (letter, binding.delay_secs + o))
                        .collect()
                } else {
                    vec![(element, binding.delay_secs + offset)]
                };

                for (target, _) in &targets {
                    tweener.set(*target, &binding.initial);
                }

                self.observed.push(ObservedReveal {
                    binding: index,
                    trigger,
                    targets,
                    observer: ScrollObserver::new(binding.start, policy),
                });
            }
        }
    }

    fn bind_scrubs<D: Dom>(&mut self, dom: &mut D) {
        for (index, binding) in self.scrubs.iter().enumerate() {
            let elements: Vec<NodeId> = dom
                .query_all(&binding.selector)
                .into_iter()
                .skip(binding.skip)
                .collect();
            let shared_trigger = match &binding.trigger {
                Some(selector) => match dom.query_all(selector).first() {
                    Some(trigger) => Some(*trigger),
                    None => {
                        debug!(selector = %selector, "scrub trigger matched nothing");
                        continue;
                    }
                },
                None => None,
            };
            if elements.is_empty() {
                debug!(selector = %binding.selector, "scrub binding matched nothing");
                continue;
            }

            let rest: StyleMap = binding.target.props().map(|p| (p, p.neutral())).collect();
            for element in elements {
                self.scrubbed.push(ScrubbedNode {
                    binding: index,
                    element,
                    trigger: shared_trigger.unwrap_or(element),
                    observer: ScrubObserver::new(binding.start, binding.end),
                    rest: rest.clone(),
                    last_progress: 0.0,
                });
            }
        }
    }

    fn bind_hovers<D: Dom>(&mut self, dom: &mut D) {
        for (index, binding) in self.hovers.iter().enumerate() {
            for listen in dom.query_all(&binding.selector) {
                let animate = match &binding.target {
                    Some(child) => dom.query_within(listen, child),
                    None => vec![listen],
                };
                if animate.is_empty() {
                    continue;
                }
                self.hover_targets.push(HoverTarget {
                    binding: index,
                    listen,
                    animate,
                });
            }
        }
    }

    fn start_loops<D: Dom>(
        &mut self,
        loops: &[LoopBinding],
        dom: &mut D,
        tweener: &mut Tweener,
        now: Timestamp,
        random: &mut dyn FnMut() -> f64,
    ) {
        for binding in loops {
            let elements = dom.query_all(&binding.selector);
            if elements.is_empty() {
                debug!(selector = %binding.selector, "loop binding matched nothing");
                continue;
            }
            let offsets = match &binding.stagger {
                Some(stagger) => stagger.offsets(elements.len(), random),
                None => vec![0.0; elements.len()],
            };
            for (element, offset) in elements.into_iter().zip(offsets) {
                let spec = TweenSpec {
                    from: binding.from.clone(),
                    to: binding.to.clone(),
                    duration_secs: binding.duration_secs,
                    delay_secs: offset,
                    easing: binding.easing,
                    repeat: Repeat::Forever { yoyo: binding.yoyo },
                };
                tweener.animate(element, spec, now);
                self.loops_started += 1;
            }
        }
    }

    /// Re-evaluate every observer after the page scrolled or resized.
    pub fn on_scroll<D: Dom>(&mut self, dom: &mut D, tweener: &mut Tweener, now: Timestamp) {
        if self.inert {
            return;
        }
        let viewport = dom.viewport_height();

        for observed in &mut self.observed {
            let Some(bounds) = dom.bounds(observed.trigger) else {
                continue;
            };
            let binding = &self.reveals[observed.binding];
            match observed.observer.update(bounds, viewport) {
                Some(TriggerEvent::Enter) => {
                    for (target, delay) in &observed.targets {
                        let spec = TweenSpec::to(
                            binding.target.clone(),
                            binding.duration_secs,
                            binding.easing,
                        )
                        .delayed(*delay);
                        tweener.animate(*target, spec, now);
                    }
                }
                Some(TriggerEvent::LeaveBack) if binding.reversible => {
                    for (target, _) in &observed.targets {
                        let spec = TweenSpec::to(
                            binding.initial.clone(),
                            binding.duration_secs,
                            binding.easing,
                        );
                        tweener.animate(*target, spec, now);
                    }
                }
                _ => {}
            }
        }

        for scrubbed in &mut self.scrubbed {
            let Some(bounds) = dom.bounds(scrubbed.trigger) else {
                continue;
            };
            let binding = &self.scrubs[scrubbed.binding];
            let (progress, event) = scrubbed.observer.update(bounds, viewport);

            if binding.disable_pointer_while_active {
                match event {
                    Some(TriggerEvent::Enter) => {
                        dom.set_property(scrubbed.element, "pointer-events", "none")
                    }
                    Some(TriggerEvent::LeaveBack) => {
                        dom.set_property(scrubbed.element, "pointer-events", "auto")
                    }
                    None => {}
                }
            }

            if (progress - scrubbed.last_progress).abs() < 1e-6 {
                continue;
            }
            scrubbed.last_progress = progress;

            let eased = binding.easing.apply(progress);
            let style: StyleMap = binding
                .target
                .iter()
                .map(|(prop, to)| {
                    let from = scrubbed.rest.resolve(prop);
                    (prop, from + (to - from) * eased)
                })
                .collect();

            if binding.lag_secs > 0.0 {
                let spec = TweenSpec::to(
                    style,
                    binding.lag_secs,
                    Easing::power(3, EaseDirection::Out),
                );
                tweener.animate(scrubbed.element, spec, now);
            } else {
                tweener.set(scrubbed.element, &style);
            }
        }
    }

    /// Pointer entered or left `node`. No-op for nodes without a hover binding.
    pub fn on_hover(&self, node: NodeId, phase: HoverPhase, tweener: &mut Tweener, now: Timestamp) {
        if self.inert {
            return;
        }
        for target in self.hover_targets.iter().filter(|t| t.listen == node) {
            let binding = &self.hovers[target.binding];
            let style = match phase {
                HoverPhase::Enter => &binding.enter,
                HoverPhase::Leave => match &binding.leave {
                    Some(leave) => leave,
                    None => continue,
                },
            };
            for animate in &target.animate {
                let spec = TweenSpec::to(style.clone(), binding.duration_secs, binding.easing);
                tweener.animate(*animate, spec, now);
            }
        }
    }

    /// Nodes that need pointer enter/leave listeners.
    pub fn hover_listeners(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.hover_targets.iter().map(|t| t.listen).collect();
        nodes.sort();
        nodes.dedup();
        nodes
    }

    /// Scroll observers (reveal and scrub) currently registered.
    pub fn observer_count(&self) -> usize {
        self.observed.len() + self.scrubbed.len()
    }

    pub fn is_inert(&self) -> bool {
        self.inert
    }
}

/// (trigger, element) pairs for a binding. Scoped bindings look inside every scope match
/// and use the scope element as the trigger.
fn resolve<D: Dom>(dom: &D, selector: &str, scope: Option<&str>, skip: usize) -> Vec<(NodeId, NodeId)> {
    match scope {
        Some(scope) => {
            let mut pairs = Vec::new();
            for scope_node in dom.query_all(scope).into_iter().skip(skip) {
                for element in dom.query_within(scope_node, selector) {
                    pairs.push((scope_node, element));
                }
            }
            pairs
        }
        None => dom
            .query_all(selector)
            .into_iter()
            .skip(skip)
            .map(|element| (element, element))
            .collect(),
    }
}
