//! Browser host pieces: canvas surfaces, capability probing, container lookup,
//! section reveals and pointer-driven element transforms
//!
//! Everything here degrades to `None` when the page does not provide what an
//! effect needs. Nothing panics on a missing element or context.

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, NodeList, Window,
};

use crate::device::CapabilitySignals;
use crate::effect::EffectKind;
use crate::input::InputEvent;
use crate::renderer::{Rgba, Surface};
use crate::reveal::{self, RevealCue};
use crate::settings::Settings;
use crate::stage::Stage;
use crate::transform::{ElementRect, ElementRole};
use crate::viewport::ViewportDimensions;

/// Element id the effect canvases are attached to
pub const CONTAINER_ID: &str = "wrapper";
/// Attribute on the container holding a JSON `Settings` document
pub const CONFIG_ATTRIBUTE: &str = "data-backdrop-config";

/// Page sections that reveal their paragraphs when shown
const SECTIONS: &str = "#main article[id]";
const SECTION_ITEMS: &str = "p";
const SECTION_HEADING: &str = "h2.major";
/// Elements that animate in once scrolled into view
const SCROLL_REVEAL: &str = ".animate-on-scroll";
const ANIMATED_CLASS: &str = "animated";
const ITEM_ANIMATION: &str = "fadeInUp 0.6s ease-out forwards";

const PARALLAX: &str = "[data-parallax]";
const MAGNETIC: &str = "nav a, button";
const TILT: &str = ".tilt-effect";
const DEFAULT_PARALLAX_SPEED: f32 = 0.5;
const DEFAULT_PARALLAX_DEPTH: f32 = 20.0;

/// A 2D canvas layered behind the page content
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dims: ViewportDimensions,
    dpr: f64,
}

impl CanvasSurface {
    /// Create a canvas for `kind` inside `container`. `None` when the
    /// browser refuses to create the element or its 2D context.
    pub fn attach(
        document: &Document,
        container: &Element,
        kind: EffectKind,
        dims: ViewportDimensions,
        dpr: f64,
    ) -> Option<Self> {
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .ok()?
            .dyn_into()
            .ok()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into()
            .ok()?;

        canvas.set_class_name(&format!("backdrop-fx backdrop-fx-{}", kind.as_str()));
        let style = canvas.style();
        let _ = style.set_property("position", "fixed");
        let _ = style.set_property("left", "0");
        let _ = style.set_property("pointer-events", "none");
        let _ = style.set_property("z-index", "-1");
        if kind == EffectKind::Waves {
            let _ = style.set_property("bottom", "0");
        } else {
            let _ = style.set_property("top", "0");
        }

        container.append_child(&canvas).ok()?;

        let mut surface = Self {
            canvas,
            ctx,
            dims: ViewportDimensions::default(),
            dpr: dpr.max(1.0),
        };
        surface.resize(dims);
        Some(surface)
    }

    fn set_fill(&self, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
    }

    fn set_stroke(&self, color: Rgba, width: f32) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
    }

    fn trace(&self, points: &[Vec2]) {
        self.ctx.begin_path();
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                self.ctx.move_to(p.x as f64, p.y as f64);
            } else {
                self.ctx.line_to(p.x as f64, p.y as f64);
            }
        }
    }

    fn arc(&self, center: Vec2, radius: f32) -> bool {
        self.ctx.begin_path();
        self.ctx
            .arc(
                center.x as f64,
                center.y as f64,
                radius.max(0.0) as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .is_ok()
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> ViewportDimensions {
        self.dims
    }

    fn resize(&mut self, dims: ViewportDimensions) {
        self.dims = dims;
        let (w, h) = dims.pixel_size();
        self.canvas.set_width((w as f64 * self.dpr) as u32);
        self.canvas.set_height((h as f64 * self.dpr) as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", w));
        let _ = style.set_property("height", &format!("{}px", h));
        // Setting the size resets the transform
        let _ = self.ctx.scale(self.dpr, self.dpr);
    }

    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.dims.width as f64, self.dims.height as f64);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        self.set_fill(color);
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if self.arc(center, radius) {
            self.set_fill(color);
            self.ctx.fill();
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        if self.arc(center, radius) {
            self.set_stroke(color, width);
            self.ctx.stroke();
        }
    }

    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Rgba) {
        if points.len() < 2 {
            return;
        }
        self.trace(points);
        self.set_stroke(color, width);
        self.ctx.stroke();
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        self.trace(points);
        self.ctx.close_path();
        self.set_fill(color);
        self.ctx.fill();
    }

    fn fill_glyph(&mut self, glyph: char, origin: Vec2, size: f32, color: Rgba) {
        self.set_fill(color);
        self.ctx.set_font(&format!("{}px monospace", size));
        self.ctx.set_text_baseline("top");
        let mut buf = [0u8; 4];
        let _ = self
            .ctx
            .fill_text(glyph.encode_utf8(&mut buf), origin.x as f64, origin.y as f64);
    }

    fn set_layer_opacity(&mut self, opacity: f32) {
        let _ = self
            .canvas
            .style()
            .set_property("opacity", &format!("{:.3}", opacity.clamp(0.0, 1.0)));
    }

    fn detach(&mut self) {
        self.canvas.remove();
    }
}

/// Read the device signals used by `DeviceProfile::detect`
pub fn probe_capabilities(window: &Window) -> CapabilitySignals {
    let navigator = window.navigator();
    let touch_events = js_sys::Reflect::has(window, &"ontouchstart".into()).unwrap_or(false);
    let coarse_pointer = window
        .match_media("(pointer: coarse)")
        .ok()
        .flatten()
        .is_some_and(|query| query.matches());

    CapabilitySignals {
        user_agent: navigator.user_agent().unwrap_or_default(),
        touch_events,
        max_touch_points: navigator.max_touch_points().max(0) as u32,
        coarse_pointer,
    }
}

/// Current inner size of the window in CSS pixels
pub fn window_size(window: &Window) -> ViewportDimensions {
    let read = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    ViewportDimensions::new(read(window.inner_width()), read(window.inner_height()))
}

/// The element effects attach to, if the page has one
pub fn container(document: &Document) -> Option<Element> {
    let found = document.get_element_by_id(CONTAINER_ID);
    if found.is_none() {
        log::warn!("No #{} container; backdrop effects disabled", CONTAINER_ID);
    }
    found
}

/// Settings from the container's config attribute, defaults otherwise
pub fn load_settings(container: &Element) -> Settings {
    Settings::load_or_default(container.get_attribute(CONFIG_ATTRIBUTE).as_deref())
}

fn elements(nodes: NodeList) -> impl Iterator<Item = Element> {
    (0..nodes.length()).filter_map(move |i| nodes.item(i)?.dyn_into::<Element>().ok())
}

fn select(document: &Document, selector: &str) -> Vec<Element> {
    document
        .query_selector_all(selector)
        .map(|nodes| elements(nodes).collect())
        .unwrap_or_default()
}

fn select_in(parent: &Element, selector: &str) -> Vec<Element> {
    parent
        .query_selector_all(selector)
        .map(|nodes| elements(nodes).collect())
        .unwrap_or_default()
}

fn rect(element: &Element) -> ElementRect {
    let r = element.get_bounding_client_rect();
    ElementRect {
        left: r.left() as f32,
        top: r.top() as f32,
        width: r.width() as f32,
        height: r.height() as f32,
    }
}

fn set_style(element: &Element, property: &str, value: &str) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property(property, value);
    }
}

fn attribute_or(element: &Element, name: &str, default: f32) -> f32 {
    element
        .get_attribute(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Visibility of every page section, one event each. The stage ignores
/// reports that do not change a section's state.
pub fn poll_sections(document: &Document, viewport: ViewportDimensions) -> Vec<InputEvent> {
    for element in select(document, SCROLL_REVEAL) {
        if reveal::section_visible(rect(&element), viewport) {
            let _ = element.class_list().add_1(ANIMATED_CLASS);
        }
    }

    select(document, SECTIONS)
        .into_iter()
        .map(|article| InputEvent::Visibility {
            section: article.id(),
            visible: reveal::section_visible(rect(&article), viewport),
            items: select_in(&article, SECTION_ITEMS).len().max(1),
        })
        .collect()
}

/// Carry out one reveal cue on the section's elements
pub fn apply_reveal(document: &Document, cue: &RevealCue) {
    let Some(article) = document.get_element_by_id(cue.section()) else {
        return;
    };
    let paragraphs = select_in(&article, SECTION_ITEMS);
    match cue {
        RevealCue::Show { item, .. } => {
            if *item == 0 {
                for heading in select_in(&article, SECTION_HEADING) {
                    let _ = heading.class_list().add_1(ANIMATED_CLASS);
                }
            }
            if let Some(p) = paragraphs.get(*item) {
                set_style(p, "animation", ITEM_ANIMATION);
            }
        }
        RevealCue::Reset { .. } => {
            for heading in select_in(&article, SECTION_HEADING) {
                let _ = heading.class_list().remove_1(ANIMATED_CLASS);
            }
            for p in &paragraphs {
                set_style(p, "animation", "none");
            }
        }
    }
}

/// Set the transform of every parallax, magnetic and tilt element from the
/// stage's pointer and scroll state
pub fn apply_element_transforms(document: &Document, stage: &Stage) {
    for element in select(document, PARALLAX) {
        let role = ElementRole::Parallax {
            speed: attribute_or(&element, "data-parallax", DEFAULT_PARALLAX_SPEED),
            depth: attribute_or(&element, "data-depth", DEFAULT_PARALLAX_DEPTH),
        };
        set_style(&element, "transform", &stage.element_transform(role, rect(&element)));
    }
    for (selector, role) in [(MAGNETIC, ElementRole::Magnetic), (TILT, ElementRole::Tilt)] {
        for element in select(document, selector) {
            set_style(&element, "transform", &stage.element_transform(role, rect(&element)));
        }
    }
}
