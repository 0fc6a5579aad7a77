//! The per-placement draw call and the rendering collaborator contracts.
//!
//! The core never touches pixels. It decides where to draw and with what
//! tint, then delegates through [`DrawTarget`]. Text extents needed by
//! size-to-text widgets come back through [`TextMeasure`].

use crate::{
    geom::Rect,
    gui::LayoutKey,
};
use vek::*;


/// Opaque handle to an image owned by the rendering collaborator.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ImageHandle(pub u64);

/// Opaque handle to a font owned by the text collaborator.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontHandle(pub u64);

/// How an image is mapped onto a target rectangle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Slicing {
    /// Scale the whole image to the rectangle.
    Stretch,
    /// Nine-slice: corners fixed, edges stretched on one axis, center on both.
    Nine,
    /// Three-slice along one axis, caps fixed and the middle stretched.
    Three { horizontal: bool },
}

/// How text is rendered. Shadow and outline are parameters handed to the
/// collaborator, not effects computed here.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextStyle {
    pub font: FontHandle,
    pub size: f32,
    pub color: Rgba<f32>,
    pub shadow_direction: Vec2<f32>,
    pub shadow_length: f32,
    pub shadow_color_near: Rgba<f32>,
    pub shadow_color_far: Rgba<f32>,
    pub outline_thickness: f32,
    pub outline_rounded: bool,
    pub outline_color: Rgba<f32>,
}

impl TextStyle {
    pub fn new(font: FontHandle, size: f32) -> Self {
        TextStyle {
            font,
            size,
            color: Rgba::white(),
            shadow_direction: Vec2::new(1.0, 1.0),
            shadow_length: 0.0,
            shadow_color_near: Rgba::black(),
            shadow_color_far: Rgba::black(),
            outline_thickness: 0.0,
            outline_rounded: false,
            outline_color: Rgba::black(),
        }
    }

    pub fn with_color(mut self, color: Rgba<f32>) -> Self {
        self.color = color;
        self
    }
}

/// Rendering collaborator. Fills rectangles, blits images, places glyphs.
pub trait DrawTarget {
    fn fill_rect(&mut self, rect: Rect, tint: Rgba<f32>);

    fn stroke_rect(&mut self, rect: Rect, line_width: f32, tint: Rgba<f32>);

    fn draw_image(&mut self, image: ImageHandle, rect: Rect, slicing: Slicing, tint: Rgba<f32>);

    fn draw_text(&mut self, text: &str, rect: Rect, style: &TextStyle, tint: Rgba<f32>);
}

/// Text measurement collaborator.
pub trait TextMeasure {
    /// Advance width and height of `text` at the given size.
    fn measure(&self, text: &str, font: FontHandle, size: f32) -> Extent2<f32>;
}


/// Ephemeral value threading one placement through its render step.
///
/// Constructed fresh per placement and cloned when a widget places nested
/// sub-widgets, so tint multiplications and rectangle adjustments made by a
/// parent flow down without persisting anywhere.
#[derive(Debug, Clone)]
pub struct DrawCall {
    /// Position of this placement in the layout's declaration sequence.
    pub index: usize,
    /// Target rectangle. Resolved by the layout's arranger for top-level
    /// placements; inherited when nested.
    pub rect: Rect,
    /// Tint inherited from enclosing placements. Multiply, don't replace,
    /// when propagating to sub-widgets.
    pub tint: Rgba<f32>,
    /// Last frame's resolved rectangle of the instance being rendered.
    pub prev_rect: Rect,
    pub(crate) highlighted: bool,
    pub(crate) layout: LayoutKey,
    pub(crate) identity: String,
    pub(crate) rect_resolved: bool,
}

impl DrawCall {
    pub(crate) fn root(layout: LayoutKey) -> Self {
        DrawCall {
            index: 0,
            rect: Rect::default(),
            tint: Rgba::white(),
            prev_rect: Rect::default(),
            highlighted: false,
            layout,
            identity: String::new(),
            rect_resolved: false,
        }
    }

    /// Whether the instance being rendered currently has highlight focus.
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Identity of the instance being rendered.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Key of the layout this placement was declared against.
    pub fn layout(&self) -> LayoutKey {
        self.layout
    }
}


/// Draw target that discards everything. For tests.
#[cfg(test)]
pub(crate) struct NullTarget;

#[cfg(test)]
impl DrawTarget for NullTarget {
    fn fill_rect(&mut self, _rect: Rect, _tint: Rgba<f32>) {}

    fn stroke_rect(&mut self, _rect: Rect, _line_width: f32, _tint: Rgba<f32>) {}

    fn draw_image(&mut self, _image: ImageHandle, _rect: Rect, _slicing: Slicing, _tint: Rgba<f32>) {}

    fn draw_text(&mut self, _text: &str, _rect: Rect, _style: &TextStyle, _tint: Rgba<f32>) {}
}
