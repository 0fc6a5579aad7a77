//! The minimal contract a widget satisfies to participate in placement.

use crate::{
    draw::DrawCall,
    gui::Placer,
    instance::StateSlot,
};


/// A widget is polymorphic over exactly two operations: whether it can take
/// highlight focus, and how it renders. Everything else (colors, graphics,
/// interaction rules) is the concrete widget kind's business and lives
/// outside this crate.
pub trait Widget {
    /// Static per configuration. Disabled widgets return false and become
    /// invisible to navigation.
    fn highlightable(&self) -> bool {
        false
    }

    /// Render into the draw call's rectangle. May read and write the
    /// instance's state, adjust the call's rectangle and tint, and place
    /// nested sub-widgets through the placer.
    fn draw(&self, call: &mut DrawCall, state: &mut StateSlot, ui: &mut Placer<'_>);
}

/// Closure-backed widget for one-off draws and tests.
pub struct CustomWidget<F> {
    highlightable: bool,
    draw_fn: F,
}

impl<F> CustomWidget<F>
where
    F: Fn(&mut DrawCall, &mut StateSlot, &mut Placer<'_>),
{
    pub fn new(draw_fn: F) -> Self {
        CustomWidget {
            highlightable: false,
            draw_fn,
        }
    }

    pub fn with_highlightable(mut self, highlightable: bool) -> Self {
        self.highlightable = highlightable;
        self
    }
}

impl<F> Widget for CustomWidget<F>
where
    F: Fn(&mut DrawCall, &mut StateSlot, &mut Placer<'_>),
{
    fn highlightable(&self) -> bool {
        self.highlightable
    }

    fn draw(&self, call: &mut DrawCall, state: &mut StateSlot, ui: &mut Placer<'_>) {
        (self.draw_fn)(call, state, ui);
    }
}
