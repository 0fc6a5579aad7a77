//! Pages: directing highlight flow through a sequence of layouts.

use crate::gui::{
    Gui,
    LayoutKey,
};


/// Controls which of several layouts currently accepts highlighting.
///
/// Menu flows often move through layouts in order: pick an option in list A,
/// then one in list B, then confirm in C. A page locks highlighting on every
/// layout except the active one and advances through them.
#[derive(Debug)]
pub struct Page {
    layouts: Vec<LayoutKey>,
    active: usize,
}

impl Page {
    pub fn new(layouts: Vec<LayoutKey>) -> Self {
        Page { layouts, active: 0 }
    }

    pub fn active(&self) -> Option<LayoutKey> {
        self.layouts.get(self.active).copied()
    }

    /// Unlock `layout` and lock every other layout of this page.
    pub fn make_active(&mut self, gui: &mut Gui, layout: LayoutKey) {
        for (at, &key) in self.layouts.iter().enumerate() {
            gui.layout_mut(key).highlight_locked = key != layout;
            if key == layout {
                self.active = at;
            }
        }
    }

    /// Move the active layout forward (or backward for negative `delta`),
    /// clamped to the page's ends. Changing the active layout drops focus so
    /// the next frame defaults into the newly unlocked layout.
    pub fn advance(&mut self, gui: &mut Gui, delta: isize) {
        if delta == 0 || self.layouts.is_empty() {
            return;
        }
        let next = self
            .active
            .saturating_add_signed(delta)
            .min(self.layouts.len() - 1);
        if next != self.active {
            let target = self.layouts[next];
            self.make_active(gui, target);
            gui.clear_focus();
        }
    }
}
