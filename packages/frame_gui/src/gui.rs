//! The root context object: frame lifecycle, placement, focus queries.
//!
//! Everything that used to be ambient in immediate-mode toolkits (the
//! layout registry, the single focused instance, the queued input) hangs
//! off an explicit [`Gui`] value, so multiple independent UI roots can
//! coexist and tests run in isolation.

use crate::{
    draw::{
        DrawCall,
        DrawTarget,
    },
    error::{
        UsageError,
        UsagePolicy,
    },
    geom::Rect,
    highlight,
    input::{
        InputSnapshot,
        InputState,
        NavInput,
    },
    instance::InstanceRecord,
    layout::Layout,
    scroll,
    widget::Widget,
};
use std::{
    collections::HashMap,
    mem,
    time::Duration,
};
use vek::*;


/// Separator between a parent identity and a nested placement's suffix.
pub const NESTED_SEPARATOR: &str = "__";

/// Stable handle to a declared layout. Keys stay valid until [`Gui::reset`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LayoutKey(pub(crate) usize);

/// The reconciliation core. One per UI root; drives one frame at a time.
pub struct Gui {
    layouts: Vec<Layout>,
    by_id: HashMap<String, usize>,
    /// Layouts declared this frame, in declaration order.
    visible: Vec<usize>,
    /// The single focused instance, as (layout index, instance index).
    focus: Option<(usize, usize)>,
    input: InputState,
    policy: UsagePolicy,
    frame_open: bool,
    /// Set by a focused widget that wants to keep directional input to
    /// itself for this frame.
    input_captured: bool,
}

impl Default for Gui {
    fn default() -> Self {
        Self::new()
    }
}

impl Gui {
    pub fn new() -> Self {
        Gui {
            layouts: Vec::new(),
            by_id: HashMap::new(),
            visible: Vec::new(),
            focus: None,
            input: InputState::new(),
            policy: UsagePolicy::default(),
            frame_open: false,
            input_captured: false,
        }
    }

    pub fn with_policy(policy: UsagePolicy) -> Self {
        let mut gui = Self::new();
        gui.policy = policy;
        gui
    }

    pub fn policy(&self) -> UsagePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: UsagePolicy) {
        self.policy = policy;
    }

    /// Tune how held directional input repeats.
    pub fn set_repeat_timing(&mut self, initial_delay: Duration, repeat_delay: Duration) {
        self.input.initial_delay = initial_delay;
        self.input.repeat_delay = repeat_delay;
    }

    /// Open a frame. Every layout and widget declaration happens between
    /// this and [`Gui::end_frame`].
    pub fn begin_frame(&mut self, snapshot: InputSnapshot) {
        if self.frame_open {
            self.policy.report(UsageError::FrameAlreadyOpen);
        }
        self.frame_open = true;
        self.input_captured = false;
        self.visible.clear();
        let pointer_activity = self.input.begin_frame(snapshot);
        if pointer_activity {
            // switching to the pointer drops keyboard focus
            self.focus = None;
        }
    }

    /// Close the frame: commit placement extents, retarget the highlight,
    /// and advance auto-scrolling for the next frame.
    pub fn end_frame(&mut self) {
        if !self.frame_open {
            self.policy.report(UsageError::FrameNotOpen);
            return;
        }
        self.frame_open = false;

        for &layout in &self.visible {
            self.layouts[layout].commit_extent();
        }

        if !self.input.pointer_mode {
            let input = if self.input_captured {
                None
            } else {
                self.input.queued()
            };
            self.focus = highlight::retarget(self.focus, input, &self.layouts, &self.visible);
        }

        for at in 0..self.visible.len() {
            let layout = self.visible[at];
            let focused_rect = self
                .focus
                .filter(|&(l, _)| l == layout)
                .map(|(l, i)| self.layouts[l].registry.get(i).rect());
            scroll::update(&mut self.layouts[layout], focused_rect);
        }

        self.input.end_frame();
    }

    /// Discard every layout's registry and all focus and input state, as
    /// when tearing the whole UI down for a fresh screen.
    pub fn reset(&mut self) {
        self.layouts.clear();
        self.by_id.clear();
        self.visible.clear();
        self.focus = None;
        self.input.reset();
        self.frame_open = false;
        self.input_captured = false;
    }

    /// Declare a layout for this frame. Redeclaring an existing identity
    /// preserves its instance records and arranger, resets its sequence
    /// counter, and adopts the given rectangle.
    pub fn declare_layout(&mut self, id: &str, rect: Rect) -> LayoutKey {
        if let Some(&index) = self.by_id.get(id) {
            if self.visible.contains(&index) {
                self.policy
                    .report(UsageError::LayoutRedeclared { id: id.to_owned() });
                return LayoutKey(index);
            }
            self.visible.push(index);
            self.layouts[index].begin_declaration(rect);
            return LayoutKey(index);
        }
        let index = self.layouts.len();
        self.layouts.push(Layout::new(id, rect));
        self.by_id.insert(id.to_owned(), index);
        self.visible.push(index);
        LayoutKey(index)
    }

    pub fn layout_key(&self, id: &str) -> Option<LayoutKey> {
        self.by_id.get(id).copied().map(LayoutKey)
    }

    pub fn layout(&self, key: LayoutKey) -> &Layout {
        &self.layouts[key.0]
    }

    pub fn layout_mut(&mut self, key: LayoutKey) -> &mut Layout {
        &mut self.layouts[key.0]
    }

    /// Declare one widget against a layout. Resolves the rectangle through
    /// the layout's arranger, reconciles the identity against the registry,
    /// and runs the widget's render step. Returns the resolved rectangle.
    pub fn place<W: Widget>(
        &mut self,
        layout: LayoutKey,
        id: &str,
        widget: &W,
        target: &mut dyn DrawTarget,
    ) -> Rect {
        let call = DrawCall::root(layout);
        self.place_call(id, widget, target, call, true)
    }

    fn place_call<W: Widget>(
        &mut self,
        id: &str,
        widget: &W,
        target: &mut dyn DrawTarget,
        mut call: DrawCall,
        advance: bool,
    ) -> Rect {
        let layout_index = call.layout.0;

        // duplicate detection happens before any mutation so a panicking
        // policy leaves the registry untouched
        if let Some(existing) = self.layouts[layout_index].registry.by_identity(id) {
            if existing.was_placed() {
                self.policy.report(UsageError::IdentityReused {
                    layout: self.layouts[layout_index].id().to_owned(),
                    id: id.to_owned(),
                });
            }
        }

        let instance_index = self.layouts[layout_index].registry.get_or_create(id);
        let highlighted = self.focus == Some((layout_index, instance_index));

        let spacing;
        let mut state;
        {
            let layout = &mut self.layouts[layout_index];
            call.index = layout.cursor;
            call.identity = id.to_owned();
            call.highlighted = highlighted;

            let record = layout.registry.get_mut(instance_index);
            record.prev_rect = record.current_rect;
            record.placed = true;
            record.highlightable = widget.highlightable();
            call.prev_rect = record.prev_rect;
            // the state leaves the record for the duration of the render
            // step so the widget can hold it mutably while nesting further
            // placements through the same registry
            state = mem::take(&mut record.state);

            if call.rect_resolved {
                spacing = call.rect;
            } else {
                let (element, spacing_rect) = layout.item_rect(call.index, call.prev_rect);
                call.rect = element;
                call.rect_resolved = true;
                spacing = spacing_rect;
            }
        }

        {
            let mut ui = Placer {
                gui: self,
                target,
            };
            widget.draw(&mut call, &mut state, &mut ui);
        }

        let layout = &mut self.layouts[layout_index];
        let record = layout.registry.get_mut(instance_index);
        record.state = state;
        record.current_rect = call.rect;
        layout.fold_extent(spacing);
        if advance {
            layout.cursor += 1;
        }
        call.rect
    }

    /// Identities of the focused instance as (layout id, widget id).
    pub fn focused(&self) -> Option<(&str, &str)> {
        self.focus.map(|(layout, index)| {
            (
                self.layouts[layout].id(),
                self.layouts[layout].registry.get(index).identity(),
            )
        })
    }

    pub fn focused_rect(&self) -> Option<Rect> {
        self.focus
            .map(|(layout, index)| self.layouts[layout].registry.get(index).rect())
    }

    /// Force focus onto an instance that has been placed at least once.
    pub fn set_focus(&mut self, layout: LayoutKey, id: &str) {
        match self.layouts[layout.0].registry.index_of(id) {
            Some(index) => self.focus = Some((layout.0, index)),
            None => self.policy.report(UsageError::UnknownInstance {
                layout: self.layouts[layout.0].id().to_owned(),
                id: id.to_owned(),
            }),
        }
    }

    /// Like [`Gui::set_focus`], but only when nothing is focused yet.
    pub fn set_default_focus(&mut self, layout: LayoutKey, id: &str) {
        if self.focus.is_none() {
            self.set_focus(layout, id);
        }
    }

    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    /// Look up an instance record. Asking for an identity that was never
    /// placed is a usage error under the active policy.
    pub fn instance(&self, layout: LayoutKey, id: &str) -> Option<&InstanceRecord> {
        let record = self.layouts[layout.0].registry.by_identity(id);
        if record.is_none() {
            self.policy.report(UsageError::UnknownInstance {
                layout: self.layouts[layout.0].id().to_owned(),
                id: id.to_owned(),
            });
        }
        record
    }

    pub fn instance_rect(&self, layout: LayoutKey, id: &str) -> Option<Rect> {
        self.instance(layout, id).map(InstanceRecord::rect)
    }

    /// Whether input is currently keyboard/gamepad driven rather than
    /// pointer driven.
    pub fn keyboard_mode(&self) -> bool {
        !self.input.pointer_mode
    }
}


/// Handed to a widget's render step: the draw target plus the queries and
/// nested-placement entry point a widget needs while rendering.
pub struct Placer<'a> {
    gui: &'a mut Gui,
    target: &'a mut dyn DrawTarget,
}

impl<'a> Placer<'a> {
    pub fn target(&mut self) -> &mut dyn DrawTarget {
        self.target
    }

    /// Place a sub-widget under a derived identity, reusing the parent's
    /// already-resolved rectangle and tint. The sub-placement does not
    /// consume a sequence position of the layout.
    pub fn place_nested<W: Widget>(
        &mut self,
        parent: &DrawCall,
        suffix: &str,
        widget: &W,
    ) -> Rect {
        let id = format!("{}{}{}", parent.identity(), NESTED_SEPARATOR, suffix);
        let call = parent.clone();
        self.gui.place_call(&id, widget, &mut *self.target, call, false)
    }

    /// Whether the rendered instance was just activated: accept was pressed
    /// while it is highlighted, or the pointer clicked inside its rectangle.
    pub fn accept_activated(&mut self, call: &DrawCall) -> bool {
        if self.gui.input.pointer_mode {
            self.gui.input.pointer_clicked()
                && self
                    .cursor_pos()
                    .map(|pos| call.rect.contains(pos))
                    .unwrap_or(false)
        } else if call.is_highlighted() && self.gui.input.queued() == Some(NavInput::Accept) {
            self.gui.input.consume();
            true
        } else {
            false
        }
    }

    pub fn cursor_pos(&self) -> Option<Vec2<f32>> {
        self.gui.input.snapshot.cursor_pos
    }

    pub fn cursor_over(&self, rect: Rect) -> bool {
        self.cursor_pos().map(|pos| rect.contains(pos)).unwrap_or(false)
    }

    pub fn pointer_pressed(&self) -> bool {
        self.gui.input.snapshot.cursor_pressed
    }

    pub fn pointer_mode(&self) -> bool {
        self.gui.input.pointer_mode
    }

    pub fn cancel_pressed(&self) -> bool {
        self.gui.input.snapshot.cancel
    }

    /// The debounced directional input waiting for frame end, if any.
    pub fn queued_input(&self) -> Option<NavInput> {
        self.gui.input.queued()
    }

    /// Steal the queued input so navigation will not act on it. For focused
    /// widgets that interpret directions themselves (sliders, spinners).
    pub fn consume_queued(&mut self) -> Option<NavInput> {
        self.gui.input.consume()
    }

    /// Keep focus where it is this frame even if directional input is
    /// queued. For widgets in an editing mode.
    pub fn capture_input(&mut self) {
        self.gui.input_captured = true;
    }

    pub fn time(&self) -> Duration {
        self.gui.input.snapshot.time
    }
}


#[cfg(test)]
use crate::{
    arrange::{
        Arranger,
        GridArranger,
    },
    draw::NullTarget,
    widget::CustomWidget,
};

#[cfg(test)]
fn button() -> impl Widget {
    CustomWidget::new(|_call, state, _ui| {
        *state.get_or_insert_with(|| 0_u32) += 1;
    })
    .with_highlightable(true)
}

#[cfg(test)]
fn keys_right(millis: u64) -> InputSnapshot {
    InputSnapshot {
        time: Duration::from_millis(millis),
        right: true,
        ..InputSnapshot::default()
    }
}

/// One frame declaring `count` buttons in a half-width grid row.
#[cfg(test)]
fn button_row_frame(gui: &mut Gui, snapshot: InputSnapshot, count: usize) -> LayoutKey {
    gui.begin_frame(snapshot);
    let row = gui.declare_layout("row", Rect::new(0.0, 0.0, 200.0, 48.0));
    gui.layout_mut(row)
        .set_arranger(Arranger::grid(GridArranger::new(2)));
    let ids = ["a", "b", "c", "d"];
    for &id in ids.iter().take(count) {
        gui.place(row, id, &button(), &mut NullTarget);
    }
    gui.end_frame();
    row
}

#[test]
fn test_two_button_row_rectangles() {
    let mut gui = Gui::new();
    let row = button_row_frame(&mut gui, InputSnapshot::default(), 2);
    assert_eq!(
        gui.instance_rect(row, "a"),
        Some(Rect::new(0.0, 0.0, 100.0, 48.0)),
    );
    assert_eq!(
        gui.instance_rect(row, "b"),
        Some(Rect::new(100.0, 0.0, 100.0, 48.0)),
    );
}

#[test]
fn test_identity_round_trip_keeps_state() {
    let mut gui = Gui::new();
    let row = button_row_frame(&mut gui, InputSnapshot::default(), 2);
    button_row_frame(&mut gui, InputSnapshot::default(), 2);
    button_row_frame(&mut gui, InputSnapshot::default(), 2);
    // the same record accumulated one draw per frame
    let record = gui.instance(row, "a").unwrap();
    assert_eq!(record.state().get::<u32>(), Some(&3));
}

#[test]
fn test_reconciliation_is_idempotent() {
    let mut gui = Gui::new();
    let row = button_row_frame(&mut gui, InputSnapshot::default(), 2);
    let first_a = gui.instance_rect(row, "a");
    let first_b = gui.instance_rect(row, "b");
    button_row_frame(&mut gui, InputSnapshot::default(), 2);
    assert_eq!(gui.instance_rect(row, "a"), first_a);
    assert_eq!(gui.instance_rect(row, "b"), first_b);
    // previous rect settles to the same value too
    let record = gui.instance(row, "a").unwrap();
    assert_eq!(record.prev_rect(), record.rect());
}

#[test]
#[should_panic(expected = "\"x\"")]
fn test_identity_reuse_panics_under_default_policy() {
    let mut gui = Gui::new();
    gui.begin_frame(InputSnapshot::default());
    let row = gui.declare_layout("row", Rect::new(0.0, 0.0, 200.0, 48.0));
    gui.place(row, "x", &button(), &mut NullTarget);
    gui.place(row, "x", &button(), &mut NullTarget);
}

#[test]
fn test_identity_reuse_under_warn_policy_keeps_first_instance() {
    let mut gui = Gui::with_policy(UsagePolicy::Warn);
    gui.begin_frame(InputSnapshot::default());
    let row = gui.declare_layout("row", Rect::new(0.0, 0.0, 200.0, 48.0));
    gui.place(row, "x", &button(), &mut NullTarget);
    gui.place(row, "x", &button(), &mut NullTarget);
    gui.end_frame();
    // no second record appeared and the registry stays usable
    assert_eq!(gui.layout(row).registry().len(), 1);
    gui.begin_frame(InputSnapshot::default());
    let row = gui.declare_layout("row", Rect::new(0.0, 0.0, 200.0, 48.0));
    gui.place(row, "x", &button(), &mut NullTarget);
    gui.end_frame();
    assert_eq!(gui.layout(row).registry().len(), 1);
}

#[test]
#[should_panic(expected = "begin_frame")]
fn test_unbalanced_begin_frame_is_reported() {
    let mut gui = Gui::new();
    gui.begin_frame(InputSnapshot::default());
    gui.begin_frame(InputSnapshot::default());
}

#[test]
#[should_panic(expected = "\"ghost\"")]
fn test_querying_unplaced_identity_is_reported() {
    let mut gui = Gui::new();
    gui.begin_frame(InputSnapshot::default());
    let row = gui.declare_layout("row", Rect::new(0.0, 0.0, 200.0, 48.0));
    gui.end_frame();
    gui.instance_rect(row, "ghost");
}

#[test]
fn test_nested_placement_derives_identity_and_keeps_sequence() {
    let composite = CustomWidget::new(|call: &mut DrawCall, _state, ui: &mut Placer| {
        let inner = CustomWidget::new(|_call, _state, _ui| {});
        ui.place_nested(call, "gfx", &inner);
    });
    let mut gui = Gui::new();
    gui.begin_frame(InputSnapshot::default());
    let row = gui.declare_layout("row", Rect::new(0.0, 0.0, 200.0, 48.0));
    gui.layout_mut(row)
        .set_arranger(Arranger::grid(GridArranger::new(2)));
    gui.place(row, "left", &composite, &mut NullTarget);
    let second = gui.place(row, "right", &button(), &mut NullTarget);
    gui.end_frame();

    assert!(gui.layout(row).registry().contains("left__gfx"));
    // the nested placement reused the parent rectangle
    assert_eq!(
        gui.instance_rect(row, "left__gfx"),
        gui.instance_rect(row, "left"),
    );
    // and did not consume a grid slot
    assert_eq!(second, Rect::new(100.0, 0.0, 100.0, 48.0));
}

#[test]
fn test_keyboard_navigation_moves_focus_right() {
    let mut gui = Gui::new();
    // first frame with directional input establishes a default focus
    button_row_frame(&mut gui, keys_right(0), 2);
    assert_eq!(gui.focused(), Some(("row", "a")));
    // a fresh press (after release) moves it
    button_row_frame(&mut gui, InputSnapshot::default(), 2);
    button_row_frame(&mut gui, keys_right(600), 2);
    assert_eq!(gui.focused(), Some(("row", "b")));
}

#[test]
fn test_pointer_activity_clears_focus() {
    let mut gui = Gui::new();
    button_row_frame(&mut gui, keys_right(0), 2);
    assert!(gui.focused().is_some());
    assert!(gui.keyboard_mode());

    let mut snapshot = InputSnapshot {
        time: Duration::from_millis(16),
        cursor_pos: Some(Vec2::new(10.0, 10.0)),
        ..InputSnapshot::default()
    };
    button_row_frame(&mut gui, snapshot.clone(), 2);
    snapshot.time = Duration::from_millis(32);
    snapshot.cursor_pos = Some(Vec2::new(20.0, 10.0));
    button_row_frame(&mut gui, snapshot, 2);
    assert_eq!(gui.focused(), None);
    assert!(!gui.keyboard_mode());
}

#[test]
fn test_accept_activates_highlighted_widget() {
    let mut gui = Gui::new();
    button_row_frame(&mut gui, keys_right(0), 2);
    assert_eq!(gui.focused(), Some(("row", "a")));

    let pressable = CustomWidget::new(|call: &mut DrawCall, state, ui: &mut Placer| {
        if ui.accept_activated(call) {
            state.set(true);
        }
    })
    .with_highlightable(true);

    gui.begin_frame(InputSnapshot {
        time: Duration::from_millis(100),
        accept: true,
        ..InputSnapshot::default()
    });
    let row = gui.declare_layout("row", Rect::new(0.0, 0.0, 200.0, 48.0));
    gui.place(row, "a", &pressable, &mut NullTarget);
    gui.place(row, "b", &pressable, &mut NullTarget);
    gui.end_frame();

    let pressed = gui.instance(row, "a").unwrap().state().get::<bool>();
    assert_eq!(pressed, Some(&true));
    assert_eq!(gui.instance(row, "b").unwrap().state().get::<bool>(), None);
    // accept does not move focus
    assert_eq!(gui.focused(), Some(("row", "a")));
}

#[test]
fn test_input_capture_blocks_retargeting() {
    let capturing = CustomWidget::new(|_call, _state, ui: &mut Placer| {
        ui.capture_input();
    })
    .with_highlightable(true);

    let mut gui = Gui::new();
    button_row_frame(&mut gui, keys_right(0), 2);
    assert_eq!(gui.focused(), Some(("row", "a")));

    gui.begin_frame(keys_right(600));
    let row = gui.declare_layout("row", Rect::new(0.0, 0.0, 200.0, 48.0));
    gui.place(row, "a", &capturing, &mut NullTarget);
    gui.place(row, "b", &capturing, &mut NullTarget);
    gui.end_frame();
    assert_eq!(gui.focused(), Some(("row", "a")));
}

#[test]
fn test_auto_scroll_brings_focused_into_view() {
    let mut gui = Gui::new();
    let frame = |gui: &mut Gui, millis: u64| {
        gui.begin_frame(InputSnapshot {
            time: Duration::from_millis(millis),
            ..InputSnapshot::default()
        });
        let list = gui.declare_layout("list", Rect::new(0.0, 0.0, 100.0, 100.0));
        gui.layout_mut(list).set_arranger(Arranger::grid(
            GridArranger::new(1).with_element_size(Vec2::new(0.0, 25.0)),
        ));
        for id in ["a", "b", "c", "d", "e", "f", "g", "h"] {
            gui.place(list, id, &button(), &mut NullTarget);
        }
        gui.end_frame();
        list
    };

    let list = frame(&mut gui, 0);
    // pin focus on the bottom entry; no input arrives, so it sticks
    gui.set_focus(list, "h");
    for step in 0..200 {
        frame(&mut gui, 16 * step);
    }
    let offset = gui.layout(list).scroll_offset();
    assert_eq!(offset.y, -100.0);
    let rect = gui.instance_rect(list, "h").unwrap();
    assert!(rect.bottom() <= 100.0);
    assert!(rect.top() >= 0.0);
}

#[test]
fn test_reset_discards_everything() {
    let mut gui = Gui::new();
    let row = button_row_frame(&mut gui, keys_right(0), 2);
    assert!(gui.focused().is_some());
    assert_eq!(gui.layout(row).registry().len(), 2);

    gui.reset();
    assert_eq!(gui.focused(), None);
    assert_eq!(gui.layout_key("row"), None);

    // the world can be rebuilt from scratch afterwards
    let row = button_row_frame(&mut gui, InputSnapshot::default(), 2);
    assert_eq!(gui.layout(row).registry().len(), 2);
}
