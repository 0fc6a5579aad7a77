//! Layouts: the per-region containers widgets are declared against.

use crate::{
    arrange::{
        ArrangeArgs,
        Arranger,
    },
    geom::{
        Anchor,
        Rect,
    },
    instance::InstanceRegistry,
};
use vek::*;


/// A rectangular region of the screen that widgets are placed into.
///
/// A layout persists across frames when redeclared under the same identity:
/// redeclaring resets the sequence counter and the placed flags but
/// preserves every instance record, which is what carries widget state from
/// one frame to the next.
#[derive(Debug)]
pub struct Layout {
    id: String,
    pub rect: Rect,
    pub(crate) arranger: Arranger,
    pub(crate) scroll_offset: Vec2<f32>,
    pub(crate) cursor: usize,
    pub(crate) current_extent: Option<Rect>,
    pub(crate) committed_extent: Option<Rect>,
    /// Explicit highlight traversal order. When non-empty, navigation steps
    /// through these identities instead of searching spatially. Identities
    /// not currently placed are skipped; identities missing from this list
    /// fall back to spatial search.
    pub navigation_order: Vec<String>,
    /// While locked, this layout's instances cannot take highlight focus.
    pub highlight_locked: bool,
    /// Top auto-scroll speed, in layout units per frame.
    pub auto_scroll_speed: f32,
    /// Velocity gained (or shed) per frame while auto-scrolling.
    pub auto_scroll_acceleration: f32,
    /// Fraction of the layout rectangle, per side, inside which the focused
    /// widget is considered comfortably visible.
    pub auto_scroll_tolerance: f32,
    pub(crate) scroll_velocity: Vec2<f32>,
    pub(crate) registry: InstanceRegistry,
}

impl Layout {
    pub(crate) fn new(id: &str, rect: Rect) -> Self {
        Layout {
            id: id.to_owned(),
            rect,
            arranger: Arranger::fill(),
            scroll_offset: Vec2::zero(),
            cursor: 0,
            current_extent: None,
            committed_extent: None,
            navigation_order: Vec::new(),
            highlight_locked: false,
            auto_scroll_speed: 8.0,
            auto_scroll_acceleration: 0.5,
            auto_scroll_tolerance: 0.25,
            scroll_velocity: Vec2::zero(),
            registry: InstanceRegistry::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn registry(&self) -> &InstanceRegistry {
        &self.registry
    }

    pub fn arranger(&self) -> &Arranger {
        &self.arranger
    }

    /// Swap the arrangement strategy. Resets the sequence counter so the
    /// next placement starts over at index zero.
    pub fn set_arranger(&mut self, arranger: Arranger) {
        self.arranger = arranger;
        self.cursor = 0;
    }

    /// Skip sequence positions, leaving holes in the arrangement.
    pub fn advance(&mut self, delta: isize) {
        self.cursor = self.cursor.saturating_add_signed(delta);
    }

    pub fn scroll_offset(&self) -> Vec2<f32> {
        self.scroll_offset
    }

    pub fn set_scroll_offset<V: Into<Vec2<f32>>>(&mut self, offset: V) {
        self.scroll_offset = offset.into();
    }

    /// Zero the scroll offset and any auto-scroll velocity.
    pub fn reset_scrolling(&mut self) {
        self.scroll_offset = Vec2::zero();
        self.scroll_velocity = Vec2::zero();
    }

    /// Reposition against another rectangle, keeping this layout's extent.
    pub fn align_to(&mut self, other: Rect, anchor: Anchor, padding: f32) {
        self.rect = self.rect.align_to(other, anchor, padding);
    }

    /// The union of every spacing rectangle placed last frame, if anything
    /// was placed. This is what auto-scrolling measures overflow against.
    pub fn extent(&self) -> Option<Rect> {
        self.committed_extent
    }

    pub(crate) fn begin_declaration(&mut self, rect: Rect) {
        self.rect = rect;
        self.cursor = 0;
        self.registry.clear_placed_flags();
    }

    /// Run the arranger for the given sequence index and translate the
    /// result by the scroll offset. Returns the element rectangle and the
    /// spacing rectangle.
    pub(crate) fn item_rect(&self, index: usize, prev_rect: Rect) -> (Rect, Rect) {
        let args = ArrangeArgs {
            base: self.rect,
            index,
            prev_rect,
        };
        let (element, spacing) = self.arranger.arrange(&args);
        (
            element.translate(self.scroll_offset),
            spacing.translate(self.scroll_offset),
        )
    }

    /// Expand the running extent to cover `spacing`. The first placement of
    /// a frame seeds the extent unconditionally.
    pub(crate) fn fold_extent(&mut self, spacing: Rect) {
        let extent = match self.current_extent {
            None => spacing,
            Some(mut extent) => {
                if spacing.left() < extent.left() {
                    extent = extent.extend_left_to(spacing.left());
                }
                if spacing.right() > extent.right() {
                    extent = extent.extend_right_to(spacing.right());
                }
                if spacing.top() < extent.top() {
                    extent = extent.extend_top_to(spacing.top());
                }
                if spacing.bottom() > extent.bottom() {
                    extent = extent.extend_bottom_to(spacing.bottom());
                }
                extent
            }
        };
        self.current_extent = Some(extent);
    }

    pub(crate) fn commit_extent(&mut self) {
        self.committed_extent = self.current_extent.take();
    }
}


/// Partition `base` into named rectangles from rows of characters.
///
/// Each distinct non-space character claims the bounding box of its cells.
/// With rows `["aa b", "aa b", "   b", "cccb"]` this yields `a` covering the
/// top-left quarter, `b` the full-height right column, and `c` the
/// bottom-left three quarters of the last row. Results are in first-seen
/// order, ready to become layout declarations under derived identities.
pub fn partition(base: Rect, rows: &[&str]) -> Vec<(char, Rect)> {
    let mut order = Vec::new();
    let mut result: Vec<(char, Rect)> = Vec::new();

    for (y, row) in rows.iter().enumerate() {
        let ty = base.y + (y as f32 / rows.len() as f32) * base.h;
        let ty2 = base.y + ((y + 1) as f32 / rows.len() as f32) * base.h;
        let columns = row.chars().count();
        for (x, c) in row.chars().enumerate() {
            if c == ' ' {
                continue;
            }
            let tx = base.x + (x as f32 / columns as f32) * base.w;
            let tx2 = base.x + ((x + 1) as f32 / columns as f32) * base.w;
            let cell = Rect::new(tx, ty, tx2 - tx, ty2 - ty);

            match order.iter().position(|&seen| seen == c) {
                None => {
                    order.push(c);
                    result.push((c, cell));
                }
                Some(at) => {
                    let rect = &mut result[at].1;
                    if cell.left() < rect.left() {
                        *rect = rect.extend_left_to(cell.left());
                    }
                    if cell.right() > rect.right() {
                        *rect = rect.extend_right_to(cell.right());
                    }
                    if cell.top() < rect.top() {
                        *rect = rect.extend_top_to(cell.top());
                    }
                    if cell.bottom() > rect.bottom() {
                        *rect = rect.extend_bottom_to(cell.bottom());
                    }
                }
            }
        }
    }

    result
}


#[test]
fn test_extent_folds_outward_only() {
    let mut layout = Layout::new("test", Rect::new(0.0, 0.0, 100.0, 100.0));
    layout.fold_extent(Rect::new(10.0, 10.0, 20.0, 20.0));
    assert_eq!(layout.current_extent, Some(Rect::new(10.0, 10.0, 20.0, 20.0)));
    // a smaller rect inside the extent changes nothing
    layout.fold_extent(Rect::new(12.0, 12.0, 5.0, 5.0));
    assert_eq!(layout.current_extent, Some(Rect::new(10.0, 10.0, 20.0, 20.0)));
    layout.fold_extent(Rect::new(0.0, 25.0, 50.0, 25.0));
    assert_eq!(layout.current_extent, Some(Rect::new(0.0, 10.0, 50.0, 40.0)));
}

#[test]
fn test_commit_takes_the_running_extent() {
    let mut layout = Layout::new("test", Rect::new(0.0, 0.0, 100.0, 100.0));
    layout.fold_extent(Rect::new(0.0, 0.0, 10.0, 10.0));
    layout.commit_extent();
    assert_eq!(layout.extent(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
    assert_eq!(layout.current_extent, None);
    // a frame with no placements commits an empty extent
    layout.commit_extent();
    assert_eq!(layout.extent(), None);
}

#[test]
fn test_item_rect_applies_scroll_offset() {
    let mut layout = Layout::new("test", Rect::new(0.0, 0.0, 100.0, 100.0));
    layout.set_scroll_offset(Vec2::new(0.0, -30.0));
    let (element, spacing) = layout.item_rect(0, Rect::default());
    assert_eq!(element, Rect::new(0.0, -30.0, 100.0, 100.0));
    assert_eq!(spacing, element);
}

#[test]
fn test_partition_documented_figure() {
    let rects = partition(
        Rect::new(0.0, 0.0, 400.0, 400.0),
        &[
            "aa b",
            "aa b",
            "   b",
            "cccb",
        ],
    );
    assert_eq!(rects.len(), 3);
    assert_eq!(rects[0], ('a', Rect::new(0.0, 0.0, 200.0, 200.0)));
    assert_eq!(rects[1], ('b', Rect::new(300.0, 0.0, 100.0, 400.0)));
    assert_eq!(rects[2], ('c', Rect::new(0.0, 300.0, 300.0, 100.0)));
}
