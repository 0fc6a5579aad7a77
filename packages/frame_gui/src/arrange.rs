//! Arrangement strategies: sequence index in, rectangle out.

use crate::geom::Rect;
use vek::*;


/// Inputs available to an arrangement strategy for one placement.
#[derive(Debug, Copy, Clone)]
pub struct ArrangeArgs {
    /// The layout's rectangle, before scroll offsetting.
    pub base: Rect,
    /// Position of this placement in the layout's declaration sequence.
    pub index: usize,
    /// The instance's rectangle from last frame. Zero for new instances.
    /// Lets custom strategies smooth toward their target without capturing
    /// outside state.
    pub prev_rect: Rect,
}

/// Whether grid indices advance across a row first or down a column first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum GridOrder {
    #[default]
    RowMajor,
    ColumnMajor,
}

/// Grid arrangement parameters.
///
/// Element size per axis: a positive value is a fixed size in layout units,
/// zero derives the size from the container (container extent divided by the
/// division count on the major axis, the full container extent on the cross
/// axis), and a negative value means that fraction of the container extent.
#[derive(Debug, Clone)]
pub struct GridArranger {
    /// Total padding between the arranged elements and the layout edges,
    /// split evenly between the two sides of each axis.
    pub outer_padding: Vec2<f32>,
    /// Total padding between neighboring elements, split evenly around each.
    pub element_padding: Vec2<f32>,
    pub element_size: Vec2<f32>,
    /// Elements per row (row-major) or per column (column-major). Clamped
    /// to at least one.
    pub divisions: usize,
    pub order: GridOrder,
    /// Total number of elements the caller intends to place. Used only to
    /// center the occupied extent on the cross axis; zero disables that.
    pub element_count: usize,
    pub centered: bool,
}

impl GridArranger {
    pub fn new(divisions: usize) -> Self {
        GridArranger {
            outer_padding: Vec2::zero(),
            element_padding: Vec2::zero(),
            element_size: Vec2::zero(),
            divisions,
            order: GridOrder::RowMajor,
            element_count: 0,
            centered: true,
        }
    }

    pub fn with_order(mut self, order: GridOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_element_size<V: Into<Vec2<f32>>>(mut self, size: V) -> Self {
        self.element_size = size.into();
        self
    }

    pub fn with_element_padding<V: Into<Vec2<f32>>>(mut self, padding: V) -> Self {
        self.element_padding = padding.into();
        self
    }

    pub fn with_outer_padding<V: Into<Vec2<f32>>>(mut self, padding: V) -> Self {
        self.outer_padding = padding.into();
        self
    }

    pub fn with_element_count(mut self, count: usize) -> Self {
        self.element_count = count;
        self
    }

    pub fn without_centering(mut self) -> Self {
        self.centered = false;
        self
    }

    fn arrange(&self, args: &ArrangeArgs) -> (Rect, Rect) {
        let outer = self.outer_padding.map(|v| v.max(0.0));
        let padding = self.element_padding.map(|v| v.max(0.0));
        let divisions = self.divisions.max(1);

        let inner_w = (args.base.w - outer.x).max(0.0);
        let inner_h = (args.base.h - outer.y).max(0.0);

        // Derived cell extent: the major axis subdivides the container,
        // the cross axis spans it.
        let (derived_w, derived_h) = match self.order {
            GridOrder::RowMajor => (inner_w / divisions as f32, inner_h),
            GridOrder::ColumnMajor => (inner_w, inner_h / divisions as f32),
        };
        let cell_w = resolve_cell(self.element_size.x, derived_w, inner_w);
        let cell_h = resolve_cell(self.element_size.y, derived_h, inner_h);

        let (column, row) = match self.order {
            GridOrder::RowMajor => (args.index % divisions, args.index / divisions),
            GridOrder::ColumnMajor => (args.index / divisions, args.index % divisions),
        };

        // Center the occupied extent inside the container on the cross axis
        // when the caller told us how many elements there will be.
        let mut center_offset = Vec2::zero();
        if self.centered && self.element_count > 0 {
            let used = (self.element_count + divisions - 1) / divisions;
            match self.order {
                GridOrder::RowMajor => {
                    let slack = inner_h - used as f32 * cell_h;
                    if slack > 0.0 {
                        center_offset.y = slack / 2.0;
                    }
                }
                GridOrder::ColumnMajor => {
                    let slack = inner_w - used as f32 * cell_w;
                    if slack > 0.0 {
                        center_offset.x = slack / 2.0;
                    }
                }
            }
        }

        let element = Rect {
            x: args.base.x
                + outer.x / 2.0
                + column as f32 * cell_w
                + padding.x / 2.0
                + center_offset.x,
            y: args.base.y
                + outer.y / 2.0
                + row as f32 * cell_h
                + padding.y / 2.0
                + center_offset.y,
            w: (cell_w - padding.x).max(0.0),
            h: (cell_h - padding.y).max(0.0),
        };

        // The spacing rect reclaims the half-padding shares so inter-element
        // gaps still count toward scrollable extent.
        let spacing = Rect {
            x: element.x - padding.x / 2.0,
            y: element.y - padding.y / 2.0,
            w: element.w + padding.x,
            h: element.h + padding.y,
        };

        (element, spacing)
    }
}

fn resolve_cell(configured: f32, derived: f32, container: f32) -> f32 {
    if configured > 0.0 {
        configured
    } else if configured < 0.0 {
        -configured * container
    } else {
        derived
    }
}


/// Strategy deciding a placement's rectangle from its sequence index and the
/// layout's rectangle.
pub enum Arranger {
    /// Every placement gets the layout rectangle minus padding. For layouts
    /// holding one logical widget.
    Fill { padding: Vec2<f32> },
    Grid(GridArranger),
    /// Caller-supplied strategy with the same contract.
    Custom(Box<dyn Fn(&ArrangeArgs) -> Rect>),
}

impl Arranger {
    pub fn fill() -> Self {
        Arranger::Fill {
            padding: Vec2::zero(),
        }
    }

    pub fn fill_padded<V: Into<Vec2<f32>>>(padding: V) -> Self {
        Arranger::Fill {
            padding: padding.into(),
        }
    }

    pub fn grid(grid: GridArranger) -> Self {
        Arranger::Grid(grid)
    }

    pub fn custom<F: Fn(&ArrangeArgs) -> Rect + 'static>(arrange: F) -> Self {
        Arranger::Custom(Box::new(arrange))
    }

    /// Returns the element rectangle and the spacing rectangle that feeds
    /// the layout's scroll-extent bookkeeping.
    pub(crate) fn arrange(&self, args: &ArrangeArgs) -> (Rect, Rect) {
        match self {
            Arranger::Fill { padding } => {
                let rect = Rect {
                    x: args.base.x + padding.x / 2.0,
                    y: args.base.y + padding.y / 2.0,
                    w: (args.base.w - padding.x).max(0.0),
                    h: (args.base.h - padding.y).max(0.0),
                };
                (rect, rect)
            }
            Arranger::Grid(grid) => grid.arrange(args),
            Arranger::Custom(arrange) => {
                let rect = arrange(args);
                (rect, rect)
            }
        }
    }
}

impl std::fmt::Debug for Arranger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arranger::Fill { padding } => f.debug_struct("Fill").field("padding", padding).finish(),
            Arranger::Grid(grid) => f.debug_tuple("Grid").field(grid).finish(),
            Arranger::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}


#[cfg(test)]
fn args(base: Rect, index: usize) -> ArrangeArgs {
    ArrangeArgs {
        base,
        index,
        prev_rect: Rect::default(),
    }
}

#[test]
fn test_fill_pads_every_placement() {
    let arranger = Arranger::fill_padded(Vec2::new(10.0, 6.0));
    let base = Rect::new(0.0, 0.0, 100.0, 50.0);
    for index in 0..3 {
        let (rect, spacing) = arranger.arrange(&args(base, index));
        assert_eq!(rect, Rect::new(5.0, 3.0, 90.0, 44.0));
        assert_eq!(spacing, rect);
    }
}

#[test]
fn test_grid_two_buttons_split_a_row() {
    let arranger = Arranger::grid(GridArranger::new(2));
    let base = Rect::new(0.0, 0.0, 200.0, 48.0);
    let (a, _) = arranger.arrange(&args(base, 0));
    let (b, _) = arranger.arrange(&args(base, 1));
    assert_eq!(a, Rect::new(0.0, 0.0, 100.0, 48.0));
    assert_eq!(b, Rect::new(100.0, 0.0, 100.0, 48.0));
}

#[test]
fn test_grid_row_column_assignment() {
    let base = Rect::new(0.0, 0.0, 300.0, 300.0);
    let row_major = GridArranger::new(3).with_element_size(Vec2::new(0.0, 100.0));
    let column_major = GridArranger::new(3)
        .with_order(GridOrder::ColumnMajor)
        .with_element_size(Vec2::new(100.0, 0.0));
    for index in 0..9 {
        let (rect, _) = row_major.arrange(&args(base, index));
        assert_eq!(rect.x, (index % 3) as f32 * 100.0);
        assert_eq!(rect.y, (index / 3) as f32 * 100.0);
        let (rect, _) = column_major.arrange(&args(base, index));
        assert_eq!(rect.x, (index / 3) as f32 * 100.0);
        assert_eq!(rect.y, (index % 3) as f32 * 100.0);
    }
}

#[test]
fn test_grid_padding_moves_pixels_not_cells() {
    let base = Rect::new(0.0, 0.0, 300.0, 100.0);
    let plain = GridArranger::new(3);
    let padded = GridArranger::new(3).with_element_padding(Vec2::new(8.0, 4.0));
    for index in 0..6 {
        let (a, _) = plain.arrange(&args(base, index));
        let (b, spacing) = padded.arrange(&args(base, index));
        // same cell assignment, offset by half padding and shrunk by full
        assert_eq!(b.x, a.x + 4.0);
        assert_eq!(b.y, a.y + 2.0);
        assert_eq!(b.w, a.w - 8.0);
        assert_eq!(b.h, a.h - 4.0);
        // the spacing rect reclaims the padding
        assert_eq!(spacing.x, a.x);
        assert_eq!(spacing.w, a.w);
    }
}

#[test]
fn test_grid_fractional_and_fixed_sizes() {
    let base = Rect::new(0.0, 0.0, 200.0, 100.0);
    let arranger = GridArranger::new(4).with_element_size(Vec2::new(-0.25, 30.0));
    let (rect, _) = arranger.arrange(&args(base, 5));
    // -0.25 means a quarter of the container width per cell
    assert_eq!(rect.w, 50.0);
    assert_eq!(rect.h, 30.0);
    assert_eq!(rect.x, 50.0);
    assert_eq!(rect.y, 30.0);
}

#[test]
fn test_grid_zero_divisions_clamped() {
    let base = Rect::new(0.0, 0.0, 100.0, 100.0);
    let arranger = GridArranger::new(0);
    let (rect, _) = arranger.arrange(&args(base, 0));
    assert_eq!(rect, Rect::new(0.0, 0.0, 100.0, 100.0));
    // index math degrades to a single column instead of dividing by zero
    let (rect, _) = arranger.arrange(&args(base, 2));
    assert_eq!(rect.y, 200.0);
}

#[test]
fn test_grid_centers_short_trailing_extent() {
    let base = Rect::new(0.0, 0.0, 100.0, 100.0);
    // two 20 px rows of a known two-element layout leave 60 px of slack
    let arranger = GridArranger::new(1)
        .with_element_size(Vec2::new(0.0, 20.0))
        .with_element_count(2);
    let (first, _) = arranger.arrange(&args(base, 0));
    assert_eq!(first.y, 30.0);
    let uncentered = GridArranger::new(1)
        .with_element_size(Vec2::new(0.0, 20.0))
        .with_element_count(2)
        .without_centering();
    let (first, _) = uncentered.arrange(&args(base, 0));
    assert_eq!(first.y, 0.0);
}

#[test]
fn test_custom_arranger_sees_previous_rect() {
    let arranger = Arranger::custom(|args| {
        // smooth halfway from last frame's rectangle toward the container
        args.prev_rect.lerp(args.base, 0.5)
    });
    let mut call_args = args(Rect::new(0.0, 0.0, 80.0, 80.0), 0);
    call_args.prev_rect = Rect::new(0.0, 0.0, 40.0, 40.0);
    let (rect, _) = arranger.arrange(&call_args);
    assert_eq!(rect, Rect::new(0.0, 0.0, 60.0, 60.0));
}
