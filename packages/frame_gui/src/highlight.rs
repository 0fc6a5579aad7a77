//! Highlight navigation: deciding which widget takes focus next.
//!
//! Runs once per frame end, in keyboard/gamepad modality, over the fully
//! settled placements of the frame. Resolution order: validate the current
//! focus, fall back to a default pick, then move by explicit order, spatial
//! search, or reading order depending on the input.

use crate::{
    geom::Rect,
    input::NavInput,
    layout::Layout,
};
use vek::*;


/// Reading-order weight of a vertical unit relative to a horizontal one.
const READING_ORDER_ROW_WEIGHT: f32 = 10_000.0;

/// A placed, highlightable instance eligible for focus.
#[derive(Debug, Copy, Clone)]
struct Candidate {
    layout: usize,
    index: usize,
    rect: Rect,
}

/// Compute the focus target for the next frame. `focus` and the result are
/// `(layout index, instance index)` pairs; `visible` lists layout indices in
/// this frame's declaration order.
pub(crate) fn retarget(
    focus: Option<(usize, usize)>,
    input: Option<NavInput>,
    layouts: &[Layout],
    visible: &[usize],
) -> Option<(usize, usize)> {
    let candidates = collect_candidates(layouts, visible);

    let focus = focus.filter(|&(layout, index)| {
        candidates
            .iter()
            .any(|c| c.layout == layout && c.index == index)
    });

    let Some((layout, index)) = focus else {
        let picked = default_pick(layouts, visible);
        if let Some((layout, index)) = picked {
            trace!(
                layout = layouts[layout].id(),
                id = layouts[layout].registry().get(index).identity(),
                "highlight defaulted",
            );
        }
        return picked;
    };

    let Some(input) = input else {
        return Some((layout, index));
    };
    if input == NavInput::Accept {
        // accept is polled by the focused widget, it never moves focus
        return Some((layout, index));
    }

    let focused_id = layouts[layout].registry().get(index).identity();
    if !layouts[layout].navigation_order.is_empty()
        && layouts[layout]
            .navigation_order
            .iter()
            .any(|entry| entry == focused_id)
    {
        let step = match input {
            NavInput::Right | NavInput::Down | NavInput::Next => 1,
            NavInput::Left | NavInput::Up | NavInput::Prev => -1,
            NavInput::Accept => unreachable!(),
        };
        return match order_step(&layouts[layout], focused_id, step) {
            Some(next) => Some((layout, next)),
            None => Some((layout, index)),
        };
    }

    let focused_rect = layouts[layout].registry().get(index).rect();
    let moved = match input {
        NavInput::Left | NavInput::Right | NavInput::Up | NavInput::Down => {
            directional(input, (layout, index), focused_rect, &candidates)
        }
        NavInput::Next => ordinal((layout, index), 1, &candidates),
        NavInput::Prev => ordinal((layout, index), -1, &candidates),
        NavInput::Accept => unreachable!(),
    };
    Some(moved.unwrap_or((layout, index)))
}

fn collect_candidates(layouts: &[Layout], visible: &[usize]) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for &layout in visible {
        if layouts[layout].highlight_locked {
            continue;
        }
        for index in 0..layouts[layout].registry().len() {
            let record = layouts[layout].registry().get(index);
            if record.placed && record.highlightable && !record.rect().is_degenerate() {
                candidates.push(Candidate {
                    layout,
                    index,
                    rect: record.rect(),
                });
            }
        }
    }
    candidates
}

/// First placed highlightable instance: explicit order entries first within
/// each layout, then registry insertion order, scanning layouts in their
/// visible order.
fn default_pick(layouts: &[Layout], visible: &[usize]) -> Option<(usize, usize)> {
    for &layout in visible {
        if layouts[layout].highlight_locked {
            continue;
        }
        let registry = layouts[layout].registry();
        for entry in &layouts[layout].navigation_order {
            if let Some(index) = registry.index_of(entry) {
                let record = registry.get(index);
                if record.placed && record.highlightable && !record.rect().is_degenerate() {
                    return Some((layout, index));
                }
            }
        }
        for index in 0..registry.len() {
            let record = registry.get(index);
            if record.placed && record.highlightable && !record.rect().is_degenerate() {
                return Some((layout, index));
            }
        }
    }
    None
}

/// Step through a layout's explicit order, wrapping, skipping entries that
/// are not currently placed. Returns None if no other entry is available.
fn order_step(layout: &Layout, focused_id: &str, step: isize) -> Option<usize> {
    let order = &layout.navigation_order;
    let len = order.len() as isize;
    let start = order.iter().position(|entry| entry == focused_id)? as isize;

    let mut at = start;
    for _ in 1..len {
        at = (at + step).rem_euclid(len);
        if let Some(index) = layout.registry().index_of(&order[at as usize]) {
            let record = layout.registry().get(index);
            if record.placed && record.highlightable && !record.rect().is_degenerate() {
                return Some(index);
            }
        }
    }
    None
}

fn directional(
    input: NavInput,
    from: (usize, usize),
    focused: Rect,
    candidates: &[Candidate],
) -> Option<(usize, usize)> {
    // a point just past the focused rectangle's relevant edge
    let edge = match input {
        NavInput::Right => Vec2::new(focused.right(), focused.center().y),
        NavInput::Left => Vec2::new(focused.left(), focused.center().y),
        NavInput::Down => Vec2::new(focused.center().x, focused.bottom()),
        NavInput::Up => Vec2::new(focused.center().x, focused.top()),
        _ => return None,
    };

    let strictly_past = |c: &Candidate| match input {
        NavInput::Right => c.rect.center().x > focused.right(),
        NavInput::Left => c.rect.center().x < focused.left(),
        NavInput::Down => c.rect.center().y > focused.bottom(),
        NavInput::Up => c.rect.center().y < focused.top(),
        _ => false,
    };

    let mut best: Option<(f32, (usize, usize))> = None;
    for c in candidates {
        if (c.layout, c.index) == from || !strictly_past(c) {
            continue;
        }
        let distance = (c.rect.center() - edge).magnitude_squared();
        if best.map(|(d, _)| distance < d).unwrap_or(true) {
            best = Some((distance, (c.layout, c.index)));
        }
    }
    if best.is_some() {
        return best.map(|(_, target)| target);
    }

    // Nothing strictly in that direction. Fall back to candidates that
    // overlap the focused rectangle on the perpendicular axis, nearest
    // along the travel axis with wraparound, so navigation continues at
    // the grid's far boundary instead of dead-ending.
    let overlapping: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| {
            (c.layout, c.index) != from
                && match input {
                    NavInput::Right | NavInput::Left => c.rect.overlaps_y(focused),
                    NavInput::Up | NavInput::Down => c.rect.overlaps_x(focused),
                    _ => false,
                }
        })
        .collect();
    if overlapping.is_empty() {
        return None;
    }

    let along = |rect: Rect| match input {
        NavInput::Right | NavInput::Left => rect.center().x,
        _ => rect.center().y,
    };
    let span = {
        let mut low = along(focused);
        let mut high = low;
        for c in &overlapping {
            low = low.min(along(c.rect));
            high = high.max(along(c.rect));
        }
        high - low
    };
    if span <= 0.0 {
        return None;
    }
    let forward = matches!(input, NavInput::Right | NavInput::Down);

    let mut best: Option<(f32, (usize, usize))> = None;
    for c in overlapping {
        let mut delta = if forward {
            along(c.rect) - along(focused)
        } else {
            along(focused) - along(c.rect)
        };
        if delta <= 0.0 {
            delta += span;
        }
        if best.map(|(d, _)| delta < d).unwrap_or(true) {
            best = Some((delta, (c.layout, c.index)));
        }
    }
    best.map(|(_, target)| target)
}

/// Step by one through all candidates in reading order, wrapping.
fn ordinal(
    from: (usize, usize),
    step: isize,
    candidates: &[Candidate],
) -> Option<(usize, usize)> {
    if candidates.len() < 2 {
        return None;
    }
    let mut sorted: Vec<&Candidate> = candidates.iter().collect();
    sorted.sort_by(|a, b| {
        let ka = a.rect.center().x + a.rect.center().y * READING_ORDER_ROW_WEIGHT;
        let kb = b.rect.center().x + b.rect.center().y * READING_ORDER_ROW_WEIGHT;
        ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
    });
    let at = sorted
        .iter()
        .position(|c| (c.layout, c.index) == from)? as isize;
    let next = (at + step).rem_euclid(sorted.len() as isize) as usize;
    Some((sorted[next].layout, sorted[next].index))
}


#[cfg(test)]
fn layout_with_buttons(id: &str, rects: &[(&str, Rect)]) -> Layout {
    let mut layout = Layout::new(id, Rect::new(0.0, 0.0, 400.0, 400.0));
    for &(button, rect) in rects {
        let index = layout.registry.get_or_create(button);
        let record = layout.registry.get_mut(index);
        record.placed = true;
        record.highlightable = true;
        record.current_rect = rect;
    }
    layout
}

#[cfg(test)]
fn row_of_three() -> Layout {
    layout_with_buttons(
        "row",
        &[
            ("a", Rect::new(0.0, 0.0, 100.0, 40.0)),
            ("b", Rect::new(150.0, 0.0, 100.0, 40.0)),
            ("c", Rect::new(300.0, 0.0, 100.0, 40.0)),
        ],
    )
}

#[cfg(test)]
fn focused_id(layouts: &[Layout], focus: Option<(usize, usize)>) -> Option<String> {
    focus.map(|(layout, index)| {
        layouts[layout].registry().get(index).identity().to_owned()
    })
}

#[test]
fn test_default_pick_is_first_placed() {
    let layouts = [row_of_three()];
    let focus = retarget(None, None, &layouts, &[0]);
    assert_eq!(focused_id(&layouts, focus).as_deref(), Some("a"));
}

#[test]
fn test_default_pick_prefers_explicit_order() {
    let mut layout = row_of_three();
    layout.navigation_order = vec!["missing".to_owned(), "b".to_owned()];
    let layouts = [layout];
    let focus = retarget(None, None, &layouts, &[0]);
    assert_eq!(focused_id(&layouts, focus).as_deref(), Some("b"));
}

#[test]
fn test_right_moves_right_never_left() {
    let layouts = [row_of_three()];
    let from = Some((0, 0));
    let focus = retarget(from, Some(NavInput::Right), &layouts, &[0]);
    assert_eq!(focused_id(&layouts, focus).as_deref(), Some("b"));
    let focus = retarget(focus, Some(NavInput::Right), &layouts, &[0]);
    assert_eq!(focused_id(&layouts, focus).as_deref(), Some("c"));
}

#[test]
fn test_right_from_last_wraps_to_first() {
    let layouts = [row_of_three()];
    let focus = retarget(Some((0, 2)), Some(NavInput::Right), &layouts, &[0]);
    assert_eq!(focused_id(&layouts, focus).as_deref(), Some("a"));
}

#[test]
fn test_next_steps_in_reading_order() {
    let layouts = [row_of_three()];
    let focus = retarget(Some((0, 2)), Some(NavInput::Next), &layouts, &[0]);
    assert_eq!(focused_id(&layouts, focus).as_deref(), Some("a"));
    let focus = retarget(focus, Some(NavInput::Prev), &layouts, &[0]);
    assert_eq!(focused_id(&layouts, focus).as_deref(), Some("c"));
}

#[test]
fn test_vertical_search_prefers_nearest() {
    let layouts = [layout_with_buttons(
        "grid",
        &[
            ("top", Rect::new(0.0, 0.0, 100.0, 40.0)),
            ("near", Rect::new(0.0, 60.0, 100.0, 40.0)),
            ("far", Rect::new(0.0, 200.0, 100.0, 40.0)),
        ],
    )];
    let focus = retarget(Some((0, 0)), Some(NavInput::Down), &layouts, &[0]);
    assert_eq!(focused_id(&layouts, focus).as_deref(), Some("near"));
}

#[test]
fn test_no_candidate_is_a_no_op() {
    let layouts = [layout_with_buttons(
        "single",
        &[("only", Rect::new(0.0, 0.0, 100.0, 40.0))],
    )];
    let focus = retarget(Some((0, 0)), Some(NavInput::Up), &layouts, &[0]);
    assert_eq!(focused_id(&layouts, focus).as_deref(), Some("only"));
}

#[test]
fn test_vanished_focus_falls_back_to_default() {
    let mut layout = row_of_three();
    {
        let index = layout.registry.index_of("b").unwrap();
        layout.registry.get_mut(index).placed = false;
    }
    let layouts = [layout];
    let focus = retarget(Some((0, 1)), None, &layouts, &[0]);
    assert_eq!(focused_id(&layouts, focus).as_deref(), Some("a"));
}

#[test]
fn test_explicit_order_steps_and_wraps() {
    let mut layout = row_of_three();
    layout.navigation_order = vec!["c".to_owned(), "a".to_owned(), "b".to_owned()];
    let layouts = [layout];
    let start = Some((0, layouts[0].registry().index_of("b").unwrap()));
    let focus = retarget(start, Some(NavInput::Next), &layouts, &[0]);
    assert_eq!(focused_id(&layouts, focus).as_deref(), Some("c"));
    let focus = retarget(focus, Some(NavInput::Prev), &layouts, &[0]);
    assert_eq!(focused_id(&layouts, focus).as_deref(), Some("b"));
}

#[test]
fn test_explicit_order_skips_unplaced_entries() {
    let mut layout = row_of_three();
    layout.navigation_order = vec!["a".to_owned(), "b".to_owned(), "c".to_owned()];
    {
        let index = layout.registry.index_of("b").unwrap();
        layout.registry.get_mut(index).placed = false;
    }
    let layouts = [layout];
    let focus = retarget(Some((0, 0)), Some(NavInput::Next), &layouts, &[0]);
    assert_eq!(focused_id(&layouts, focus).as_deref(), Some("c"));
}

#[test]
fn test_locked_layout_is_skipped() {
    let mut locked = row_of_three();
    locked.highlight_locked = true;
    let open = layout_with_buttons(
        "open",
        &[("x", Rect::new(0.0, 100.0, 50.0, 50.0))],
    );
    let layouts = [locked, open];
    let focus = retarget(None, None, &layouts, &[0, 1]);
    assert_eq!(focus, Some((1, 0)));
}

#[test]
fn test_degenerate_rects_are_never_candidates() {
    let layouts = [layout_with_buttons(
        "degenerate",
        &[
            ("real", Rect::new(0.0, 0.0, 100.0, 40.0)),
            ("flat", Rect::new(200.0, 0.0, 0.0, 40.0)),
        ],
    )];
    let focus = retarget(Some((0, 0)), Some(NavInput::Right), &layouts, &[0]);
    assert_eq!(focused_id(&layouts, focus).as_deref(), Some("real"));
}

#[test]
fn test_focus_crosses_layouts_spatially() {
    let left = layout_with_buttons(
        "left",
        &[("l", Rect::new(0.0, 0.0, 100.0, 40.0))],
    );
    let right = layout_with_buttons(
        "right",
        &[("r", Rect::new(200.0, 0.0, 100.0, 40.0))],
    );
    let layouts = [left, right];
    let focus = retarget(Some((0, 0)), Some(NavInput::Right), &layouts, &[0, 1]);
    assert_eq!(focus, Some((1, 0)));
}
