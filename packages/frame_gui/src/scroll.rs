//! Auto-scrolling: nudging a layout's offset so the focused widget stays
//! visible.
//!
//! Runs once per frame end, after every placement is known, because the
//! placement extent is only final then. The offset moves with a velocity
//! that accelerates toward a top speed while the focused widget sits
//! outside the layout's tolerance band and decays back to zero otherwise.
//! Hitting a boundary clamps the offset and kills the velocity.

use crate::{
    geom::Rect,
    layout::Layout,
};
use vek::*;


pub(crate) fn update(layout: &mut Layout, focused_rect: Option<Rect>) {
    let Some(extent) = layout.committed_extent else {
        layout.scroll_velocity = Vec2::zero();
        return;
    };

    // the extent was accumulated with the current offset applied; undo it
    // to get the neutral extent the clamping math works against
    let base = extent.translate(-layout.scroll_offset);

    let (offset_x, velocity_x) = update_axis(
        AxisView {
            layout_min: layout.rect.left(),
            layout_max: layout.rect.right(),
            base_min: base.left(),
            base_max: base.right(),
            focused: focused_rect.map(|r| r.center().x),
            offset: layout.scroll_offset.x,
            velocity: layout.scroll_velocity.x,
        },
        layout.auto_scroll_speed,
        layout.auto_scroll_acceleration,
        layout.auto_scroll_tolerance,
    );
    let (offset_y, velocity_y) = update_axis(
        AxisView {
            layout_min: layout.rect.top(),
            layout_max: layout.rect.bottom(),
            base_min: base.top(),
            base_max: base.bottom(),
            focused: focused_rect.map(|r| r.center().y),
            offset: layout.scroll_offset.y,
            velocity: layout.scroll_velocity.y,
        },
        layout.auto_scroll_speed,
        layout.auto_scroll_acceleration,
        layout.auto_scroll_tolerance,
    );

    layout.scroll_offset = Vec2::new(offset_x, offset_y);
    layout.scroll_velocity = Vec2::new(velocity_x, velocity_y);
}

struct AxisView {
    layout_min: f32,
    layout_max: f32,
    base_min: f32,
    base_max: f32,
    /// Focused rectangle center on this axis, in current (offset) space.
    focused: Option<f32>,
    offset: f32,
    velocity: f32,
}

fn update_axis(
    axis: AxisView,
    top_speed: f32,
    acceleration: f32,
    tolerance: f32,
) -> (f32, f32) {
    let layout_size = axis.layout_max - axis.layout_min;
    let base_size = axis.base_max - axis.base_min;
    if base_size <= layout_size {
        // nothing to scroll on this axis
        return (axis.offset, 0.0);
    }

    let mut velocity = axis.velocity;
    let band_margin = layout_size * tolerance;
    let band_min = axis.layout_min + band_margin;
    let band_max = axis.layout_max - band_margin;

    let push = match axis.focused {
        Some(center) if center < band_min => 1.0,
        Some(center) if center > band_max => -1.0,
        _ => 0.0,
    };
    if push != 0.0 {
        velocity = (velocity + push * acceleration).clamp(-top_speed, top_speed);
    } else {
        // decay toward rest
        velocity -= velocity.signum() * velocity.abs().min(acceleration);
    }

    let mut offset = axis.offset + velocity;

    // the extent's leading edge never leaves the layout's leading edge,
    // and likewise for the trailing edges
    let min_offset = axis.layout_max - axis.base_max;
    let max_offset = axis.layout_min - axis.base_min;
    let clamped = offset.clamp(min_offset, max_offset);
    if clamped != offset {
        offset = clamped;
        velocity = 0.0;
    }

    (offset, velocity)
}


#[cfg(test)]
fn overflowing_layout() -> Layout {
    // 100 px tall viewport over 300 px of content
    let mut layout = Layout::new("list", Rect::new(0.0, 0.0, 100.0, 100.0));
    layout.committed_extent = Some(Rect::new(0.0, 0.0, 100.0, 300.0));
    layout
}

#[test]
fn test_no_overflow_means_no_scroll() {
    let mut layout = Layout::new("static", Rect::new(0.0, 0.0, 100.0, 100.0));
    layout.committed_extent = Some(Rect::new(0.0, 0.0, 80.0, 80.0));
    layout.scroll_velocity = Vec2::new(3.0, 3.0);
    update(&mut layout, Some(Rect::new(0.0, 70.0, 80.0, 10.0)));
    assert_eq!(layout.scroll_offset, Vec2::zero());
    assert_eq!(layout.scroll_velocity, Vec2::zero());
}

#[test]
fn test_scrolls_toward_offscreen_focus() {
    let mut layout = overflowing_layout();
    // focused widget below the viewport
    let focused = Rect::new(0.0, 250.0, 100.0, 20.0);
    update(&mut layout, Some(focused));
    assert!(layout.scroll_offset.y < 0.0);
    assert!(layout.scroll_velocity.y < 0.0);
}

#[test]
fn test_velocity_accelerates_to_top_speed() {
    let mut layout = overflowing_layout();
    let focused = Rect::new(0.0, 250.0, 100.0, 20.0);
    let mut last_speed = 0.0;
    for _ in 0..32 {
        update(&mut layout, Some(focused));
        let speed = layout.scroll_velocity.y.abs();
        assert!(speed >= last_speed);
        assert!(speed <= layout.auto_scroll_speed);
        last_speed = speed;
    }
    assert_eq!(last_speed, layout.auto_scroll_speed);
}

#[test]
fn test_offset_never_overscrolls() {
    let mut layout = overflowing_layout();
    let focused = Rect::new(0.0, 250.0, 100.0, 20.0);
    for _ in 0..200 {
        // keep the committed extent in step with the moving offset, the way
        // redeclaring the same content every frame would
        layout.committed_extent =
            Some(Rect::new(0.0, 0.0, 100.0, 300.0).translate(layout.scroll_offset));
        let focused_translated = focused.translate(layout.scroll_offset);
        update(&mut layout, Some(focused_translated));
        let base_bottom = 300.0 + layout.scroll_offset.y;
        assert!(layout.scroll_offset.y >= -200.0);
        assert!(layout.scroll_offset.y <= 0.0);
        assert!(base_bottom >= layout.rect.bottom());
    }
    // far enough to bring the focused widget into the viewport
    assert!(layout.scroll_offset.y <= -150.0);
}

#[test]
fn test_velocity_decays_when_focus_is_comfortable() {
    let mut layout = overflowing_layout();
    layout.scroll_velocity = Vec2::new(0.0, -4.0);
    // focused widget already centered in the viewport
    let focused = Rect::new(0.0, 45.0, 100.0, 10.0);
    update(&mut layout, Some(focused));
    assert_eq!(layout.scroll_velocity.y, -3.5);
    for _ in 0..16 {
        update(&mut layout, Some(focused));
    }
    assert_eq!(layout.scroll_velocity.y, 0.0);
}

#[test]
fn test_hard_stop_zeroes_velocity() {
    let mut layout = overflowing_layout();
    layout.scroll_offset = Vec2::new(0.0, -199.0);
    layout.scroll_velocity = Vec2::new(0.0, -8.0);
    layout.committed_extent =
        Some(Rect::new(0.0, 0.0, 100.0, 300.0).translate(layout.scroll_offset));
    let focused = Rect::new(0.0, 250.0, 100.0, 20.0).translate(layout.scroll_offset);
    update(&mut layout, Some(focused));
    assert_eq!(layout.scroll_offset.y, -200.0);
    assert_eq!(layout.scroll_velocity.y, 0.0);
}
