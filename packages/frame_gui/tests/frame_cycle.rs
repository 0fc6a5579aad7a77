//! End-to-end frame cycles through the public API only.

use frame_gui::{
    Arranger,
    CustomWidget,
    DrawTarget,
    Gui,
    GridArranger,
    InputSnapshot,
    Page,
    Rect,
    Slicing,
    TextStyle,
    UsagePolicy,
    partition,
};
use std::time::Duration;
use vek::*;

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Draw target that records every fill so tests can assert on what the
/// core asked the renderer to do.
#[derive(Default)]
struct RecordingTarget {
    fills: Vec<(Rect, Rgba<f32>)>,
}

impl DrawTarget for RecordingTarget {
    fn fill_rect(&mut self, rect: Rect, tint: Rgba<f32>) {
        self.fills.push((rect, tint));
    }

    fn stroke_rect(&mut self, _rect: Rect, _line_width: f32, _tint: Rgba<f32>) {}

    fn draw_image(
        &mut self,
        _image: frame_gui::ImageHandle,
        _rect: Rect,
        _slicing: Slicing,
        _tint: Rgba<f32>,
    ) {
    }

    fn draw_text(&mut self, _text: &str, _rect: Rect, _style: &TextStyle, _tint: Rgba<f32>) {}
}

fn snapshot(millis: u64) -> InputSnapshot {
    InputSnapshot {
        time: Duration::from_millis(millis),
        ..InputSnapshot::default()
    }
}

#[test]
fn composite_widget_propagates_tint_to_nested_placements() {
    init_logging();
    let mut gui = Gui::new();
    let mut target = RecordingTarget::default();

    // a panel that dims itself and then places a child under its rectangle
    let panel = CustomWidget::new(|call, _state, ui| {
        call.tint = call.tint * Rgba::new(0.5, 0.5, 0.5, 0.5);
        let child = CustomWidget::new(|call, _state, ui| {
            let tint = call.tint;
            ui.target().fill_rect(call.rect, tint);
        });
        ui.place_nested(call, "body", &child);
    });

    gui.begin_frame(snapshot(0));
    let root = gui.declare_layout("root", Rect::new(0.0, 0.0, 100.0, 100.0));
    gui.place(root, "panel", &panel, &mut target);
    gui.end_frame();

    assert_eq!(target.fills.len(), 1);
    let (rect, tint) = target.fills[0];
    assert_eq!(rect, Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(tint, Rgba::new(0.5, 0.5, 0.5, 0.5));
    assert_eq!(
        gui.instance_rect(root, "panel__body"),
        gui.instance_rect(root, "panel"),
    );
}

#[test]
fn partitioned_menu_with_page_flow() {
    init_logging();
    let mut gui = Gui::with_policy(UsagePolicy::Warn);
    let mut target = RecordingTarget::default();

    let regions = partition(
        Rect::new(0.0, 0.0, 300.0, 300.0),
        &[
            "ll rr",
            "ll rr",
        ],
    );
    assert_eq!(regions.len(), 2);

    let button = CustomWidget::new(|_call, _state, _ui| {}).with_highlightable(true);

    let run_frame = |gui: &mut Gui, target: &mut RecordingTarget, input: InputSnapshot| {
        gui.begin_frame(input);
        let mut keys = Vec::new();
        for &(name, rect) in &regions {
            let key = gui.declare_layout(&format!("menu_{}", name), rect);
            gui.layout_mut(key)
                .set_arranger(Arranger::grid(GridArranger::new(1)));
            keys.push(key);
        }
        for (at, &key) in keys.iter().enumerate() {
            gui.place(key, &format!("choice_{}", at), &button, target);
        }
        gui.end_frame();
        keys
    };

    // keyboard input establishes a default focus in the first open layout
    let keys = run_frame(
        &mut gui,
        &mut target,
        InputSnapshot {
            time: Duration::from_millis(0),
            down: true,
            ..InputSnapshot::default()
        },
    );
    assert_eq!(gui.focused(), Some(("menu_l", "choice_0")));

    // a page locks the left menu and moves the flow to the right one
    let mut page = Page::new(keys.clone());
    page.make_active(&mut gui, keys[0]);
    page.advance(&mut gui, 1);
    assert_eq!(page.active(), Some(keys[1]));
    assert_eq!(gui.focused(), None);

    run_frame(&mut gui, &mut target, snapshot(400));
    assert_eq!(gui.focused(), Some(("menu_r", "choice_1")));
}

#[test]
fn abandoned_identities_stop_rendering_but_keep_state() {
    init_logging();
    let mut gui = Gui::new();
    let mut target = RecordingTarget::default();

    let counter = CustomWidget::new(|_call, state, _ui| {
        *state.get_or_insert_with(|| 0_u32) += 1;
    });

    let frame = |gui: &mut Gui, target: &mut RecordingTarget, with_b: bool, millis: u64| {
        gui.begin_frame(snapshot(millis));
        let list = gui.declare_layout("list", Rect::new(0.0, 0.0, 100.0, 100.0));
        gui.place(list, "a", &counter, target);
        if with_b {
            gui.place(list, "b", &counter, target);
        }
        gui.end_frame();
        list
    };

    let list = frame(&mut gui, &mut target, true, 0);
    frame(&mut gui, &mut target, false, 16);
    frame(&mut gui, &mut target, false, 32);

    let a = gui.instance(list, "a").unwrap();
    assert!(a.was_placed());
    assert_eq!(a.state().get::<u32>(), Some(&3));

    // b kept its record and state from the frame it was last declared
    let b = gui.instance(list, "b").unwrap();
    assert!(!b.was_placed());
    assert_eq!(b.state().get::<u32>(), Some(&1));

    frame(&mut gui, &mut target, true, 48);
    let b = gui.instance(list, "b").unwrap();
    assert!(b.was_placed());
    assert_eq!(b.state().get::<u32>(), Some(&2));
}
