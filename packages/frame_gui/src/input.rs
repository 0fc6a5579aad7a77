//! Input snapshots and the queued-input debounce state machine.
//!
//! The host polls its input backend and hands this crate one raw snapshot
//! per frame. Debounce and repeat timing for highlight movement live here,
//! consuming raw held booleans and letting one movement through immediately,
//! then repeating after an initial delay.

use std::time::Duration;
use vek::*;


/// Raw input for one frame, as read by the host's input collaborator.
///
/// Directional and accept booleans are held states, not edges; this module
/// derives edges and repeats from them. `time` is any monotonic clock the
/// host maintains, used only for differences.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    pub time: Duration,
    pub cursor_pos: Option<Vec2<f32>>,
    /// Primary pointer button held.
    pub cursor_pressed: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub next: bool,
    pub prev: bool,
    pub accept: bool,
    pub cancel: bool,
}

/// One debounced highlight-movement request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum NavInput {
    Left,
    Right,
    Up,
    Down,
    Prev,
    Next,
    Accept,
}

/// How long a held input waits before it starts repeating.
pub const REPEAT_INITIAL_DELAY: Duration = Duration::from_millis(250);
/// The interval between repeats once repeating has started.
pub const REPEAT_DELAY: Duration = Duration::from_millis(40);

#[derive(Debug)]
pub(crate) struct InputState {
    queued: Option<NavInput>,
    prev_queued: Option<NavInput>,
    hold_started: Duration,
    last_passed: Duration,
    pub(crate) pointer_mode: bool,
    last_cursor_pos: Option<Vec2<f32>>,
    prev_cursor_pressed: bool,
    pub(crate) snapshot: InputSnapshot,
    pub(crate) initial_delay: Duration,
    pub(crate) repeat_delay: Duration,
}

impl InputState {
    pub(crate) fn new() -> Self {
        InputState {
            queued: None,
            prev_queued: None,
            hold_started: Duration::ZERO,
            last_passed: Duration::ZERO,
            pointer_mode: true,
            last_cursor_pos: None,
            prev_cursor_pressed: false,
            snapshot: InputSnapshot::default(),
            initial_delay: REPEAT_INITIAL_DELAY,
            repeat_delay: REPEAT_DELAY,
        }
    }

    /// Ingest one snapshot. Returns whether pointer activity occurred, which
    /// the caller uses to drop highlight focus.
    pub(crate) fn begin_frame(&mut self, snapshot: InputSnapshot) -> bool {
        let mut requested = None;
        if snapshot.right {
            requested = Some(NavInput::Right);
        }
        if snapshot.left {
            requested = Some(NavInput::Left);
        }
        if snapshot.up {
            requested = Some(NavInput::Up);
        }
        if snapshot.down {
            requested = Some(NavInput::Down);
        }
        if snapshot.next {
            requested = Some(NavInput::Next);
        }
        if snapshot.prev {
            requested = Some(NavInput::Prev);
        }
        if snapshot.accept {
            requested = Some(NavInput::Accept);
        }

        let now = snapshot.time;
        self.queued = requested;
        match self.queued {
            Some(input) => {
                if self.prev_queued != Some(input) {
                    // fresh edge passes through immediately
                    self.hold_started = now;
                    self.last_passed = now;
                    self.prev_queued = Some(input);
                } else if now.saturating_sub(self.hold_started) < self.initial_delay {
                    self.queued = None;
                } else if now.saturating_sub(self.last_passed) < self.repeat_delay {
                    self.queued = None;
                } else {
                    // let one repeat through
                    self.last_passed = now;
                }
            }
            None => {
                self.prev_queued = None;
            }
        }

        let moved = match (self.last_cursor_pos, snapshot.cursor_pos) {
            (Some(last), Some(current)) => last != current,
            _ => false,
        };
        let clicked = snapshot.cursor_pressed && !self.prev_cursor_pressed;
        let pointer_activity = moved || clicked;
        if pointer_activity {
            self.pointer_mode = true;
        }
        if requested.is_some() {
            self.pointer_mode = false;
        }

        self.last_cursor_pos = snapshot.cursor_pos;
        self.prev_cursor_pressed = snapshot.cursor_pressed;
        self.snapshot = snapshot;
        pointer_activity
    }

    pub(crate) fn queued(&self) -> Option<NavInput> {
        self.queued
    }

    /// Take the queued input, leaving nothing for navigation this frame.
    /// Focused widgets use this to steal directional input (sliders, cycle
    /// buttons).
    pub(crate) fn consume(&mut self) -> Option<NavInput> {
        self.queued.take()
    }

    /// Pointer primary button transitioned from up to down this frame.
    pub(crate) fn pointer_clicked(&self) -> bool {
        self.snapshot.cursor_pressed && !self.prev_cursor_pressed
    }

    pub(crate) fn end_frame(&mut self) {
        self.queued = None;
    }

    pub(crate) fn reset(&mut self) {
        let initial_delay = self.initial_delay;
        let repeat_delay = self.repeat_delay;
        *self = InputState::new();
        self.initial_delay = initial_delay;
        self.repeat_delay = repeat_delay;
    }
}


#[cfg(test)]
fn held_right(millis: u64) -> InputSnapshot {
    InputSnapshot {
        time: Duration::from_millis(millis),
        right: true,
        ..InputSnapshot::default()
    }
}

#[test]
fn test_fresh_edge_passes_immediately() {
    let mut state = InputState::new();
    assert!(!state.begin_frame(held_right(0)));
    assert_eq!(state.queued(), Some(NavInput::Right));
}

#[test]
fn test_hold_suppressed_during_initial_delay() {
    let mut state = InputState::new();
    state.begin_frame(held_right(0));
    for millis in [16, 100, 240] {
        state.begin_frame(held_right(millis));
        assert_eq!(state.queued(), None);
    }
    // past the initial delay the input repeats
    state.begin_frame(held_right(260));
    assert_eq!(state.queued(), Some(NavInput::Right));
    // and then only at the repeat interval
    state.begin_frame(held_right(276));
    assert_eq!(state.queued(), None);
    state.begin_frame(held_right(302));
    assert_eq!(state.queued(), Some(NavInput::Right));
}

#[test]
fn test_release_rearms_the_edge() {
    let mut state = InputState::new();
    state.begin_frame(held_right(0));
    state.begin_frame(InputSnapshot {
        time: Duration::from_millis(16),
        ..InputSnapshot::default()
    });
    state.begin_frame(held_right(32));
    assert_eq!(state.queued(), Some(NavInput::Right));
}

#[test]
fn test_changing_direction_is_a_fresh_edge() {
    let mut state = InputState::new();
    state.begin_frame(held_right(0));
    let mut snapshot = held_right(16);
    snapshot.right = false;
    snapshot.down = true;
    state.begin_frame(snapshot);
    assert_eq!(state.queued(), Some(NavInput::Down));
}

#[test]
fn test_modality_switches() {
    let mut state = InputState::new();
    assert!(state.pointer_mode);
    state.begin_frame(held_right(0));
    assert!(!state.pointer_mode);

    // cursor motion returns to pointer mode
    let mut snapshot = InputSnapshot {
        time: Duration::from_millis(16),
        cursor_pos: Some(Vec2::new(10.0, 10.0)),
        ..InputSnapshot::default()
    };
    assert!(!state.begin_frame(snapshot.clone()));
    snapshot.time = Duration::from_millis(32);
    snapshot.cursor_pos = Some(Vec2::new(11.0, 10.0));
    assert!(state.begin_frame(snapshot));
    assert!(state.pointer_mode);
}
