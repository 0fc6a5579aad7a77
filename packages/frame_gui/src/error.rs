//! Usage errors and the configurable reporting policy.
//!
//! These are development-time correctness aids, not runtime faults. Geometry
//! degeneracies are clamped at the point of use and never surface here.

use thiserror::Error;


/// A caller mistake detected at the point of violation.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum UsageError {
    #[error("widget identity {id:?} declared more than once in layout {layout:?} this frame")]
    IdentityReused { layout: String, id: String },
    #[error("layout {id:?} declared more than once this frame")]
    LayoutRedeclared { id: String },
    #[error("begin_frame called while a frame is already open")]
    FrameAlreadyOpen,
    #[error("end_frame called without an open frame")]
    FrameNotOpen,
    #[error("no instance {id:?} was ever placed in layout {layout:?}")]
    UnknownInstance { layout: String, id: String },
}

/// What to do when a [`UsageError`] is detected.
///
/// The default is [`UsagePolicy::Panic`]: a misuse aborts at the offending
/// call so the declaration that caused it is on the stack. `Warn` logs the
/// error and continues with the first-seen instance, which keeps a running
/// game playable while still surfacing the mistake.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum UsagePolicy {
    #[default]
    Panic,
    Warn,
    Ignore,
}

impl UsagePolicy {
    pub(crate) fn report(self, err: UsageError) {
        match self {
            UsagePolicy::Panic => panic!("{}", err),
            UsagePolicy::Warn => warn!("{}", err),
            UsagePolicy::Ignore => (),
        }
    }
}


#[test]
fn test_error_names_offender() {
    let err = UsageError::IdentityReused {
        layout: "menu".to_owned(),
        id: "x".to_owned(),
    };
    let message = err.to_string();
    assert!(message.contains("\"x\""));
    assert!(message.contains("\"menu\""));
}

#[test]
#[should_panic(expected = "\"x\"")]
fn test_panic_policy_aborts() {
    UsagePolicy::Panic.report(UsageError::IdentityReused {
        layout: "menu".to_owned(),
        id: "x".to_owned(),
    });
}

#[test]
fn test_ignore_policy_is_silent() {
    UsagePolicy::Ignore.report(UsageError::FrameAlreadyOpen);
    UsagePolicy::Warn.report(UsageError::FrameNotOpen);
}
