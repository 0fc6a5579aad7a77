//! Immediate-mode GUI core with retained widget state.
//!
//! Callers redeclare the whole UI tree every frame against a [`Gui`]
//! context; stable string identities correlate each declaration with a
//! persistent instance record, so toggles, scroll offsets, and carets
//! survive the rebuild. Layouts turn a declaration's sequence position into
//! a rectangle through an [`Arranger`], a debounced highlight system moves
//! focus spatially between widgets for keyboard/gamepad users, and an
//! auto-scroll controller keeps the focused widget on screen.
//!
//! Rendering, text measurement, and input polling are collaborator traits
//! ([`DrawTarget`], [`TextMeasure`], [`InputSnapshot`]); this crate decides
//! where and with what tint to draw, never how.

#[macro_use]
extern crate tracing;

pub mod arrange;
pub mod draw;
pub mod error;
pub mod geom;
pub mod gui;
mod highlight;
pub mod input;
pub mod instance;
pub mod layout;
pub mod page;
mod scroll;
pub mod widget;

pub use crate::{
    arrange::{
        ArrangeArgs,
        Arranger,
        GridArranger,
        GridOrder,
    },
    draw::{
        DrawCall,
        DrawTarget,
        FontHandle,
        ImageHandle,
        Slicing,
        TextMeasure,
        TextStyle,
    },
    error::{
        UsageError,
        UsagePolicy,
    },
    geom::{
        Anchor,
        Rect,
    },
    gui::{
        Gui,
        LayoutKey,
        Placer,
        NESTED_SEPARATOR,
    },
    input::{
        InputSnapshot,
        NavInput,
    },
    instance::{
        InstanceRecord,
        InstanceRegistry,
        StateSlot,
    },
    layout::{
        partition,
        Layout,
    },
    page::Page,
    widget::{
        CustomWidget,
        Widget,
    },
};
