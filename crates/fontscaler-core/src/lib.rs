#![forbid(unsafe_code)]

//! Fit an element's font size to a target height.
//!
//! The core is host-agnostic: the rendering engine is reached through the capability traits in
//! [`host`], so the same search runs against a browser binding, the headless document in
//! `fontscaler-dom`, or a fake oracle in tests.
//!
//! A cycle resolves the height budget (styling variable, else the parent's content height),
//! probes an out-of-flow measurement clone one pixel at a time, applies the optional min/max
//! bounds and writes the result onto the target's inline style.

pub mod config;
pub mod error;
pub mod host;
mod scaler;
pub mod schedule;
pub mod units;

pub use config::{ConfigOverrides, ErrorMessageOverrides, ErrorMessages, ScalerConfig};
pub use error::{Error, Result};
pub use host::{EventHost, LayoutHost, LayoutOracle, ScalerHost};
pub use scaler::{
    Clamp, CycleReport, DEFAULT_FONT_SIZE_PX, Direction, HeightSource, MIN_FONT_SIZE_PX, Scaler,
};
pub use schedule::{BindingId, FrameSlot, Ticket, Trigger};
