//! Host capability traits.
//!
//! The scaler never talks to a rendering engine directly. A host exposes computed-style reads
//! and layout measurements ([`LayoutOracle`]), the handful of tree/style mutations needed to
//! run a measurement clone ([`LayoutHost`]), and listener registration ([`EventHost`]).

use crate::schedule::{BindingId, FrameSlot, Trigger};
use crate::units::parse_style_number;
use std::fmt::Debug;

pub trait LayoutOracle {
    type Node: Copy + Eq + Debug;

    /// True iff `node` is a live element node (not text, comment, document, or a dangling
    /// handle).
    fn is_element(&self, node: Self::Node) -> bool;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Raw computed value of `property` (custom properties included) for `node`.
    fn computed_style_value(&self, node: Self::Node, property: &str) -> Option<String>;

    /// Content-box height of `node` as currently laid out, wrapped lines included.
    fn measure_rendered_height(&self, node: Self::Node) -> f64;

    /// Rendered content width of `node`.
    fn measure_width(&self, node: Self::Node) -> f64;

    /// Numeric value of a styling variable; absent or blank values read as `None`.
    fn read_style_variable(&self, node: Self::Node, name: &str) -> Option<f64> {
        parse_style_number(self.computed_style_value(node, name).as_deref())
    }

    /// Computed font size in px.
    fn computed_font_size(&self, node: Self::Node) -> Option<f64> {
        self.read_style_variable(node, "font-size")
    }
}

pub trait LayoutHost: LayoutOracle {
    /// Deep structural copy of `node` (all descendants, no listeners), not yet inserted.
    fn deep_clone(&mut self, node: Self::Node) -> Self::Node;

    /// Takes `node` out of normal flow so it no longer affects its siblings' layout, and lets
    /// its height follow its content.
    fn set_out_of_flow(&mut self, node: Self::Node);

    fn set_width(&mut self, node: Self::Node, px: f64);

    /// Inserts `node` as the next sibling of `reference`.
    fn insert_after(&mut self, reference: Self::Node, node: Self::Node);

    /// Writes an inline `font-size` declaration on `node`.
    fn set_font_size(&mut self, node: Self::Node, px: f64);

    /// Detaches `node` from the document and discards it.
    fn detach(&mut self, node: Self::Node);
}

pub trait EventHost {
    /// Registers `slot` to be scheduled whenever `trigger` fires.
    fn bind(&mut self, trigger: Trigger, slot: FrameSlot) -> BindingId;

    fn unbind(&mut self, binding: BindingId);

    /// Current paint frame; scheduled cycles become due on the following frame.
    fn current_frame(&self) -> u64;
}

/// Everything a [`Scaler`](crate::Scaler) needs from its host.
pub trait ScalerHost: LayoutHost + EventHost {}

impl<T: LayoutHost + EventHost> ScalerHost for T {}
