#![forbid(unsafe_code)]

//! Headless host for `fontscaler`.
//!
//! [`Document`] is an in-memory element tree with inline styles, a minimal cascade (custom
//! properties and font properties inherit), block/inline layout and a deterministic text
//! measurer. It implements the `fontscaler-core` host traits, so a `Scaler` can run against it
//! without a browser.

mod document;
mod layout;
pub mod node;
pub mod style;
pub mod text;

pub use document::{Document, NodeSnapshot};
pub use node::{NodeId, NodeKind};
pub use style::StyleDeclarations;
pub use text::{DeterministicTextMeasurer, TextMeasurer, TextMetrics, TextStyle};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown node: {id:?}")]
    UnknownNode { id: NodeId },
    #[error("hierarchy request error: {message}")]
    HierarchyRequest { message: String },
    #[error("invalid style declaration: {declaration:?}")]
    InvalidStyle { declaration: String },
}

pub type Result<T> = std::result::Result<T, Error>;
