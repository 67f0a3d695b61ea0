#![forbid(unsafe_code)]

//! `fontscaler` adjusts the font size of an element so its rendered content fills, but does not
//! exceed, a target height: the `--fontScalerHeight` styling variable when set, otherwise the
//! content height of the element's parent.
//!
//! The search core ([`Scaler`]) is host-agnostic; see [`LayoutOracle`], [`LayoutHost`] and
//! [`EventHost`] for the capabilities a host provides.
//!
//! # Features
//!
//! - `headless` (default): an in-memory [`headless::Document`] host with a deterministic text
//!   measurer, for tests, tooling and server-side layout.

pub use fontscaler_core::*;

#[cfg(feature = "headless")]
pub mod headless {
    use crate::{ConfigOverrides, CycleReport, Scaler};

    pub use fontscaler_dom::{
        DeterministicTextMeasurer, Document, NodeId, NodeKind, NodeSnapshot, StyleDeclarations,
        TextMeasurer, TextMetrics, TextStyle,
    };

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Scaler(#[from] fontscaler_core::Error),
        #[error(transparent)]
        Dom(#[from] fontscaler_dom::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Appends a `tag` element with the given `style` attribute text under `parent`.
    pub fn append_styled(
        doc: &mut Document,
        parent: NodeId,
        tag: &str,
        css_text: &str,
    ) -> Result<NodeId> {
        let id = doc.append_element(parent, tag)?;
        doc.set_style_attribute(id, css_text)?;
        Ok(id)
    }

    /// Runs a single cycle for `target` and unbinds again (no event wiring left behind).
    pub fn fit_once(
        doc: &mut Document,
        target: NodeId,
        overrides: ConfigOverrides,
    ) -> Result<CycleReport> {
        let scaler = Scaler::new(doc, target, overrides)?;
        let report = scaler.execute(doc);
        scaler.dispose(doc);
        Ok(report?)
    }

    /// Advances the paint clock one frame and runs every scaler whose cycle is due.
    pub fn next_frame(doc: &mut Document, scalers: &[Scaler<NodeId>]) -> Vec<CycleReport> {
        let frame = doc.advance_frame();
        let reports = scalers
            .iter()
            .filter_map(|s| s.on_frame(doc))
            .collect::<Vec<_>>();
        tracing::trace!(frame, ran = reports.len(), "fontscaler: frame");
        reports
    }
}
