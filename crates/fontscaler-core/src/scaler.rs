//! The fit search: resolve a target height, probe a measurement clone one font-size step at a
//! time, clamp, and commit the result onto the live element.

use crate::config::{ConfigOverrides, ScalerConfig};
use crate::error::{Error, Result};
use crate::host::{EventHost, LayoutHost, ScalerHost};
use crate::schedule::{BindingId, FrameSlot, Ticket, Trigger};
use std::fmt::Debug;

/// Starting size used when the host cannot report a computed font size.
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;
/// The shrink search never probes below this size.
pub const MIN_FONT_SIZE_PX: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Grow,
    Shrink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightSource {
    /// The height styling variable on the target.
    Variable,
    /// The content height of the target's parent element.
    Parent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clamp {
    None,
    Max(f64),
    Min(f64),
}

/// Outcome of one successful cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub start_font_size: f64,
    /// Largest integer size that fits, before min/max bounds are applied.
    pub fitted_font_size: f64,
    /// Size committed onto the target.
    pub final_font_size: f64,
    pub max_height: f64,
    pub height_source: HeightSource,
    pub direction: Direction,
    /// Font-size changes made during the search.
    pub iterations: u32,
    pub clamp: Clamp,
}

#[derive(Debug, Clone, Copy, Default)]
struct SearchState {
    current_font_size: f64,
    iteration_count: u32,
    max_height: f64,
}

/// Fits the font size of one target element to its height budget.
///
/// Construction registers a debounced listener for every [`Trigger`]; the host's frame callback
/// then drives [`Scaler::on_frame`]. [`Scaler::execute`] runs a cycle immediately.
///
/// A scaler dropped without [`Scaler::dispose`] leaves its listeners bound; they keep
/// scheduling a slot nobody reads.
#[derive(Debug)]
#[must_use = "a scaler stays bound to its host until `dispose` is called"]
pub struct Scaler<N> {
    target: N,
    config: ScalerConfig,
    slot: FrameSlot,
    bindings: Vec<BindingId>,
}

impl<N: Copy + Eq + Debug> Scaler<N> {
    pub fn new<H>(host: &mut H, target: N, overrides: ConfigOverrides) -> Result<Self>
    where
        H: ScalerHost<Node = N>,
    {
        let config = ScalerConfig::from_overrides(overrides)?;
        if !host.is_element(target) {
            return Err(Error::InvalidTarget {
                message: config.error_messages().invalid_target.clone(),
            });
        }

        let slot = FrameSlot::new();
        let bindings = Trigger::ALL
            .iter()
            .map(|trigger| host.bind(*trigger, slot.clone()))
            .collect();

        tracing::debug!(node = ?target, "fontscaler: bound scaler");
        Ok(Self {
            target,
            config,
            slot,
            bindings,
        })
    }

    pub fn target(&self) -> N {
        self.target
    }

    pub fn config(&self) -> &ScalerConfig {
        &self.config
    }

    pub fn is_scheduled(&self) -> bool {
        self.slot.is_scheduled()
    }

    /// Requests a cycle on the next frame, replacing any pending request.
    pub fn schedule<H: EventHost>(&self, host: &H, trigger: Trigger) -> Ticket {
        self.slot.schedule(trigger, host.current_frame())
    }

    pub fn cancel(&self) -> Option<Ticket> {
        self.slot.cancel()
    }

    /// Frame callback: runs the pending cycle if it is due.
    ///
    /// Cycle errors are logged and swallowed; the target keeps its previous font size and the
    /// next trigger starts a fresh cycle.
    pub fn on_frame<H>(&self, host: &mut H) -> Option<CycleReport>
    where
        H: ScalerHost<Node = N>,
    {
        let ticket = self.slot.take_due(host.current_frame())?;
        match self.execute(host) {
            Ok(report) => Some(report),
            Err(err) => {
                tracing::warn!(
                    node = ?self.target,
                    trigger = ?ticket.trigger,
                    error = %err,
                    "fontscaler: cycle skipped"
                );
                None
            }
        }
    }

    /// Runs one cycle synchronously and returns its report.
    pub fn execute<H>(&self, host: &mut H) -> Result<CycleReport>
    where
        H: LayoutHost<Node = N>,
    {
        let mut cycle = Cycle {
            host,
            config: &self.config,
            target: self.target,
            clone: None,
            state: SearchState::default(),
        };
        let report = cycle.run()?;
        tracing::debug!(
            node = ?self.target,
            start = report.start_font_size,
            fitted = report.fitted_font_size,
            committed = report.final_font_size,
            max_height = report.max_height,
            direction = ?report.direction,
            iterations = report.iterations,
            "fontscaler: cycle committed"
        );
        Ok(report)
    }

    /// Unbinds every listener and drops any pending cycle.
    pub fn dispose<H: EventHost>(mut self, host: &mut H) {
        self.slot.cancel();
        for binding in std::mem::take(&mut self.bindings) {
            host.unbind(binding);
        }
    }
}

impl<N> Drop for Scaler<N> {
    fn drop(&mut self) {
        if !self.bindings.is_empty() {
            tracing::debug!(
                listeners = self.bindings.len(),
                "fontscaler: scaler dropped without dispose; listeners stay bound"
            );
        }
    }
}

/// State of one execution cycle. Owns the measurement clone and detaches it on drop, so a
/// failed cycle leaves no clone behind.
struct Cycle<'a, H: LayoutHost> {
    host: &'a mut H,
    config: &'a ScalerConfig,
    target: H::Node,
    clone: Option<H::Node>,
    state: SearchState,
}

impl<H: LayoutHost> Cycle<'_, H> {
    fn run(&mut self) -> Result<CycleReport> {
        self.state.iteration_count = 0;
        let height_source = self.update_height()?;
        let start_font_size = self.init_clone();

        let direction = if self.is_text_too_large() {
            self.shrink()?;
            Direction::Shrink
        } else {
            self.grow()?;
            Direction::Grow
        };
        let fitted_font_size = self.state.current_font_size;
        let clamp = self.set_min_max_font_size();
        let final_font_size = self.sync_font_size();

        Ok(CycleReport {
            start_font_size,
            fitted_font_size,
            final_font_size,
            max_height: self.state.max_height,
            height_source,
            direction,
            iterations: self.state.iteration_count,
            clamp,
        })
    }

    fn update_height(&mut self) -> Result<HeightSource> {
        let from_variable = self
            .host
            .read_style_variable(self.target, self.config.height_variable())
            .filter(|h| *h > 0.0);
        if let Some(h) = from_variable {
            self.state.max_height = h;
            return Ok(HeightSource::Variable);
        }

        let from_parent = self
            .host
            .parent(self.target)
            .filter(|p| self.host.is_element(*p))
            .map(|p| self.host.measure_rendered_height(p))
            .filter(|h| h.is_finite() && *h > 0.0);
        match from_parent {
            Some(h) => {
                self.state.max_height = h;
                Ok(HeightSource::Parent)
            }
            None => Err(Error::InvalidHeight {
                message: self.config.error_messages().invalid_height.clone(),
            }),
        }
    }

    fn init_clone(&mut self) -> f64 {
        let start = self
            .host
            .computed_font_size(self.target)
            .filter(|v| v.is_finite())
            .map(f64::trunc)
            .unwrap_or(DEFAULT_FONT_SIZE_PX)
            .max(MIN_FONT_SIZE_PX);
        self.state.current_font_size = start;

        let width = self.host.measure_width(self.target);
        let clone = self.host.deep_clone(self.target);
        self.host.set_out_of_flow(clone);
        self.host.set_width(clone, width);
        self.host.insert_after(self.target, clone);
        // Probe from the truncated size so every step lands on the integer lattice.
        self.host.set_font_size(clone, start);
        self.clone = Some(clone);
        start
    }

    fn is_text_too_large(&self) -> bool {
        self.clone
            .is_some_and(|c| self.host.measure_rendered_height(c) > self.state.max_height)
    }

    fn count_loop(&mut self) -> Result<()> {
        self.state.iteration_count += 1;
        if self.state.iteration_count >= self.config.max_iterations() {
            return Err(Error::MaxIterationsExceeded {
                message: self.config.error_messages().max_iterations.clone(),
                limit: self.config.max_iterations(),
            });
        }
        Ok(())
    }

    fn step(&mut self, delta: f64) -> Result<()> {
        self.count_loop()?;
        self.state.current_font_size += delta;
        if let Some(clone) = self.clone {
            self.host.set_font_size(clone, self.state.current_font_size);
        }
        tracing::trace!(
            font_size = self.state.current_font_size,
            iteration = self.state.iteration_count,
            "fontscaler: probe"
        );
        Ok(())
    }

    fn grow(&mut self) -> Result<()> {
        loop {
            self.step(1.0)?;
            if self.is_text_too_large() {
                return self.step(-1.0);
            }
        }
    }

    fn shrink(&mut self) -> Result<()> {
        loop {
            if self.state.current_font_size - 1.0 < MIN_FONT_SIZE_PX {
                tracing::warn!(
                    node = ?self.target,
                    max_height = self.state.max_height,
                    "fontscaler: content overflows even at the minimum font size"
                );
                return Ok(());
            }
            self.step(-1.0)?;
            if !self.is_text_too_large() {
                return Ok(());
            }
        }
    }

    /// Applies the optional max/min bounds. The bounded size is not re-checked against the fit
    /// test.
    fn set_min_max_font_size(&mut self) -> Clamp {
        let max = self
            .host
            .read_style_variable(self.target, self.config.max_font_size_variable())
            .filter(|v| *v > 0.0);
        let min = self
            .host
            .read_style_variable(self.target, self.config.min_font_size_variable())
            .filter(|v| *v > 0.0);

        let mut clamp = Clamp::None;
        if let Some(max) = max.filter(|m| self.state.current_font_size > *m) {
            self.state.current_font_size = max;
            clamp = Clamp::Max(max);
        }
        if let Some(min) = min.filter(|m| self.state.current_font_size < *m) {
            self.state.current_font_size = min;
            clamp = Clamp::Min(min);
        }

        if clamp != Clamp::None {
            if let Some(clone) = self.clone {
                self.host.set_font_size(clone, self.state.current_font_size);
            }
        }
        clamp
    }

    fn sync_font_size(&mut self) -> f64 {
        let size = self.state.current_font_size;
        self.host.set_font_size(self.target, size);
        if let Some(clone) = self.clone.take() {
            self.host.detach(clone);
        }
        size
    }
}

impl<H: LayoutHost> Drop for Cycle<'_, H> {
    fn drop(&mut self) {
        if let Some(clone) = self.clone.take() {
            tracing::debug!(clone = ?clone, "fontscaler: discarding clone of aborted cycle");
            self.host.detach(clone);
        }
    }
}
