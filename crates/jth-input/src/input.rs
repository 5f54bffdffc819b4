//! Table-backed inputs that turn a jet and its event into a calibration value.

use std::fmt;

use jth_core::errors::{ErrorInfo, JthError};
use jth_core::{EventContext, Jet, LookupTable, TableRef, TableSource};
use tracing::{debug, info, warn};

use crate::clamp::clamp;
use crate::variable::AxisVariable;

/// Largest number of axes an input may carry.
pub const MAX_DIMENSIONS: usize = 3;

/// Exactly `D` axis variables, one per table axis.
#[derive(Debug, Clone)]
pub struct AxisSet<const D: usize> {
    axes: [AxisVariable; D],
}

impl<const D: usize> AxisSet<D> {
    pub fn new(axes: [AxisVariable; D]) -> Self {
        Self { axes }
    }

    pub fn variables(&self) -> &[AxisVariable] {
        &self.axes
    }

    fn variables_mut(&mut self) -> &mut [AxisVariable] {
        &mut self.axes
    }

    /// Extracted, scaled and clamped coordinates for `jet`.
    pub fn coordinates(
        &self,
        table: &dyn LookupTable,
        jet: &Jet,
        ctx: &EventContext,
    ) -> Result<[f64; D], JthError> {
        let mut coords = [0.0; D];
        for (index, (variable, slot)) in self.axes.iter().zip(coords.iter_mut()).enumerate() {
            let axis = table.axis(index).ok_or_else(|| {
                JthError::Dimension(
                    ErrorInfo::new("dimension-mismatch", "table has no axis for this variable")
                        .with_context("axis", index.to_string()),
                )
            })?;
            let raw = variable.value(jet, ctx).map_err(|err| {
                err.map_info(|info| {
                    info.with_context("axis", index.to_string())
                        .with_context("variable", variable.name())
                })
            })?;
            *slot = clamp(axis, raw);
        }
        Ok(coords)
    }

    fn resolve(&self, table: &dyn LookupTable, jet: &Jet, ctx: &EventContext) -> Result<f64, JthError> {
        let coords = self.coordinates(table, jet, ctx)?;
        table.interpolate(&coords)
    }
}

/// Axis variables of an input, with the dimensionality fixed by the variant.
#[derive(Debug, Clone)]
pub enum AxisLayout {
    One(AxisSet<1>),
    Two(AxisSet<2>),
    Three(AxisSet<3>),
}

impl AxisLayout {
    /// Picks the layout matching the number of variables.
    ///
    /// Fails with `unsupported-dimensionality` for anything but 1, 2 or 3.
    pub fn from_variables(axes: Vec<AxisVariable>) -> Result<Self, JthError> {
        let count = axes.len();
        let layout = match count {
            1 => axes.try_into().map(|axes| AxisLayout::One(AxisSet::new(axes))),
            2 => axes.try_into().map(|axes| AxisLayout::Two(AxisSet::new(axes))),
            3 => axes.try_into().map(|axes| AxisLayout::Three(AxisSet::new(axes))),
            _ => return Err(unsupported_dimensionality(count)),
        };
        layout.map_err(|_| unsupported_dimensionality(count))
    }

    pub fn dimensionality(&self) -> usize {
        match self {
            AxisLayout::One(_) => 1,
            AxisLayout::Two(_) => 2,
            AxisLayout::Three(_) => 3,
        }
    }

    pub fn variables(&self) -> &[AxisVariable] {
        match self {
            AxisLayout::One(set) => set.variables(),
            AxisLayout::Two(set) => set.variables(),
            AxisLayout::Three(set) => set.variables(),
        }
    }

    fn variables_mut(&mut self) -> &mut [AxisVariable] {
        match self {
            AxisLayout::One(set) => set.variables_mut(),
            AxisLayout::Two(set) => set.variables_mut(),
            AxisLayout::Three(set) => set.variables_mut(),
        }
    }

    fn resolve(&self, table: &dyn LookupTable, jet: &Jet, ctx: &EventContext) -> Result<f64, JthError> {
        match self {
            AxisLayout::One(set) => set.resolve(table, jet, ctx),
            AxisLayout::Two(set) => set.resolve(table, jet, ctx),
            AxisLayout::Three(set) => set.resolve(table, jet, ctx),
        }
    }
}

fn unsupported_dimensionality(count: usize) -> JthError {
    JthError::Dimension(
        ErrorInfo::new(
            "unsupported-dimensionality",
            "inputs carry between one and three axes",
        )
        .with_context("axes", count.to_string()),
    )
}

fn lifecycle_error(code: &str, message: &str, input: &str, state: LifecycleState) -> JthError {
    JthError::Lifecycle(
        ErrorInfo::new(code, message)
            .with_context("input", input)
            .with_context("state", state.as_str()),
    )
}

/// Observable lifecycle of a [`MultiAxisInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Unconfigured,
    Ready,
    Failed,
    Finalized,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Unconfigured => "unconfigured",
            LifecycleState::Ready => "ready",
            LifecycleState::Failed => "failed",
            LifecycleState::Finalized => "finalized",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
enum Slot {
    Unconfigured,
    Ready(Box<dyn LookupTable>),
    Failed(JthError),
    Finalized,
}

/// An input owning D axis variables and, once initialized, the table they
/// index.
///
/// `resolve` is only valid while the input is ready. The table is owned
/// exclusively and dropped on [`MultiAxisInput::finalize`].
#[derive(Debug)]
pub struct MultiAxisInput {
    name: String,
    table_ref: TableRef,
    layout: AxisLayout,
    slot: Slot,
}

impl MultiAxisInput {
    /// Creates an unconfigured input. `axes` must hold one to three variables.
    pub fn new(
        name: impl Into<String>,
        table_ref: TableRef,
        axes: Vec<AxisVariable>,
    ) -> Result<Self, JthError> {
        let name = name.into();
        let layout = AxisLayout::from_variables(axes)
            .map_err(|err| err.map_info(|info| info.with_context("input", name.as_str())))?;
        Ok(Self::with_layout(name, table_ref, layout))
    }

    pub fn with_layout(name: impl Into<String>, table_ref: TableRef, layout: AxisLayout) -> Self {
        Self {
            name: name.into(),
            table_ref,
            layout,
            slot: Slot::Unconfigured,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table_ref(&self) -> &TableRef {
        &self.table_ref
    }

    pub fn layout(&self) -> &AxisLayout {
        &self.layout
    }

    /// Number of axes, fixed at construction.
    pub fn dimensionality(&self) -> usize {
        self.layout.dimensionality()
    }

    pub fn variables(&self) -> &[AxisVariable] {
        self.layout.variables()
    }

    pub fn state(&self) -> LifecycleState {
        match self.slot {
            Slot::Unconfigured => LifecycleState::Unconfigured,
            Slot::Ready(_) => LifecycleState::Ready,
            Slot::Failed(_) => LifecycleState::Failed,
            Slot::Finalized => LifecycleState::Finalized,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.slot, Slot::Ready(_))
    }

    /// The error that moved the input to the failed state, if any.
    pub fn failure(&self) -> Option<&JthError> {
        match &self.slot {
            Slot::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// The loaded table while ready.
    pub fn table(&self) -> Option<&dyn LookupTable> {
        match &self.slot {
            Slot::Ready(table) => Some(table.as_ref()),
            _ => None,
        }
    }

    /// Changes the scale of axis `axis` (0-based). Not allowed while ready.
    pub fn set_scale(&mut self, axis: usize, scale: f64) -> Result<(), JthError> {
        if self.is_ready() {
            return Err(lifecycle_error(
                "scale-frozen",
                "scales cannot change while the input is ready",
                &self.name,
                self.state(),
            )
            .map_info(|info| info.with_hint("finalize the input before changing scales")));
        }
        let dims = self.dimensionality();
        let variable = self.layout.variables_mut().get_mut(axis).ok_or_else(|| {
            JthError::Dimension(
                ErrorInfo::new("dimension-mismatch", "axis index out of range")
                    .with_context("axis", axis.to_string())
                    .with_context("dimensionality", dims.to_string()),
            )
        })?;
        variable.set_scale(scale);
        Ok(())
    }

    /// Loads the configured table from `source` and moves to ready.
    ///
    /// Any load or dimensionality failure moves the input to failed and is
    /// returned. Initializing a ready input is an error and keeps the table.
    pub fn initialize(&mut self, source: &dyn TableSource) -> Result<(), JthError> {
        self.ensure_not_ready()?;
        match source.load_table(&self.table_ref.file, &self.table_ref.table) {
            Ok(table) => self.accept(table),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Moves an already built table into the input.
    ///
    /// Applies the same double-initialization and dimensionality checks as
    /// [`MultiAxisInput::initialize`].
    pub fn initialize_with_table(&mut self, table: Box<dyn LookupTable>) -> Result<(), JthError> {
        self.ensure_not_ready()?;
        self.accept(table)
    }

    fn ensure_not_ready(&self) -> Result<(), JthError> {
        if self.is_ready() {
            return Err(lifecycle_error(
                "already-initialized",
                "input already holds a table",
                &self.name,
                self.state(),
            ));
        }
        Ok(())
    }

    fn accept(&mut self, table: Box<dyn LookupTable>) -> Result<(), JthError> {
        let expected = self.dimensionality();
        let actual = table.dimensionality();
        let axes_present = (0..expected).all(|index| table.axis(index).is_some());
        if actual != expected || !axes_present {
            let err = JthError::Dimension(
                ErrorInfo::new("dimension-mismatch", "table dimensionality differs from the axes")
                    .with_context("expected", expected.to_string())
                    .with_context("actual", actual.to_string())
                    .with_context("table", self.table_ref.to_string()),
            );
            return Err(self.fail(err));
        }
        info!(input = %self.name, table = %self.table_ref, dims = expected, "input ready");
        self.slot = Slot::Ready(table);
        Ok(())
    }

    fn fail(&mut self, err: JthError) -> JthError {
        let err = err.map_info(|info| info.with_context("input", self.name.as_str()));
        warn!(input = %self.name, table = %self.table_ref, error = %err, "input initialization failed");
        self.slot = Slot::Failed(err.clone());
        err
    }

    /// Looks up the calibration value for `jet` in `ctx`.
    ///
    /// Each axis value is extracted, scaled and clamped into the table range
    /// before interpolation. Errors never change the input's state.
    pub fn resolve(&self, jet: &Jet, ctx: &EventContext) -> Result<f64, JthError> {
        match &self.slot {
            Slot::Ready(table) => self
                .layout
                .resolve(table.as_ref(), jet, ctx)
                .map_err(|err| err.map_info(|info| info.with_context("input", self.name.as_str()))),
            _ => Err(lifecycle_error(
                "not-ready",
                "input has no table loaded",
                &self.name,
                self.state(),
            )),
        }
    }

    /// Drops the table. Always succeeds and may be called repeatedly.
    pub fn finalize(&mut self) {
        if !matches!(self.slot, Slot::Finalized) {
            debug!(input = %self.name, from = %self.state(), "input finalized");
        }
        self.slot = Slot::Finalized;
    }
}
