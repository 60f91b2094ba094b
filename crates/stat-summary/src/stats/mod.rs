//! The statistics engine.
//!
//! Everything here is a pure function of in-memory data: coercion of raw
//! cells, per-column descriptive statistics, grouping, one-way ANOVA and
//! boxplot layout. Missing or degenerate data yields `NaN` (or `0.0` where
//! documented) rather than an error.

pub mod anova;
pub mod boxplot;
pub mod coercion;
pub mod descriptive;
pub mod distribution;
pub mod histogram;
pub mod partition;

pub use anova::{AnovaResult, AnovaTableRow, GroupMean, VarianceSource};
pub use boxplot::{
    BoxGlyph, BoxplotGeometry, GroupBox, PlotDimensions, Quartiles, Shape, TextAnchor, Tick,
    ValueScale,
};
pub use coercion::{NumericSeries, coerce, coerce_column};
pub use descriptive::{ColumnSummary, summarize_column, summarize_dataset};
pub use histogram::Histogram;
pub use partition::{AnovaSelection, Group, MISSING_GROUP, Partition, partition};
