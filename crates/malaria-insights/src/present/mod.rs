//! Shaping aggregates into map, chart and KPI inputs.
//!
//! Nothing here draws: the output is plain data for whichever UI and
//! charting layer sits on top.

mod chart;
mod choropleth;
mod kpi;

pub use chart::{ChartKind, ChartPoint, ChartSpec};
pub use choropleth::{to_choropleth_input, ChoroplethCell, ChoroplethInput, ValueRange};
pub use kpi::{to_kpi_set, KpiSet, Leader, NOT_AVAILABLE};
