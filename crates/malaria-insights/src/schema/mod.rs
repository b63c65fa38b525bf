//! Column resolution and calendar handling for loosely-typed datasets.

mod calendar;
mod columns;

pub use calendar::{
    date_of, infer_year_month_domain, month_label, month_text_to_number, month_to_number,
    parse_date, with_period_column, year_of, PeriodColumns, YearMonth, YearMonthDomain,
};
pub use columns::{resolve_column, ColumnCandidates, LogicalField, ResolvedColumns};
