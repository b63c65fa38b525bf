//! Filtering and aggregation over case-count datasets.
//!
//! Every function here is pure: it reads a [`Dataset`](crate::Dataset) and
//! returns a freshly derived table, leaving the input untouched so the same
//! cached source can serve repeated interactions.

mod filter;
mod group;
mod period;

pub use filter::{apply_filters, Choice, FilterSelection};
pub use group::{
    count_nonzero_groups, grand_total, sum_by, top_n, GroupKey, GroupTotal, MISSING_GROUP_LABEL,
};
pub use period::{bucket_by_period, Granularity, PeriodSeries, PeriodTotal};
