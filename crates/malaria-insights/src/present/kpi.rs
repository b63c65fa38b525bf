//! Headline metric cards.

use serde::{Deserialize, Serialize};

use crate::aggregate::{count_nonzero_groups, grand_total, sum_by, top_n, GroupTotal};
use crate::input::Dataset;

/// Placeholder name shown when no leader can be computed.
pub const NOT_AVAILABLE: &str = "N/A";

/// The largest group and its total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    pub name: String,
    pub total: f64,
}

impl Leader {
    pub fn unavailable() -> Self {
        Self {
            name: NOT_AVAILABLE.to_string(),
            total: 0.0,
        }
    }

    fn from_groups(groups: Option<&[GroupTotal]>) -> Self {
        groups
            .and_then(|g| top_n(g, 1).into_iter().next())
            .map(|g| Self {
                name: g.key.to_string(),
                total: g.total,
            })
            .unwrap_or_else(Self::unavailable)
    }

    pub fn is_available(&self) -> bool {
        self.name != NOT_AVAILABLE
    }
}

/// Total cases, active districts, top district and top sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSet {
    pub total: f64,
    pub active_regions: usize,
    pub top_region: Leader,
    pub top_sector: Leader,
}

impl KpiSet {
    /// All-zero KPIs, shown for empty results.
    pub fn empty() -> Self {
        Self {
            total: 0.0,
            active_regions: 0,
            top_region: Leader::unavailable(),
            top_sector: Leader::unavailable(),
        }
    }
}

/// Project a (filtered) dataset onto the KPI cards.
///
/// Any absent field degrades its card to zero / `N/A`.
pub fn to_kpi_set(
    dataset: &Dataset,
    value_field: Option<&str>,
    district_field: Option<&str>,
    sector_field: Option<&str>,
) -> KpiSet {
    let Some(value_field) = value_field else {
        return KpiSet::empty();
    };

    let districts = district_field.and_then(|d| sum_by(dataset, d, value_field));
    let sectors = sector_field.and_then(|s| sum_by(dataset, s, value_field));

    KpiSet {
        total: grand_total(dataset, value_field).unwrap_or(0.0),
        active_regions: districts.as_deref().map_or(0, count_nonzero_groups),
        top_region: Leader::from_groups(districts.as_deref()),
        top_sector: Leader::from_groups(sectors.as_deref()),
    }
}
