//! Joining district totals to region boundaries for a choropleth map.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::{GroupKey, GroupTotal};
use crate::input::RegionCollection;

/// Value painted onto one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethCell {
    pub region: String,
    pub value: f64,
}

/// Bounds for the color scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

/// Map input: one cell per region, in region order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethInput {
    /// Feature property the cells are keyed on (e.g. `shapeName`).
    pub feature_id_key: String,
    pub cells: Vec<ChoroplethCell>,
    /// District totals with no matching region. Kept out of the map but
    /// still part of every non-map total.
    pub unmatched: Vec<GroupTotal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<ValueRange>,
}

/// Left-join regions with district totals by exact name.
///
/// Regions without a total get 0. Totals whose district matches no region
/// (including the missing-district group) are reported in `unmatched`.
pub fn to_choropleth_input(
    regions: &RegionCollection,
    district_totals: &[GroupTotal],
) -> ChoroplethInput {
    let mut by_name: HashMap<&str, f64> = HashMap::new();
    let mut unmatched = Vec::new();

    for group in district_totals {
        match &group.key {
            GroupKey::Value(name) if regions.get(name).is_some() => {
                *by_name.entry(name.as_str()).or_insert(0.0) += group.total;
            }
            _ => unmatched.push(group.clone()),
        }
    }

    let cells: Vec<ChoroplethCell> = regions
        .regions
        .iter()
        .map(|r| ChoroplethCell {
            region: r.name.clone(),
            value: by_name.get(r.name.as_str()).copied().unwrap_or(0.0),
        })
        .collect();

    let range = cells.iter().map(|c| c.value).fold(None, |acc, v| match acc {
        None => Some(ValueRange { min: v, max: v }),
        Some(r) => Some(ValueRange {
            min: r.min.min(v),
            max: r.max.max(v),
        }),
    });

    if !unmatched.is_empty() {
        log::debug!("{} district totals have no matching region", unmatched.len());
    }

    ChoroplethInput {
        feature_id_key: regions.key.clone(),
        cells,
        unmatched,
        range,
    }
}
