//! Chart inputs handed to the rendering collaborator.

use serde::{Deserialize, Serialize};

use crate::aggregate::{GroupTotal, PeriodSeries};

/// How a series is meant to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    Line,
    Pie,
}

/// One `(category, value)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// An ordered series ready for a bar, line or pie chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub points: Vec<ChartPoint>,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            points: Vec::new(),
        }
    }

    /// Series from grouped totals, in the order given.
    pub fn from_groups(kind: ChartKind, title: impl Into<String>, groups: &[GroupTotal]) -> Self {
        Self {
            kind,
            title: title.into(),
            points: groups
                .iter()
                .map(|g| ChartPoint {
                    label: g.key.to_string(),
                    value: g.total,
                })
                .collect(),
        }
    }

    /// Line series from a chronological period series.
    pub fn from_periods(title: impl Into<String>, series: &PeriodSeries) -> Self {
        Self {
            kind: ChartKind::Line,
            title: title.into(),
            points: series
                .points
                .iter()
                .map(|p| ChartPoint {
                    label: p.label.clone(),
                    value: p.total,
                })
                .collect(),
        }
    }

    /// Reverse the point order. Horizontal bar charts draw bottom-up, so a
    /// descending ranking is reversed to put the largest bar on top.
    pub fn reversed(mut self) -> Self {
        self.points.reverse();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{GroupKey, PeriodTotal};

    #[test]
    fn test_from_groups_preserves_order() {
        let groups = vec![
            GroupTotal::new("Gasabo", 9.0),
            GroupTotal {
                key: GroupKey::Missing,
                total: 1.0,
            },
        ];
        let chart = ChartSpec::from_groups(ChartKind::Bar, "Top Sectors", &groups);
        assert_eq!(chart.points[0].label, "Gasabo");
        assert_eq!(chart.points[1].label, "(missing)");

        let flipped = chart.clone().reversed();
        assert_eq!(flipped.points[0].label, "(missing)");
    }

    #[test]
    fn test_from_periods() {
        let series = PeriodSeries {
            points: vec![PeriodTotal {
                year: 2023,
                index: 2,
                label: "Q2 2023".to_string(),
                total: 6.0,
            }],
            malformed: 0,
        };
        let chart = ChartSpec::from_periods("Cases over time", &series);
        assert_eq!(chart.kind, ChartKind::Line);
        assert_eq!(chart.points[0].label, "Q2 2023");
    }
}
