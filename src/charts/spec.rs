//! Chart Specification Module
//! Declarative, renderer-independent description of the four-panel trial chart.

use super::layout::{RowDef, SeriesStyle, PANEL_LAYOUT};
use crate::data::TrialTable;
use chrono::NaiveDateTime;
use serde::Serialize;

/// One styled line of `(timestamp, value)` pairs. `None` values are gaps.
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub name: &'static str,
    pub column: &'static str,
    pub style: SeriesStyle,
    pub points: Vec<(NaiveDateTime, Option<f64>)>,
}

impl Series {
    /// Finite values only.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|(_, v)| *v)
    }

    /// Maximal runs of consecutive present points.
    pub fn segments(&self) -> Vec<Vec<(NaiveDateTime, f64)>> {
        let mut out = Vec::new();
        let mut current = Vec::new();
        for (t, v) in &self.points {
            match v {
                Some(v) => current.push((*t, *v)),
                None if !current.is_empty() => out.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
        out
    }
}

/// One stacked panel.
#[derive(Debug, Clone, Serialize)]
pub struct ChartRow {
    pub y_title: &'static str,
    /// Fixed view range; the series data itself is never clamped.
    pub y_range: Option<[f64; 2]>,
    pub series: Vec<Series>,
}

impl ChartRow {
    /// Y view for this row: the fixed range if declared, else the padded data extent.
    pub fn y_view(&self) -> [f64; 2] {
        if let Some(range) = self.y_range {
            return range;
        }
        let (min, max) = self
            .series
            .iter()
            .flat_map(Series::values)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if min > max {
            return [0.0, 1.0];
        }
        let fills = self.series.iter().any(|s| s.style.fill_to_zero);
        let (min, max) = if fills {
            (min.min(0.0), max.max(0.0))
        } else {
            (min, max)
        };
        let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
        [min - pad, max + pad]
    }
}

/// Fully resolved chart: four rows sharing one time axis.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub rows: Vec<ChartRow>,
    pub shared_x: bool,
    pub x_range: [NaiveDateTime; 2],
}

/// Bind a loaded table onto the fixed panel layout.
pub fn bind(table: &TrialTable) -> ChartSpec {
    ChartSpec {
        rows: PANEL_LAYOUT.iter().map(|row| bind_row(row, table)).collect(),
        shared_x: true,
        x_range: [table.first_timestamp(), table.last_timestamp()],
    }
}

fn bind_row(row: &RowDef, table: &TrialTable) -> ChartRow {
    ChartRow {
        y_title: row.y_title,
        y_range: row.y_range,
        series: row
            .series
            .iter()
            .map(|def| Series {
                name: def.name,
                column: def.channel.header(),
                style: def.style,
                points: table.channel_points(def.channel),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::layout::Dash;
    use crate::data::{TrialLoader, TrialRecord};
    use chrono::NaiveDate;

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, minute, 0)
            .unwrap()
    }

    fn table_with_valve(values: &[f64]) -> TrialTable {
        let records = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let mut readings = [Some(1.0); 7];
                readings[6] = Some(v);
                TrialRecord::new(at(i as u32 * 5), readings)
            })
            .collect();
        TrialTable::from_records(records, 0).unwrap()
    }

    #[test]
    fn binds_four_rows_with_fixed_membership() {
        let spec = bind(&table_with_valve(&[10.0]));
        let names: Vec<Vec<&str>> = spec
            .rows
            .iter()
            .map(|r| r.series.iter().map(|s| s.name).collect())
            .collect();
        assert_eq!(
            names,
            vec![
                vec!["Process Temp SP", "Process Temp"],
                vec!["Pressure SP", "Inlet P1", "Outlet P2"],
                vec!["Flow Rate"],
                vec!["Valve %"],
            ]
        );
        let y_titles: Vec<&str> = spec.rows.iter().map(|r| r.y_title).collect();
        assert_eq!(y_titles, vec!["Temp (°C)", "Bar", "kg/hr", "%"]);
        assert!(spec.shared_x);
    }

    #[test]
    fn styles_follow_layout() {
        let spec = bind(&table_with_valve(&[10.0]));
        let pressure = &spec.rows[1].series;
        assert_eq!(pressure[0].style.dash, Dash::Dot);
        assert!(!pressure[0].style.fill_to_zero);
        assert_eq!(pressure[1].style.dash, Dash::Solid);
        assert!(!pressure[1].style.fill_to_zero);
        assert!(pressure[2].style.fill_to_zero);
        assert!(spec.rows[2].series[0].style.fill_to_zero);
        assert!(spec.rows[3].series[0].style.fill_to_zero);
    }

    #[test]
    fn valve_values_are_not_clamped_but_view_is_fixed() {
        let spec = bind(&table_with_valve(&[50.0, 110.0, -5.0]));
        let valve = &spec.rows[3];
        let values: Vec<Option<f64>> = valve.series[0].points.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![Some(50.0), Some(110.0), Some(-5.0)]);
        assert_eq!(valve.y_range, Some([0.0, 105.0]));
        assert_eq!(valve.y_view(), [0.0, 105.0]);
    }

    #[test]
    fn scenario_from_csv() {
        let csv = "Timestamp,Process Temp SP,Process Temp,Pressure SP,Inlet Steam Pressure,Outlet Steam Pressure,Steam Flow Rate,QualSteam Valve Opening\n\
                   2024-01-01 00:00,90,85,3,4,2.4,100,50\n\
                   2024-01-01 00:05,90,86,3,4,2.4,100,110\n\
                   2024-01-01 00:10,90,87,3,4,2.4,100,-5\n";
        let table = TrialLoader::load_bytes(csv.as_bytes().to_vec()).unwrap();
        let spec = bind(&table);
        let valve: Vec<_> = spec.rows[3].series[0].values().collect();
        assert_eq!(valve, vec![50.0, 110.0, -5.0]);
        assert_eq!(spec.rows[3].y_view(), [0.0, 105.0]);
        assert_eq!(spec.x_range, [at(0), at(10)]);
    }

    #[test]
    fn auto_range_covers_data_and_baseline() {
        let spec = bind(&table_with_valve(&[1.0]));
        // Flow row is filled to zero and every reading is 1.0.
        let [lo, hi] = spec.rows[2].y_view();
        assert!(lo <= 0.0 && hi >= 1.0);
    }

    #[test]
    fn segments_split_on_gaps() {
        let series = Series {
            name: "x",
            column: "x",
            style: PANEL_LAYOUT[2].series[0].style,
            points: vec![
                (at(0), Some(1.0)),
                (at(1), None),
                (at(2), Some(2.0)),
                (at(3), Some(3.0)),
                (at(4), None),
            ],
        };
        assert_eq!(
            series.segments(),
            vec![vec![(at(0), 1.0)], vec![(at(2), 2.0), (at(3), 3.0)]]
        );
    }

    #[test]
    fn serializes_for_external_renderers() {
        let spec = bind(&table_with_valve(&[42.0]));
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["rows"][3]["y_range"], serde_json::json!([0.0, 105.0]));
        assert_eq!(json["rows"][1]["series"][2]["column"], "Outlet Steam Pressure");
        assert_eq!(json["rows"][0]["series"][0]["style"]["dash"], "dot");
        assert_eq!(json["rows"][0]["y_title"], "Temp (°C)");
        assert!(json["rows"][0].get("title").is_none());
        assert_eq!(json["rows"][3]["series"][0]["points"][0][1], 42.0);
    }
}
