//! One synchronous render pass: resolve → fetch → load → range → bind.
//!
//! Each pass builds its table and chart from scratch; nothing is cached
//! between selections.

use crate::charts::{bind, ChartSpec};
use crate::config::AppConfig;
use crate::data::{DatasetLocator, DisplayRange, LoadError, LocatorError, TrialLoader};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PassError {
    #[error(transparent)]
    Locator(#[from] LocatorError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Everything the display surface needs for one dataset.
#[derive(Debug, Clone, Serialize)]
pub struct TrialView {
    pub dataset: String,
    pub title: String,
    pub heading: String,
    pub subtitle: String,
    pub range: DisplayRange,
    pub rows_loaded: usize,
    pub rows_dropped: usize,
    pub chart: ChartSpec,
}

impl TrialView {
    pub fn status_line(&self) -> String {
        if self.rows_dropped == 0 {
            format!("Loaded {} rows", self.rows_loaded)
        } else {
            format!(
                "Loaded {} rows ({} skipped: unparseable timestamp)",
                self.rows_loaded, self.rows_dropped
            )
        }
    }

    /// Pretty JSON of the whole view, for renderers outside this app.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `"<site> (<min_date> to <max_date>)"`
pub fn heading(site_name: &str, range: &DisplayRange) -> String {
    format!("{} ({} to {})", site_name, range.min_date, range.max_date)
}

/// Run a full pass for the selected identifier.
pub fn run_pass(
    locator: &DatasetLocator,
    dataset: &str,
    config: &AppConfig,
) -> Result<TrialView, PassError> {
    let source = locator.resolve(dataset)?;
    info!(dataset, %source, "loading dataset");
    let bytes = source.fetch()?;
    build_view(dataset, bytes, config)
}

/// Load and bind already-fetched bytes.
pub fn build_view(dataset: &str, bytes: Vec<u8>, config: &AppConfig) -> Result<TrialView, PassError> {
    let table = TrialLoader::load_bytes(bytes)?;
    let range = table.display_range();
    let chart = bind(&table);
    info!(dataset, rows = table.len(), from = %range.min_date, to = %range.max_date, "chart bound");

    Ok(TrialView {
        dataset: dataset.to_string(),
        title: config.page_title.clone(),
        heading: heading(&config.site_name, &range),
        subtitle: config.subtitle.clone(),
        range,
        rows_loaded: table.len(),
        rows_dropped: table.dropped_rows(),
        chart,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEADER: &str = "Timestamp,Process Temp SP,Process Temp,Pressure SP,Inlet Steam Pressure,Outlet Steam Pressure,Steam Flow Rate,QualSteam Valve Opening";

    fn write_trial(dir: &std::path::Path, name: &str, rows: &[&str]) {
        let mut body = format!("{HEADER}\n");
        for r in rows {
            body.push_str(r);
            body.push('\n');
        }
        fs::write(dir.join(name), body).unwrap();
    }

    fn local(dir: &std::path::Path) -> DatasetLocator {
        DatasetLocator::LocalDirectoryScan {
            dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn full_pass_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_trial(
            dir.path(),
            "15-11_clean.csv",
            &[
                "2024-11-15 10:05:30,90,88,3,4,2.5,120,40",
                "2024-11-15 09:58:10,90,85,3,4,2.4,100,50",
            ],
        );

        let view = run_pass(&local(dir.path()), "15-11_clean.csv", &AppConfig::default()).unwrap();
        assert_eq!(
            view.heading,
            "Zydus LifeSciences, Ahmedabad. (2024-11-15 09:58 to 2024-11-15 10:05)"
        );
        assert_eq!(view.subtitle, "Customer Trial Data");
        assert_eq!(view.chart.rows.len(), 4);
        assert_eq!(view.status_line(), "Loaded 2 rows");
    }

    #[test]
    fn missing_column_aborts_pass() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.csv"), "Timestamp,Process Temp\n2024-01-01 00:00,1\n").unwrap();
        let err = run_pass(&local(dir.path()), "bad.csv", &AppConfig::default()).unwrap_err();
        assert!(matches!(err, PassError::Load(LoadError::SchemaError(ref m)) if m.len() == 6));
        assert!(err.to_string().starts_with("Missing required column(s): Process Temp SP"));
    }

    #[test]
    fn empty_dataset_aborts_pass() {
        let dir = tempfile::tempdir().unwrap();
        write_trial(dir.path(), "empty.csv", &[]);
        let err = run_pass(&local(dir.path()), "empty.csv", &AppConfig::default()).unwrap_err();
        assert!(matches!(err, PassError::Load(LoadError::EmptyDataset)));
    }

    #[test]
    fn unknown_selection_aborts_pass() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_pass(&local(dir.path()), "ghost.csv", &AppConfig::default()).unwrap_err();
        assert!(matches!(err, PassError::Locator(LocatorError::UnknownDataset(_))));
    }

    #[test]
    fn bad_middle_timestamp_is_dropped_and_reported() {
        let bytes = format!(
            "{HEADER}\n2024-01-01 00:00,1,1,1,1,1,1,1\nyesterday,2,2,2,2,2,2,2\n2024-01-01 00:10,3,3,3,3,3,3,3\n"
        )
        .into_bytes();
        let view = build_view("t.csv", bytes, &AppConfig::default()).unwrap();
        assert_eq!(view.rows_loaded, 2);
        assert_eq!(view.rows_dropped, 1);
        assert_eq!(view.range.min_date, "2024-01-01 00:00");
        assert_eq!(view.range.max_date, "2024-01-01 00:10");
        assert_eq!(
            view.status_line(),
            "Loaded 2 rows (1 skipped: unparseable timestamp)"
        );
        assert_eq!(view.chart.rows[0].series[0].points.len(), 2);
    }

    #[test]
    fn json_export_carries_heading_and_chart() {
        let bytes = format!("{HEADER}\n2024-01-01 00:00,1,2,3,4,5,6,7\n").into_bytes();
        let config = AppConfig {
            site_name: "Plant".into(),
            ..AppConfig::default()
        };
        let view = build_view("t.csv", bytes, &config).unwrap();
        let json: serde_json::Value = serde_json::from_str(&view.to_json().unwrap()).unwrap();
        assert_eq!(json["heading"], "Plant (2024-01-01 00:00 to 2024-01-01 00:00)");
        assert_eq!(json["title"], "QualSteam Dashboard");
        assert_eq!(json["chart"]["rows"][3]["y_range"], serde_json::json!([0.0, 105.0]));
    }
}
