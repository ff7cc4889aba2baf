use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// One observed activity instance. Read-only input data; a new dataset load
/// replaces all records wholesale, there is no incremental merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub employee_id: String,
    /// ISO date string, e.g. `2024-03-18`.
    pub date: String,
    /// Seconds since midnight.
    pub start_time: f64,
    pub end_time: f64,
    /// Raw region name, never a combination name.
    pub region: String,
    pub activity: String,
    /// Seconds; expected to equal `end_time - start_time`.
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    #[serde(rename = "dateRange")]
    pub date_range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DatasetFile {
    metadata: DatasetMetadata,
    records: Vec<ActivityRecord>,
}

static DATASET_VERSION: AtomicU64 = AtomicU64::new(0);

/// An uploaded dataset plus a process-unique version used as a cache key
/// component. Loading a new file always yields a new version.
#[derive(Debug, Clone)]
pub struct ActivityDataset {
    pub metadata: DatasetMetadata,
    pub records: Vec<ActivityRecord>,
    pub version: u64,
}

impl ActivityDataset {
    fn new(metadata: DatasetMetadata, records: Vec<ActivityRecord>) -> Self {
        Self {
            metadata,
            records,
            version: DATASET_VERSION.fetch_add(1, Ordering::Relaxed) + 1,
        }
    }

    /// Distinct dates present in the records, sorted ascending. ISO date
    /// strings sort correctly lexicographically.
    pub fn dates(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.records.iter().map(|r| r.date.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Distinct activity names, sorted, minus the hidden ones.
    pub fn activities(&self, hidden: &std::collections::HashSet<String>) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .records
            .iter()
            .filter(|r| !hidden.contains(&r.activity))
            .map(|r| r.activity.as_str())
            .collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Records restricted to the selected dates and non-hidden activities.
    /// This is the input slice every aggregation pass starts from.
    pub fn filtered<'a>(
        &'a self,
        selected_dates: &BTreeSet<String>,
        hidden_activities: &std::collections::HashSet<String>,
    ) -> Vec<&'a ActivityRecord> {
        self.records
            .iter()
            .filter(|r| selected_dates.contains(&r.date) && !hidden_activities.contains(&r.activity))
            .collect()
    }

    /// Records whose `[start_time, end_time)` interval covers the given
    /// second-of-day on the given date. Drives the animated timeline.
    pub fn active_at<'a>(&'a self, date: &str, second_of_day: f64) -> Vec<&'a ActivityRecord> {
        self.records
            .iter()
            .filter(|r| {
                r.date == date && r.start_time <= second_of_day && second_of_day < r.end_time
            })
            .collect()
    }
}

pub fn parse_dataset(json: &str) -> Result<ActivityDataset> {
    let file: DatasetFile = serde_json::from_str(json).context("deserialize activity dataset")?;
    for record in &file.records {
        let expected = record.end_time - record.start_time;
        if (record.duration - expected).abs() > 1.0 {
            tracing::warn!(
                employee = %record.employee_id,
                date = %record.date,
                duration = record.duration,
                expected,
                "record duration disagrees with its time interval"
            );
        }
    }
    Ok(ActivityDataset::new(file.metadata, file.records))
}

pub fn load_dataset(path: &Path) -> Result<ActivityDataset> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read activity dataset {}", path.display()))?;
    parse_dataset(&content).with_context(|| format!("parse activity dataset {}", path.display()))
}
