use crate::dataset::ActivityRecord;
use crate::format::format_duration;
use crate::regions::RegionSnapshot;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

/// Records at or below this duration (seconds) do not count as instances.
/// They are sensor noise from spurious sub-5-second detections; their
/// duration still counts toward totals.
pub const INSTANCE_THRESHOLD: f64 = 5.0;

/// One quartile-derived histogram bucket. `upper` of `None` marks the open
/// top bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationBucket {
    pub label: String,
    pub lower: f64,
    pub upper: Option<f64>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionStats {
    pub region: String,
    pub activity: String,
    pub total_duration: f64,
    pub instance_count: usize,
    pub average_duration: f64,
    /// Share of the grand total in percent; the metric follows the
    /// instances/duration display mode.
    pub percentage: f64,
    /// Present only in instances mode.
    pub histogram: Vec<DurationBucket>,
}

/// Aggregated per-region statistics for one activity, plus the grand totals
/// and maxima the renderer normalizes against. Derived state only, never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeatData {
    pub region_stats: HashMap<String, RegionStats>,
    pub max_duration: f64,
    pub max_count: usize,
    pub total_duration: f64,
    pub total_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    pub show_instances: bool,
    pub use_combined_regions: bool,
}

/// Streams the records for `activity` into per-region statistics.
///
/// Two passes: accumulation first, then percentage/average derivation against
/// the final grand totals, so no region ever carries a stale mid-stream
/// percentage. Division by zero is pinned to 0 explicitly; a NaN leaking into
/// a rendered label is a visible defect.
pub fn aggregate(
    records: &[&ActivityRecord],
    activity: &str,
    options: AggregateOptions,
    snapshot: &RegionSnapshot,
) -> HeatData {
    struct Accum {
        total_duration: f64,
        instance_count: usize,
        samples: Vec<f64>,
    }

    let mut per_region: HashMap<String, Accum> = HashMap::new();

    for record in records {
        if record.activity != activity {
            continue;
        }
        let display_region = if options.use_combined_regions {
            snapshot.resolve(&record.region)
        } else {
            record.region.as_str()
        };
        if snapshot.is_excluded(&record.region) {
            continue;
        }

        let entry = per_region
            .entry(display_region.to_string())
            .or_insert_with(|| Accum {
                total_duration: 0.0,
                instance_count: 0,
                samples: Vec::new(),
            });

        entry.total_duration += record.duration;
        if !options.show_instances || record.duration > INSTANCE_THRESHOLD {
            entry.instance_count += 1;
            if options.show_instances {
                entry.samples.push(record.duration);
            }
        }
    }

    let total_duration: f64 = per_region.values().map(|a| a.total_duration).sum();
    let total_count: usize = per_region.values().map(|a| a.instance_count).sum();

    let mut data = HeatData {
        total_duration,
        total_count,
        ..HeatData::default()
    };

    for (region, mut accum) in per_region {
        let percentage = if options.show_instances {
            if total_count == 0 {
                0.0
            } else {
                accum.instance_count as f64 / total_count as f64 * 100.0
            }
        } else if total_duration <= 0.0 {
            0.0
        } else {
            accum.total_duration / total_duration * 100.0
        };

        let average_duration = if accum.instance_count == 0 {
            0.0
        } else {
            accum.total_duration / accum.instance_count as f64
        };

        let histogram = if options.show_instances {
            quartile_histogram(&mut accum.samples)
        } else {
            Vec::new()
        };

        data.max_duration = data.max_duration.max(accum.total_duration);
        data.max_count = data.max_count.max(accum.instance_count);
        data.region_stats.insert(
            region.clone(),
            RegionStats {
                region,
                activity: activity.to_string(),
                total_duration: accum.total_duration,
                instance_count: accum.instance_count,
                average_duration,
                percentage,
                histogram,
            },
        );
    }

    data
}

/// Buckets durations into four quartile-derived ranges over the fixed
/// 5-second lower bound. With fewer than four distinct samples some
/// boundaries coincide; such buckets are legal and simply accumulate into
/// the same labeled range.
pub fn quartile_histogram(samples: &mut Vec<f64>) -> Vec<DurationBucket> {
    if samples.is_empty() {
        return Vec::new();
    }
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = samples.len();
    let boundaries = [
        INSTANCE_THRESHOLD,
        samples[n / 4],
        samples[n / 2],
        samples[3 * n / 4],
    ];

    let mut buckets: Vec<DurationBucket> = (0..4)
        .map(|i| {
            let lower = boundaries[i];
            let upper = boundaries.get(i + 1).copied();
            let label = match upper {
                Some(upper) => {
                    format!("{} to {}", format_duration(lower), format_duration(upper))
                }
                None => format!("over {}", format_duration(lower)),
            };
            DurationBucket {
                label,
                lower,
                upper,
                count: 0,
            }
        })
        .collect();

    for &duration in samples.iter() {
        // First bucket is closed on both ends, the rest half-open below.
        let index = if duration <= boundaries[1] {
            0
        } else if duration <= boundaries[2] {
            1
        } else if duration <= boundaries[3] {
            2
        } else {
            3
        };
        buckets[index].count += 1;
    }

    buckets
}

/// Cache key for an aggregation result. The dataset version and store
/// revision stand in for implicit dependency tracking: any upload or store
/// mutation produces a fresh key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatsKey {
    pub dataset_version: u64,
    pub store_revision: u64,
    pub activity: String,
    pub show_instances: bool,
    pub use_combined_regions: bool,
    pub filter_fingerprint: u64,
}

pub fn filter_fingerprint<'a>(dates: impl Iterator<Item = &'a str>) -> u64 {
    let mut hasher = DefaultHasher::new();
    for date in dates {
        date.hash(&mut hasher);
    }
    hasher.finish()
}

/// Explicit recompute-on-demand memoization for aggregation results. Readers
/// get `Arc` snapshots; the interior mutex only guards the map itself.
#[derive(Debug, Default)]
pub struct StatsCache {
    entries: Mutex<HashMap<StatsKey, Arc<HeatData>>>,
}

impl StatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute<F>(&self, key: StatsKey, compute: F) -> Arc<HeatData>
    where
        F: FnOnce() -> HeatData,
    {
        if let Ok(entries) = self.entries.lock() {
            if let Some(found) = entries.get(&key) {
                return Arc::clone(found);
            }
        }
        let computed = Arc::new(compute());
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, Arc::clone(&computed));
        }
        computed
    }

    /// Drops entries for older dataset versions. Called after an upload so
    /// superseded datasets do not pin their stats in memory.
    pub fn retain_dataset(&self, dataset_version: u64) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.retain(|key, _| key.dataset_version == dataset_version);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::{quartile_histogram, StatsCache, StatsKey, INSTANCE_THRESHOLD};

    fn key(version: u64, activity: &str) -> StatsKey {
        StatsKey {
            dataset_version: version,
            store_revision: 1,
            activity: activity.to_string(),
            show_instances: false,
            use_combined_regions: false,
            filter_fingerprint: 0,
        }
    }

    #[test]
    fn histogram_boundaries_come_from_quartile_indices() {
        let mut samples = vec![6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0];
        let buckets = quartile_histogram(&mut samples);
        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[0].lower, INSTANCE_THRESHOLD);
        assert_eq!(buckets[0].upper, Some(8.0));
        assert_eq!(buckets[1].upper, Some(10.0));
        assert_eq!(buckets[2].upper, Some(12.0));
        assert_eq!(buckets[3].upper, None);
        let total: usize = buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, 8);
    }

    #[test]
    fn histogram_collapses_boundaries_on_sparse_data() {
        let mut samples = vec![6.0, 6.0];
        let buckets = quartile_histogram(&mut samples);
        assert_eq!(buckets.len(), 4);
        // All three quartile boundaries collapse onto 6.0; everything lands
        // in the first closed bucket.
        assert_eq!(buckets[0].count, 2);
        let total: usize = buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn histogram_of_nothing_is_empty() {
        assert!(quartile_histogram(&mut Vec::new()).is_empty());
    }

    #[test]
    fn cache_computes_once_per_key() {
        let cache = StatsCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            cache.get_or_compute(key(1, "Walk"), || {
                calls += 1;
                super::HeatData::default()
            });
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn retain_dataset_evicts_stale_versions() {
        let cache = StatsCache::new();
        cache.get_or_compute(key(1, "Walk"), super::HeatData::default);
        cache.get_or_compute(key(2, "Walk"), super::HeatData::default);
        cache.retain_dataset(2);
        assert_eq!(cache.len(), 1);
    }
}
