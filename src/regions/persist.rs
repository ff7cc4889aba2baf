use crate::regions::store::{RegionCombination, RegionStore};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const REGIONS_FILE_NAME: &str = "region_combinations.json";
const CURRENT_VERSION: u32 = 1;

/// On-disk schema. The excluded set crosses the serde boundary as a sorted
/// vector since a `HashSet` has no stable JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PersistedRegions {
    version: u32,
    combinations: Vec<RegionCombination>,
    excluded_regions: Vec<String>,
}

pub fn resolve_regions_path() -> Result<PathBuf> {
    let config_dir = dirs_next::config_dir().context("locate user config directory")?;
    Ok(config_dir.join("floorsight").join(REGIONS_FILE_NAME))
}

pub fn load() -> Result<RegionStore> {
    let path = resolve_regions_path()?;
    load_from_path(&path)
}

pub fn save(store: &RegionStore) -> Result<PathBuf> {
    let path = resolve_regions_path()?;
    save_to_path(&path, store)?;
    Ok(path)
}

pub fn load_from_path(path: &Path) -> Result<RegionStore> {
    if !path.exists() {
        return Ok(RegionStore::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read region combinations file {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(RegionStore::default());
    }

    let persisted: PersistedRegions = serde_json::from_str(&content)
        .with_context(|| format!("deserialize region combinations file {}", path.display()))?;

    if persisted.version > CURRENT_VERSION {
        tracing::warn!(
            version = persisted.version,
            "region combinations file is from a newer schema, starting empty"
        );
        return Ok(RegionStore::default());
    }

    let excluded: HashSet<String> = persisted.excluded_regions.into_iter().collect();
    Ok(RegionStore::new(persisted.combinations, excluded))
}

pub fn save_to_path(path: &Path, store: &RegionStore) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create config folder {}", parent.display()))?;
    }

    let mut excluded_regions: Vec<String> = store.excluded().iter().cloned().collect();
    excluded_regions.sort();

    let persisted = PersistedRegions {
        version: CURRENT_VERSION,
        combinations: store.combinations().to_vec(),
        excluded_regions,
    };
    let json = serde_json::to_string_pretty(&persisted)
        .context("serialize region combinations")?;
    std::fs::write(path, json)
        .with_context(|| format!("write region combinations file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::{load_from_path, save_to_path, REGIONS_FILE_NAME};
    use crate::regions::store::RegionStore;

    #[test]
    fn missing_file_loads_an_empty_store() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(REGIONS_FILE_NAME);
        let store = load_from_path(&path).expect("load");
        assert!(store.combinations().is_empty());
        assert!(store.excluded().is_empty());
    }

    #[test]
    fn round_trip_preserves_combinations_and_exclusions() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(REGIONS_FILE_NAME);

        let mut store = RegionStore::default();
        store
            .add_combination("AB", vec!["A".to_string(), "B".to_string()])
            .expect("add");
        store.toggle_exclusion("Dock");
        store.toggle_exclusion("Office");

        save_to_path(&path, &store).expect("save");
        let loaded = load_from_path(&path).expect("load");

        assert_eq!(loaded.combinations(), store.combinations());
        assert_eq!(loaded.excluded(), store.excluded());
    }

    #[test]
    fn excluded_regions_serialize_as_a_sorted_array() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(REGIONS_FILE_NAME);

        let mut store = RegionStore::default();
        store.toggle_exclusion("Zulu");
        store.toggle_exclusion("Alpha");
        save_to_path(&path, &store).expect("save");

        let content = std::fs::read_to_string(&path).expect("read");
        let value: serde_json::Value = serde_json::from_str(&content).expect("json");
        assert_eq!(value["version"], 1);
        assert_eq!(
            value["excluded_regions"],
            serde_json::json!(["Alpha", "Zulu"])
        );
    }

    #[test]
    fn newer_schema_versions_load_as_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(REGIONS_FILE_NAME);
        std::fs::write(
            &path,
            r#"{"version": 99, "combinations": [], "excluded_regions": ["A"]}"#,
        )
        .expect("write");

        let store = load_from_path(&path).expect("load");
        assert!(store.excluded().is_empty());
    }
}
