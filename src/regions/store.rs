use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// A user-defined merge of two or more named regions into one aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCombination {
    pub name: String,
    pub regions: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CombinationError {
    #[error("combination name must not be empty")]
    EmptyName,
    #[error("a combination needs at least 2 regions")]
    TooFewRegions,
    #[error("a combination named {0:?} already exists")]
    DuplicateName(String),
    #[error("region {region:?} already belongs to combination {owner:?}")]
    RegionClaimed { region: String, owner: String },
    #[error("no combination named {0:?} to update")]
    UnknownCombination(String),
}

/// Immutable view of the store handed to aggregation and rendering. Rebuilt
/// on every successful mutation so concurrent readers (several heatmap
/// panels) always see a consistent state between renders.
#[derive(Debug, Default)]
pub struct RegionSnapshot {
    pub combinations: Vec<RegionCombination>,
    pub excluded: HashSet<String>,
    /// Region name to owning combination name.
    owners: HashMap<String, String>,
    pub revision: u64,
}

impl RegionSnapshot {
    /// The display name a raw region aggregates under: its combination if it
    /// has one, otherwise itself.
    pub fn resolve<'a>(&'a self, region: &'a str) -> &'a str {
        self.owners.get(region).map(String::as_str).unwrap_or(region)
    }

    pub fn is_excluded(&self, region: &str) -> bool {
        self.excluded.contains(region)
    }

    pub fn combination(&self, name: &str) -> Option<&RegionCombination> {
        self.combinations.iter().find(|c| c.name == name)
    }
}

/// Holds the user-defined region combinations and the excluded-region set.
/// Owned by the app session and passed by handle into computation; mutations
/// go through validated setters that refuse to leave partial state behind.
#[derive(Debug)]
pub struct RegionStore {
    combinations: Vec<RegionCombination>,
    excluded: HashSet<String>,
    revision: u64,
    snapshot: Arc<RegionSnapshot>,
}

impl Default for RegionStore {
    fn default() -> Self {
        Self::new(Vec::new(), HashSet::new())
    }
}

impl RegionStore {
    pub fn new(combinations: Vec<RegionCombination>, excluded: HashSet<String>) -> Self {
        let mut store = Self {
            combinations,
            excluded,
            revision: 0,
            snapshot: Arc::new(RegionSnapshot::default()),
        };
        store.rebuild_snapshot();
        store
    }

    pub fn combinations(&self) -> &[RegionCombination] {
        &self.combinations
    }

    pub fn excluded(&self) -> &HashSet<String> {
        &self.excluded
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Cheap copy-on-write handle; cloning the `Arc`, not the contents.
    pub fn snapshot(&self) -> Arc<RegionSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn add_combination(
        &mut self,
        name: &str,
        regions: Vec<String>,
    ) -> Result<(), CombinationError> {
        self.validate(name, &regions, None)?;
        self.combinations.push(RegionCombination {
            name: name.trim().to_string(),
            regions,
        });
        self.rebuild_snapshot();
        Ok(())
    }

    /// Same validation as add, except the combination being edited is exempt
    /// from conflicts with itself so names and members can be reassigned.
    pub fn update_combination(
        &mut self,
        old_name: &str,
        new_name: &str,
        regions: Vec<String>,
    ) -> Result<(), CombinationError> {
        if !self.combinations.iter().any(|c| c.name == old_name) {
            return Err(CombinationError::UnknownCombination(old_name.to_string()));
        }
        self.validate(new_name, &regions, Some(old_name))?;
        for combination in &mut self.combinations {
            if combination.name == old_name {
                combination.name = new_name.trim().to_string();
                combination.regions = regions;
                break;
            }
        }
        self.rebuild_snapshot();
        Ok(())
    }

    /// Removal is idempotent; deleting an absent name is a no-op.
    pub fn remove_combination(&mut self, name: &str) {
        let before = self.combinations.len();
        self.combinations.retain(|c| c.name != name);
        if self.combinations.len() != before {
            self.rebuild_snapshot();
        }
    }

    pub fn toggle_exclusion(&mut self, region: &str) {
        if !self.excluded.remove(region) {
            self.excluded.insert(region.to_string());
        }
        self.rebuild_snapshot();
    }

    fn validate(
        &self,
        name: &str,
        regions: &[String],
        exempt: Option<&str>,
    ) -> Result<(), CombinationError> {
        if name.trim().is_empty() {
            return Err(CombinationError::EmptyName);
        }
        if regions.len() < 2 {
            return Err(CombinationError::TooFewRegions);
        }
        let name = name.trim();
        if self
            .combinations
            .iter()
            .any(|c| c.name == name && Some(c.name.as_str()) != exempt)
        {
            return Err(CombinationError::DuplicateName(name.to_string()));
        }
        for combination in &self.combinations {
            if Some(combination.name.as_str()) == exempt {
                continue;
            }
            for region in regions {
                if combination.regions.contains(region) {
                    return Err(CombinationError::RegionClaimed {
                        region: region.clone(),
                        owner: combination.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn rebuild_snapshot(&mut self) {
        self.revision += 1;
        let mut owners = HashMap::new();
        for combination in &self.combinations {
            for region in &combination.regions {
                owners.insert(region.clone(), combination.name.clone());
            }
        }
        self.snapshot = Arc::new(RegionSnapshot {
            combinations: self.combinations.clone(),
            excluded: self.excluded.clone(),
            owners,
            revision: self.revision,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{CombinationError, RegionStore};

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolve_maps_members_and_passes_through_strangers() {
        let mut store = RegionStore::default();
        store.add_combination("AB", names(&["A", "B"])).expect("add");
        let snap = store.snapshot();
        assert_eq!(snap.resolve("A"), "AB");
        assert_eq!(snap.resolve("B"), "AB");
        assert_eq!(snap.resolve("C"), "C");
    }

    #[test]
    fn whitespace_names_are_rejected() {
        let mut store = RegionStore::default();
        assert_eq!(
            store.add_combination("   ", names(&["A", "B"])),
            Err(CombinationError::EmptyName)
        );
        assert!(store.combinations().is_empty());
    }

    #[test]
    fn single_region_combination_is_rejected() {
        let mut store = RegionStore::default();
        assert_eq!(
            store.add_combination("solo", names(&["A"])),
            Err(CombinationError::TooFewRegions)
        );
    }

    #[test]
    fn claimed_region_is_rejected_without_mutation() {
        let mut store = RegionStore::default();
        store.add_combination("AB", names(&["A", "B"])).expect("add");
        let err = store
            .add_combination("CD", names(&["B", "C"]))
            .expect_err("B is taken");
        assert_eq!(
            err,
            CombinationError::RegionClaimed {
                region: "B".to_string(),
                owner: "AB".to_string()
            }
        );
        assert_eq!(store.combinations().len(), 1);
    }

    #[test]
    fn update_allows_self_reassignment() {
        let mut store = RegionStore::default();
        store.add_combination("AB", names(&["A", "B"])).expect("add");
        store
            .update_combination("AB", "AB", names(&["A", "B", "C"]))
            .expect("same name, extra member");
        store
            .update_combination("AB", "ABC", names(&["A", "B", "C"]))
            .expect("rename");
        assert_eq!(store.combinations()[0].name, "ABC");
    }

    #[test]
    fn update_of_unknown_combination_fails() {
        let mut store = RegionStore::default();
        assert_eq!(
            store.update_combination("ghost", "new", names(&["A", "B"])),
            Err(CombinationError::UnknownCombination("ghost".to_string()))
        );
    }

    #[test]
    fn membership_stays_a_partition_across_mutations() {
        let mut store = RegionStore::default();
        store.add_combination("AB", names(&["A", "B"])).expect("add");
        store.add_combination("CD", names(&["C", "D"])).expect("add");
        let _ = store.update_combination("CD", "CD", names(&["C", "A"]));
        let _ = store.add_combination("AD", names(&["A", "D"]));
        store.remove_combination("AB");
        store.add_combination("AE", names(&["A", "E"])).expect("add");

        let snap = store.snapshot();
        let mut seen = std::collections::HashSet::new();
        for combination in &snap.combinations {
            for region in &combination.regions {
                assert!(seen.insert(region.clone()), "{region} claimed twice");
            }
        }
        let mut combo_names = std::collections::HashSet::new();
        for combination in &snap.combinations {
            assert!(combo_names.insert(combination.name.clone()));
        }
    }

    #[test]
    fn exclusion_toggles_on_and_off() {
        let mut store = RegionStore::default();
        store.toggle_exclusion("A");
        assert!(store.snapshot().is_excluded("A"));
        store.toggle_exclusion("A");
        assert!(!store.snapshot().is_excluded("A"));
    }

    #[test]
    fn snapshots_are_isolated_from_later_mutations() {
        let mut store = RegionStore::default();
        store.add_combination("AB", names(&["A", "B"])).expect("add");
        let before = store.snapshot();
        store.remove_combination("AB");
        assert_eq!(before.resolve("A"), "AB");
        assert_eq!(store.snapshot().resolve("A"), "A");
        assert!(store.snapshot().revision > before.revision);
    }
}
