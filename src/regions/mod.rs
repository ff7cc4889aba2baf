pub mod persist;
pub mod store;

pub use store::{CombinationError, RegionCombination, RegionSnapshot, RegionStore};
