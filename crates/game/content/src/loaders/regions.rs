//! Region spawn table loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// A region and the mob ids that spawn there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub name: String,
    pub mobs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionTable {
    pub regions: Vec<RegionSpec>,
}

/// Loader for the region table from RON files.
pub struct RegionLoader;

impl RegionLoader {
    /// Load the region table as `(region, mob ids)` pairs.
    pub fn load(path: &Path) -> LoadResult<Vec<(String, Vec<String>)>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<(String, Vec<String>)>> {
        let table: RegionTable = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse region table RON: {}", e))?;

        Ok(table
            .regions
            .into_iter()
            .map(|region| (region.name, region.mobs))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_regions_in_order() {
        let regions = RegionLoader::parse(
            r#"(regions: [
                (name: "Settlement of Klesva", mobs: ["Krets"]),
                (name: "King's Tomb", mobs: ["Aggressive Krets", "Skeleton"]),
            ])"#,
        )
        .unwrap();
        assert_eq!(regions[0].0, "Settlement of Klesva");
        assert_eq!(regions[1].1, ["Aggressive Krets", "Skeleton"]);
    }
}
