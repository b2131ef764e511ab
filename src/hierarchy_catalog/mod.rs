//! The hierarchy catalog: a small keyed document mapping hierarchy names to
//! the BW objects behind them.
//!
//! Catalogs are defined in YAML or JSON with one entry per hierarchy:
//!
//! ```yaml
//! REGION:
//!   hieid: 4GK31DJZ9OPQ        # internal hierarchy id (HIEID)
//!   schema_name: SAPBW         # schema of the replicated hierarchy tables
//!   table_name: RSHIERARCHYNODES
//! ```
//!
//! The generated table takes its name from the catalog key: hierarchy
//! `REGION` produces `REGION_HIER`.

mod errors;

pub use errors::CatalogError;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Resolved location of one hierarchy instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HierarchyEntry {
    /// Internal hierarchy id scoping all rows of one instance.
    pub hieid: String,
    /// Schema holding the replicated hierarchy tables.
    pub schema_name: String,
    /// Hierarchy node table for this instance.
    pub table_name: String,
}

/// All hierarchies known to this deployment, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct HierarchyCatalog {
    entries: HashMap<String, HierarchyEntry>,
}

impl HierarchyCatalog {
    /// Load a catalog from a YAML or JSON file, chosen by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Err(CatalogError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let entries: HashMap<String, HierarchyEntry> = serde_json::from_str(content)?;
        Ok(Self { entries })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        let entries: HashMap<String, HierarchyEntry> = serde_yaml::from_str(content)?;
        Ok(Self { entries })
    }

    /// Look up a hierarchy by name. Unknown names are a configuration error
    /// and surface immediately.
    pub fn resolve(&self, hierarchy: &str) -> Result<&HierarchyEntry, CatalogError> {
        self.entries
            .get(hierarchy)
            .ok_or_else(|| CatalogError::UnknownHierarchy(hierarchy.to_string()))
    }
}

/// Name of the generated table for a hierarchy.
pub fn generated_table_name(hierarchy: &str) -> String {
    format!("{}_HIER", hierarchy).to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const YAML: &str = "\
REGION:
  hieid: 4GK31DJZ9OPQ
  schema_name: SAPBW
  table_name: RSHIERARCHYNODES
COSTCENTER:
  hieid: 9QX00TRL2ABC
  schema_name: SAPBW
  table_name: /BIC/HCOSTCENTER
";

    const JSON: &str = r#"{
  "REGION": {
    "hieid": "4GK31DJZ9OPQ",
    "schema_name": "SAPBW",
    "table_name": "RSHIERARCHYNODES"
  }
}"#;

    #[test]
    fn resolves_entry_from_yaml() {
        let catalog = HierarchyCatalog::from_yaml_str(YAML).unwrap();
        let entry = catalog.resolve("COSTCENTER").unwrap();
        assert_eq!(entry.hieid, "9QX00TRL2ABC");
        assert_eq!(entry.table_name, "/BIC/HCOSTCENTER");
    }

    #[test]
    fn resolves_entry_from_json() {
        let catalog = HierarchyCatalog::from_json_str(JSON).unwrap();
        assert_eq!(catalog.resolve("REGION").unwrap().schema_name, "SAPBW");
    }

    #[test]
    fn unknown_hierarchy_is_an_error() {
        let catalog = HierarchyCatalog::from_yaml_str(YAML).unwrap();
        assert!(matches!(
            catalog.resolve("PROFITCENTER"),
            Err(CatalogError::UnknownHierarchy(name)) if name == "PROFITCENTER"
        ));
    }

    #[test]
    fn loads_from_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("hierarchies.yaml");
        fs::write(&yaml_path, YAML).unwrap();
        assert!(HierarchyCatalog::from_file(&yaml_path).unwrap().resolve("REGION").is_ok());

        let json_path = dir.path().join("hierarchies.json");
        let mut file = fs::File::create(&json_path).unwrap();
        file.write_all(JSON.as_bytes()).unwrap();
        assert!(HierarchyCatalog::from_file(&json_path).unwrap().resolve("REGION").is_ok());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hierarchies.toml");
        fs::write(&path, "").unwrap();
        assert!(matches!(
            HierarchyCatalog::from_file(&path),
            Err(CatalogError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn generated_table_name_upper_cases_with_suffix() {
        assert_eq!(generated_table_name("region"), "REGION_HIER");
        assert_eq!(generated_table_name("CostCenter"), "COSTCENTER_HIER");
        assert_eq!(generated_table_name("REGION"), "REGION_HIER");
    }
}
