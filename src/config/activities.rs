//! Activity catalog loading.
//!
//! Two layouts are accepted:
//!
//! ```json
//! { "Chess": 2, "Drama": 3 }
//! ```
//!
//! ```toml
//! [[activity]]
//! name = "Chess"
//! capacity = 2
//! ```
//!
//! In both cases file order becomes catalog order.

use crate::domain::model::ActivityCatalog;
use crate::utils::error::{AllocError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub name: String,
    pub capacity: i64,
}

#[derive(Debug, Deserialize)]
struct ActivityFile {
    #[serde(default)]
    activity: Vec<ActivityEntry>,
}

pub fn catalog_from_entries(entries: &[ActivityEntry]) -> Result<ActivityCatalog> {
    ActivityCatalog::new(entries.iter().map(|e| (e.name.clone(), e.capacity)))
}

pub fn catalog_from_json_str(content: &str) -> Result<ActivityCatalog> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let serde_json::Value::Object(map) = value else {
        return Err(AllocError::config(
            "activity file must contain a JSON object mapping activity names to integer capacities",
        ));
    };

    let mut entries = Vec::with_capacity(map.len());
    for (name, capacity) in map {
        let capacity = capacity
            .as_i64()
            .ok_or_else(|| AllocError::InvalidConfigValueError {
                field: format!("activities.{}", name),
                value: capacity.to_string(),
                reason: "Capacity must be a positive integer".to_string(),
            })?;
        entries.push((name, capacity));
    }

    ActivityCatalog::new(entries)
}

pub fn catalog_from_toml_str(content: &str) -> Result<ActivityCatalog> {
    let file: ActivityFile = toml::from_str(content)?;
    catalog_from_entries(&file.activity)
}

/// 依副檔名決定格式 (.json / .toml)
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<ActivityCatalog> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;

    let catalog = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => catalog_from_json_str(&content)?,
        Some("toml") => catalog_from_toml_str(&content)?,
        _ => {
            return Err(AllocError::InvalidConfigValueError {
                field: "activities".to_string(),
                value: path.display().to_string(),
                reason: "Activity file must end in .json or .toml".to_string(),
            })
        }
    };

    tracing::debug!(
        "Loaded {} activities ({} slots) from {}",
        catalog.len(),
        catalog.total_capacity(),
        path.display()
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_json_keeps_file_order() {
        let catalog = catalog_from_json_str(r#"{ "Zumba": 1, "Art": 2, "Chess": 3 }"#).unwrap();
        let names: Vec<&str> = catalog.activities().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Zumba", "Art", "Chess"]);
    }

    #[test]
    fn test_json_rejects_bad_capacities() {
        assert!(catalog_from_json_str(r#"{ "Art": 0 }"#).is_err());
        assert!(catalog_from_json_str(r#"{ "Art": -3 }"#).is_err());
        assert!(catalog_from_json_str(r#"{ "Art": 1.5 }"#).is_err());
        assert!(catalog_from_json_str(r#"{ "Art": "2" }"#).is_err());
        assert!(catalog_from_json_str(r#"[1, 2]"#).is_err());
        assert!(catalog_from_json_str("{}").is_err());
    }

    #[test]
    fn test_toml_tables() {
        let catalog = catalog_from_toml_str(
            r#"
[[activity]]
name = "Chess"
capacity = 2

[[activity]]
name = "Drama"
capacity = 1
"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.position("drama"), Some(1));
    }

    #[test]
    fn test_load_catalog_by_extension() {
        let mut json = NamedTempFile::with_suffix(".json").unwrap();
        json.write_all(br#"{ "Chess": 2 }"#).unwrap();
        assert_eq!(load_catalog(json.path()).unwrap().total_capacity(), 2);

        let mut txt = NamedTempFile::with_suffix(".txt").unwrap();
        txt.write_all(br#"{ "Chess": 2 }"#).unwrap();
        assert!(load_catalog(txt.path()).is_err());
    }
}
