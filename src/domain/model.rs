use crate::utils::error::{AllocError, Result};
use crate::utils::validation::validate_capacity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 活動名稱正規化：去掉前後空白並轉小寫
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Name as configured, used in every report.
    pub name: String,
    /// Normalized name used for matching preference tokens.
    pub key: String,
    pub capacity: usize,
}

/// Ordered, validated set of activities for one run.
///
/// Configuration order is significant: it fixes the slot (column) order fed to
/// the solver and therefore the tie-break outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCatalog {
    activities: Vec<Activity>,
    index: HashMap<String, usize>,
}

impl ActivityCatalog {
    /// Builds the catalog from `(name, capacity)` pairs in configuration order.
    ///
    /// Fails on an empty list, blank or duplicate (after normalization) names and
    /// capacities below 1.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let mut activities = Vec::new();
        let mut index = HashMap::new();

        for (name, capacity) in entries {
            let name: String = name.into();
            let key = normalize_name(&name);
            if key.is_empty() {
                return Err(AllocError::config("activity names cannot be blank"));
            }
            let capacity = validate_capacity(&name, capacity)?;
            if index.insert(key.clone(), activities.len()).is_some() {
                return Err(AllocError::config(format!(
                    "activity '{}' is configured more than once",
                    name.trim()
                )));
            }
            activities.push(Activity {
                name: name.trim().to_string(),
                key,
                capacity,
            });
        }

        if activities.is_empty() {
            return Err(AllocError::config("no activities configured"));
        }

        Ok(Self { activities, index })
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn get(&self, position: usize) -> Option<&Activity> {
        self.activities.get(position)
    }

    /// Position of an activity by normalized key.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn total_capacity(&self) -> usize {
        self.activities.iter().map(|a| a.capacity).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    /// The preference cell exactly as read, echoed back in the results table.
    pub raw_preferences: String,
    /// Normalized tokens, most preferred first.
    pub preferences: Vec<String>,
    /// The other input columns as `(header, value)`, in input order.
    #[serde(default)]
    pub extra_fields: Vec<(String, String)>,
}

impl Participant {
    pub fn new(id: impl Into<String>, raw_preferences: Option<&str>) -> Self {
        Self {
            id: id.into(),
            raw_preferences: raw_preferences.unwrap_or_default().to_string(),
            preferences: crate::core::preference::parse_preferences(raw_preferences),
            extra_fields: Vec::new(),
        }
    }

    pub fn with_extra_fields(mut self, extra_fields: Vec<(String, String)>) -> Self {
        self.extra_fields = extra_fields;
        self
    }
}

/// One unit of capacity of one activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    /// Position of the owning activity in the catalog.
    pub activity: usize,
    /// 1-based index within the activity.
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AchievedRank {
    Ranked(usize),
    /// Matched below the cost threshold but missing from the preference list.
    Unknown,
}

impl AchievedRank {
    /// Numeric form used in reports; `0` stands for [`AchievedRank::Unknown`].
    pub fn as_number(&self) -> usize {
        match self {
            AchievedRank::Ranked(rank) => *rank,
            AchievedRank::Unknown => 0,
        }
    }
}

impl fmt::Display for AchievedRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_number())
    }
}

impl Serialize for AchievedRank {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.as_number() as u64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub participant: String,
    pub activity: String,
    pub rank: AchievedRank,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityRow {
    pub activity: String,
    pub capacity: usize,
    pub filled: usize,
    pub remaining: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankRow {
    pub rank: usize,
    pub count: usize,
    pub percentage: f64,
}

/// A preference token that names no configured activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownToken {
    pub participant: String,
    pub position: usize,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationReport {
    pub assignments: Vec<Assignment>,
    pub unassigned: Vec<String>,
    pub capacity: Vec<CapacityRow>,
    pub rank_distribution: Vec<RankRow>,
    pub total_cost: i64,
    pub unknown_tokens: Vec<UnknownToken>,
}

/// 管道 transform 階段的產物：原始參與者加上配對結果
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub participants: Vec<Participant>,
    pub report: AllocationReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_keeps_configuration_order() {
        let catalog = ActivityCatalog::new(vec![("Drama", 2), ("chess", 1), ("Art ", 3)]).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.position("drama"), Some(0));
        assert_eq!(catalog.position("art"), Some(2));
        assert_eq!(catalog.get(2).unwrap().name, "Art");
        assert_eq!(catalog.total_capacity(), 6);
    }

    #[test]
    fn test_catalog_rejects_bad_configuration() {
        let empty: Vec<(String, i64)> = vec![];
        assert!(matches!(
            ActivityCatalog::new(empty),
            Err(AllocError::ConfigError { .. })
        ));
        assert!(ActivityCatalog::new(vec![("Chess", 0)]).is_err());
        assert!(ActivityCatalog::new(vec![("Chess", -1)]).is_err());
        assert!(ActivityCatalog::new(vec![("Chess", 1), ("CHESS", 2)]).is_err());
        assert!(ActivityCatalog::new(vec![("  ", 1)]).is_err());
    }

    #[test]
    fn test_rank_numbers() {
        assert_eq!(AchievedRank::Ranked(3).as_number(), 3);
        assert_eq!(AchievedRank::Unknown.as_number(), 0);
        assert_eq!(AchievedRank::Unknown.to_string(), "0");
    }
}
