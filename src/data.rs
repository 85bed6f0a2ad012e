use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{info, warn};

/// Seating unit category. Determines fill color; `Blocked` marks structural
/// obstacles that suppress the disc and all text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableType {
    #[default]
    Normal,
    Stage,
    HeadTable,
    Blocked,
}

impl TableType {
    /// Unknown type names fall back to `Normal`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "stage" => TableType::Stage,
            "head_table" => TableType::HeadTable,
            "blocked" => TableType::Blocked,
            _ => TableType::Normal,
        }
    }
}

fn lossy_table_type<'de, D>(deserializer: D) -> Result<TableType, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.as_deref().map(TableType::from_name).unwrap_or_default())
}

fn position_from_value(value: &Value) -> Option<(i64, i64)> {
    let arr = value.as_array()?;
    if arr.len() != 2 {
        return None;
    }
    Some((arr[0].as_i64()?, arr[1].as_i64()?))
}

/// Anything but a 2-element integer array deserializes to `None`; such
/// tables are excluded from geometry and drawing, never a hard error.
fn lossy_position<'de, D>(deserializer: D) -> Result<Option<(i64, i64)>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(position_from_value))
}

fn lossy_capacity<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .unwrap_or_else(default_capacity))
}

fn default_capacity() -> i64 {
    10
}

/// One seating unit's metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct TableRecord {
    #[serde(default, deserialize_with = "lossy_position")]
    pub position: Option<(i64, i64)>,
    #[serde(default, rename = "type", deserialize_with = "lossy_table_type")]
    pub kind: TableType,
    /// Used by external occupancy reporting, not by the renderer.
    #[serde(default = "default_capacity", deserialize_with = "lossy_capacity")]
    pub capacity: i64,
    #[serde(default, rename = "displayName")]
    pub display_name: String,
    /// Zero or more rule tokens matched by substring containment (see rules.rs).
    #[serde(default)]
    pub text_rules: String,
}

impl Default for TableRecord {
    fn default() -> Self {
        Self {
            position: None,
            kind: TableType::Normal,
            capacity: 10,
            display_name: String::new(),
            text_rules: String::new(),
        }
    }
}

/// Mapping from upper-cased table id to record for one event. Sorted key
/// order keeps render output deterministic.
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    tables: BTreeMap<String, TableRecord>,
}

impl TableSet {
    pub fn insert(&mut self, id: &str, record: TableRecord) {
        self.tables.insert(id.to_uppercase(), record);
    }

    pub fn get(&self, id: &str) -> Option<&TableRecord> {
        self.tables.get(&id.to_uppercase())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tables.contains_key(&id.to_uppercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TableRecord)> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Accepts both source shapes: a list of records carrying a `tableId`
    /// field, or a map of table id to record. Ids are upper-cased on load.
    pub fn from_json(content: &str) -> Result<Self, String> {
        let root: Value = serde_json::from_str(content)
            .map_err(|e| format!("Failed to parse table JSON: {}", e))?;

        let mut set = TableSet::default();
        match root {
            Value::Array(entries) => {
                for entry in entries {
                    let Some(id) = entry.get("tableId").and_then(Value::as_str) else {
                        warn!("table entry without a 'tableId' field ignored");
                        continue;
                    };
                    let id = id.to_string();
                    match serde_json::from_value::<TableRecord>(entry) {
                        Ok(record) => set.insert(&id, record),
                        Err(e) => warn!(table = %id, "unreadable table entry ignored: {}", e),
                    }
                }
            }
            Value::Object(entries) => {
                for (id, entry) in entries {
                    match serde_json::from_value::<TableRecord>(entry) {
                        Ok(record) => set.insert(&id, record),
                        Err(e) => warn!(table = %id, "unreadable table entry ignored: {}", e),
                    }
                }
            }
            _ => return Err("Table JSON must be an array or an object".to_string()),
        }

        info!(tables = set.len(), "loaded table set");
        Ok(set)
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read table file {}: {}", path.display(), e))?;
        Self::from_json(&content)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Guest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
}

/// Guest roster. Only the fields that feed filename derivation are read;
/// check-in bookkeeping lives with the chat layer.
#[derive(Debug, Clone, Default)]
pub struct GuestList {
    guests: Vec<Guest>,
}

impl GuestList {
    pub fn from_json(content: &str) -> Result<Self, String> {
        let guests: Vec<Guest> = serde_json::from_str(content)
            .map_err(|e| format!("Failed to parse guest JSON: {}", e))?;
        info!(guests = guests.len(), "loaded guest list");
        Ok(Self { guests })
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read guest file {}: {}", path.display(), e))?;
        Self::from_json(&content)
    }

    /// Exact-name lookup, mirroring how the chat layer resolves guests.
    pub fn category_of(&self, name: &str) -> Option<&str> {
        let lower = name.to_lowercase();
        self.guests
            .iter()
            .find(|g| g.name.to_lowercase() == lower)
            .map(|g| g.category.as_str())
    }

    /// Same-name occurrence counts across the whole roster; a count above 1
    /// marks the name as ambiguous for key derivation.
    pub fn name_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for guest in &self.guests {
            if !guest.name.is_empty() {
                *counts.entry(guest.name.clone()).or_insert(0) += 1;
            }
        }
        counts
    }
}
