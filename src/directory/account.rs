//! Account records and the read-only directory consulted during reconciliation

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::types::*;
use crate::utils::validation::{validate_account_code, validate_account_name, validate_color};

/// Display information attached to an account code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Human-readable account name, the value expected in `Compte`
    pub name: String,
    /// Hex color used by the UI
    #[serde(default)]
    pub color: String,
}

impl AccountRecord {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Mapping from account code to [`AccountRecord`]
///
/// Codes are case-insensitive and stored uppercase. Entries keep the order in
/// which they were inserted (or appeared in the JSON document), which is the
/// order used when looking a code up by display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountDirectory {
    entries: Vec<(String, AccountRecord)>,
}

impl AccountDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a directory from its JSON form: `{ "CODE": { "name": .., "color": .. } }`
    ///
    /// Loading is lenient: only the document shape is enforced. An entry that
    /// [`insert`](Self::insert) would refuse is kept with a warning, since a
    /// cosmetic field such as the color has no bearing on reconciliation.
    pub fn from_json(json: &str) -> ReconcileResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ReconcileError::Directory(format!("Invalid account directory: {}", e)))
    }

    /// Encode the directory to JSON, entries in directory order
    pub fn to_json(&self) -> ReconcileResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ReconcileError::Directory(format!("Cannot encode directory: {}", e)))
    }

    /// Add or replace an account; a replaced account keeps its position
    pub fn insert(&mut self, code: &str, record: AccountRecord) -> ReconcileResult<()> {
        validate_account_code(code)?;
        validate_account_name(&record.name)?;
        validate_color(&record.color)?;

        self.upsert(code, record);
        Ok(())
    }

    /// Store an entry read from a document, warning about what `insert` refuses
    fn load_entry(&mut self, code: &str, record: AccountRecord) {
        if let Err(e) = validate_account_code(code) {
            tracing::warn!(code, "account code can never match a Source prefix: {}", e);
        } else if let Err(e) = validate_account_name(&record.name) {
            tracing::warn!(code, "account name will never match a Compte value: {}", e);
        } else if let Err(e) = validate_color(&record.color) {
            tracing::debug!(code, "account color kept as written: {}", e);
        }
        self.upsert(code, record);
    }

    fn upsert(&mut self, code: &str, record: AccountRecord) {
        let code = code.trim().to_uppercase();
        match self.entries.iter_mut().find(|(existing, _)| *existing == code) {
            Some((_, existing)) => *existing = record,
            None => self.entries.push((code, record)),
        }
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_account(
        mut self,
        code: &str,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> ReconcileResult<Self> {
        self.insert(code, AccountRecord::new(name, color))?;
        Ok(self)
    }

    /// Look up an account by code, ignoring case
    pub fn get(&self, code: &str) -> Option<&AccountRecord> {
        let code = code.trim().to_uppercase();
        self.entries
            .iter()
            .find(|(existing, _)| *existing == code)
            .map(|(_, record)| record)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Reverse lookup: the code of the first account named `name`
    ///
    /// When several codes share a display name the earliest entry wins.
    pub fn find_code_by_name(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, record)| record.name == name)
            .map(|(code, _)| code.as_str())
    }

    /// Iterate over `(code, record)` in directory order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AccountRecord)> {
        self.entries
            .iter()
            .map(|(code, record)| (code.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for AccountDirectory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (code, record) in &self.entries {
            map.serialize_entry(code, record)?;
        }
        map.end()
    }
}

struct DirectoryVisitor;

impl<'de> Visitor<'de> for DirectoryVisitor {
    type Value = AccountDirectory;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of account codes to { name, color }")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut directory = AccountDirectory::new();
        while let Some((code, record)) = access.next_entry::<String, AccountRecord>()? {
            directory.load_entry(&code, record);
        }
        Ok(directory)
    }
}

impl<'de> Deserialize<'de> for AccountDirectory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DirectoryVisitor)
    }
}
