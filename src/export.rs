// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Number};

use crate::config::Section;
use crate::value::{Value, ValueKind};
use crate::ForgeError;

impl Section {
    /// Flatten the tree into a JSON map, keeping insertion order.
    ///
    /// Nested sections become nested objects. Floats that JSON cannot
    /// represent (NaN, infinities) export as `null`.
    ///
    /// # Examples
    /// ```
    /// # use forge_cfg::parse_str;
    /// let root = parse_str("key = \"v\"; sect { inner = 5; }").unwrap();
    /// let map = root.to_map();
    /// assert_eq!(map["sect"]["inner"], 5);
    /// ```
    pub fn to_map(&self) -> Map<String, serde_json::Value> {
        self.entries()
            .into_iter()
            .map(|(name, value)| (name, value_to_json(&value)))
            .collect()
    }

    /// Compact JSON text for the tree.
    pub fn to_json(&self) -> String {
        serde_json::Value::Object(self.to_map()).to_string()
    }

    pub fn to_json_pretty(&self) -> String {
        format!("{:#}", serde_json::Value::Object(self.to_map()))
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match &*value.kind() {
        ValueKind::Boolean(b) => serde_json::Value::Bool(*b),
        ValueKind::Integer(i) => serde_json::Value::Number((*i).into()),
        ValueKind::Float(f) => Number::from_f64(*f).map_or(serde_json::Value::Null, serde_json::Value::Number),
        ValueKind::String(s) => serde_json::Value::String(s.clone()),
        ValueKind::Null => serde_json::Value::Null,
        ValueKind::Section(section) => serde_json::Value::Object(section.to_map()),
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, value) in &entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &*self.kind() {
            ValueKind::Boolean(b) => serializer.serialize_bool(*b),
            ValueKind::Integer(i) => serializer.serialize_i64(*i),
            ValueKind::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            ValueKind::Float(_) | ValueKind::Null => serializer.serialize_unit(),
            ValueKind::String(s) => serializer.serialize_str(s),
            ValueKind::Section(section) => section.serialize(serializer),
        }
    }
}

/// Parse a configuration file and export it as pretty-printed JSON.
///
/// # Examples
/// ```no_run
/// use forge_cfg::export::export_file;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let json = export_file("app.cfg")?;
/// println!("{}", json);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
/// Returns error if the file can't be read or doesn't parse.
pub fn export_file<P: AsRef<Path>>(path: P) -> Result<String, ForgeError> {
    Ok(crate::parse_file(path)?.to_json_pretty())
}
