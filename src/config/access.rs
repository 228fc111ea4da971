use super::*;
use crate::ForgeError;

impl Section {
    /// Walk a dotted path (`a.b.c`) from this section.
    ///
    /// Every segment but the last must name a section. Errors carry the part
    /// of the path that was visited successfully and no source position.
    ///
    /// # Examples
    /// ```
    /// # use forge_cfg::parse_str;
    /// let root = parse_str("server { port = 8080; }").unwrap();
    /// let port = root.resolve("server.port").unwrap();
    /// assert_eq!(port.as_integer().unwrap(), 8080);
    /// ```
    pub fn resolve(&self, path: &str) -> Result<Value, ForgeError> {
        let segments: Vec<&str> = path.split('.').collect();
        self.resolve_segments(&segments)
    }

    pub fn resolve_segments<S: AsRef<str>>(&self, segments: &[S]) -> Result<Value, ForgeError> {
        let reference = segments
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(".");

        let mut current = Value::new(ValueKind::Section(self.clone()));
        let mut visited: Vec<&str> = Vec::new();

        for segment in segments {
            let segment = segment.as_ref();
            let section = current.as_section().ok_or_else(|| ForgeError::ReferenceType {
                reference: reference.clone(),
                visited: visited.join("."),
                found: current.value_type(),
                origin: None,
                line: 0,
                column: 0,
            })?;

            current = section.get(segment).ok_or_else(|| ForgeError::ReferenceMissing {
                reference: reference.clone(),
                visited: visited.join("."),
                key: segment.to_string(),
                origin: None,
                line: 0,
                column: 0,
            })?;
            visited.push(segment);
        }

        Ok(current)
    }

    /// Whether a dotted path resolves.
    pub fn has(&self, path: &str) -> bool {
        self.resolve(path).is_ok()
    }

    /// Resolve a dotted path and convert it with `TryFrom<Value>`.
    ///
    /// # Examples
    /// ```
    /// # use forge_cfg::parse_str;
    /// let root = parse_str("debug = 1; name = null;").unwrap();
    /// let debug: bool = root.get_as("debug").unwrap();
    /// let name: Option<String> = root.get_as("name").unwrap();
    /// assert!(debug);
    /// assert_eq!(name, None);
    /// ```
    pub fn get_as<T>(&self, path: &str) -> Result<T, ForgeError>
    where
        T: TryFrom<Value, Error = ForgeError>,
    {
        T::try_from(self.resolve(path)?)
    }

    /// Like [`Section::get_as`], falling back to `default` on any error.
    pub fn get_or<T>(&self, path: &str, default: T) -> T
    where
        T: TryFrom<Value, Error = ForgeError>,
    {
        self.get_as(path).unwrap_or(default)
    }

    pub fn get_boolean(&self, path: &str) -> Result<bool, ForgeError> {
        let value = self.resolve(path)?;
        // A section is always truthy
        if value.is_section() {
            return Ok(true);
        }
        value.as_boolean()
    }

    pub fn get_integer(&self, path: &str) -> Result<i64, ForgeError> {
        self.resolve(path)?.as_integer()
    }

    pub fn get_float(&self, path: &str) -> Result<f64, ForgeError> {
        self.resolve(path)?.as_float()
    }

    pub fn get_string(&self, path: &str) -> Result<String, ForgeError> {
        self.resolve(path)?.as_string()
    }

    pub fn get_section(&self, path: &str) -> Result<Section, ForgeError> {
        self.get_as(path)
    }

    pub fn set_boolean(&self, name: &str, value: bool) {
        self.set_primitive(name, ValueKind::Boolean(value));
    }

    pub fn set_integer(&self, name: &str, value: i64) {
        self.set_primitive(name, ValueKind::Integer(value));
    }

    pub fn set_float(&self, name: &str, value: f64) {
        self.set_primitive(name, ValueKind::Float(value));
    }

    pub fn set_string(&self, name: &str, value: impl Into<String>) {
        self.set_primitive(name, ValueKind::String(value.into()));
    }

    pub fn set_null(&self, name: &str) {
        self.set_primitive(name, ValueKind::Null);
    }

    /// Update an existing primitive in place, so aliases see the change.
    /// Sections and missing keys get a fresh value instead.
    fn set_primitive(&self, name: &str, kind: ValueKind) {
        match self.get(name) {
            Some(current) if !current.is_section() => current.update(kind),
            _ => self.set(name, Value::new(kind)),
        }
    }
}
