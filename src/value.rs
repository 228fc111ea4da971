use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::config::{Section, conversion};
use crate::ForgeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Boolean,
    Integer,
    Float,
    String,
    Null,
    Section,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Boolean => "BOOLEAN",
            ValueType::Integer => "INTEGER",
            ValueType::Float => "FLOAT",
            ValueType::String => "STRING",
            ValueType::Null => "NULL",
            ValueType::Section => "SECTION",
        };
        f.write_str(name)
    }
}

/// What a [`Value`] currently holds.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Null,
    Section(Section),
}

impl ValueKind {
    pub fn value_type(&self) -> ValueType {
        match self {
            ValueKind::Boolean(_) => ValueType::Boolean,
            ValueKind::Integer(_) => ValueType::Integer,
            ValueKind::Float(_) => ValueType::Float,
            ValueKind::String(_) => ValueType::String,
            ValueKind::Null => ValueType::Null,
            ValueKind::Section(_) => ValueType::Section,
        }
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, ValueKind::Section(_))
    }
}

impl From<bool> for ValueKind {
    fn from(b: bool) -> Self {
        ValueKind::Boolean(b)
    }
}

impl From<i64> for ValueKind {
    fn from(n: i64) -> Self {
        ValueKind::Integer(n)
    }
}

impl From<f64> for ValueKind {
    fn from(n: f64) -> Self {
        ValueKind::Float(n)
    }
}

impl From<String> for ValueKind {
    fn from(s: String) -> Self {
        ValueKind::String(s)
    }
}

impl From<&str> for ValueKind {
    fn from(s: &str) -> Self {
        ValueKind::String(s.to_string())
    }
}

impl From<Section> for ValueKind {
    fn from(section: Section) -> Self {
        ValueKind::Section(section)
    }
}

/// Shared handle to a setting's value.
///
/// Cloning the handle aliases the value: a reference assignment installs a clone
/// of the referenced handle, so [`Value::update`] through either name is seen
/// through both. Replacing a name with [`Section::set`] only rebinds that name.
#[derive(Clone)]
pub struct Value(Rc<RefCell<ValueKind>>);

impl Value {
    pub fn new(kind: impl Into<ValueKind>) -> Self {
        Value(Rc::new(RefCell::new(kind.into())))
    }

    pub fn null() -> Self {
        Value::new(ValueKind::Null)
    }

    pub fn value_type(&self) -> ValueType {
        self.0.borrow().value_type()
    }

    /// Borrow the current contents.
    ///
    /// The borrow must be released before calling [`Value::update`] on any alias.
    pub fn kind(&self) -> Ref<'_, ValueKind> {
        self.0.borrow()
    }

    /// Snapshot of the current contents. Sections are returned as handles.
    pub fn get(&self) -> ValueKind {
        self.0.borrow().clone()
    }

    /// Replace the contents in place, changing the type if needed.
    pub fn update(&self, kind: impl Into<ValueKind>) {
        *self.0.borrow_mut() = kind.into();
    }

    pub fn as_section(&self) -> Option<Section> {
        match &*self.0.borrow() {
            ValueKind::Section(section) => Some(section.clone()),
            _ => None,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(&*self.0.borrow(), ValueKind::Section(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(&*self.0.borrow(), ValueKind::Null)
    }

    /// Whether both handles point at the same underlying value.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn as_boolean(&self) -> Result<bool, ForgeError> {
        conversion::as_boolean(&self.kind())
    }

    pub fn as_integer(&self) -> Result<i64, ForgeError> {
        conversion::as_integer(&self.kind())
    }

    pub fn as_float(&self) -> Result<f64, ForgeError> {
        conversion::as_float(&self.kind())
    }

    pub fn as_string(&self) -> Result<String, ForgeError> {
        conversion::as_string(&self.kind())
    }
}

macro_rules! value_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::new(v)
                }
            }
        )*
    };
}

value_from!(bool, i64, f64, String, &str, Section, ValueKind);

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.kind() == *other.kind()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.kind(), f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.kind() {
            ValueKind::Section(section) => match section.name() {
                Some(name) => write!(f, "<section {}>", name),
                None => f.write_str("<section>"),
            },
            kind => match conversion::as_string(kind) {
                Ok(s) => f.write_str(&s),
                Err(_) => Err(fmt::Error),
            },
        }
    }
}
