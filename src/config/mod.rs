// Author: Dustin Pilgrim
// License: MIT

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::value::{Value, ValueKind};

mod access;
pub mod conversion;

/// A named group of settings; the document root is the anonymous section.
///
/// `Section` is a handle: clones refer to the same section. Entries keep their
/// insertion order and a key appears at most once, later writes win.
#[derive(Clone)]
pub struct Section {
    inner: Rc<RefCell<SectionInner>>,
}

struct SectionInner {
    name: Option<String>,
    parent: Weak<RefCell<SectionInner>>,
    values: IndexMap<String, Value>,
}

impl Section {
    /// Create an anonymous section with no parent, as used for a document root.
    pub fn new() -> Self {
        Section {
            inner: Rc::new(RefCell::new(SectionInner {
                name: None,
                parent: Weak::new(),
                values: IndexMap::new(),
            })),
        }
    }

    fn child_of(parent: &Section, name: &str) -> Self {
        Section {
            inner: Rc::new(RefCell::new(SectionInner {
                name: Some(name.to_string()),
                parent: Rc::downgrade(&parent.inner),
                values: IndexMap::new(),
            })),
        }
    }

    pub fn name(&self) -> Option<String> {
        self.inner.borrow().name.clone()
    }

    /// The section this one was declared in. `None` for the root, or once the
    /// enclosing section has been dropped.
    pub fn parent(&self) -> Option<Section> {
        self.inner
            .borrow()
            .parent
            .upgrade()
            .map(|inner| Section { inner })
    }

    pub fn has_parent(&self) -> bool {
        self.parent().is_some()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.inner.borrow().values.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.borrow().values.contains_key(name)
    }

    /// Bind `name` to `value`, replacing any previous binding.
    ///
    /// The previous value object is left untouched, so aliases of it keep
    /// their old contents. Binding a section that contains this one creates
    /// a cycle and is not supported.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.inner.borrow_mut().values.insert(name.into(), value.into());
    }

    /// Remove a binding, keeping the order of the remaining entries.
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.inner.borrow_mut().values.shift_remove(name)
    }

    /// Create an empty child section and bind it under `name`.
    pub fn add_section(&self, name: &str) -> Section {
        let child = Section::child_of(self, name);
        self.set(name, Value::new(ValueKind::Section(child.clone())));
        child
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().values.keys().cloned().collect()
    }

    pub fn entries(&self) -> Vec<(String, Value)> {
        self.inner
            .borrow()
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().values.is_empty()
    }

    /// Whether both handles refer to the same section.
    pub fn ptr_eq(&self, other: &Section) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Section {
    fn default() -> Self {
        Section::new()
    }
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.inner.borrow().values == other.inner.borrow().values
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Section")
            .field("name", &inner.name)
            .field("values", &inner.values)
            .finish()
    }
}
