//! Bound property access
//!
//! The only visual channel of the gesture core is one numeric property on a
//! caller-owned target. [`PropertyBinding`] pairs the target with the key so
//! every read and write of "current position" goes through the same slot.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

/// An object owning named numeric properties
pub trait PropertyTarget {
    /// Read a property. `None` when the target has no such property.
    fn get(&self, key: &str) -> Option<f64>;

    /// Write a property
    fn set(&self, key: &str, value: f64);
}

/// In-memory property target
#[derive(Default)]
pub struct PropertyBag {
    values: RefCell<FxHashMap<String, f64>>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style initial value
    pub fn with(self, key: impl Into<String>, value: f64) -> Self {
        self.values.borrow_mut().insert(key.into(), value);
        self
    }
}

impl PropertyTarget for PropertyBag {
    fn get(&self, key: &str) -> Option<f64> {
        self.values.borrow().get(key).copied()
    }

    fn set(&self, key: &str, value: f64) {
        self.values.borrow_mut().insert(key.to_string(), value);
    }
}

/// One named property on one target
#[derive(Clone)]
pub struct PropertyBinding {
    target: Rc<dyn PropertyTarget>,
    key: Rc<str>,
}

impl PropertyBinding {
    pub fn new(target: Rc<dyn PropertyTarget>, key: impl AsRef<str>) -> Self {
        Self {
            target,
            key: Rc::from(key.as_ref()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the target currently has the property
    pub fn exists(&self) -> bool {
        self.target.get(&self.key).is_some()
    }

    /// Current value; a missing property reads as 0
    pub fn get(&self) -> f64 {
        self.target.get(&self.key).unwrap_or(0.0)
    }

    pub fn set(&self, value: f64) {
        self.target.set(&self.key, value);
    }

    /// Add `delta` to the current value and return the result
    pub fn offset(&self, delta: f64) -> f64 {
        let value = self.get() + delta;
        self.set(value);
        value
    }
}

impl fmt::Debug for PropertyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBinding")
            .field("key", &self.key)
            .field("value", &self.target.get(&self.key))
            .finish()
    }
}
