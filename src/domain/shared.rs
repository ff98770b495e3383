// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared sub-structures for write-path data.
//!
//! Data handed to `dump` is usually a plain tree, but callers building a model
//! incrementally sometimes alias the same section from several places. [`Shared`]
//! makes that aliasing explicit so the dump engine can tell the same structure apart
//! from an equal copy, and reject a structure that contains itself.

use serde::ser::{Error as _, Serialize, Serializer};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Newtype name the dump engine recognizes. Any other serializer sees a plain newtype.
pub(crate) const SHARED_TOKEN: &str = "$yaml_translator::Shared";

/// A reference-counted, interiorly mutable value that may appear in several places
/// of a structure, including inside itself.
///
/// # Examples
///
/// ```
/// use yaml_translator::domain::Shared;
/// use indexmap::IndexMap;
///
/// let settings = Shared::new(IndexMap::from([("Timeout".to_string(), 30)]));
/// let alias = settings.clone();
/// alias.borrow_mut().insert("Retries".to_string(), 3);
/// assert_eq!(settings.borrow().len(), 2);
/// assert!(settings.ptr_eq(&alias));
/// ```
#[derive(Debug, Default)]
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    /// Wraps a value.
    pub fn new(value: T) -> Self {
        Shared(Rc::new(RefCell::new(value)))
    }

    /// Borrows the value.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Mutably borrows the value.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Returns true if both handles point at the same value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<T: Serialize> Serialize for Shared<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let inner = self
            .0
            .try_borrow()
            .map_err(|_| S::Error::custom("shared value is mutably borrowed"))?;
        // The dump engine identifies the structure by the address of the borrowed value.
        serializer.serialize_newtype_struct(SHARED_TOKEN, &*inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_aliases_the_same_value() {
        let first = Shared::new(vec![1, 2]);
        let second = first.clone();
        second.borrow_mut().push(3);
        assert_eq!(*first.borrow(), vec![1, 2, 3]);
        assert!(first.ptr_eq(&second));
    }

    #[test]
    fn test_equal_values_are_distinct() {
        let first = Shared::new(1);
        let second = Shared::new(1);
        assert!(!first.ptr_eq(&second));
    }
}
