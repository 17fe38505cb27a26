//! Per-file memo shared by sniffs across rounds

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Lazily computed facts about one file
///
/// A context is created fresh for every file and lives for all of that
/// file's rounds. Token indices change between rounds, so values stored
/// here must not hold any.
#[derive(Debug)]
pub struct FileContext {
    path: PathBuf,
    values: HashMap<TypeId, Box<dyn Any + Send>>,
}

impl FileContext {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            values: HashMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get<T: Any + Send>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Value of type `T`, computing it with `init` on first use
    pub fn get_or_insert_with<T, F>(&mut self, init: F) -> &mut T
    where
        T: Any + Send,
        F: FnOnce() -> T,
    {
        let value = self
            .values
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(init()));
        match value.downcast_mut::<T>() {
            Some(value) => value,
            None => unreachable!("context values are keyed by their own type"),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
