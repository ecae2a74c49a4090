//! View-model store: latest reading per room and datapoint

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::reading::{Reading, ReadingKey};

/// Keyed view model the dashboard renders from
///
/// Holds at most one reading per [`ReadingKey`]. Iteration follows the order
/// in which keys were first seen; overwriting a key keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    readings: Vec<Reading>,
    index: HashMap<ReadingKey, usize>,
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh store from a full set of rows; later duplicates win
    pub fn from_readings(readings: impl IntoIterator<Item = Reading>) -> Self {
        let mut store = Self::new();
        for reading in readings {
            store.upsert(reading);
        }
        store
    }

    /// Insert or overwrite the entry at the reading's key.
    /// Returns true when the key was not present before.
    pub fn upsert(&mut self, reading: Reading) -> bool {
        let key = reading.key();
        match self.index.get(&key) {
            Some(&position) => {
                self.readings[position] = reading;
                false
            }
            None => {
                self.index.insert(key, self.readings.len());
                self.readings.push(reading);
                true
            }
        }
    }

    /// Pure merge: a copy of this store with one row applied
    pub fn merged(&self, reading: Reading) -> Self {
        let mut next = self.clone();
        next.upsert(reading);
        next
    }

    /// Discard everything and rebuild from a snapshot
    pub fn replace_with(&mut self, readings: impl IntoIterator<Item = Reading>) {
        *self = Self::from_readings(readings);
    }

    pub fn get(&self, key: &ReadingKey) -> Option<&Reading> {
        self.index.get(key).map(|&position| &self.readings[position])
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Readings in store order
    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }
}

/// Shared store handle: written by the session's update queue, read by the dashboard
pub type StoreHandle = Arc<RwLock<ViewModel>>;

pub fn new_store_handle() -> StoreHandle {
    Arc::new(RwLock::new(ViewModel::new()))
}
