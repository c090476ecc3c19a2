use std::cell::RefCell;

use crate::stats::schema::AllStats;
use crate::store::{StatsSink, StoreError};

/// Keeps the document in memory. Used for `--ephemeral` practice.
#[derive(Default)]
pub struct MemoryStore {
    saved: RefCell<Option<AllStats>>,
    saves: RefCell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stats(stats: AllStats) -> Self {
        Self {
            saved: RefCell::new(Some(stats)),
            saves: RefCell::new(0),
        }
    }

    /// Last saved document.
    pub fn snapshot(&self) -> Option<AllStats> {
        self.saved.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl StatsSink for MemoryStore {
    fn load(&self) -> AllStats {
        self.saved.borrow().clone().unwrap_or_default()
    }

    fn save(&self, stats: &AllStats) -> Result<(), StoreError> {
        *self.saved.borrow_mut() = Some(stats.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
