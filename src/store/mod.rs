pub mod json_store;
pub mod memory;

use thiserror::Error;

use crate::stats::schema::AllStats;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable home of the stats document.
pub trait StatsSink {
    /// Missing or unreadable data yields an empty document.
    fn load(&self) -> AllStats;

    /// All-or-nothing write of the whole document.
    fn save(&self, stats: &AllStats) -> Result<(), StoreError>;
}

impl<T: StatsSink + ?Sized> StatsSink for std::rc::Rc<T> {
    fn load(&self) -> AllStats {
        (**self).load()
    }

    fn save(&self, stats: &AllStats) -> Result<(), StoreError> {
        (**self).save(stats)
    }
}
