//! In-memory action log for tests and headless composition.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::audit::domain::{ActionLogEntry, ActionLogId};
use crate::audit::ports::{
    ActionLogQuery, ActionLogRepository, ActionLogRepositoryError, ActionLogRepositoryResult,
};
use crate::page::{Page, PageRequest};

/// Thread-safe in-memory action log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActionLog {
    entries: Arc<RwLock<Vec<ActionLogEntry>>>,
}

impl InMemoryActionLog {
    /// Creates an empty in-memory action log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> ActionLogRepositoryError {
    ActionLogRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ActionLogRepository for InMemoryActionLog {
    async fn append(&self, entry: &ActionLogEntry) -> ActionLogRepositoryResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        if entries.iter().any(|existing| existing.id() == entry.id()) {
            return Err(ActionLogRepositoryError::DuplicateEntry(entry.id()));
        }
        entries.push(entry.clone());
        Ok(())
    }

    async fn list(
        &self,
        query: &ActionLogQuery,
        page: PageRequest,
    ) -> ActionLogRepositoryResult<Page<ActionLogEntry>> {
        let entries = self.entries.read().map_err(poisoned)?;

        let mut matching: Vec<ActionLogEntry> = entries
            .iter()
            .filter(|entry| query.matches(entry))
            .cloned()
            .collect();
        // Newest first; id breaks ties for stable pagination.
        matching.sort_by_key(|entry| {
            (
                std::cmp::Reverse(entry.recorded_at()),
                entry.id().into_inner(),
            )
        });

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.size() as usize)
            .collect();
        Ok(Page::new(items, total, page))
    }
}
