//! In-memory user repository for tests and headless composition.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::domain::{EmailAddress, UserAccount, UserId};
use crate::identity::ports::{UserRepository, UserRepositoryError, UserRepositoryResult};
use crate::page::{Page, PageRequest};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<InMemoryUserState>>,
}

#[derive(Debug, Default)]
struct InMemoryUserState {
    accounts: HashMap<UserId, UserAccount>,
    email_index: HashMap<EmailAddress, UserId>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> UserRepositoryError {
    UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, account: &UserAccount) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.accounts.contains_key(&account.id()) {
            return Err(UserRepositoryError::DuplicateUser(account.id()));
        }
        if state.email_index.contains_key(account.email()) {
            return Err(UserRepositoryError::DuplicateEmail(account.email().clone()));
        }

        state.email_index.insert(account.email().clone(), account.id());
        state.accounts.insert(account.id(), account.clone());
        Ok(())
    }

    async fn update(&self, account: &UserAccount) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;

        let previous = state
            .accounts
            .get(&account.id())
            .ok_or(UserRepositoryError::NotFound(account.id()))?
            .clone();

        if previous.email() != account.email() {
            if state.email_index.contains_key(account.email()) {
                return Err(UserRepositoryError::DuplicateEmail(account.email().clone()));
            }
            state.email_index.remove(previous.email());
            state.email_index.insert(account.email().clone(), account.id());
        }

        state.accounts.insert(account.id(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<UserAccount>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.accounts.get(&id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> UserRepositoryResult<Option<UserAccount>> {
        let state = self.state.read().map_err(poisoned)?;
        let account = state
            .email_index
            .get(email)
            .and_then(|id| state.accounts.get(id))
            .cloned();
        Ok(account)
    }

    async fn list(&self, page: PageRequest) -> UserRepositoryResult<Page<UserAccount>> {
        let state = self.state.read().map_err(poisoned)?;

        let mut accounts: Vec<UserAccount> = state.accounts.values().cloned().collect();
        accounts.sort_by_key(|account| (account.created_at(), account.id().into_inner()));

        let total = accounts.len() as u64;
        let items = accounts
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.size() as usize)
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn list_active_technicians(&self) -> UserRepositoryResult<Vec<UserAccount>> {
        let state = self.state.read().map_err(poisoned)?;

        let mut technicians: Vec<UserAccount> = state
            .accounts
            .values()
            .filter(|account| account.is_active_technician())
            .cloned()
            .collect();
        technicians.sort_by_key(|account| (account.created_at(), account.id().into_inner()));
        Ok(technicians)
    }
}
