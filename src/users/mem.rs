use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::users::{
    model::User,
    store::{StoreError, UserStore},
};

/// In-memory [`UserStore`] for tests and database-less local runs. The
/// single mutex serializes every read-modify-write, which already satisfies
/// the per-record discipline the trait requires.
pub struct MemStore {
    users: Mutex<HashMap<String, User>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().await.get(email).cloned())
    }

    async fn create(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.lock().await;
        if users.contains_key(&user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn update(
        &self,
        email: &str,
        apply: &(dyn for<'a> Fn(&'a mut User) + Send + Sync),
    ) -> Result<User, StoreError> {
        let mut users = self.users.lock().await;
        let user = users.get_mut(email).ok_or(StoreError::NotFound)?;
        apply(user);
        Ok(user.clone())
    }
}
