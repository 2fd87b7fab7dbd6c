use async_trait::async_trait;
use thiserror::Error;

use crate::users::model::User;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email is already registered")]
    DuplicateEmail,
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Durable mapping from email to [`User`]. Emails are normalized to
/// lower-case before they reach the store, so lookups are exact-match.
///
/// `update` is the only write path for existing records: the whole
/// read-modify-write runs under a per-record write serialization (row lock
/// or store mutex), so two concurrent toggles against the same user cannot
/// lose updates.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Persists a new record, failing with [`StoreError::DuplicateEmail`]
    /// when the email is taken.
    async fn create(&self, user: User) -> Result<User, StoreError>;

    /// Applies `apply` to the stored record and persists the result,
    /// returning the updated record. [`StoreError::NotFound`] when the email
    /// does not resolve.
    async fn update(
        &self,
        email: &str,
        apply: &(dyn for<'a> Fn(&'a mut User) + Send + Sync),
    ) -> Result<User, StoreError>;
}
