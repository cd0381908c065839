//! User repository.

use super::Repository;
use crate::error::{Result, StoreError};
use crate::gateway::{LoadReport, RecordStore};
use crate::types::{User, is_valid_email};
use std::sync::Arc;
use tracing::debug;

/// Minimum password length accepted by [`UserRepository::signup`].
pub const MIN_PASSWORD_LEN: usize = 4;

/// Registered users, in registration order.
///
/// Usernames are unique and matched exactly (case-sensitive).
pub struct UserRepository {
    inner: Repository<User>,
}

impl UserRepository {
    /// Load users from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the store cannot be read.
    pub fn open(store: Arc<dyn RecordStore<User>>, max_users: usize) -> Result<Self> {
        Ok(Self {
            inner: Repository::open(store, max_users)?,
        })
    }

    /// Register a user (administrative add).
    ///
    /// # Errors
    ///
    /// - [`StoreError::CapacityExceeded`] when the user limit is reached
    /// - [`StoreError::InvalidArgument`] for a blank username or malformed email
    /// - [`StoreError::UsernameTaken`] when the username exists
    /// - [`StoreError::Persistence`] if the save fails (the user stays added)
    pub fn add(&mut self, username: &str, password: &str, email: &str) -> Result<()> {
        self.inner.ensure_room()?;
        if username.trim().is_empty() {
            return Err(StoreError::InvalidArgument(
                "username must not be empty".to_string(),
            ));
        }
        if self.find_by_username(username).is_some() {
            return Err(StoreError::UsernameTaken(username.to_string()));
        }
        if !is_valid_email(email) {
            return Err(StoreError::InvalidArgument(format!(
                "invalid email format: {email}"
            )));
        }

        self.inner.push(User::new(username, password, email));
        debug!(username, "User added");
        self.inner.flush()
    }

    /// Self-service registration: [`add`](Self::add) plus a password of at
    /// least [`MIN_PASSWORD_LEN`] characters.
    ///
    /// # Errors
    ///
    /// As [`add`](Self::add), plus [`StoreError::InvalidArgument`] for a short
    /// password.
    pub fn signup(&mut self, username: &str, password: &str, email: &str) -> Result<()> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(StoreError::InvalidArgument(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        self.add(username, password, email)
    }

    /// Remove the user at `index`; later users shift down one place.
    ///
    /// # Errors
    ///
    /// - [`StoreError::IndexOutOfRange`] for an invalid index
    /// - [`StoreError::Persistence`] if the save fails (the user stays removed)
    pub fn delete(&mut self, index: usize) -> Result<User> {
        let user = self.inner.remove(index)?;
        debug!(username = %user.username, index, "User deleted");
        self.inner.flush()?;
        Ok(user)
    }

    /// First user whose username matches exactly.
    #[must_use]
    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.inner.iter().find(|user| user.username == username)
    }

    /// The user matching both username and password.
    #[must_use]
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&User> {
        self.find_by_username(username)
            .filter(|user| user.password == password)
    }

    /// Email address registered for `username`.
    #[must_use]
    pub fn email_of(&self, username: &str) -> Option<&str> {
        self.find_by_username(username).map(|user| user.email.as_str())
    }

    /// All users in registration order
    #[must_use]
    pub fn list(&self) -> &[User] {
        self.inner.list()
    }

    /// User at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&User> {
        self.inner.get(index)
    }

    /// Number of users
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether no user is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Retry saving the current users.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the save fails again.
    pub fn flush(&self) -> Result<()> {
        self.inner.flush()
    }

    /// What happened when users were loaded
    #[must_use]
    pub const fn load_report(&self) -> LoadReport {
        self.inner.load_report()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::repository::test_support::MemoryStore;

    fn empty_repo(max_users: usize) -> (Arc<MemoryStore>, UserRepository) {
        let store = MemoryStore::with_text("");
        let repo = UserRepository::open(store.clone(), max_users).unwrap();
        (store, repo)
    }

    #[test]
    fn test_add_then_duplicate() {
        let (store, mut repo) = empty_repo(10);
        repo.add("alice", "pw123", "a@b.com").unwrap();
        let error = repo.add("alice", "other", "x@y.com").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Duplicate);
        assert_eq!(repo.len(), 1);
        assert_eq!(store.text(), "alice,pw123,a@b.com\n");
    }

    #[test]
    fn test_usernames_are_case_sensitive() {
        let (_, mut repo) = empty_repo(10);
        repo.add("alice", "pw123", "a@b.com").unwrap();
        repo.add("Alice", "pw123", "a@b.com").unwrap();
        assert_eq!(repo.len(), 2);
        assert!(repo.find_by_username("ALICE").is_none());
    }

    #[test]
    fn test_add_validates_fields() {
        let (store, mut repo) = empty_repo(10);
        assert_eq!(
            repo.add("", "pw123", "a@b.com").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            repo.add("carol", "pw123", "carol-at-example").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert!(repo.is_empty());
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn test_signup_requires_password_length() {
        let (_, mut repo) = empty_repo(10);
        assert!(matches!(
            repo.signup("dave", "abc", "d@e.com"),
            Err(StoreError::InvalidArgument(_))
        ));
        repo.signup("dave", "abcd", "d@e.com").unwrap();
        assert_eq!(repo.email_of("dave"), Some("d@e.com"));
    }

    #[test]
    fn test_capacity_limit() {
        let (_, mut repo) = empty_repo(1);
        repo.add("alice", "pw123", "a@b.com").unwrap();
        assert!(matches!(
            repo.add("bob", "pw123", "b@c.com"),
            Err(StoreError::CapacityExceeded { max: 1, .. })
        ));
    }

    #[test]
    fn test_authenticate() {
        let (_, mut repo) = empty_repo(10);
        repo.add("alice", "pw123", "a@b.com").unwrap();
        assert!(repo.authenticate("alice", "pw123").is_some());
        assert!(repo.authenticate("alice", "wrong").is_none());
        assert!(repo.authenticate("bob", "pw123").is_none());
    }

    #[test]
    fn test_delete_shifts_and_saves() {
        let (store, mut repo) = empty_repo(10);
        repo.add("a", "pass", "a@b.com").unwrap();
        repo.add("b", "pass", "b@b.com").unwrap();
        repo.add("c", "pass", "c@b.com").unwrap();

        let removed = repo.delete(0).unwrap();
        assert_eq!(removed.username, "a");
        assert_eq!(repo.get(0).map(|u| u.username.as_str()), Some("b"));
        assert_eq!(store.text(), "b,pass,b@b.com\nc,pass,c@b.com\n");
        assert!(matches!(
            repo.delete(5),
            Err(StoreError::IndexOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_failed_save_keeps_user() {
        let (store, mut repo) = empty_repo(10);
        store.fail_saves(true);
        let error = repo.add("alice", "pw123", "a@b.com").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::PersistenceFailure);
        assert!(repo.find_by_username("alice").is_some());

        store.fail_saves(false);
        repo.flush().unwrap();
        assert_eq!(store.text(), "alice,pw123,a@b.com\n");
    }
}
