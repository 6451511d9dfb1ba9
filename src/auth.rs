//! User accounts and the credential check performed by `USER`/`PASS`.

use crate::storage::FileSystem;
use std::{collections::HashMap, fmt, sync::Arc};

/// An account that may log in, together with the file system it sees once logged in.
#[derive(Clone)]
pub struct FtpUser {
    name: String,
    password: String,
    filesystem: Arc<dyn FileSystem>,
}

impl FtpUser {
    /// Creates an account.
    pub fn new<N: Into<String>, P: Into<String>>(name: N, password: P, filesystem: Arc<dyn FileSystem>) -> Self {
        FtpUser {
            name: name.into(),
            password: password.into(),
            filesystem,
        }
    }

    /// The account name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file system this account works on
    pub fn filesystem(&self) -> Arc<dyn FileSystem> {
        Arc::clone(&self.filesystem)
    }

    /// Returns `true` if `password` is this account's password.
    pub fn verify(&self, password: &str) -> bool {
        self.password == password
    }
}

// Keeps passwords out of logs.
impl fmt::Debug for FtpUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FtpUser")
            .field("name", &self.name)
            .field("filesystem", &self.filesystem)
            .finish_non_exhaustive()
    }
}

/// The set of accounts a server accepts, looked up by exact name.
#[derive(Debug, Default)]
pub struct Accounts {
    users: HashMap<String, FtpUser>,
}

impl Accounts {
    /// Returns the account with the given name.
    pub fn get(&self, name: &str) -> Option<&FtpUser> {
        self.users.get(name)
    }

    /// Returns `true` if an account with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.users.contains_key(name)
    }

    /// The number of accounts
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if there are no accounts.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl FromIterator<FtpUser> for Accounts {
    fn from_iter<I: IntoIterator<Item = FtpUser>>(iter: I) -> Self {
        Accounts {
            users: iter.into_iter().map(|user| (user.name.clone(), user)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryFileSystem;
    use pretty_assertions::assert_eq;

    #[test]
    fn lookup_is_exact() {
        let accounts: Accounts = vec![FtpUser::new("alice", "secret", Arc::new(MemoryFileSystem::new()))].into_iter().collect();
        assert_eq!(accounts.len(), 1);
        assert!(accounts.contains("alice"));
        assert!(!accounts.contains("Alice"));
        assert!(accounts.get("alice").is_some_and(|user| user.verify("secret")));
        assert!(!accounts.get("alice").is_some_and(|user| user.verify("Secret")));
    }

    #[test]
    fn debug_hides_password() {
        let user = FtpUser::new("alice", "secret", Arc::new(MemoryFileSystem::new()));
        assert!(!format!("{:?}", user).contains("secret"));
    }
}
