use crate::Filesystem;
use std::{io, path::PathBuf, sync::Arc};
use zeptoftp::auth::FtpUser;

/// Extension trait purely for construction convenience.
pub trait FtpUserExt: Sized {
    /// Create an account that works on the local directory `root`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use zeptoftp::auth::FtpUser;
    /// use zeptoftp_sbe_fs::FtpUserExt;
    ///
    /// let alice = FtpUser::with_fs("alice", "secret", std::env::temp_dir()).unwrap();
    /// ```
    fn with_fs<N: Into<String>, P: Into<String>, R: Into<PathBuf>>(name: N, password: P, root: R) -> io::Result<Self>;
}

impl FtpUserExt for FtpUser {
    fn with_fs<N: Into<String>, P: Into<String>, R: Into<PathBuf>>(name: N, password: P, root: R) -> io::Result<Self> {
        Ok(FtpUser::new(name, password, Arc::new(Filesystem::new(root)?)))
    }
}
