//! Master key material for unlocking a database.

use crate::error::{Error, Result};
use keepass::DatabaseKey;
use std::fmt;
use std::path::{Path, PathBuf};

/// Which secret sources make up a [`Credential`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Password,
    KeyFile,
    PasswordAndKeyFile,
}

/// Authentication material: a master password, a key file, or both.
///
/// Construct with [`Credential::resolve`]; an empty credential cannot exist.
#[derive(Clone)]
pub struct Credential {
    password: Option<String>,
    keyfile: Option<PathBuf>,
}

impl Credential {
    /// Build a credential from a password and a key-file path.
    ///
    /// Empty strings count as absent. Fails with [`Error::Configuration`]
    /// when neither source is given.
    pub fn resolve(password: &str, keyfile_path: &str) -> Result<Self> {
        let password = (!password.is_empty()).then(|| password.to_string());
        let keyfile = (!keyfile_path.is_empty()).then(|| PathBuf::from(keyfile_path));

        if password.is_none() && keyfile.is_none() {
            return Err(Error::Configuration(
                "either a master password or a key file must be configured \
                 (keepassxc_master_password / keepassxc_keyfile_path)"
                    .to_string(),
            ));
        }

        Ok(Self { password, keyfile })
    }

    pub fn kind(&self) -> CredentialKind {
        match (&self.password, &self.keyfile) {
            (Some(_), Some(_)) => CredentialKind::PasswordAndKeyFile,
            (None, Some(_)) => CredentialKind::KeyFile,
            _ => CredentialKind::Password,
        }
    }

    pub fn keyfile(&self) -> Option<&Path> {
        self.keyfile.as_deref()
    }

    /// Turn the credential into a codec key, reading the key file if any.
    pub(crate) fn database_key(&self) -> Result<DatabaseKey> {
        let mut key = DatabaseKey::new();

        if let Some(password) = &self.password {
            key = key.with_password(password);
        }

        if let Some(path) = &self.keyfile {
            let mut file = std::fs::File::open(path)
                .map_err(|e| Error::io("failed to open key file", path, e))?;
            key = key
                .with_keyfile(&mut file)
                .map_err(|e| Error::io("failed to read key file", path, e))?;
        }

        Ok(key)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("keyfile", &self.keyfile)
            .finish()
    }
}
