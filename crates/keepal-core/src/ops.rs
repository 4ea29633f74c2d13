//! One-shot operations: open the database, act on it, and save if needed.
//!
//! Callers pass everything explicitly; nothing here reads the environment.

use crate::attribute;
use crate::credential::Credential;
use crate::database::KeepassDatabase;
use crate::error::{Error, Result};
use crate::models::{AddOutcome, NewEntry};
use std::path::Path;

/// Add `new_entry` under `group_path` and persist the database.
///
/// Either the whole add is committed to disk or the file is left unchanged.
pub fn add_entry(
    database_path: &Path,
    credential: &Credential,
    new_entry: &NewEntry,
    group_path: &str,
) -> Result<AddOutcome> {
    if new_entry.username.is_empty() {
        return Err(Error::Usage("--username is required".to_string()));
    }
    if new_entry.password.is_empty() {
        return Err(Error::Usage("--password is required".to_string()));
    }

    let mut db = KeepassDatabase::unlock(database_path, credential)?;
    let outcome = db.add_entry(new_entry, group_path);
    db.save()?;
    Ok(outcome)
}

/// Read `attribute_name` from the entry at `entry_path`.
pub fn get_attribute(
    database_path: &Path,
    credential: &Credential,
    entry_path: &str,
    attribute_name: &str,
) -> Result<String> {
    let db = KeepassDatabase::unlock(database_path, credential)?;
    let found = db.find_entry(entry_path)?;
    attribute::get_attribute(found.entry, attribute_name)
}
