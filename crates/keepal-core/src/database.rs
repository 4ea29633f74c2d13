//! KeePass database operations wrapper.

use crate::credential::Credential;
use crate::error::{Error, Result};
use crate::models::{fields, AddOutcome, NewEntry, SearchResult};
use crate::{search, tree};
use chrono::Timelike;
use keepass::config::{DatabaseConfig, DatabaseVersion};
use keepass::db::{Entry, Group, Node, Value};
use keepass::Database;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Wrapper around the KeePass database for easier operations.
pub struct KeepassDatabase {
    db: Database,
    path: PathBuf,
    credential: Credential,
}

impl KeepassDatabase {
    /// Open and unlock a KeePass database.
    pub fn unlock(path: impl AsRef<Path>, credential: &Credential) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| Error::io("failed to open database", path, e))?;
        let db = Self::from_reader(&mut file, path, credential)?;
        tracing::info!("Opened database {}", path.display());
        Ok(db)
    }

    /// Decode a database from any byte source. `path` is where [`save`](Self::save) writes.
    pub fn from_reader(
        reader: &mut dyn Read,
        path: impl Into<PathBuf>,
        credential: &Credential,
    ) -> Result<Self> {
        let path = path.into();
        let key = credential.database_key()?;

        let db = Database::open(reader, key).map_err(|e| Error::Decode {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            db,
            path,
            credential: credential.clone(),
        })
    }

    /// Start an empty in-memory database that will be saved to `path`.
    pub fn create(path: impl Into<PathBuf>, credential: &Credential) -> Self {
        Self {
            db: Database::new(DatabaseConfig::default()),
            path: path.into(),
            credential: credential.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the root group of the database.
    pub fn root(&self) -> &Group {
        &self.db.root
    }

    /// Get mutable access to the root group for modifications.
    pub fn root_mut(&mut self) -> &mut Group {
        &mut self.db.root
    }

    /// Entries whose title contains every term, in traversal order.
    pub fn search<S: AsRef<str>>(&self, terms: &[S]) -> Vec<SearchResult<'_>> {
        search::search(&self.db.root, terms)
    }

    /// The single entry addressed by `path`.
    pub fn find_entry(&self, path: &str) -> Result<SearchResult<'_>> {
        search::find_entry(&self.db.root, path)
    }

    /// Append a new entry to the group at `group_path`, creating missing groups.
    ///
    /// Entries with the same title are not merged; a duplicate is simply added.
    pub fn add_entry(&mut self, new_entry: &NewEntry, group_path: &str) -> AddOutcome {
        let entry = build_entry(new_entry);
        let uuid = entry.uuid.to_string();

        let group = tree::resolve_or_create(&mut self.db.root, group_path);
        group.children.push(Node::Entry(entry));
        tracing::info!("Added entry '{}' to group '{}'", new_entry.title, group.name);

        AddOutcome {
            title: new_entry.title.clone(),
            group: tree::split_path(group_path).collect::<Vec<_>>().join("/"),
            uuid,
        }
    }

    /// Seal every plain value stored under a protected key.
    ///
    /// Returns the number of values that were sealed.
    pub fn lock_protected_fields(&mut self) -> usize {
        let sealed = seal_group(&mut self.db.root);
        if sealed > 0 {
            tracing::debug!("Sealed {} unprotected value(s)", sealed);
        }
        sealed
    }

    /// Move a database read from an older container onto KDBX4, the only
    /// version that can be written.
    ///
    /// KDBX3 keeps its ciphers and AES key derivation, which KDBX4 also
    /// supports. Anything older gets the default configuration.
    pub fn upgrade_format(&mut self) -> bool {
        let config = &mut self.db.config;
        if matches!(config.version, DatabaseVersion::KDB4(_)) {
            return false;
        }
        if matches!(config.version, DatabaseVersion::KDB3(_)) {
            config.version = DatabaseConfig::default().version;
        } else {
            *config = DatabaseConfig::default();
        }
        tracing::info!("Upgrading database {} to KDBX4 on save", self.path.display());
        true
    }

    /// Serialize the whole tree into the KDBX4 container format.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let key = self.credential.database_key()?;
        let mut buffer = Vec::new();
        self.db
            .save(&mut buffer, key)
            .map_err(|e| Error::Encode(e.to_string()))?;
        Ok(buffer)
    }

    /// Save the database to disk.
    ///
    /// The container is fully encoded in memory first, then written to a
    /// temporary file next to the database and renamed over it.
    pub fn save(&mut self) -> Result<()> {
        self.upgrade_format();
        self.lock_protected_fields();
        let bytes = self.encode()?;
        commit_atomically(&self.path, |file| file.write_all(&bytes))?;
        tracing::info!("Saved database {} ({} bytes)", self.path.display(), bytes.len());
        Ok(())
    }
}

fn build_entry(new_entry: &NewEntry) -> Entry {
    let mut entry = Entry::new();

    let plain = [
        (fields::TITLE, &new_entry.title),
        (fields::USERNAME, &new_entry.username),
        (fields::URL, &new_entry.url),
        (fields::NOTES, &new_entry.notes),
    ];
    for (key, value) in plain {
        entry
            .fields
            .insert(key.to_string(), Value::Unprotected(value.clone()));
    }
    entry.fields.insert(
        fields::PASSWORD.to_string(),
        Value::Protected(new_entry.password.as_bytes().into()),
    );

    // KDBX stores whole seconds
    let now = chrono::Utc::now().naive_utc();
    let now = now.with_nanosecond(0).unwrap_or(now);
    entry.times.set_creation(now);
    entry.times.set_last_modification(now);

    entry
}

fn seal_group(group: &mut Group) -> usize {
    let mut sealed = 0;

    for node in &mut group.children {
        match node {
            Node::Group(child) => sealed += seal_group(child),
            Node::Entry(entry) => {
                for key in fields::PROTECTED {
                    if let Some(Value::Unprotected(plain)) = entry.fields.get(*key) {
                        let protected = Value::Protected(plain.as_bytes().into());
                        entry.fields.insert((*key).to_string(), protected);
                        sealed += 1;
                    }
                }
            }
        }
    }

    sealed
}

/// Replace `path` with whatever `write` produces, all or nothing.
///
/// `write` fills a temporary file in the same directory. Only after it
/// returns successfully and the data is synced is the file renamed over
/// `path`. On any failure the temporary file is removed and `path` keeps
/// its previous content. Permissions of an existing `path` are carried over.
///
/// A symlinked `path` is followed: the link stays in place and its target is
/// replaced.
pub fn commit_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    let target = match std::fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => path.to_path_buf(),
        Err(e) => return Err(Error::io("failed to resolve", path, e)),
    };
    let path = target.as_path();

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| Error::io("failed to create temporary file in", dir, e))?;

    write(tmp.as_file_mut()).map_err(|e| Error::io("failed to write", tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| Error::io("failed to sync", tmp.path(), e))?;

    if let Ok(metadata) = std::fs::metadata(path) {
        std::fs::set_permissions(tmp.path(), metadata.permissions())
            .map_err(|e| Error::io("failed to set permissions on", tmp.path(), e))?;
    }

    tmp.persist(path)
        .map_err(|e| Error::io("failed to replace", path, e.error))?;

    sync_dir(dir);
    Ok(())
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        tracing::warn!("Could not sync directory {}: {}", dir.display(), e);
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
