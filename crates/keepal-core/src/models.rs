//! Shared data types for the application.

use keepass::db::Entry;

/// Standard KeePass field keys.
pub mod fields {
    pub const TITLE: &str = "Title";
    pub const USERNAME: &str = "UserName";
    pub const PASSWORD: &str = "Password";
    pub const URL: &str = "URL";
    pub const NOTES: &str = "Notes";

    /// Keys whose values are kept encrypted in memory and on disk.
    pub const PROTECTED: &[&str] = &[PASSWORD];
}

/// Separator used in group paths and entry paths.
pub const PATH_SEPARATOR: char = '/';

/// Group path used by `add` when none is given.
pub const DEFAULT_GROUP: &str = "temp/General";

/// Data for a password entry that is about to be created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEntry {
    pub title: String,
    pub username: String,
    pub password: String,
    pub url: String,
    pub notes: String,
}

impl NewEntry {
    /// Create an entry from the two required fields.
    ///
    /// The title starts out as the username.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            title: username.clone(),
            username,
            password: password.into(),
            ..Self::default()
        }
    }

    /// Set the title; an empty title keeps the username as title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        if !title.is_empty() {
            self.title = title;
        }
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// A matched entry together with the names of the groups that lead to it.
///
/// Borrows from the open database and cannot outlive it.
#[derive(Debug, Clone)]
pub struct SearchResult<'a> {
    pub entry: &'a Entry,
    /// Group names from the root group (inclusive) down to the containing group.
    pub group_path: Vec<&'a str>,
}

impl<'a> SearchResult<'a> {
    pub fn title(&self) -> &'a str {
        self.entry.get_title().unwrap_or_default()
    }

    pub fn uuid(&self) -> String {
        self.entry.uuid.to_string()
    }

    /// Lookup path of the entry: groups below the root, then the title.
    ///
    /// An entry stored directly in the root group has its title as path.
    pub fn path(&self) -> String {
        let mut segments: Vec<&str> = self.group_path.iter().skip(1).copied().collect();
        segments.push(self.title());
        segments.join(&PATH_SEPARATOR.to_string())
    }
}

/// Result of a successful `add`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub title: String,
    /// Group path with empty segments removed.
    pub group: String,
    pub uuid: String,
}
