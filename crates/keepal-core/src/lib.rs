//! Core database handling for keepal.
//!
//! Opens KeePass databases, resolves and creates groups by path, searches
//! entries and persists changes atomically. Used by the `keepal` CLI.

pub mod attribute;
pub mod credential;
pub mod database;
pub mod error;
pub mod models;
pub mod ops;
pub mod search;
pub mod tree;

pub use credential::{Credential, CredentialKind};
pub use database::KeepassDatabase;
pub use error::{Error, ErrorKind, Result};
pub use models::{fields, AddOutcome, NewEntry, SearchResult, DEFAULT_GROUP};
pub use tree::GroupLocator;
