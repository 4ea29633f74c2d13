//! Field lookup on a single entry.

use crate::error::{Error, Result};
use crate::models::fields;
use keepass::db::Entry;

/// Map a user-facing attribute name to the stored field key.
///
/// `title`, `username`, `password`, `url` and `notes` are matched
/// case-insensitively; any other name is used verbatim.
pub fn field_key(name: &str) -> &str {
    const ALIASES: [(&str, &str); 5] = [
        ("title", fields::TITLE),
        ("username", fields::USERNAME),
        ("password", fields::PASSWORD),
        ("url", fields::URL),
        ("notes", fields::NOTES),
    ];

    ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        .map_or(name, |&(_, key)| key)
}

/// Read an attribute from `entry`, unsealing protected values.
///
/// A field that exists but is empty yields `""`; a missing field is
/// [`Error::NotFound`].
pub fn get_attribute(entry: &Entry, name: &str) -> Result<String> {
    let key = field_key(name);

    if !entry.fields.contains_key(key) {
        return Err(Error::NotFound(format!("attribute '{name}'")));
    }

    entry
        .get(key)
        .map(str::to_string)
        .ok_or_else(|| Error::NotFound(format!("text value for attribute '{name}'")))
}
