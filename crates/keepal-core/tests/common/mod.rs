use keepal_core::{Credential, KeepassDatabase, NewEntry};
use std::path::{Path, PathBuf};

pub const PASSWORD: &str = "Abc12345";

pub fn credential() -> Credential {
    Credential::resolve(PASSWORD, "").unwrap()
}

/// Write a database with `Entry1`, `Entry2` at the root and one nested entry.
pub fn fixture(dir: &Path) -> PathBuf {
    let path = dir.join("test.kdbx");
    let mut db = KeepassDatabase::create(&path, &credential());

    db.add_entry(
        &NewEntry::new("username", PASSWORD)
            .with_title("Entry1")
            .with_url("https://test.test/Entry1"),
        "",
    );
    db.add_entry(
        &NewEntry::new("Entry2-User", "Entry2-Pass")
            .with_title("Entry2")
            .with_url("https://test.test/Entry2"),
        "",
    );
    db.add_entry(
        &NewEntry::new("admin", "admin123")
            .with_title("Production")
            .with_notes("primary"),
        "Servers/Production",
    );

    db.save().unwrap();
    path
}
