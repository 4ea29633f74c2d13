use keepal_core::{Credential, KeepassDatabase, NewEntry};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("test.kdbx"), PathBuf::from);

    let credential = Credential::resolve("Abc12345", "")?;
    let mut db = KeepassDatabase::create(&path, &credential);

    let entry1 = NewEntry::new("username", "Abc12345")
        .with_title("Entry1")
        .with_url("https://test.test/Entry1");
    let entry2 = NewEntry::new("Entry2-User", "Entry2-Pass")
        .with_title("Entry2")
        .with_url("https://test.test/Entry2");
    db.add_entry(&entry1, "");
    db.add_entry(&entry2, "");

    let nested = NewEntry::new("admin", "admin123")
        .with_title("Production")
        .with_notes("Nested sample entry");
    db.add_entry(&nested, "Servers/Production");

    db.save()?;

    println!("Created {} with password 'Abc12345'", path.display());
    Ok(())
}
