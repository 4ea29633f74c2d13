mod common;

use common::{credential, fixture, PASSWORD};
use keepal_core::tree::{entries, subgroups};
use keepal_core::{ops, Credential, ErrorKind, KeepassDatabase, NewEntry};
use keepass::db::Group;
use tempfile::TempDir;

/// Group names, entry fields and tree shape, with timestamps left out.
fn snapshot(group: &Group, depth: usize, out: &mut Vec<String>) {
    out.push(format!("{}group {}", "  ".repeat(depth), group.name));
    for entry in entries(group) {
        let mut fields: Vec<_> = entry
            .fields
            .keys()
            .map(|k| format!("{k}={}", entry.get(k).unwrap_or("<binary>")))
            .collect();
        fields.sort();
        out.push(format!("{}entry {}", "  ".repeat(depth + 1), fields.join(" ")));
    }
    for child in subgroups(group) {
        snapshot(child, depth + 1, out);
    }
}

fn shape(db: &KeepassDatabase) -> Vec<String> {
    let mut out = Vec::new();
    snapshot(db.root(), 0, &mut out);
    out
}

#[test]
fn round_trip_preserves_logical_content() {
    let dir = TempDir::new().unwrap();
    let path = fixture(dir.path());

    let mut first = KeepassDatabase::unlock(&path, &credential()).unwrap();
    let before = shape(&first);
    first.save().unwrap();

    let second = KeepassDatabase::unlock(&path, &credential()).unwrap();
    assert_eq!(shape(&second), before);

    let bytes = second.encode().unwrap();
    let third =
        KeepassDatabase::from_reader(&mut bytes.as_slice(), &path, &credential()).unwrap();
    assert_eq!(shape(&third), before);
}

#[test]
fn add_creates_nested_groups_and_entry() {
    let dir = TempDir::new().unwrap();
    let path = fixture(dir.path());

    let new_entry = NewEntry::new("alice", "s3cret!")
        .with_title("Team Wiki")
        .with_url("https://wiki.example")
        .with_notes("shared login");
    let outcome = ops::add_entry(&path, &credential(), &new_entry, "NewTeam/Sub").unwrap();
    assert_eq!(outcome.title, "Team Wiki");
    assert_eq!(outcome.group, "NewTeam/Sub");
    assert!(!outcome.uuid.is_empty());

    let db = KeepassDatabase::unlock(&path, &credential()).unwrap();
    let root_groups: Vec<_> = subgroups(db.root()).map(|g| g.name.as_str()).collect();
    assert_eq!(root_groups, ["Servers", "NewTeam"]);

    let team = subgroups(db.root()).find(|g| g.name == "NewTeam").unwrap();
    let sub: Vec<_> = subgroups(team).collect();
    assert_eq!(sub.len(), 1);
    assert_eq!(sub[0].name, "Sub");

    let added: Vec<_> = entries(sub[0]).collect();
    assert_eq!(added.len(), 1);
    let entry = added[0];
    assert_eq!(entry.get_title(), Some("Team Wiki"));
    assert_eq!(entry.get_username(), Some("alice"));
    assert_eq!(entry.get_password(), Some("s3cret!"));
    assert_eq!(entry.get_url(), Some("https://wiki.example"));
    assert_eq!(entry.get("Notes"), Some("shared login"));
    assert_eq!(entry.uuid.to_string(), outcome.uuid);
    assert!(entry.times.get_creation().is_some());
    assert!(entry.times.get_last_modification().is_some());
}

#[test]
fn add_into_existing_group_keeps_siblings() {
    let dir = TempDir::new().unwrap();
    let path = fixture(dir.path());

    let new_entry = NewEntry::new("admin", "other").with_title("Production");
    ops::add_entry(&path, &credential(), &new_entry, "Servers/Production/").unwrap();

    let db = KeepassDatabase::unlock(&path, &credential()).unwrap();
    let servers: Vec<_> = subgroups(db.root()).filter(|g| g.name == "Servers").collect();
    assert_eq!(servers.len(), 1);

    let production: Vec<_> = subgroups(servers[0]).collect();
    assert_eq!(production.len(), 1);

    // duplicates are kept, in insertion order
    let passwords: Vec<_> = entries(production[0])
        .map(|e| e.get_password().unwrap_or_default())
        .collect();
    assert_eq!(passwords, ["admin123", "other"]);

    assert_eq!(db.search(&["Entry"]).len(), 2);
}

#[test]
fn title_defaults_to_username_on_add() {
    let dir = TempDir::new().unwrap();
    let path = fixture(dir.path());

    let new_entry = NewEntry::new("jane_doe", "password123").with_title("");
    ops::add_entry(&path, &credential(), &new_entry, keepal_core::DEFAULT_GROUP).unwrap();

    let value = ops::get_attribute(&path, &credential(), "temp/General/jane_doe", "password")
        .unwrap();
    assert_eq!(value, "password123");
}

#[test]
fn add_without_password_fails_before_io() {
    let missing = std::path::Path::new("/nonexistent/keepal/test.kdbx");
    let new_entry = NewEntry::new("alice", "");
    let err = ops::add_entry(missing, &credential(), &new_entry, "temp").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Usage);

    let new_entry = NewEntry::new("", "pw");
    let err = ops::add_entry(missing, &credential(), &new_entry, "temp").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Usage);
}

#[test]
fn wrong_password_is_decode_error_and_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = fixture(dir.path());
    let before = std::fs::read(&path).unwrap();

    let wrong = Credential::resolve("not-the-password", "").unwrap();
    let err = ops::add_entry(&path, &wrong, &NewEntry::new("a", "b"), "x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn get_attribute_resolves_aliases() {
    let dir = TempDir::new().unwrap();
    let path = fixture(dir.path());
    let cred = credential();

    assert_eq!(ops::get_attribute(&path, &cred, "Entry1", "username").unwrap(), "username");
    assert_eq!(ops::get_attribute(&path, &cred, "Entry1", "password").unwrap(), PASSWORD);
    assert_eq!(
        ops::get_attribute(&path, &cred, "Entry2", "url").unwrap(),
        "https://test.test/Entry2"
    );
    assert_eq!(
        ops::get_attribute(&path, &cred, "Servers/Production/Production", "notes").unwrap(),
        "primary"
    );

    let err = ops::get_attribute(&path, &cred, "Entry1", "nonexistent").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = ops::get_attribute(&path, &cred, "Missing", "password").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn empty_notes_are_returned_as_empty() {
    let dir = TempDir::new().unwrap();
    let path = fixture(dir.path());
    let notes = ops::get_attribute(&path, &credential(), "Entry1", "notes").unwrap();
    assert_eq!(notes, "");
}

#[test]
fn search_after_reopen_is_order_stable() {
    let dir = TempDir::new().unwrap();
    let path = fixture(dir.path());
    let db = KeepassDatabase::unlock(&path, &credential()).unwrap();

    let entry1 = db.search(&["Entry1"]);
    assert_eq!(entry1.len(), 1);
    assert_eq!(entry1[0].title(), "Entry1");

    let all: Vec<_> = db.search::<&str>(&[]).iter().map(|r| r.path()).collect();
    assert_eq!(all, ["Entry1", "Entry2", "Servers/Production/Production"]);

    assert!(db.search(&["nomatch"]).is_empty());
}

#[test]
fn title_with_separator_is_addressable() {
    let dir = TempDir::new().unwrap();
    let path = fixture(dir.path());
    let cred = credential();

    let new_entry = NewEntry::new("bob", "hunter2").with_title("example.com/login");
    ops::add_entry(&path, &cred, &new_entry, "Web").unwrap();
    let new_entry = NewEntry::new("bob", "top-level").with_title("login");
    ops::add_entry(&path, &cred, &new_entry, "").unwrap();

    assert_eq!(
        ops::get_attribute(&path, &cred, "example.com/login", "password").unwrap(),
        "hunter2"
    );
    assert_eq!(
        ops::get_attribute(&path, &cred, "Web/example.com/login", "password").unwrap(),
        "hunter2"
    );
    assert_eq!(ops::get_attribute(&path, &cred, "login", "password").unwrap(), "top-level");
}

#[cfg(unix)]
#[test]
fn add_through_symlink_updates_target() {
    let dir = TempDir::new().unwrap();
    let path = fixture(dir.path());
    let link = dir.path().join("current.kdbx");
    std::os::unix::fs::symlink(&path, &link).unwrap();

    let new_entry = NewEntry::new("carol", "linked").with_title("Linked");
    ops::add_entry(&link, &credential(), &new_entry, "temp").unwrap();

    assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    let value = ops::get_attribute(&path, &credential(), "temp/Linked", "password").unwrap();
    assert_eq!(value, "linked");
}

fn write_keyfile(dir: &std::path::Path) -> String {
    let keyfile = dir.join("vault.key");
    std::fs::write(&keyfile, b"not xml, not 32 bytes, just some key material").unwrap();
    keyfile.display().to_string()
}

#[test]
fn password_and_keyfile_are_both_required() {
    let dir = TempDir::new().unwrap();
    let keyfile = write_keyfile(dir.path());
    let path = dir.path().join("composite.kdbx");
    let composite = Credential::resolve(PASSWORD, &keyfile).unwrap();

    let mut db = KeepassDatabase::create(&path, &composite);
    db.add_entry(&NewEntry::new("dave", "both-keys").with_title("Composite"), "");
    db.save().unwrap();

    assert_eq!(
        ops::get_attribute(&path, &composite, "Composite", "password").unwrap(),
        "both-keys"
    );

    let err = KeepassDatabase::unlock(&path, &credential()).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Decode);

    let keyfile_only = Credential::resolve("", &keyfile).unwrap();
    let err = KeepassDatabase::unlock(&path, &keyfile_only).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn keyfile_alone_unlocks_and_saves() {
    let dir = TempDir::new().unwrap();
    let keyfile = write_keyfile(dir.path());
    let path = dir.path().join("keyfile.kdbx");
    let cred = Credential::resolve("", &keyfile).unwrap();

    let mut db = KeepassDatabase::create(&path, &cred);
    db.add_entry(&NewEntry::new("erin", "from-keyfile").with_title("KeyOnly"), "");
    db.save().unwrap();

    ops::add_entry(&path, &cred, &NewEntry::new("frank", "second"), "Team").unwrap();
    assert_eq!(ops::get_attribute(&path, &cred, "KeyOnly", "password").unwrap(), "from-keyfile");
    assert_eq!(ops::get_attribute(&path, &cred, "Team/frank", "username").unwrap(), "frank");

    let err = KeepassDatabase::unlock(&path, &credential()).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn missing_keyfile_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = fixture(dir.path());
    let absent = dir.path().join("absent.key").display().to_string();
    let cred = Credential::resolve(PASSWORD, &absent).unwrap();

    let err = ops::get_attribute(&path, &cred, "Entry1", "password").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}
