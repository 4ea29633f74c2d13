//! Subcommand definitions and their handlers.

use crate::alfred::ScriptFilter;
use crate::config::Config;
use clap::Subcommand;
use keepal_core::{ops, KeepassDatabase, NewEntry, Result, DEFAULT_GROUP};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new entry to the database
    #[command(after_help = "Examples:
  keepal add -u john_doe -p secret123 -t \"Google Account\" -l https://google.com -g Web/Google
  keepal add -u jane_doe -p password123 -t \"Email Account\"
  keepal add -u admin -p admin123 -g Servers/Production")]
    Add {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Entry title (defaults to the username)
        #[arg(short, long, default_value = "")]
        title: String,

        /// URL
        #[arg(short = 'l', long, default_value = "")]
        url: String,

        /// Notes
        #[arg(short, long, default_value = "")]
        notes: String,

        /// Slash-separated group path; missing groups are created
        #[arg(short, long, default_value = DEFAULT_GROUP)]
        group: String,
    },

    /// Print one attribute of an entry
    #[command(name = "get-attr", visible_alias = "getAttr")]
    GetAttr {
        /// Entry path (`Group/Sub/Title`) or title
        entry_path: String,

        /// username, password, url, notes, title, or any custom field name
        attribute: String,
    },

    /// Search entry titles and print Alfred script-filter JSON
    Search {
        /// Terms that must all appear in the title (case-insensitive)
        terms: Vec<String>,
    },
}

impl Command {
    pub fn run(self, config: &Config) -> Result<()> {
        match self {
            Command::Add {
                username,
                password,
                title,
                url,
                notes,
                group,
            } => {
                let new_entry = NewEntry::new(username, password)
                    .with_title(title)
                    .with_url(url)
                    .with_notes(notes);
                let credential = config.credential()?;
                let outcome =
                    ops::add_entry(&config.database_path, &credential, &new_entry, &group)?;
                println!(
                    "Successfully added entry '{}' to group '{}'",
                    outcome.title, outcome.group
                );
            }
            Command::GetAttr {
                entry_path,
                attribute,
            } => {
                let credential = config.credential()?;
                let value =
                    ops::get_attribute(&config.database_path, &credential, &entry_path, &attribute)?;
                println!("{value}");
            }
            Command::Search { terms } => {
                let credential = config.credential()?;
                let db = KeepassDatabase::unlock(&config.database_path, &credential)?;
                let results = db.search(&terms);
                tracing::info!("{} entries match {:?}", results.len(), terms);

                let json = ScriptFilter::from_results(&results)
                    .to_json()
                    .map_err(|e| keepal_core::Error::Encode(e.to_string()))?;
                println!("{json}");
            }
        }
        Ok(())
    }
}
