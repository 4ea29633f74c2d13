//! Alfred script-filter output.
//!
//! Each search hit becomes one item. The default action argument is the
//! entry path, which the workflow feeds back into `keepal get-attr <path>
//! password`. Holding ⌥ passes the URL, holding ⌘ passes the username.

use keepal_core::SearchResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptFilter {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub title: String,
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mods: Option<Mods>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mods {
    pub alt: Modifier,
    pub cmd: Modifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub arg: String,
    pub subtitle: String,
}

impl Item {
    pub fn from_result(result: &SearchResult<'_>) -> Self {
        let path = result.path();
        let url = result.entry.get_url().unwrap_or_default().to_string();
        let username = result.entry.get_username().unwrap_or_default().to_string();

        Self {
            uid: Some(result.uuid()),
            title: result.title().to_string(),
            subtitle: path.clone(),
            arg: Some(path),
            valid: true,
            mods: Some(Mods {
                alt: Modifier {
                    subtitle: format!("Open {url}"),
                    arg: url,
                },
                cmd: Modifier {
                    subtitle: format!("Copy username {username}"),
                    arg: username,
                },
            }),
        }
    }

    fn no_results() -> Self {
        Self {
            uid: None,
            title: "No matching entries".to_string(),
            subtitle: "Try fewer or shorter search terms".to_string(),
            arg: None,
            valid: false,
            mods: None,
        }
    }
}

impl ScriptFilter {
    /// Build the envelope; an empty hit list yields one non-actionable item.
    pub fn from_results(results: &[SearchResult<'_>]) -> Self {
        let items = if results.is_empty() {
            vec![Item::no_results()]
        } else {
            results.iter().map(Item::from_result).collect()
        };
        Self { items }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
