//! Deserialized shapes of a Launchpad bug export.
//!
//! The export is a JSON array of bug records as returned by the Launchpad
//! read API, reduced to the fields the import consumes.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A Launchpad account referenced by a bug or message.
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchpadUser {
    /// Short account name, e.g. `elbarto`.
    pub name: String,
    pub display_name: String,
    /// Profile page URL; OpenID discovery starts here.
    pub web_link: String,
}

/// One comment on a bug, in posting order.
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchpadMessage {
    pub owner: LaunchpadUser,
    pub content: String,
    pub date_created: Option<DateTime<Utc>>,
}

/// A single exported bug.
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchpadBug {
    /// Canonical API reference; the trailing digits are the bug id.
    pub self_link: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date_created: Option<DateTime<Utc>>,
    pub date_last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub owner: Option<LaunchpadUser>,
    #[serde(default)]
    pub assignee: Option<LaunchpadUser>,
    #[serde(default)]
    pub messages: Vec<LaunchpadMessage>,
    /// Launchpad workflow status, e.g. `Fix Released`.
    #[serde(default)]
    pub status: Option<String>,
    /// Launchpad importance, e.g. `Critical`.
    #[serde(default)]
    pub importance: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_bug() {
        let raw = r#"{
            "self_link": "https://api.launchpad.net/1.0/bugs/1057477",
            "title": "Port crashes on restart",
            "owner": {
                "name": "elbarto",
                "display_name": "Bart Simpson",
                "web_link": "https://launchpad.net/~elbarto"
            },
            "date_created": "2012-09-27T14:02:00Z",
            "date_last_updated": null
        }"#;

        let bug: LaunchpadBug = serde_json::from_str(raw).unwrap();
        assert_eq!(bug.self_link, "https://api.launchpad.net/1.0/bugs/1057477");
        assert_eq!(bug.description, "");
        assert!(bug.tags.is_empty());
        assert!(bug.messages.is_empty());
        assert!(bug.assignee.is_none());
        assert_eq!(bug.owner.unwrap().name, "elbarto");
    }
}
