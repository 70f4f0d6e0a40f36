//! # Launchpad Import
//!
//! Copies a Launchpad bug export into the local store: one story per bug,
//! one task per story, the full comment history, tags, and the users behind
//! them. Status and importance are mapped onto the local task vocabulary.

use std::path::Path;

use thiserror::Error;

pub mod openid;
pub mod types;
pub mod writer;

pub use openid::{DiscoveryError, IdentityResolver, OpenIdResolver};
pub use types::{LaunchpadBug, LaunchpadMessage, LaunchpadUser};
pub use writer::LaunchpadWriter;

use crate::error::ImportError;

/// Errors reading a bug export file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to read export file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse export file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Maps a Launchpad workflow status onto the local task status vocabulary.
pub fn map_status(status: Option<&str>) -> &'static str {
    match status {
        Some("Fix Released") | Some("Fix Committed") => "merged",
        Some("In Progress") => "inprogress",
        Some("Invalid") | Some("Won't Fix") | Some("Opinion") | Some("Expired") => "invalid",
        _ => "todo",
    }
}

/// Maps a Launchpad importance onto the local task priority vocabulary.
pub fn map_priority(importance: Option<&str>) -> &'static str {
    match importance {
        Some("Critical") | Some("High") => "high",
        Some("Medium") => "medium",
        _ => "low",
    }
}

/// Reads a JSON bug export from disk.
pub fn load_bug_export(path: &Path) -> Result<Vec<LaunchpadBug>, ExportError> {
    let raw = std::fs::read_to_string(path)?;
    let bugs = serde_json::from_str(&raw)?;

    Ok(bugs)
}

/// Totals for one import run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub stories: usize,
    pub skipped: usize,
}

/// Runs the writer over every bug in the export. Bugs without a usable
/// reference or owner are skipped; storage failures halt the run, and a
/// re-run resumes from the persisted state.
pub async fn import_bugs<R: IdentityResolver>(
    writer: &mut LaunchpadWriter<'_, R>,
    bugs: &[LaunchpadBug],
) -> Result<ImportSummary, ImportError> {
    let mut summary = ImportSummary::default();

    for bug in bugs {
        let Some(owner) = writer.write_user(bug.owner.as_ref()).await? else {
            tracing::warn!(self_link = %bug.self_link, "bug has no owner, skipping");
            summary.skipped += 1;
            continue;
        };
        let assignee = writer.write_user(bug.assignee.as_ref()).await?;
        let tags = writer.write_tags(bug).await?;

        let priority = map_priority(bug.importance.as_deref());
        let status = map_status(bug.status.as_deref());

        match writer
            .write_bug(&owner, assignee.as_ref(), priority, status, &tags, bug)
            .await?
        {
            Some(_) => summary.stories += 1,
            None => summary.skipped += 1,
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_covers_the_launchpad_vocabulary() {
        assert_eq!(map_status(Some("Fix Released")), "merged");
        assert_eq!(map_status(Some("Fix Committed")), "merged");
        assert_eq!(map_status(Some("In Progress")), "inprogress");
        assert_eq!(map_status(Some("Invalid")), "invalid");
        assert_eq!(map_status(Some("Won't Fix")), "invalid");
        assert_eq!(map_status(Some("Opinion")), "invalid");
        assert_eq!(map_status(Some("Expired")), "invalid");
        assert_eq!(map_status(Some("Triaged")), "todo");
        assert_eq!(map_status(Some("New")), "todo");
        assert_eq!(map_status(None), "todo");
    }

    #[test]
    fn priority_mapping_defaults_low() {
        assert_eq!(map_priority(Some("Critical")), "high");
        assert_eq!(map_priority(Some("High")), "high");
        assert_eq!(map_priority(Some("Medium")), "medium");
        assert_eq!(map_priority(Some("Low")), "low");
        assert_eq!(map_priority(Some("Wishlist")), "low");
        assert_eq!(map_priority(None), "low");
    }

    #[test]
    fn export_loading_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bugs.json");

        std::fs::write(&path, "[]").unwrap();
        assert!(load_bug_export(&path).unwrap().is_empty());

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_bug_export(&path).unwrap_err(),
            ExportError::Json(_)
        ));

        assert!(matches!(
            load_bug_export(Path::new("/nonexistent/bugs.json")).unwrap_err(),
            ExportError::Io(_)
        ));
    }
}
