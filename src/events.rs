//! Timeline event kinds
//!
//! Event types are persisted as text on `timeline_events.event_type`; this
//! module is the single place that enumerates the known kinds and renders
//! them into the human-readable form the API returns. Unrecognized kinds are
//! deliberately not an error: events carrying them are returned unresolved.

use serde::Deserialize;

/// Enumerated kinds of timeline events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    StoryCreated,
    StoryDetailsChanged,
    UserComment,
    TaskCreated,
    TaskStatusChanged,
    TaskPriorityChanged,
    TaskAssigneeChanged,
    TaskDetailsChanged,
    TaskDeleted,
}

/// Structured payload attached to task-related events.
#[derive(Debug, Clone, Deserialize)]
struct TaskEventInfo {
    #[serde(default)]
    task_id: Option<i64>,
    #[serde(default)]
    task_title: Option<String>,
    #[serde(default)]
    old_status: Option<String>,
    #[serde(default)]
    new_status: Option<String>,
    #[serde(default)]
    old_priority: Option<String>,
    #[serde(default)]
    new_priority: Option<String>,
}

impl EventType {
    /// Stored representation of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::StoryCreated => "story_created",
            EventType::StoryDetailsChanged => "story_details_changed",
            EventType::UserComment => "user_comment",
            EventType::TaskCreated => "task_created",
            EventType::TaskStatusChanged => "task_status_changed",
            EventType::TaskPriorityChanged => "task_priority_changed",
            EventType::TaskAssigneeChanged => "task_assignee_changed",
            EventType::TaskDetailsChanged => "task_details_changed",
            EventType::TaskDeleted => "task_deleted",
        }
    }

    /// Parses a stored event type. Returns `None` for unknown kinds so that
    /// callers can pass the event through unresolved.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "story_created" => Some(EventType::StoryCreated),
            "story_details_changed" => Some(EventType::StoryDetailsChanged),
            "user_comment" => Some(EventType::UserComment),
            "task_created" => Some(EventType::TaskCreated),
            "task_status_changed" => Some(EventType::TaskStatusChanged),
            "task_priority_changed" => Some(EventType::TaskPriorityChanged),
            "task_assignee_changed" => Some(EventType::TaskAssigneeChanged),
            "task_details_changed" => Some(EventType::TaskDetailsChanged),
            "task_deleted" => Some(EventType::TaskDeleted),
            _ => None,
        }
    }

    /// Renders the event into a human-readable description, using the
    /// JSON-encoded `event_info` payload where one applies.
    pub fn describe(&self, event_info: Option<&str>) -> String {
        let info: Option<TaskEventInfo> =
            event_info.and_then(|raw| serde_json::from_str(raw).ok());
        let task_label = info
            .as_ref()
            .and_then(|i| i.task_title.clone())
            .or_else(|| {
                info.as_ref()
                    .and_then(|i| i.task_id)
                    .map(|id| format!("#{id}"))
            });

        match self {
            EventType::StoryCreated => "Story created.".to_string(),
            EventType::StoryDetailsChanged => "Story details changed.".to_string(),
            EventType::UserComment => "Comment added.".to_string(),
            EventType::TaskCreated => match task_label {
                Some(label) => format!("Task '{label}' created."),
                None => "Task created.".to_string(),
            },
            EventType::TaskStatusChanged => {
                let transition = info.as_ref().and_then(|i| {
                    Some(format!(
                        " from '{}' to '{}'",
                        i.old_status.as_deref()?,
                        i.new_status.as_deref()?
                    ))
                });
                match (task_label, transition) {
                    (Some(label), Some(t)) => format!("Task '{label}' status changed{t}."),
                    (Some(label), None) => format!("Task '{label}' status changed."),
                    (None, Some(t)) => format!("Task status changed{t}."),
                    (None, None) => "Task status changed.".to_string(),
                }
            }
            EventType::TaskPriorityChanged => {
                let transition = info.as_ref().and_then(|i| {
                    Some(format!(
                        " from '{}' to '{}'",
                        i.old_priority.as_deref()?,
                        i.new_priority.as_deref()?
                    ))
                });
                match (task_label, transition) {
                    (Some(label), Some(t)) => format!("Task '{label}' priority changed{t}."),
                    (Some(label), None) => format!("Task '{label}' priority changed."),
                    (None, Some(t)) => format!("Task priority changed{t}."),
                    (None, None) => "Task priority changed.".to_string(),
                }
            }
            EventType::TaskAssigneeChanged => match task_label {
                Some(label) => format!("Task '{label}' assignee changed."),
                None => "Task assignee changed.".to_string(),
            },
            EventType::TaskDetailsChanged => match task_label {
                Some(label) => format!("Task '{label}' details changed."),
                None => "Task details changed.".to_string(),
            },
            EventType::TaskDeleted => match task_label {
                Some(label) => format!("Task '{label}' deleted."),
                None => "Task deleted.".to_string(),
            },
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
