//! Version 1 of the API resource models.

pub mod resources;

pub use resources::{
    Comment, Project, ProjectGroup, Story, SystemInfo, Task, Team, TimeLineEvent, User,
};
