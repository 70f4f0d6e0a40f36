//! Database migrations for the StoryBoard service.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2026_01_10_100000_create_users;
mod m2026_01_10_100100_create_projects;
mod m2026_01_10_100200_create_stories;
mod m2026_01_10_100300_create_tags;
mod m2026_01_10_100400_create_story_tags;
mod m2026_01_10_100500_create_tasks;
mod m2026_01_10_100600_create_comments;
mod m2026_01_10_100700_create_timeline_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2026_01_10_100000_create_users::Migration),
            Box::new(m2026_01_10_100100_create_projects::Migration),
            Box::new(m2026_01_10_100200_create_stories::Migration),
            Box::new(m2026_01_10_100300_create_tags::Migration),
            Box::new(m2026_01_10_100400_create_story_tags::Migration),
            Box::new(m2026_01_10_100500_create_tasks::Migration),
            Box::new(m2026_01_10_100600_create_comments::Migration),
            Box::new(m2026_01_10_100700_create_timeline_events::Migration),
        ]
    }
}
