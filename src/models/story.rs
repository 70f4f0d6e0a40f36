//! Story entity model
//!
//! A story is the main unit of work (bug or feature). For imported stories
//! the primary key is the external bug id, which keeps the external-to-local
//! mapping 1:1 across repeated import runs.

use super::user::Entity as User;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stories")]
pub struct Model {
    /// Primary key; assigned (never auto-generated) on import.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    /// Descriptive label, at most 100 characters. Overlong source titles are
    /// truncated; the full text is preserved in the description.
    pub title: String,

    pub description: String,

    pub creator_id: i64,

    /// Bug or feature :)
    pub is_bug: bool,

    pub created_at: Option<DateTimeWithTimeZone>,

    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "User",
        from = "Column::CreatorId",
        to = "super::user::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::task::Entity")]
    Task,
    #[sea_orm(has_many = "super::timeline_event::Entity")]
    TimelineEvent,
}

impl Related<User> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl Related<super::timeline_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimelineEvent.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::story_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::story_tag::Relation::Story.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
