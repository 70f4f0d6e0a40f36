//! User entity model
//!
//! Users are identified by the OpenID returned from the identity provider.
//! The Launchpad import creates users lazily with a temporary email address;
//! real details are filled in on first login.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Short unique handle, carried over from the source tracker.
    pub username: String,

    /// Full (display) name.
    pub full_name: String,

    pub email: String,

    /// The unique identifier returned by the OpenID provider, or the
    /// deterministic placeholder assigned when discovery fails.
    pub openid: String,

    pub is_superuser: bool,

    pub enable_login: bool,

    pub last_login: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::story::Entity")]
    Story,
    #[sea_orm(has_many = "super::timeline_event::Entity")]
    TimelineEvent,
}

impl Related<super::story::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Story.def()
    }
}

impl Related<super::timeline_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimelineEvent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
