//! # StoryBoard
//!
//! A bug and story tracker: REST resource models over a relational data
//! model, plus a re-runnable batch importer that copies bugs from Launchpad
//! into the local store.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod logging;
pub mod migrate;
pub mod models;
pub mod repositories;

pub use migration;
