//! # Migration Writers
//!
//! Batch importers that copy data from external trackers into the local
//! store. Each importer is safe to re-run after a partial failure: every
//! write goes through a lookup-first path, so a replay picks up where the
//! previous run stopped without duplicating rows.

pub mod launchpad;
