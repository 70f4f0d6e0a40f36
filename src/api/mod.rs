//! # API Resource Models
//!
//! Versioned wire representations of the persisted entities. These are the
//! JSON shapes exposed to clients, kept separate from the database models so
//! storage changes never leak into the contract.

pub mod v1;
