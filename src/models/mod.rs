//! Core data model for the file gateway.
//!
//! The gateway owns no persisted records; the only entity is the logical
//! user file, whose identity doubles as its backend key.

pub mod stored_file;
