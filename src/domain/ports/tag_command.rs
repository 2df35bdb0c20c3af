//! Driving port for tag write operations.
//!
//! List, rename, and delete are deliberately separate capabilities rather
//! than one catch-all CRUD surface: tags are never created through this port,
//! only lazily by recipe writes.

use async_trait::async_trait;

use crate::domain::{Error, Tag, UserId};

/// Domain use-case port for renaming and deleting tags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagCommand: Send + Sync {
    /// Rename an owned tag.
    async fn rename(&self, id: i64, owner: &UserId, name: String) -> Result<Tag, Error>;

    /// Delete an owned tag; recipes referencing it are detached, not deleted.
    async fn delete(&self, id: i64, owner: &UserId) -> Result<(), Error>;
}

/// Fixture command reporting every tag as missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTagCommand;

#[async_trait]
impl TagCommand for FixtureTagCommand {
    async fn rename(&self, _id: i64, _owner: &UserId, _name: String) -> Result<Tag, Error> {
        Err(Error::not_found("tag not found"))
    }

    async fn delete(&self, _id: i64, _owner: &UserId) -> Result<(), Error> {
        Err(Error::not_found("tag not found"))
    }
}
