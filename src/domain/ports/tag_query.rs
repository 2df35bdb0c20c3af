//! Driving port for tag read operations.

use async_trait::async_trait;

use crate::domain::{Error, Tag, UserId};

/// Domain use-case port for listing tags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagQuery: Send + Sync {
    /// List the owner's tags, name descending.
    async fn list(&self, owner: &UserId) -> Result<Vec<Tag>, Error>;
}

/// Fixture query with no tags.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTagQuery;

#[async_trait]
impl TagQuery for FixtureTagQuery {
    async fn list(&self, _owner: &UserId) -> Result<Vec<Tag>, Error> {
        Ok(Vec::new())
    }
}
