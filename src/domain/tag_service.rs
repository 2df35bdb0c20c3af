//! Tag management service.
//!
//! Tags come into existence through recipe writes; this service only lists,
//! renames, and deletes them on the owner's behalf.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{TagCommand, TagQuery, TagRepository};
use crate::domain::recipe_service::map_tag_error;
use crate::domain::tag::tag_name_violation;
use crate::domain::{Error, Tag, UserId};

/// Tag use-case service implementing the driving ports.
#[derive(Clone)]
pub struct TagService<T> {
    tags: Arc<T>,
}

impl<T> TagService<T> {
    /// Create a new service backed by the given repository.
    pub fn new(tags: Arc<T>) -> Self {
        Self { tags }
    }
}

fn rename_violation_error(code: &str) -> Error {
    Error::invalid_request("tag name is invalid").with_details(serde_json::json!({
        "fields": [{
            "field": "name",
            "code": code,
            "message": match code {
                "empty" => "name must not be empty",
                _ => "name is too long",
            },
        }],
    }))
}

#[async_trait]
impl<T> TagCommand for TagService<T>
where
    T: TagRepository,
{
    async fn rename(&self, id: i64, owner: &UserId, name: String) -> Result<Tag, Error> {
        let name = name.trim().to_owned();
        if let Some(code) = tag_name_violation(&name) {
            return Err(rename_violation_error(code));
        }
        self.tags
            .rename(id, owner, &name)
            .await
            .map_err(map_tag_error)
    }

    async fn delete(&self, id: i64, owner: &UserId) -> Result<(), Error> {
        self.tags.delete(id, owner).await.map_err(map_tag_error)
    }
}

#[async_trait]
impl<T> TagQuery for TagService<T>
where
    T: TagRepository,
{
    async fn list(&self, owner: &UserId) -> Result<Vec<Tag>, Error> {
        self.tags.list_by_owner(owner).await.map_err(map_tag_error)
    }
}
