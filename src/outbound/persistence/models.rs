//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{recipe_tags, recipes, tags};

/// Row struct for reading from the tags table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: i64,
    pub owner_id: Uuid,
    pub name: String,
}

/// Insertable struct for creating new tag records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tags)]
pub(crate) struct NewTagRow<'a> {
    pub owner_id: Uuid,
    pub name: &'a str,
}

/// Row struct for reading from the recipes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: i64,
    pub owner_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price_cents: i64,
    pub link: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Insertable struct for creating new recipe records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub owner_id: Uuid,
    pub title: &'a str,
    pub time_minutes: i32,
    pub price_cents: i64,
    pub link: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// Changeset struct for partial recipe updates. `None` fields are skipped by
/// Diesel, so an absent field never overwrites a stored value.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = recipes)]
pub(crate) struct RecipeRowChanges<'a> {
    pub title: Option<&'a str>,
    pub time_minutes: Option<i32>,
    pub price_cents: Option<i64>,
    pub link: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// Insertable struct for attaching a tag to a recipe.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipe_tags)]
pub(crate) struct NewRecipeTagRow {
    pub recipe_id: i64,
    pub tag_id: i64,
}
