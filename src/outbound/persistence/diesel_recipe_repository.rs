//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! Recipe rows and their tag attachments are written in one transaction, so
//! a failed write never leaves a half-created recipe behind. Reads batch-load
//! attachments with a single join instead of a query per recipe.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError};
use crate::domain::{Price, Recipe, RecipeFieldChanges, RecipeFields, Tag, UserId};

use super::models::{NewRecipeRow, NewRecipeTagRow, RecipeRow, RecipeRowChanges, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{recipe_tags, recipes, tags};

/// Diesel-backed implementation of the `RecipeRepository` port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain recipe repository errors.
fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            RecipeRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain recipe repository errors.
fn map_diesel_error(error: diesel::result::Error) -> RecipeRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => RecipeRepositoryError::not_found(),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RecipeRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => RecipeRepositoryError::query("database error"),
        _ => RecipeRepositoryError::query("database error"),
    }
}

fn row_to_tag(row: TagRow) -> Tag {
    Tag {
        id: row.id,
        owner_id: UserId::from_uuid(row.owner_id),
        name: row.name,
    }
}

/// Convert a database row plus its attached tags to a domain recipe.
fn row_to_recipe(row: RecipeRow, tags: Vec<Tag>) -> Recipe {
    Recipe {
        id: row.id,
        owner_id: UserId::from_uuid(row.owner_id),
        title: row.title,
        #[expect(
            clippy::cast_sign_loss,
            reason = "time_minutes is validated non-negative before insert"
        )]
        time_minutes: row.time_minutes as u32,
        price: Price::from_minor_units(row.price_cents),
        link: row.link,
        description: row.description,
        image: row.image,
        tags,
    }
}

/// Cast validated minutes (u32) to the database column type (i32).
#[expect(
    clippy::cast_possible_wrap,
    reason = "validation caps time_minutes at i32::MAX"
)]
fn cast_minutes_for_db(minutes: u32) -> i32 {
    minutes as i32
}

/// Load the attached tags for each of `recipe_ids`, name descending within
/// each recipe.
async fn load_attached_tags(
    conn: &mut AsyncPgConnection,
    recipe_ids: &[i64],
) -> Result<HashMap<i64, Vec<Tag>>, diesel::result::Error> {
    let rows: Vec<(i64, TagRow)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(recipe_ids))
        .order((recipe_tags::recipe_id, tags::name.desc()))
        .select((recipe_tags::recipe_id, TagRow::as_select()))
        .load(conn)
        .await?;

    let mut grouped: HashMap<i64, Vec<Tag>> = HashMap::with_capacity(recipe_ids.len());
    for (recipe_id, tag_row) in rows {
        grouped.entry(recipe_id).or_default().push(row_to_tag(tag_row));
    }
    Ok(grouped)
}

/// Replace a recipe's attachments with exactly `tag_ids`.
async fn replace_attachments(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    tag_ids: &[i64],
) -> Result<(), diesel::result::Error> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
        .execute(conn)
        .await?;
    insert_attachments(conn, recipe_id, tag_ids).await
}

async fn insert_attachments(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    tag_ids: &[i64],
) -> Result<(), diesel::result::Error> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    let attachment_rows: Vec<NewRecipeTagRow> = tag_ids
        .iter()
        .map(|&tag_id| NewRecipeTagRow { recipe_id, tag_id })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&attachment_rows)
        .execute(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn create(
        &self,
        owner: &UserId,
        fields: RecipeFields,
        tag_ids: Vec<i64>,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner_uuid = *owner.as_uuid();

        let recipe = conn
            .transaction(|conn| {
                async move {
                    let new_row = NewRecipeRow {
                        owner_id: owner_uuid,
                        title: &fields.title,
                        time_minutes: cast_minutes_for_db(fields.time_minutes),
                        price_cents: fields.price.minor_units(),
                        link: fields.link.as_deref(),
                        description: fields.description.as_deref(),
                    };

                    let row: RecipeRow = diesel::insert_into(recipes::table)
                        .values(&new_row)
                        .returning(RecipeRow::as_returning())
                        .get_result(conn)
                        .await?;

                    insert_attachments(conn, row.id, &tag_ids).await?;
                    let mut attached = load_attached_tags(conn, &[row.id]).await?;
                    let recipe_tags = attached.remove(&row.id).unwrap_or_default();
                    Ok::<_, diesel::result::Error>(row_to_recipe(row, recipe_tags))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        debug!(recipe_id = recipe.id, owner = %owner, "recipe row created");
        Ok(recipe)
    }

    async fn find(&self, id: i64, owner: &UserId) -> Result<Recipe, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<RecipeRow> = recipes::table
            .filter(recipes::id.eq(id).and(recipes::owner_id.eq(owner.as_uuid())))
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let row = row.ok_or_else(RecipeRepositoryError::not_found)?;
        let mut attached = load_attached_tags(&mut conn, &[row.id])
            .await
            .map_err(map_diesel_error)?;
        let recipe_tags = attached.remove(&row.id).unwrap_or_default();
        Ok(row_to_recipe(row, recipe_tags))
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<RecipeRow> = recipes::table
            .filter(recipes::owner_id.eq(owner.as_uuid()))
            .order(recipes::id.desc())
            .select(RecipeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let recipe_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut attached = load_attached_tags(&mut conn, &recipe_ids)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let recipe_tags = attached.remove(&row.id).unwrap_or_default();
                row_to_recipe(row, recipe_tags)
            })
            .collect())
    }

    async fn update(
        &self,
        id: i64,
        owner: &UserId,
        changes: RecipeFieldChanges,
        tag_ids: Option<Vec<i64>>,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner_uuid = *owner.as_uuid();

        let updated = conn
            .transaction(|conn| {
                async move {
                    // Diesel rejects an all-None changeset, and a tags-only
                    // PATCH is legitimate, so fall back to a plain read.
                    let row: Option<RecipeRow> = if changes.is_empty() {
                        recipes::table
                            .filter(recipes::id.eq(id).and(recipes::owner_id.eq(owner_uuid)))
                            .select(RecipeRow::as_select())
                            .first(conn)
                            .await
                            .optional()?
                    } else {
                        let changeset = RecipeRowChanges {
                            title: changes.title.as_deref(),
                            time_minutes: changes.time_minutes.map(cast_minutes_for_db),
                            price_cents: changes.price.map(Price::minor_units),
                            link: changes.link.as_deref(),
                            description: changes.description.as_deref(),
                        };
                        diesel::update(
                            recipes::table.filter(
                                recipes::id.eq(id).and(recipes::owner_id.eq(owner_uuid)),
                            ),
                        )
                        .set(&changeset)
                        .returning(RecipeRow::as_returning())
                        .get_result(conn)
                        .await
                        .optional()?
                    };

                    let Some(row) = row else {
                        return Ok(None);
                    };

                    if let Some(tag_ids) = &tag_ids {
                        replace_attachments(conn, row.id, tag_ids).await?;
                    }
                    let mut attached = load_attached_tags(conn, &[row.id]).await?;
                    let recipe_tags = attached.remove(&row.id).unwrap_or_default();
                    Ok::<_, diesel::result::Error>(Some(row_to_recipe(row, recipe_tags)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        updated.ok_or_else(RecipeRepositoryError::not_found)
    }

    async fn delete(&self, id: i64, owner: &UserId) -> Result<Recipe, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Attachment rows cascade away with the recipe; tags stay.
        let row: Option<RecipeRow> = diesel::delete(
            recipes::table.filter(recipes::id.eq(id).and(recipes::owner_id.eq(owner.as_uuid()))),
        )
        .returning(RecipeRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        row.map(|row| row_to_recipe(row, Vec::new()))
            .ok_or_else(RecipeRepositoryError::not_found)
    }

    async fn set_image(
        &self,
        id: i64,
        owner: &UserId,
        image: &str,
    ) -> Result<Option<String>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner_uuid = *owner.as_uuid();

        let previous = conn
            .transaction(|conn| {
                async move {
                    let current: Option<Option<String>> = recipes::table
                        .filter(recipes::id.eq(id).and(recipes::owner_id.eq(owner_uuid)))
                        .select(recipes::image)
                        .first(conn)
                        .await
                        .optional()?;

                    let Some(previous) = current else {
                        return Ok(None);
                    };

                    diesel::update(
                        recipes::table
                            .filter(recipes::id.eq(id).and(recipes::owner_id.eq(owner_uuid))),
                    )
                    .set(recipes::image.eq(image))
                    .execute(conn)
                    .await?;

                    Ok::<_, diesel::result::Error>(Some(previous))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        previous.ok_or_else(RecipeRepositoryError::not_found)
    }
}
