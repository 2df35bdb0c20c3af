//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. Diesel uses
//! them for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Owner-scoped tags table.
    ///
    /// `(owner_id, name)` carries a uniqueness constraint; get-or-create
    /// relies on it for race safety.
    tags (id) {
        /// Primary key: sequence-assigned identifier.
        id -> Int8,
        /// Owning user (UUID v4), assigned by the identity provider.
        owner_id -> Uuid,
        /// Tag name, case-sensitive, max 255 characters.
        name -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recipes table.
    recipes (id) {
        /// Primary key: sequence-assigned identifier.
        id -> Int8,
        /// Owning user (UUID v4), immutable after insert.
        owner_id -> Uuid,
        /// Recipe title, max 255 characters.
        title -> Varchar,
        /// Preparation time in minutes.
        time_minutes -> Int4,
        /// Price in minor currency units (cents).
        price_cents -> Int8,
        /// Optional external link, max 255 characters.
        link -> Nullable<Varchar>,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Stored image file reference, if an image has been attached.
        image -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recipe-to-tag attachment table.
    ///
    /// Rows cascade away with their recipe; tags themselves are never
    /// deleted through this table.
    recipe_tags (recipe_id, tag_id) {
        recipe_id -> Int8,
        tag_id -> Int8,
    }
}

diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));

diesel::allow_tables_to_appear_in_same_query!(recipes, recipe_tags, tags);
