//! User-owned recipe, tag, and recipe-image API.
//!
//! The crate follows a hexagonal layout: `domain` holds entities, services,
//! and port traits; `inbound` maps HTTP requests onto domain use-cases;
//! `outbound` provides Diesel persistence and filesystem storage adapters.

pub mod domain;
pub mod doc;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::trace::Trace;
