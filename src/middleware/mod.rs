//! Actix middleware shared by all HTTP routes.

pub mod trace;

pub use trace::Trace;
