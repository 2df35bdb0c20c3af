//! Outbound adapters driven by the domain: database persistence and image
//! blob storage.

pub mod persistence;
pub mod storage;
