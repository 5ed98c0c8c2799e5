// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod gallery_repository;
pub mod photo_repository;
pub mod store;

pub use gallery_repository::*;
pub use photo_repository::*;
pub use store::*;
