// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod checkout;
pub mod gallery;
pub mod photo;

pub use checkout::*;
pub use gallery::*;
pub use photo::*;
