// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod archive_service;
pub mod batch;
pub mod checkout_service;
pub mod context;
pub mod gallery_service;
pub mod payment_client;
pub mod pricing;
pub mod storage_client;
pub mod upload_service;

pub use archive_service::*;
pub use batch::*;
pub use checkout_service::*;
pub use context::*;
pub use gallery_service::*;
pub use payment_client::*;
pub use storage_client::*;
pub use upload_service::*;
