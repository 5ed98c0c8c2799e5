// src/lib.rs
// DOCUMENTATION: Library root
// PURPOSE: Shared by the HTTP server and the upload tool

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
