#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "Users, categories and tasks behind a bearer-token REST API: domain models,"]
#![doc = "authentication, the persistence seam, routing configuration and error handling."]
#![doc = "The binary (`main.rs`) only reads configuration, picks a store and starts the server."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

pub use error::AppError;
