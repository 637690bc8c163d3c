//! Knowledge-sharing service.
//!
//! Articles are kept in memory and published under short, deterministic
//! share codes (see [`utils::share_code`]) so public links never expose
//! internal ids.

pub mod app;
pub mod config;
pub mod errors;
pub mod fixtures;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod types;
pub mod utils;
pub mod validations;
