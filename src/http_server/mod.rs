//! # HTTP Server Module
//!
//! Router assembly and server bootstrap.

pub mod config;
pub mod server;

pub use config::HttpServerConfig;
pub use server::{build_router, HttpServer};
