//! API Module
//!
//! HTTP handlers and routing for the smart cache admin service.
//!
//! # Endpoints
//! - `PUT /cache` - Store a value with a strategy
//! - `GET /cache/:key` - Retrieve a value, counting a hit or miss
//! - `DELETE /cache/:key` - Remove a key
//! - `POST /cache/clear` - Empty the cache and reset statistics
//! - `GET /stats` - Hit/miss/set statistics
//! - `POST /stats/reset` - Reset statistics only
//! - `POST /preload` - Fetch remote resources into the cache
//! - `GET /health` - Health check endpoint

pub mod extract;
pub mod handlers;
pub mod routes;

pub use extract::JsonBody;
pub use handlers::*;
pub use routes::create_router;
