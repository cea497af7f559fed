// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Account creation, login, and every read-only endpoint.

pub mod auth;
pub mod posts;
pub mod system;
pub mod users;
