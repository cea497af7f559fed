// handlers/protected/mod.rs - Handlers that mutate posts
//
// When `security.require_auth` is on, the router puts these behind
// `jwt_auth_middleware` and the handlers read the `AuthUser` it inserts.
// With it off they run anonymously and the body names the owner.

pub mod posts;
