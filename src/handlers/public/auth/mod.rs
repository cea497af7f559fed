// handlers/public/auth/mod.rs - Account creation and token acquisition
//
// Neither endpoint requires a token; login is where tokens come from.

pub mod login; // POST /login
pub mod register; // POST /register
pub mod utils;

pub use login::login;
pub use register::register;
