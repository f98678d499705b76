pub mod auth;
pub mod env;
pub mod types;
pub mod utils;
