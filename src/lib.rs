pub mod auth;
pub mod core;
pub mod handlers;
pub mod mail;
pub mod models;
pub mod registration;
pub mod signals;
pub mod stores;
pub mod utils;
pub mod validation;
pub mod wal;
