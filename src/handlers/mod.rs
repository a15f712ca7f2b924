pub mod admin;
pub mod fallback;
pub mod health;
pub mod registration;
pub mod session;
pub mod users;
