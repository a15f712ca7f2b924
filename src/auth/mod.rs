pub mod backend;
pub mod hasher;
pub mod manager;
