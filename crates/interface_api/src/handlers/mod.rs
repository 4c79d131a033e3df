//! Request handlers

pub mod items;
pub mod claims;
pub mod user;
pub mod health;
