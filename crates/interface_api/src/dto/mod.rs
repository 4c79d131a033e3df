//! Request bodies accepted by the API

pub mod items;
pub mod claims;
