//! Service objects implementing the application's data access and rules
//!
//! Each service receives the pool handle at construction and the caller
//! identity per operation; there is no ambient global state.

pub mod favorites;
pub mod ingredients;
pub mod moderation;
pub mod pantry;
pub mod recipes;
pub mod shopping;
pub mod suggestions;
pub mod users;
