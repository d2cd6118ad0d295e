pub mod auth;
pub mod books;
pub mod client;
pub mod error;
pub mod feedback;
pub mod profile;
pub mod search;
pub mod types;
