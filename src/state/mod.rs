pub mod auth;
pub mod dashboard;
pub mod feedback;
pub mod login;
pub mod my_books;
pub mod pagination;
pub mod profile;
pub mod search;
