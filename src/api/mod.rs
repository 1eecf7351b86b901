pub mod admin;
pub mod auth;
pub mod clients;
pub mod tasks;
pub mod token;
pub mod user;
