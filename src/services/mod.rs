pub mod auth_service;
pub mod scope;
pub mod session_service;
pub mod token_service;
