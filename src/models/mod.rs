pub mod client;
pub mod session;
pub mod task;
pub mod token;
pub mod user;
