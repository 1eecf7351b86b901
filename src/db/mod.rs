pub mod credential_store;
pub mod task_store;
pub mod token_store;

pub use credential_store::CredentialStore;
pub use task_store::TaskStore;
pub use token_store::TokenStore;
