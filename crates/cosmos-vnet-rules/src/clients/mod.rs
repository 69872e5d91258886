//! Type-safe clients for the resource actors.

pub mod database_account_client;
pub mod network_client;
pub mod resource_group_client;

pub use database_account_client::DatabaseAccountClient;
pub use network_client::NetworkClient;
pub use resource_group_client::ResourceGroupClient;
