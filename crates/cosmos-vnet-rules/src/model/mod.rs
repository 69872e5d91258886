//! Plain data describing control-plane resources and the payloads that create or change them.

pub mod database_account;
pub mod network;
pub mod region;
pub mod resource_group;
pub mod resource_id;

pub use database_account::*;
pub use network::*;
pub use region::*;
pub use resource_group::*;
pub use resource_id::*;
