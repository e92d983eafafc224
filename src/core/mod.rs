pub mod endpoint;
pub mod filter;
pub mod provider;
