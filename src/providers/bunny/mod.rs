//! Bunny.net DNS provider implementation

pub mod annotations;
pub mod client;
pub mod error;
pub mod mapper;
pub mod provider;
pub mod types;


pub use client::{BunnyApi, BunnyClient, DEFAULT_API_URL};
pub use provider::{BunnyProvider, Options};
