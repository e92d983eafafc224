use crate::core::endpoint::{Changes, Endpoint};
use crate::core::filter::DomainFilter;
use crate::error::Error;
use async_trait::async_trait;

/// The contract a DNS provider exposes to the webhook layer: capability
/// negotiation, the current record inventory, change application, and
/// endpoint adjustment before diffing.
#[async_trait]
pub trait Provider: Send + Sync {
    fn domain_filter(&self) -> DomainFilter;
    async fn records(&self) -> Result<Vec<Endpoint>, Error>;
    async fn apply_changes(&self, changes: Changes) -> Result<(), Error>;
    async fn adjust_endpoints(&self, endpoints: Vec<Endpoint>) -> Result<Vec<Endpoint>, Error>;
}
