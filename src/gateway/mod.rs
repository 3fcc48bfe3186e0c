//! # Gateway Synchronisation
//!
//! CRUD access to the remote gateway's API definition collection.

pub mod client;
pub mod collision;

pub use client::{join_url, GatewayClient, APIS_ENDPOINT};
pub use collision::find_collision;

use async_trait::async_trait;

use crate::domain::Definition;
use crate::errors::Result;

/// Operations the definition sync needs from a gateway
#[async_trait]
pub trait GatewayApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Definition>>;

    async fn create(&self, def: &Definition) -> Result<String>;

    async fn update(&self, def: &Definition) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}

#[async_trait]
impl GatewayApi for GatewayClient {
    async fn list(&self) -> Result<Vec<Definition>> {
        GatewayClient::list(self).await
    }

    async fn create(&self, def: &Definition) -> Result<String> {
        GatewayClient::create(self, def).await
    }

    async fn update(&self, def: &Definition) -> Result<()> {
        GatewayClient::update(self, def).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        GatewayClient::delete(self, id).await
    }
}
