pub mod mock;
pub mod registry;

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Argument mapping carried by every invocation: string keys to arbitrary
/// JSON values.
pub type Args = serde_json::Map<String, Value>;

/// A unit of hosted business logic.
///
/// `load` runs exactly once per process before any `generate` call is
/// dispatched; it covers whatever cold-start work the handler needs (model
/// loading, warmup). `generate` must be safe to call concurrently: handlers
/// are assumed stateless across calls.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn load(&self) -> Result<()>;

    async fn generate(&self, args: &Args) -> Result<Value>;
}

/// Identifies which handler a host process serves. Immutable, set at startup
/// from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerDescriptor {
    pub name: String,
}

impl HandlerDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
