//! Bounded-concurrency gate for a shared backend
//!
//! Independent extraction runs share nothing except the backend's capacity.
//! A `ConcurrencyGate` is sized to the number of requests the backend accepts
//! at once; every `GatedGenerator` holding a clone of the gate waits for a
//! permit before calling through. The permit is an owned guard, so it is
//! released when the call finishes, fails, times out or is dropped.
//!
//! Time spent waiting for a permit is not part of a call's timeout.

use async_trait::async_trait;
use sift_domain::{ExternalServiceError, GeneratorClient, Message, MessageLog};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

/// Shared limit on in-flight backend requests
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyGate {
    /// Create a gate admitting `capacity` concurrent requests (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Maximum concurrent requests
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Wait for a permit
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, ExternalServiceError> {
        Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| ExternalServiceError::Connection("concurrency gate closed".to_string()))
    }
}

/// A generator that holds a gate permit for the duration of every call
pub struct GatedGenerator<G> {
    inner: G,
    gate: ConcurrencyGate,
}

impl<G: GeneratorClient> GatedGenerator<G> {
    /// Wrap `inner` behind `gate`
    pub fn new(inner: G, gate: ConcurrencyGate) -> Self {
        Self { inner, gate }
    }

    /// The gate this generator waits on
    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }

    async fn admit(&self) -> Result<OwnedSemaphorePermit, ExternalServiceError> {
        let permit = self.gate.acquire().await?;
        debug!(
            backend = self.inner.name(),
            available = self.gate.available(),
            "Acquired backend permit"
        );
        Ok(permit)
    }
}

#[async_trait]
impl<G: GeneratorClient> GeneratorClient for GatedGenerator<G> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(&self, log: &MessageLog) -> Result<Message, ExternalServiceError> {
        let _permit = self.admit().await?;
        self.inner.generate(log).await
    }

    async fn generate_within(&self, log: &MessageLog, limit: Duration) -> Result<Message, ExternalServiceError> {
        let _permit = self.admit().await?;
        self.inner.generate_within(log, limit).await
    }
}
