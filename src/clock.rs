use async_trait::async_trait;
use std::time::Duration;

/// Injectable sleep capability. Every courtesy delay in the engagement loop
/// goes through this seam so tests can run passes without wall-clock time.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real clock backed by the tokio timer.
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
