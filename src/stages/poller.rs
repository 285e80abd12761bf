use crate::adapters::api::ReadinessProbe;
use crate::core::context::{RunContext, StageId, StageOutput};
use crate::core::runner::Stage;
use crate::utils::error::{PipelineError, Result};
use std::time::Duration;
use tokio::time::Instant;

/// Waits for the external resource to become ready.
///
/// This loop IS the retry mechanism: transient probe faults are logged
/// and absorbed, and the only exits are a ready payload or
/// `ReadinessTimeout`. The stage sleeps the configured interval between
/// ticks rather than busy-looping.
pub struct ReadinessPoller<P: ReadinessProbe> {
    probe: P,
    poll_interval: Duration,
    timeout: Duration,
}

impl<P: ReadinessProbe> ReadinessPoller<P> {
    pub fn new(probe: P, poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            probe,
            poll_interval,
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl<P: ReadinessProbe> Stage for ReadinessPoller<P> {
    fn id(&self) -> StageId {
        StageId::ReadinessPoller
    }

    async fn run(&self, _ctx: &RunContext) -> Result<StageOutput> {
        let deadline = Instant::now() + self.timeout;

        loop {
            match self.probe.poke().await {
                Ok(Some(payload)) => {
                    tracing::info!("📡 External resource ready");
                    return Ok(StageOutput::Payload(payload));
                }
                Ok(None) => {
                    tracing::debug!("📡 External resource not ready yet");
                }
                Err(e) => {
                    tracing::warn!("⚠️ Probe failed, treating as not ready: {}", e);
                }
            }

            if Instant::now() >= deadline {
                return Err(PipelineError::ReadinessTimeout {
                    timeout: self.timeout,
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Probe that reports not-ready (or a transient fault) a fixed number
    /// of times before handing out a payload.
    struct FlakyProbe {
        calls: AtomicU32,
        misses_before_ready: u32,
        fail_with_error: bool,
    }

    impl FlakyProbe {
        fn not_ready(misses_before_ready: u32) -> Self {
            Self {
                calls: AtomicU32::new(0),
                misses_before_ready,
                fail_with_error: false,
            }
        }

        fn erroring(misses_before_ready: u32) -> Self {
            Self {
                calls: AtomicU32::new(0),
                misses_before_ready,
                fail_with_error: true,
            }
        }
    }

    #[async_trait]
    impl ReadinessProbe for FlakyProbe {
        async fn poke(&self) -> Result<Option<serde_json::Value>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.misses_before_ready {
                if self.fail_with_error {
                    return Err(PipelineError::Io(std::io::Error::new(
                        std::io::ErrorKind::ConnectionRefused,
                        "connection refused",
                    )));
                }
                return Ok(None);
            }
            Ok(Some(serde_json::json!({"id": 7})))
        }
    }

    struct NeverReadyProbe;

    #[async_trait]
    impl ReadinessProbe for NeverReadyProbe {
        async fn poke(&self) -> Result<Option<serde_json::Value>> {
            Ok(None)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_returns_payload_once_ready() {
        let poller = ReadinessPoller::new(
            FlakyProbe::not_ready(2),
            Duration::from_millis(10),
            Duration::from_secs(5),
        );
        let ctx = RunContext::new("test".to_string());

        let output = poller.run(&ctx).await.unwrap();
        match output {
            StageOutput::Payload(payload) => assert_eq!(payload["id"], 7),
            other => panic!("expected payload, got {}", other.kind()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_probe_errors_do_not_fail_the_stage() {
        let poller = ReadinessPoller::new(
            FlakyProbe::erroring(3),
            Duration::from_millis(10),
            Duration::from_secs(5),
        );
        let ctx = RunContext::new("test".to_string());

        assert!(poller.run(&ctx).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_bounds() {
        let poll_interval = Duration::from_millis(10);
        let timeout = Duration::from_millis(95);
        let poller = ReadinessPoller::new(NeverReadyProbe, poll_interval, timeout);
        let ctx = RunContext::new("test".to_string());

        let started = Instant::now();
        let err = poller.run(&ctx).await.unwrap_err();
        let elapsed = started.elapsed();

        assert!(matches!(err, PipelineError::ReadinessTimeout { .. }));
        // Fails no earlier than the timeout, no later than one extra tick.
        assert!(elapsed >= timeout, "elapsed: {:?}", elapsed);
        assert!(elapsed <= timeout + poll_interval, "elapsed: {:?}", elapsed);
    }
}
