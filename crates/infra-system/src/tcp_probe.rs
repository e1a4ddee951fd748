// TCP reachability probe
// reason: tokio for async connect with a bounded wait
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, warn};

use healthprobe_core::domain::{ProbeExtras, ProbeLevel, ProbeResult, ProbeStatus};
use healthprobe_core::port::{Probe, ProbeError, ProbeOutcome};

/// Checks that a `host:port` target accepts TCP connections
///
/// - Basic: connects within the timeout
/// - Extended: also reports WARNING when connecting took more than half the timeout
/// - Thorough: extended checks plus target, peer address and connect time as extras
pub struct TcpConnectProbe {
    name: String,
    target: String,
    timeout: Duration,
}

impl TcpConnectProbe {
    /// Create a probe for `target` (e.g. `db.internal:5432`)
    ///
    /// # Example
    /// ```ignore
    /// let probe = TcpConnectProbe::new("127.0.0.1:5432", Duration::from_secs(2));
    /// ```
    pub fn new(target: impl Into<String>, timeout: Duration) -> Self {
        let target = target.into();
        Self {
            name: format!("TCP probe {}", target),
            target,
            timeout,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Build the result for a connection that succeeded
    pub fn assess(
        &self,
        level: ProbeLevel,
        elapsed: Duration,
        peer: Option<SocketAddr>,
    ) -> ProbeResult {
        if level == ProbeLevel::Basic {
            return ProbeResult::new(
                self.name.clone(),
                ProbeStatus::Ok,
                format!("OK - {} accepted a connection.", self.target),
            );
        }

        let connect_ms = elapsed.as_millis();
        let (status, message) = if elapsed > self.timeout / 2 {
            (
                ProbeStatus::Warning,
                format!(
                    "SLOW - {} took {}ms to accept a connection (timeout {}ms).",
                    self.target,
                    connect_ms,
                    self.timeout.as_millis()
                ),
            )
        } else {
            (
                ProbeStatus::Ok,
                format!("OK - {} accepted a connection in {}ms.", self.target, connect_ms),
            )
        };

        if level < ProbeLevel::Thorough {
            return ProbeResult::new(self.name.clone(), status, message);
        }

        let mut extras = ProbeExtras::new();
        extras.insert("target".to_string(), self.target.clone());
        extras.insert(
            "peer_addr".to_string(),
            peer.map(|addr| addr.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        );
        extras.insert("connect_ms".to_string(), connect_ms.to_string());

        ProbeResult::thorough(self.name.clone(), status, message, extras)
    }
}

#[async_trait]
impl Probe for TcpConnectProbe {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, level: ProbeLevel) -> ProbeOutcome {
        let start = Instant::now();

        let stream = match timeout(self.timeout, TcpStream::connect(&self.target)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                warn!(addr = %self.target, error = %e, "TCP connect failed");
                return Err(ProbeError::Unreachable(format!("{}: {}", self.target, e)));
            }
            Err(_) => {
                warn!(
                    addr = %self.target,
                    timeout_ms = %self.timeout.as_millis(),
                    "TCP connect timed out"
                );
                return Err(ProbeError::Timeout(self.timeout.as_millis() as u64));
            }
        };

        let elapsed = start.elapsed();
        let peer = stream.peer_addr().ok();
        drop(stream);

        debug!(
            addr = %self.target,
            level = %level,
            connect_ms = %elapsed.as_millis(),
            "TCP connect succeeded"
        );

        Ok(self.assess(level, elapsed, peer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_reachable_target() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let probe = TcpConnectProbe::new(addr.to_string(), Duration::from_secs(2));

        let result = probe.execute(ProbeLevel::Basic).await.unwrap();

        assert_eq!(result.status(), ProbeStatus::Ok);
        assert_eq!(result.source_name(), format!("TCP probe {}", addr));
    }

    #[tokio::test]
    async fn test_thorough_reports_peer() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let probe = TcpConnectProbe::new(addr.to_string(), Duration::from_secs(2));

        let result = probe.execute(ProbeLevel::Thorough).await.unwrap();
        let extras = result.extras().unwrap();

        assert_eq!(extras.get("peer_addr"), Some(&addr.to_string()));
        assert_eq!(extras.get("target"), Some(&addr.to_string()));
        assert!(extras.contains_key("connect_ms"));
    }

    #[tokio::test]
    async fn test_refused_connection_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let probe = TcpConnectProbe::new(addr.to_string(), Duration::from_secs(2));
        let outcome = probe.execute(ProbeLevel::Basic).await;

        match outcome {
            Err(e) => assert_eq!(e.proposed_status(), ProbeStatus::Error),
            Ok(result) => panic!("expected refusal, got {:?}", result),
        }
    }

    #[test]
    fn test_slow_connect_warns_on_extended() {
        let probe = TcpConnectProbe::new("db.internal:5432", Duration::from_millis(1000));

        let fast = probe.assess(ProbeLevel::Extended, Duration::from_millis(20), None);
        assert_eq!(fast.status(), ProbeStatus::Ok);

        let slow = probe.assess(ProbeLevel::Extended, Duration::from_millis(700), None);
        assert_eq!(slow.status(), ProbeStatus::Warning);
        assert!(slow.message().starts_with("SLOW - db.internal:5432 took 700ms"));

        // Basic only cares that the connection succeeded
        let basic = probe.assess(ProbeLevel::Basic, Duration::from_millis(700), None);
        assert_eq!(basic.status(), ProbeStatus::Ok);
    }
}
