use std::fmt;

use tokio::net::TcpListener;
use tracing::{info, warn};

/// One (port, host) pair to attempt a listening socket on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindCandidate {
    pub port: u16,
    pub host: &'static str,
}

impl BindCandidate {
    pub const fn new(port: u16, host: &'static str) -> Self {
        Self { port, host }
    }

    fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for BindCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Candidates attempted at startup, in this exact order. The first one that
/// binds wins; trial order is part of the server's contract.
pub const BIND_CANDIDATES: [BindCandidate; 8] = [
    BindCandidate::new(3001, "127.0.0.1"),
    BindCandidate::new(3001, "localhost"),
    BindCandidate::new(3001, "0.0.0.0"),
    BindCandidate::new(8080, "127.0.0.1"),
    BindCandidate::new(8080, "localhost"),
    BindCandidate::new(8080, "0.0.0.0"),
    BindCandidate::new(3000, "127.0.0.1"),
    BindCandidate::new(5000, "127.0.0.1"),
];

/// Probes the candidate with a throwaway listener, then binds for real.
/// Another process can grab the port between the two binds; that is treated
/// like any other unavailable candidate, just logged louder.
pub async fn try_bind(candidate: &BindCandidate) -> Option<TcpListener> {
    let addr = candidate.addr();
    match TcpListener::bind(&addr).await {
        Ok(probe) => drop(probe),
        Err(e) => {
            info!("{} is not available: {}", candidate, e);
            return None;
        }
    }
    match TcpListener::bind(&addr).await {
        Ok(listener) => Some(listener),
        Err(e) => {
            warn!("Failed to bind {} after probe: {}", candidate, e);
            None
        }
    }
}

/// Walks the candidates in order and returns the first that binds, along
/// with its index so a caller can resume the scan after it.
pub async fn first_available(candidates: &[BindCandidate]) -> Option<(usize, TcpListener)> {
    for (idx, candidate) in candidates.iter().enumerate() {
        info!("Trying {}...", candidate);
        if let Some(listener) = try_bind(candidate).await {
            return Some((idx, listener));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reserves a port by binding to it, so the candidate under test is
    // guaranteed unavailable while the blocker is alive.
    async fn blocked_port() -> (TcpListener, u16) {
        let blocker = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = blocker.local_addr().unwrap().port();
        (blocker, port)
    }

    async fn free_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn skips_unavailable_candidates_and_binds_the_first_free_one() {
        let (_blocker_a, taken_a) = blocked_port().await;
        let (_blocker_b, taken_b) = blocked_port().await;
        let free = free_port().await;

        let candidates = [
            BindCandidate::new(taken_a, "127.0.0.1"),
            BindCandidate::new(taken_b, "127.0.0.1"),
            BindCandidate::new(free, "127.0.0.1"),
        ];

        let (idx, listener) = first_available(&candidates).await.unwrap();
        assert_eq!(idx, 2);
        assert_eq!(listener.local_addr().unwrap().port(), free);
    }

    #[tokio::test]
    async fn returns_none_when_every_candidate_is_taken() {
        let (_blocker, taken) = blocked_port().await;
        let candidates = [BindCandidate::new(taken, "127.0.0.1")];
        assert!(first_available(&candidates).await.is_none());
    }

    #[tokio::test]
    async fn try_bind_reports_unavailable_ports() {
        let (_blocker, taken) = blocked_port().await;
        assert!(try_bind(&BindCandidate::new(taken, "127.0.0.1"))
            .await
            .is_none());
    }

    #[test]
    fn candidate_order_is_fixed() {
        let expected = [
            (3001, "127.0.0.1"),
            (3001, "localhost"),
            (3001, "0.0.0.0"),
            (8080, "127.0.0.1"),
            (8080, "localhost"),
            (8080, "0.0.0.0"),
            (3000, "127.0.0.1"),
            (5000, "127.0.0.1"),
        ];
        for (candidate, (port, host)) in BIND_CANDIDATES.iter().zip(expected) {
            assert_eq!(candidate.port, port);
            assert_eq!(candidate.host, host);
        }
    }
}
