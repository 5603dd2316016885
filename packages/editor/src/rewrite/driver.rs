//! Runs rewrite calls off the input loop.
//!
//! Each request becomes a tokio task bounded by a timeout. Results come back
//! as [`RewriteCompletion`]s on a channel the event loop drains, so edits
//! keep flowing while a call is out.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::controller::{RequestId, RewriteRequest};
use super::service::{RewriteService, RewriteServiceError};

const COMPLETION_BUFFER: usize = 100;

/// Service answer for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteCompletion {
    pub id: RequestId,
    pub result: Result<String, RewriteServiceError>,
}

pub struct RewriteDriver {
    service: Arc<dyn RewriteService>,
    timeout: Duration,
    completions: mpsc::Sender<RewriteCompletion>,
}

impl RewriteDriver {
    /// Driver plus the receiving end of its completions
    pub fn new(
        service: Arc<dyn RewriteService>,
        timeout: Duration,
    ) -> (Self, mpsc::Receiver<RewriteCompletion>) {
        let (tx, rx) = mpsc::channel(COMPLETION_BUFFER);
        (
            Self {
                service,
                timeout,
                completions: tx,
            },
            rx,
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Start the service call for `request`
    ///
    /// Aborting the returned handle stops the call; the controller still
    /// decides whether a delivered result is applied.
    pub fn spawn(&self, request: &RewriteRequest) -> JoinHandle<()> {
        let service = Arc::clone(&self.service);
        let tx = self.completions.clone();
        let timeout = self.timeout;
        let id = request.id;
        let input = request.input.clone();
        let command = request.command.clone();

        tokio::spawn(async move {
            let result = call_with_timeout(service.as_ref(), &input, &command, timeout).await;
            if tx.send(RewriteCompletion { id, result }).await.is_err() {
                tracing::debug!("Rewrite {} finished after the editor went away", id);
            }
        })
    }
}

/// Run one service call, mapping an elapsed timeout to `TimedOut`
pub async fn call_with_timeout(
    service: &dyn RewriteService,
    input: &str,
    command: &str,
    timeout: Duration,
) -> Result<String, RewriteServiceError> {
    match tokio::time::timeout(timeout, service.rewrite(input, command)).await {
        Ok(result) => result,
        Err(_) => Err(RewriteServiceError::TimedOut {
            after_ms: timeout.as_millis() as u64,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::CannedRewriter;
    use crate::selection::SelectionSnapshot;
    use async_trait::async_trait;

    struct Sleepy;

    #[async_trait]
    impl RewriteService for Sleepy {
        async fn rewrite(&self, text: &str, _command: &str) -> Result<String, RewriteServiceError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(text.to_string())
        }
    }

    fn request(id: RequestId) -> RewriteRequest {
        RewriteRequest {
            id,
            snapshot: SelectionSnapshot {
                anchor: 0,
                focus: 7,
                start: 0,
                end: 7,
                text: "teh cat".to_string(),
                revision: 0,
            },
            command: "improve grammar".to_string(),
            input: "teh cat".to_string(),
        }
    }

    #[tokio::test]
    async fn test_completion_arrives_on_channel() {
        let (driver, mut rx) = RewriteDriver::new(Arc::new(CannedRewriter::new()), Duration::from_secs(1));
        driver.spawn(&request(7));

        let completion = rx.recv().await.unwrap();
        assert_eq!(completion.id, 7);
        assert_eq!(
            completion.result,
            Ok("[AI Grammar Improved]: teh cat".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_service_times_out() {
        let (driver, mut rx) = RewriteDriver::new(Arc::new(Sleepy), Duration::from_millis(30));
        driver.spawn(&request(1));

        let completion = rx.recv().await.unwrap();
        assert_eq!(
            completion.result,
            Err(RewriteServiceError::TimedOut { after_ms: 30 })
        );
    }
}
