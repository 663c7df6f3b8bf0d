//! Background log streaming from the log cache.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use stratus_api_models::{LogEnvelope, LogStream};
use stratus_client::LogCacheClient;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::actor::Actor;
use crate::error::ActorError;

/// How far back the first read looks, in seconds.
const INITIAL_LOOKBACK_SECS: i64 = 1;

/// One application log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    /// Decoded message text.
    pub message: String,
    /// Emission time.
    pub timestamp: DateTime<Utc>,
    /// Source type tag, e.g. `APP/PROC/WEB` or `STG`.
    pub source_type: String,
    /// Source instance.
    pub source_instance: String,
    /// Output stream.
    pub stream: LogStream,
}

impl LogMessage {
    /// Convert a log cache envelope; `None` for envelopes without a usable
    /// log payload or timestamp.
    #[must_use]
    pub fn from_envelope(envelope: &LogEnvelope) -> Option<Self> {
        let nanos = envelope.timestamp_nanos()?;
        let message = envelope.message()?;
        let stream = envelope.log.as_ref()?.stream;
        Some(Self {
            message,
            timestamp: DateTime::from_timestamp_nanos(nanos),
            source_type: envelope.source_type().to_string(),
            source_instance: envelope.instance_id.clone(),
            stream,
        })
    }
}

/// Receiving side of a running log stream.
#[derive(Debug)]
pub struct LogStreamHandle {
    /// Log lines in emission order.
    pub messages: mpsc::UnboundedReceiver<LogMessage>,
    /// Read failures; streaming continues after each.
    pub errors: mpsc::UnboundedReceiver<ActorError>,
    /// The producer task; finishes once cancelled or both receivers are dropped.
    pub task: JoinHandle<()>,
}

impl Actor {
    /// Spawn a task that tails the log cache for `app_guid` until `cancel`
    /// fires.
    #[must_use]
    pub fn stream_application_logs(
        &self,
        log_client: Arc<dyn LogCacheClient>,
        app_guid: &str,
        cancel: CancellationToken,
    ) -> LogStreamHandle {
        let (message_tx, messages) = mpsc::unbounded_channel();
        let (error_tx, errors) = mpsc::unbounded_channel();
        let source_id = app_guid.to_string();
        let interval = self.config.log_poll_interval;
        let start = Utc::now() - TimeDelta::seconds(INITIAL_LOOKBACK_SECS);
        let cursor = start.timestamp_nanos_opt().unwrap_or_default();

        let task = tokio::spawn(async move {
            let mut cursor = cursor;
            loop {
                if message_tx.is_closed() && error_tx.is_closed() {
                    break;
                }
                let read = tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    read = log_client.read(&source_id, cursor) => read,
                };
                match read {
                    Ok(envelopes) => {
                        for envelope in &envelopes {
                            let Some(nanos) = envelope.timestamp_nanos() else {
                                warn!(source = %source_id, "skipping log envelope without timestamp");
                                continue;
                            };
                            if nanos < cursor {
                                continue;
                            }
                            cursor = nanos.saturating_add(1);
                            match LogMessage::from_envelope(envelope) {
                                Some(message) => {
                                    if message_tx.send(message).is_err() {
                                        return;
                                    }
                                }
                                None => warn!(source = %source_id, "skipping malformed log envelope"),
                            }
                        }
                    }
                    Err(err) => {
                        debug!(source = %source_id, error = %err, "log cache read failed");
                        if error_tx.send(ActorError::LogCache(err)).is_err() {
                            return;
                        }
                    }
                }
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    () = sleep(interval) => {}
                }
            }
            debug!(source = %source_id, "log stream stopped");
        });

        LogStreamHandle {
            messages,
            errors,
            task,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::test_support::{actor_for, fast_config};
    use async_trait::async_trait;
    use httpmock::MockServer;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use stratus_client::{ClientError, ClientResult};

    struct ScriptedLogCache {
        reads: AtomicUsize,
        batches: Mutex<Vec<ClientResult<Vec<LogEnvelope>>>>,
    }

    impl ScriptedLogCache {
        fn new(batches: Vec<ClientResult<Vec<LogEnvelope>>>) -> Self {
            Self {
                reads: AtomicUsize::new(0),
                batches: Mutex::new(batches),
            }
        }
    }

    #[async_trait]
    impl LogCacheClient for ScriptedLogCache {
        async fn read(&self, _source_id: &str, _start_time: i64) -> ClientResult<Vec<LogEnvelope>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            let next = {
                let mut batches = self.batches.lock().expect("lock poisoned");
                if batches.is_empty() {
                    None
                } else {
                    Some(batches.remove(0))
                }
            };
            next.unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn envelope(nanos: i64, payload: &str) -> LogEnvelope {
        serde_json::from_value(json!({
            "timestamp": nanos.to_string(),
            "source_id": "app-guid",
            "instance_id": "0",
            "tags": {"source_type": "STG"},
            "log": {"payload": payload, "type": "OUT"}
        }))
        .expect("envelope should decode")
    }

    fn now_nanos() -> i64 {
        Utc::now().timestamp_nanos_opt().expect("time in range")
    }

    #[tokio::test]
    async fn lines_and_errors_arrive_until_cancelled() {
        let server = MockServer::start_async().await;
        let actor = actor_for(&server, fast_config());
        let base = now_nanos() + 1_000_000;
        let cache = Arc::new(ScriptedLogCache::new(vec![
            Ok(vec![envelope(base, "aGVsbG8="), envelope(base + 1, "d29ybGQ=")]),
            Err(ClientError::MissingUriParam {
                param: "source_id".to_string(),
            }),
            Ok(vec![envelope(base, "aGVsbG8=")]),
        ]));
        let cancel = CancellationToken::new();

        let mut handle = actor.stream_application_logs(cache.clone(), "app-guid", cancel.clone());

        let first = handle.messages.recv().await.expect("first line");
        let second = handle.messages.recv().await.expect("second line");
        assert_eq!(first.message, "hello");
        assert_eq!(second.message, "world");
        assert_eq!(second.source_type, "STG");
        assert!(matches!(
            handle.errors.recv().await,
            Some(ActorError::LogCache(_))
        ));

        while cache.reads.load(Ordering::SeqCst) < 4 {
            sleep(std::time::Duration::from_millis(1)).await;
        }
        cancel.cancel();
        handle.task.await.expect("log task should stop cleanly");

        let mut replayed = Vec::new();
        while let Ok(message) = handle.messages.try_recv() {
            replayed.push(message);
        }
        assert!(replayed.is_empty(), "duplicate envelope should be skipped");
    }

    #[tokio::test]
    async fn dropping_the_receivers_stops_the_task() {
        let server = MockServer::start_async().await;
        let actor = actor_for(&server, fast_config());
        let cache = Arc::new(ScriptedLogCache::new(vec![Ok(vec![envelope(
            now_nanos() + 1_000_000,
            "aGVsbG8=",
        )])]));

        let handle =
            actor.stream_application_logs(cache, "app-guid", CancellationToken::new());
        drop(handle.messages);
        drop(handle.errors);

        handle.task.await.expect("log task should stop once nobody listens");
    }

    #[test]
    fn envelopes_without_payload_are_skipped() {
        let envelope: LogEnvelope = serde_json::from_value(json!({
            "timestamp": "10",
            "source_id": "app-guid",
            "tags": {}
        }))
        .expect("envelope should decode");
        assert!(LogMessage::from_envelope(&envelope).is_none());
    }
}
