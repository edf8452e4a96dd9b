//! Line-delimited JSON orchestrator adapters.
//!
//! [`JsonLinesTransport`] reads one task object per line from any async
//! reader and [`JsonLinesTaskService`] writes one signal object per line to
//! any async writer. The worker binary wires them to stdin and stdout.
//!
//! The transport has no signal channel of its own, so a line it cannot
//! decode is never failed towards the orchestrator. When such a line still
//! carries a task `id` the drop is logged at error severity with that id;
//! the orchestrator redelivers the task once its lock expires.

use crate::external_task::{
    domain::{ExternalTask, FailureReport, TopicName},
    ports::{
        TaskService, TaskServiceError, TaskServiceResult, TaskTransport, TransportError,
        TransportResult,
    },
};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::RwLock;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::Mutex;

/// Transport decoding one task descriptor per input line.
///
/// Blank lines are skipped and undecodable lines are logged and skipped.
/// Undecodable lines that still name a task `id` are logged at error
/// severity with that id.
/// Tasks on topics that were never subscribed are still delivered so the
/// registry can fail them as unknown.
pub struct JsonLinesTransport<R> {
    lines: Mutex<Lines<R>>,
    subscriptions: RwLock<HashSet<TopicName>>,
}

impl<R> JsonLinesTransport<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    /// Creates a transport reading from `reader`.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
            subscriptions: RwLock::new(HashSet::new()),
        }
    }

    fn is_subscribed(&self, topic: &TopicName) -> TransportResult<bool> {
        let subscriptions = self
            .subscriptions
            .read()
            .map_err(|err| TransportError::io(std::io::Error::other(err.to_string())))?;
        Ok(subscriptions.contains(topic))
    }
}

#[async_trait]
impl<R> TaskTransport for JsonLinesTransport<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn subscribe(&self, topic: &TopicName) -> TransportResult<()> {
        let mut subscriptions = self
            .subscriptions
            .write()
            .map_err(|err| TransportError::io(std::io::Error::other(err.to_string())))?;
        subscriptions.insert(topic.clone());
        Ok(())
    }

    async fn next_task(&self) -> TransportResult<Option<ExternalTask>> {
        let mut lines = self.lines.lock().await;
        loop {
            let Some(line) = lines.next_line().await.map_err(TransportError::io)? else {
                return Ok(None);
            };
            let payload = line.trim();
            if payload.is_empty() {
                continue;
            }

            match ExternalTask::from_json(payload) {
                Ok(task) => {
                    if !self.is_subscribed(task.topic())? {
                        tracing::warn!(
                            task_id = task.id(),
                            topic = %task.topic(),
                            "delivering task for a topic without subscription"
                        );
                    }
                    return Ok(Some(task));
                }
                Err(err) => match recover_task_id(payload) {
                    Some(task_id) => tracing::error!(
                        task_id = %task_id,
                        error = %err,
                        "dropping undecodable task; it stays locked until lock expiry"
                    ),
                    None => tracing::warn!(error = %err, "skipping undecodable task line"),
                },
            }
        }
    }
}

fn recover_task_id(payload: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(payload).ok()?;
    let id = value.get("id")?.as_str()?.trim();
    (!id.is_empty()).then(|| id.to_owned())
}

#[derive(Debug, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case", rename_all_fields = "camelCase")]
enum SignalLine<'a> {
    Complete {
        task_id: &'a str,
    },
    Failure {
        task_id: &'a str,
        error_message: &'a str,
        error_details: &'a str,
        retries: u32,
        retry_timeout: u64,
    },
}

/// Signal adapter writing one JSON object per signal.
pub struct JsonLinesTaskService<W> {
    writer: Mutex<W>,
}

impl<W> JsonLinesTaskService<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Creates a service writing to `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    async fn write_signal(&self, signal: &SignalLine<'_>) -> TaskServiceResult<()> {
        let mut line = serde_json::to_vec(signal).map_err(TaskServiceError::transport)?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer
            .write_all(&line)
            .await
            .map_err(TaskServiceError::transport)?;
        writer.flush().await.map_err(TaskServiceError::transport)
    }
}

#[async_trait]
impl<W> TaskService for JsonLinesTaskService<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn complete(&self, task: &ExternalTask) -> TaskServiceResult<()> {
        self.write_signal(&SignalLine::Complete { task_id: task.id() })
            .await
    }

    async fn handle_failure(
        &self,
        task: &ExternalTask,
        report: &FailureReport,
    ) -> TaskServiceResult<()> {
        let retry_timeout = u64::try_from(report.retry_timeout().as_millis()).unwrap_or(u64::MAX);
        self.write_signal(&SignalLine::Failure {
            task_id: task.id(),
            error_message: report.error_message(),
            error_details: report.error_details(),
            retries: report.retries(),
            retry_timeout,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::io::Cursor;
    use std::sync::{Arc, Mutex as StdMutex};
    use std::time::Duration;
    use tracing::field::{Field, Visit};
    use tracing_subscriber::{
        Layer,
        layer::{Context, SubscriberExt},
    };

    /// Records the `task_id` field of every ERROR event.
    struct DroppedTasks(Arc<StdMutex<Vec<String>>>);

    struct TaskIdVisitor(Option<String>);

    impl Visit for TaskIdVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "task_id" {
                self.0 = Some(format!("{value:?}"));
            }
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for DroppedTasks {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::ERROR {
                let mut visitor = TaskIdVisitor(None);
                event.record(&mut visitor);
                self.0
                    .lock()
                    .expect("dropped tasks lock")
                    .push(visitor.0.unwrap_or_default());
            }
        }
    }

    fn topic(name: &str) -> TopicName {
        TopicName::new(name).expect("valid topic")
    }

    #[tokio::test]
    async fn transport_skips_blank_and_undecodable_lines() {
        let input = "\n{\"id\":\"t-1\",\"topic\":\"publish-article\",\"businessKey\":\"k\"}\n\
                     garbage\n\
                     {\"id\":\"t-2\",\"topic\":\"other\"}\n";
        let transport = JsonLinesTransport::new(Cursor::new(input.as_bytes().to_vec()));
        transport
            .subscribe(&topic("publish-article"))
            .await
            .expect("subscribe should succeed");

        let first = transport
            .next_task()
            .await
            .expect("read should succeed")
            .expect("first task should exist");
        let second = transport
            .next_task()
            .await
            .expect("read should succeed")
            .expect("second task should exist");
        let end = transport.next_task().await.expect("read should succeed");

        assert_eq!(first.id(), "t-1");
        assert_eq!(first.business_key(), Some("k"));
        assert_eq!(second.topic().as_str(), "other");
        assert!(end.is_none());
    }

    #[tokio::test]
    async fn service_writes_one_signal_per_line() {
        let service = JsonLinesTaskService::new(Vec::new());
        let task = ExternalTask::new("t-7", topic("publish-article"));
        let report = FailureReport::retryable(
            "Publish Article Failed",
            "upstream unavailable",
            4,
            Duration::from_millis(5_000),
        );

        service.complete(&task).await.expect("complete should write");
        service
            .handle_failure(&task, &report)
            .await
            .expect("failure should write");

        let written = String::from_utf8(service.into_inner()).expect("utf-8 output");
        let lines: Vec<Value> = written
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect();

        assert_eq!(
            lines,
            vec![
                json!({"signal": "complete", "taskId": "t-7"}),
                json!({
                    "signal": "failure",
                    "taskId": "t-7",
                    "errorMessage": "Publish Article Failed",
                    "errorDetails": "upstream unavailable",
                    "retries": 4,
                    "retryTimeout": 5000
                }),
            ]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn unroutable_task_is_reported_with_its_id_and_skipped() {
        let dropped = Arc::new(StdMutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(DroppedTasks(Arc::clone(&dropped)));
        let _guard = tracing::subscriber::set_default(subscriber);
        let input = "{\"id\":\"t-blank\",\"topic\":\"  \"}\n\
                     {\"id\":\"t-none\"}\n\
                     {\"topic\":\"\"}\n\
                     garbage\n\
                     {\"id\":\"t-ok\",\"topic\":\"publish-article\"}\n";
        let transport = JsonLinesTransport::new(Cursor::new(input.as_bytes().to_vec()));

        let delivered = transport
            .next_task()
            .await
            .expect("read should succeed")
            .expect("routable task should be delivered");

        assert_eq!(delivered.id(), "t-ok");
        assert_eq!(
            dropped.lock().expect("dropped tasks lock").as_slice(),
            ["t-blank".to_owned(), "t-none".to_owned()]
        );
    }
}
