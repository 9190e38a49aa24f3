use async_trait::async_trait;
use tokio::{
    io::AsyncWrite,
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use super::{AnalyticsManager, AnalyticsRecord, DeliveryError, RecordWriter};
use crate::tenant::TenantContext;

/// The records forwarded for one access log batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordBatch {
    pub tenant: TenantContext,
    pub records: Vec<AnalyticsRecord>,
}

/// An [`AnalyticsManager`] that queues batches in a bounded buffer drained
/// by a background task.
///
/// `send_records` waits for buffer capacity; callers bound that wait.
#[derive(Clone, Debug)]
pub struct BufferedManager {
    sender: mpsc::Sender<RecordBatch>,
}

impl BufferedManager {
    /// Spawns the drain task writing into `writer`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new<T>(capacity: usize, writer: RecordWriter<T>) -> (Self, DrainHandle)
    where
        T: AsyncWrite + Send + Unpin + 'static,
    {
        let (sender, receiver) = mpsc::channel(capacity);
        let (close, closed) = oneshot::channel();
        let task = tokio::spawn(drain(receiver, writer, closed));

        (Self { sender }, DrainHandle { close, task })
    }
}

#[async_trait]
impl AnalyticsManager for BufferedManager {
    async fn send_records(
        &self,
        tenant: &TenantContext,
        records: Vec<AnalyticsRecord>,
    ) -> Result<(), DeliveryError> {
        let batch = RecordBatch {
            tenant: tenant.clone(),
            records,
        };
        self.sender
            .send(batch)
            .await
            .map_err(|_| DeliveryError::Closed)
    }
}

/// Controls the drain task of a [`BufferedManager`].
#[derive(Debug)]
pub struct DrainHandle {
    close: oneshot::Sender<()>,
    task: JoinHandle<Result<(), ()>>,
}

impl DrainHandle {
    /// Stops accepting new batches, writes everything already buffered and
    /// flushes the output.
    pub async fn finish(self) -> Result<(), ()> {
        // The task may already be gone after a write error.
        let _ = self.close.send(());
        self.task.await.map_err(|error| {
            error!(message = "Analytics drain task failed.", %error);
        })?
    }
}

async fn drain<T>(
    mut receiver: mpsc::Receiver<RecordBatch>,
    mut writer: RecordWriter<T>,
    mut closed: oneshot::Receiver<()>,
) -> Result<(), ()>
where
    T: AsyncWrite + Send + Unpin,
{
    loop {
        tokio::select! {
            batch = receiver.recv() => match batch {
                Some(batch) => writer.write_batch(batch).await?,
                None => break,
            },
            _ = &mut closed => {
                receiver.close();
                while let Some(batch) = receiver.recv().await {
                    writer.write_batch(batch).await?;
                }
                break;
            }
        }
    }

    writer.flush().await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::AsyncReadExt;

    use super::*;

    fn records(count: usize) -> Vec<AnalyticsRecord> {
        (0..count)
            .map(|index| AnalyticsRecord {
                request_uri: format!("/{index}"),
                ..Default::default()
            })
            .collect()
    }

    #[tokio::test]
    async fn drains_buffered_batches_on_finish() {
        let (output, mut input) = tokio::io::duplex(64 * 1024);
        let (manager, drain) = BufferedManager::new(8, RecordWriter::new(output));
        let tenant = TenantContext::new("org", "env");

        manager.send_records(&tenant, records(2)).await.unwrap();
        manager.send_records(&tenant, records(3)).await.unwrap();
        drain.finish().await.unwrap();

        let mut written = String::new();
        input.read_to_string(&mut written).await.unwrap();
        assert_eq!(written.lines().count(), 5);
    }

    #[tokio::test]
    async fn rejects_sends_after_finish() {
        let (manager, drain) = BufferedManager::new(1, RecordWriter::new(Vec::new()));
        drain.finish().await.unwrap();

        let result = manager
            .send_records(&TenantContext::new("org", "env"), records(1))
            .await;

        assert!(matches!(result, Err(DeliveryError::Closed)));
    }

    #[tokio::test(start_paused = true)]
    async fn full_buffer_applies_backpressure() {
        // A zero-sized duplex never accepts a write, so the drain task stalls
        // on the first batch and the queue fills up behind it.
        let (output, _input) = tokio::io::duplex(1);
        let (manager, _drain) = BufferedManager::new(1, RecordWriter::new(output));
        let tenant = TenantContext::new("org", "env");

        manager.send_records(&tenant, records(64)).await.unwrap();
        manager.send_records(&tenant, records(64)).await.unwrap();
        let blocked = tokio::time::timeout(
            Duration::from_secs(1),
            manager.send_records(&tenant, records(1)),
        )
        .await;

        assert!(blocked.is_err());
    }
}
