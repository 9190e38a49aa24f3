use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::{AnalyticsRecord, RecordBatch};
use crate::internal_events::{AnalyticsEncodeError, AnalyticsRecordsWritten, AnalyticsWriteError};

/// Writes records to an output as newline-delimited JSON.
pub struct RecordWriter<T> {
    output: T,
}

impl<T> RecordWriter<T>
where
    T: AsyncWrite + Send + Unpin,
{
    pub const fn new(output: T) -> Self {
        Self { output }
    }

    /// Writes every record of the batch.
    ///
    /// A record that fails to encode is skipped. An output error is
    /// considered irrecoverable and is returned to stop the writer.
    pub async fn write_batch(&mut self, batch: RecordBatch) -> Result<(), ()> {
        let mut buf = Vec::new();
        let mut count = 0;
        for record in &batch.records {
            match encode_record(record) {
                Ok(line) => {
                    buf.extend_from_slice(&line);
                    buf.push(b'\n');
                    count += 1;
                }
                Err(error) => emit!(AnalyticsEncodeError { error: &error }),
            }
        }

        if let Err(error) = self.output.write_all(&buf).await {
            emit!(AnalyticsWriteError { error, count });
            return Err(());
        }

        emit!(AnalyticsRecordsWritten {
            count,
            byte_size: buf.len(),
        });
        Ok(())
    }

    pub async fn flush(&mut self) -> Result<(), ()> {
        self.output.flush().await.map_err(|error| {
            emit!(AnalyticsWriteError { error, count: 0 });
        })
    }

    #[cfg(test)]
    pub fn into_inner(self) -> T {
        self.output
    }
}

fn encode_record(record: &AnalyticsRecord) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(record)
}
