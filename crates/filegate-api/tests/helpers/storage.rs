//! Instrumented blob store that records every call.

use async_trait::async_trait;
use filegate_storage::{
    BlobStore, ByteStream, StorageBackend, StorageError, StorageResult, WriteStream,
    WriteStreamState,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct Recording {
    pub opened: Vec<String>,
    pub writes: Vec<Vec<u8>>,
    pub closed: usize,
    pub aborted: usize,
    /// Streams dropped without `close` or `abort` (the request was cancelled).
    pub dropped_open: usize,
    pub signed: Vec<String>,
}

pub struct RecordingBlobStore {
    recording: Arc<Mutex<Recording>>,
    fail_writes: bool,
    write_delay: Option<Duration>,
}

impl RecordingBlobStore {
    pub fn new() -> Self {
        Self {
            recording: Arc::new(Mutex::new(Recording::default())),
            fail_writes: false,
            write_delay: None,
        }
    }

    /// Every `write` stalls for `delay` before it is recorded.
    pub fn slow_writes(delay: Duration) -> Self {
        Self {
            write_delay: Some(delay),
            ..Self::new()
        }
    }

    /// Every `write` fails as a remote store would.
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::new()
        }
    }

    pub fn recording(&self) -> Recording {
        self.recording.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for RecordingBlobStore {
    fn bucket(&self) -> &str {
        "recording"
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }

    async fn open_write_stream(&self, desired_name: &str) -> StorageResult<Box<dyn WriteStream>> {
        let key = filegate_storage::keys::generate_object_key(desired_name);
        self.recording.lock().unwrap().opened.push(key.clone());
        Ok(Box::new(RecordingWriteStream {
            key,
            state: WriteStreamState::Opened,
            recording: self.recording.clone(),
            fail_writes: self.fail_writes,
            write_delay: self.write_delay,
        }))
    }

    async fn signed_url(&self, object_key: &str, expires_in: Duration) -> StorageResult<String> {
        self.recording.lock().unwrap().signed.push(object_key.to_string());
        Ok(format!(
            "https://storage.test/recording/{}?expires_in={}",
            object_key,
            expires_in.as_secs()
        ))
    }

    async fn download_stream(&self, object_key: &str) -> StorageResult<ByteStream> {
        Err(StorageError::NotFound(object_key.to_string()))
    }
}

struct RecordingWriteStream {
    key: String,
    state: WriteStreamState,
    recording: Arc<Mutex<Recording>>,
    fail_writes: bool,
    write_delay: Option<Duration>,
}

impl RecordingWriteStream {
    fn ensure_open(&self) -> StorageResult<()> {
        match self.state {
            WriteStreamState::Opened => Ok(()),
            WriteStreamState::Closed => Err(StorageError::StreamClosed(self.key.clone())),
        }
    }
}

#[async_trait]
impl WriteStream for RecordingWriteStream {
    fn key(&self) -> &str {
        &self.key
    }

    fn state(&self) -> WriteStreamState {
        self.state
    }

    async fn write(&mut self, chunk: &[u8]) -> StorageResult<usize> {
        self.ensure_open()?;
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_writes {
            return Err(StorageError::IoError(std::io::Error::other("quota exceeded")));
        }
        self.recording.lock().unwrap().writes.push(chunk.to_vec());
        Ok(chunk.len())
    }

    async fn close(&mut self) -> StorageResult<()> {
        self.ensure_open()?;
        self.state = WriteStreamState::Closed;
        self.recording.lock().unwrap().closed += 1;
        Ok(())
    }

    async fn abort(&mut self) -> StorageResult<()> {
        self.ensure_open()?;
        self.state = WriteStreamState::Closed;
        self.recording.lock().unwrap().aborted += 1;
        Ok(())
    }
}

impl Drop for RecordingWriteStream {
    fn drop(&mut self) {
        if self.state == WriteStreamState::Opened {
            if let Ok(mut recording) = self.recording.lock() {
                recording.dropped_open += 1;
            }
        }
    }
}
