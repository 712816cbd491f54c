use async_trait::async_trait;
use filegate_storage::{StorageResult, WriteStream};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Receives upload chunks in arrival order.
///
/// The slice is only valid for the duration of the call.
#[async_trait]
pub trait ChunkConsumer: Send {
    async fn consume(&mut self, chunk: &[u8]) -> Result<(), BoxError>;
}

/// Forwards every chunk into a blob store write stream.
pub struct StreamForwarder {
    stream: Box<dyn WriteStream>,
}

impl StreamForwarder {
    pub fn new(stream: Box<dyn WriteStream>) -> Self {
        Self { stream }
    }

    pub fn key(&self) -> &str {
        self.stream.key()
    }

    pub async fn close(mut self) -> StorageResult<String> {
        self.stream.close().await?;
        Ok(self.stream.key().to_string())
    }

    pub async fn abort(mut self) -> StorageResult<()> {
        self.stream.abort().await
    }
}

#[async_trait]
impl ChunkConsumer for StreamForwarder {
    async fn consume(&mut self, chunk: &[u8]) -> Result<(), BoxError> {
        self.stream.write(chunk).await?;
        Ok(())
    }
}

/// Counts bytes and drops them.
#[derive(Debug, Default)]
pub struct DiscardConsumer {
    pub bytes: u64,
}

#[async_trait]
impl ChunkConsumer for DiscardConsumer {
    async fn consume(&mut self, chunk: &[u8]) -> Result<(), BoxError> {
        self.bytes += chunk.len() as u64;
        Ok(())
    }
}
