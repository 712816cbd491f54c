use crate::upload::consumer::ChunkConsumer;
use crate::upload::error::UploadError;
use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use bytes::Bytes;
use filegate_core::constants::UPLOAD_CHUNK_SIZE;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::io::StreamReader;

/// Reader over the body of the selected multipart field.
pub type FieldReader = StreamReader<BoxStream<'static, io::Result<Bytes>>, Bytes>;

/// A single file being uploaded, read in bounded chunks.
pub struct FileUpload<R> {
    reader: R,
    file_name: String,
    max_size: Option<u64>,
}

impl<R> FileUpload<R>
where
    R: AsyncRead + Unpin + Send,
{
    /// Wrap any byte reader. `max_size` of `None` means unlimited.
    pub fn new(reader: R, file_name: impl Into<String>, max_size: Option<u64>) -> Self {
        Self {
            reader,
            file_name: file_name.into(),
            max_size,
        }
    }

    /// File name as declared by the client. Untrusted, possibly empty.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Read the file to the end, handing each chunk to `consumer`.
    ///
    /// Chunks are [`UPLOAD_CHUNK_SIZE`] bytes except the last one. A chunk that
    /// would take the running total over the maximum is rejected before the
    /// consumer sees it. Returns the number of bytes consumed.
    pub async fn process<C>(&mut self, consumer: &mut C) -> Result<u64, UploadError>
    where
        C: ChunkConsumer + ?Sized,
    {
        let mut buffer = vec![0u8; UPLOAD_CHUNK_SIZE];
        let mut total: u64 = 0;

        loop {
            let filled = fill_chunk(&mut self.reader, &mut buffer)
                .await
                .map_err(UploadError::ReadFailed)?;
            if filled == 0 {
                break;
            }

            if let Some(max_size) = self.max_size {
                if total + filled as u64 > max_size {
                    tracing::warn!(
                        file_name = %self.file_name,
                        max_size,
                        received = total + filled as u64,
                        "Upload exceeds maximum size"
                    );
                    return Err(UploadError::MaxSizeExceeded { max_size });
                }
            }

            consumer
                .consume(&buffer[..filled])
                .await
                .map_err(UploadError::CallbackFailed)?;
            total += filled as u64;

            if filled < buffer.len() {
                break;
            }
        }

        Ok(total)
    }
}

impl FileUpload<FieldReader> {
    /// Locate the part named `field_name` in a streaming multipart request.
    ///
    /// Parts are scanned in arrival order and the first match wins; the body
    /// of earlier parts is skipped without being buffered.
    pub async fn from_request(
        request: Request,
        field_name: &str,
        max_size: Option<u64>,
    ) -> Result<Self, UploadError> {
        let content_type = request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| UploadError::MalformedRequest("missing Content-Type header".to_string()))?;
        let boundary = multer::parse_boundary(content_type)
            .map_err(|e| UploadError::MalformedRequest(e.to_string()))?;

        let mut multipart = multer::Multipart::new(request.into_body().into_data_stream(), boundary);

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| UploadError::MalformedRequest(e.to_string()))?
        {
            if field.name() != Some(field_name) {
                continue;
            }

            let file_name = field.file_name().unwrap_or_default().to_string();
            tracing::debug!(field = field_name, file_name = %file_name, "Found upload field");

            let body = field.map_err(io::Error::other).boxed();
            return Ok(Self::new(StreamReader::new(body), file_name, max_size));
        }

        Err(UploadError::NoFileAttached(field_name.to_string()))
    }
}

/// Read until `buf` is full or the reader is exhausted.
async fn fill_chunk<R>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]).await {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
