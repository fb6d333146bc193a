//! Types for the upload pipeline.

use bytes::Bytes;
use futures::Stream;
use kampus_storage::StorageError;
use std::pin::Pin;
use tokio::io::AsyncRead;

/// An upload as received from the transport, before any validation.
pub struct IncomingFile<'a> {
    /// Client-supplied filename, untrusted
    pub original_filename: Option<String>,
    /// Content length declared by the client, if the transport exposed one
    pub declared_size: Option<u64>,
    pub reader: &'a mut (dyn AsyncRead + Send + Unpin),
}

impl<'a> IncomingFile<'a> {
    pub fn new(
        original_filename: impl Into<String>,
        reader: &'a mut (dyn AsyncRead + Send + Unpin),
    ) -> Self {
        Self {
            original_filename: Some(original_filename.into()),
            declared_size: None,
            reader,
        }
    }

    pub fn with_declared_size(mut self, declared_size: Option<u64>) -> Self {
        self.declared_size = declared_size;
        self
    }
}

impl std::fmt::Debug for IncomingFile<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncomingFile")
            .field("original_filename", &self.original_filename)
            .field("declared_size", &self.declared_size)
            .finish_non_exhaustive()
    }
}

/// Chunked file contents for downloads
pub type DownloadStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;
