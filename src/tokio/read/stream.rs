// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A ZIP reader which acts over a non-seekable tokio source.

use crate::entry::ZipEntry;
use crate::error::Result;
use crate::read::stream::{StreamOptions, ZipStreamReader as BaseZipStreamReader};

use tokio::io::AsyncRead;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};

/// A ZIP reader which acts over a non-seekable source implementing tokio's `AsyncRead`.
///
/// See the [base module-level docs](crate::read::stream) for more information.
pub struct ZipStreamReader<R>(BaseZipStreamReader<Compat<R>>);

impl<R> ZipStreamReader<R>
where
    R: AsyncRead + Unpin,
{
    /// Constructs a new tokio-specific ZIP reader from a non-seekable source, with default
    /// options.
    pub fn new(reader: R) -> Self {
        Self(BaseZipStreamReader::new(reader.compat()))
    }

    /// Constructs a new tokio-specific ZIP reader from a non-seekable source.
    pub fn with_options(reader: R, options: StreamOptions) -> Self {
        Self(BaseZipStreamReader::with_options(reader.compat(), options))
    }

    /// Opens the next entry for reading, closing the current one first.
    pub async fn next_entry(&mut self) -> Result<Option<ZipEntry>> {
        self.0.next_entry().await
    }

    /// Produces the next bytes of the current entry's (decompressed) data.
    pub async fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        self.0.read(buffer).await
    }

    /// Skips over and discards `count` bytes of the current entry's data.
    pub async fn skip(&mut self, count: u64) -> Result<u64> {
        self.0.skip(count).await
    }

    /// Marks the reader as closed.
    pub fn close(&mut self) {
        self.0.close()
    }

    /// Whether this reader is able to produce the given entry's data.
    pub fn can_read_entry_data(&self, entry: &ZipEntry) -> bool {
        self.0.can_read_entry_data(entry)
    }

    /// Consumes the `ZipStreamReader` returning the original `reader`.
    pub fn into_inner(self) -> R {
        self.0.into_inner().into_inner()
    }
}
