// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::error::{Result, ZipError};
use futures_lite::io::{AsyncRead, AsyncReadExt};

/// Read exactly `buffer.len()` bytes from a reader which impls AsyncRead.
///
/// Running out of source bytes part-way through is a truncation of the structure named by
/// `context`, not a plain I/O failure.
#[tracing::instrument(skip(reader, buffer))]
pub(crate) async fn read_fully(
    mut reader: impl AsyncRead + Unpin,
    buffer: &mut [u8],
    context: &'static str,
) -> Result<()> {
    reader.read_exact(buffer).await.map_err(|err| match err.kind() {
        std::io::ErrorKind::UnexpectedEof => ZipError::TruncatedArchive(context),
        _ => ZipError::UpstreamReadError(err),
    })
}

/// Read and return a little-endian u32 from a reader which impls AsyncRead.
#[tracing::instrument(skip(reader))]
pub(crate) async fn read_u32(reader: impl AsyncRead + Unpin, context: &'static str) -> Result<u32> {
    let mut buffer = [0u8; 4];
    read_fully(reader, &mut buffer, context).await?;
    Ok(u32::from_le_bytes(buffer))
}

/// Read and return a little-endian u64 from a reader which impls AsyncRead.
#[tracing::instrument(skip(reader))]
pub(crate) async fn read_u64(reader: impl AsyncRead + Unpin, context: &'static str) -> Result<u64> {
    let mut buffer = [0u8; 8];
    read_fully(reader, &mut buffer, context).await?;
    Ok(u64::from_le_bytes(buffer))
}
