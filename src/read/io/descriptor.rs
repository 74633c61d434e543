// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::error::Result;
use crate::spec::consts::DATA_DESCRIPTOR_SIGNATURE;
use crate::spec::header::DataDescriptor;
use crate::utils::{read_u32, read_u64};

use futures_lite::io::AsyncRead;

/// Reads the data descriptor which trails an entry's data.
///
/// The descriptor's leading signature is optional: when the first word is not the signature it
/// already holds the CRC. Sizes are 4 bytes each, or 8 bytes each when the entry uses zip64.
/// No validation against previously declared values is performed; entries which carry a
/// descriptor had those header fields zeroed by construction.
#[tracing::instrument(skip(reader))]
pub(crate) async fn read_data_descriptor(
    mut reader: impl AsyncRead + Unpin,
    zip64: bool,
) -> Result<DataDescriptor> {
    let first = read_u32(&mut reader, "data descriptor").await?;
    let crc = if first == DATA_DESCRIPTOR_SIGNATURE {
        read_u32(&mut reader, "data descriptor").await?
    } else {
        first
    };

    let (compressed_size, uncompressed_size) = if zip64 {
        (read_u64(&mut reader, "data descriptor").await?, read_u64(&mut reader, "data descriptor").await?)
    } else {
        (
            read_u32(&mut reader, "data descriptor").await?.into(),
            read_u32(&mut reader, "data descriptor").await?.into(),
        )
    };

    Ok(DataDescriptor { crc, compressed_size, uncompressed_size })
}
