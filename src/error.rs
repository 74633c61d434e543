// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A module which holds relevant error reporting structures/types.

use thiserror::Error;

/// A Result type alias over ZipError to minimise repetition.
pub type Result<V> = std::result::Result<V, ZipError>;

/// An enum of possible errors and their descriptions.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ZipError {
    /// An I/O error from the underlying source, propagated unchanged.
    #[error("an upstream reader returned an error: {0}")]
    UpstreamReadError(#[from] std::io::Error),
    /// The source ended part-way through a structure the format requires to be complete.
    #[error("truncated ZIP archive while reading {0}")]
    TruncatedArchive(&'static str),
    /// A size field held the zip64 sentinel but no extended information field was present.
    #[error("expected a Zip64 extended information extra field")]
    ExpectedZip64ExtendedInformation,
    #[error("zip64 extended information field was incomplete")]
    Zip64ExtendedFieldIncomplete,
    #[error("an extra field was malformed")]
    MalformedExtraField,
    /// The deflate stream of the current entry could not be decoded.
    #[error("corrupt deflate stream: {0}")]
    CorruptDeflateStream(String),
    #[error("computed CRC32 value did not match expected")]
    CRC32CheckError,
    #[error("a computed value did not match the expected (stored) value")]
    StoredSizeMismatch,
    #[error("feature not supported: '{0}'")]
    FeatureNotSupported(&'static str),
    #[error("compression type {0} is not supported for reading")]
    CompressionNotSupported(u16),
    #[error("attempted to read or skip on a closed reader")]
    ReaderClosed,
    #[error("string is not UTF-8 encoded")]
    StringNotUtf8,
}
