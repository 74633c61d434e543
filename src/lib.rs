// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! An asynchronous ZIP archive reading crate for forward-only sources.
//!
//! ## Features
//! - Streams archives entry by entry from any non-seekable [`AsyncRead`](futures_lite::io::AsyncRead)
//!   source; the central directory is never required.
//! - Handles both size-disclosure conventions: sizes in the local file header, or sizes deferred
//!   to a trailing data descriptor.
//! - Supports the Zip64 extension for entries beyond the 32-bit size limits.
//! - Recovers stored entries with a deferred size via an opt-in signature scan.
//! - Verifies CRC32 values of fully-read entries against the archive's records.
//! - Aims for reasonable [specification](https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT) compliance.
//!
//! ## Example
//! ```no_run
//! # use futures_lite::io::Cursor;
//! # use async_zip_stream::error::Result;
//! # use async_zip_stream::read::stream::ZipStreamReader;
//! #
//! # async fn run() -> Result<()> {
//! let mut zip = ZipStreamReader::new(Cursor::new([0; 0]));
//! let mut data = vec![0; 1024];
//!
//! while let Some(entry) = zip.next_entry().await? {
//!     println!("File: {}", entry.filename().as_str().unwrap());
//!
//!     loop {
//!         match zip.read(&mut data).await? {
//!             0 => break,
//!             n => println!("  {n} bytes"),
//!         }
//!     }
//! }
//! #
//! #     Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod read;

#[cfg(feature = "tokio")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
pub mod tokio;

pub(crate) mod date;
pub(crate) mod entry;
pub(crate) mod spec;
pub(crate) mod string;
pub(crate) mod utils;


pub use crate::date::ZipDateTime;
pub use crate::entry::ZipEntry;
pub use crate::spec::compression::Compression;
pub use crate::spec::header::{
    DataDescriptor, ExtraField, GeneralPurposeFlag, HeaderId, InfoZipUnicodeCommentExtraField,
    InfoZipUnicodePathExtraField, UnknownExtraField, Zip64ExtendedInformationExtraField,
};
pub use crate::string::{StringEncoding, ZipString};

pub use crate::read::stream::{StreamOptions, ZipStreamReader};
