// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::date::ZipDateTime;
use crate::spec::header::{ExtraField, GeneralPurposeFlag};
use crate::spec::Compression;
use crate::string::ZipString;

/// An immutable store of data about a ZIP entry, parsed from its local file header.
///
/// Each value returned by the stream reader is an owned snapshot, independent of any subsequent
/// reads. Sizes and the CRC are only known up front when the writer recorded them in the local
/// file header; for entries which defer them to a trailing data descriptor they remain `None`
/// until the reader has walked past the entry's data.
#[derive(Clone, Debug)]
pub struct ZipEntry {
    pub(crate) filename: ZipString,
    pub(crate) compression: Compression,
    pub(crate) crc32: u32,
    pub(crate) compressed_size: Option<u64>,
    pub(crate) uncompressed_size: Option<u64>,
    pub(crate) last_modification_date: ZipDateTime,
    pub(crate) flags: GeneralPurposeFlag,
    pub(crate) extra_fields: Vec<ExtraField>,
}

impl ZipEntry {
    /// Returns the entry's filename.
    ///
    /// # Note
    /// This will return the raw filename stored during ZIP creation. If calling this method on
    /// entries retrieved from untrusted ZIP files, the filename should be sanitised before being
    /// used as a path to prevent [directory traversal
    /// attacks](https://en.wikipedia.org/wiki/Directory_traversal_attack).
    pub fn filename(&self) -> &ZipString {
        &self.filename
    }

    /// Returns the entry's compression method.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Returns the entry's CRC32 value.
    ///
    /// Zero when the entry defers its checksum to a data descriptor.
    pub fn crc32(&self) -> u32 {
        self.crc32
    }

    /// Returns the entry's compressed size, if the local file header disclosed it.
    pub fn compressed_size(&self) -> Option<u64> {
        self.compressed_size
    }

    /// Returns the entry's uncompressed size, if the local file header disclosed it.
    pub fn uncompressed_size(&self) -> Option<u64> {
        self.uncompressed_size
    }

    /// Returns the entry's last modification time & date.
    pub fn last_modification_date(&self) -> &ZipDateTime {
        &self.last_modification_date
    }

    /// Returns whether or not a data descriptor trails the entry's data (ie. whether or not it
    /// was stream written).
    pub fn data_descriptor(&self) -> bool {
        self.flags.data_descriptor
    }

    /// Returns whether or not the entry's data is encrypted.
    pub fn encrypted(&self) -> bool {
        self.flags.encrypted
    }

    /// Returns the entry's general purpose flag word as parsed from the header.
    pub fn general_purpose_flag(&self) -> GeneralPurposeFlag {
        self.flags
    }

    /// Returns the entry's extra field data, parsed into typed records.
    pub fn extra_fields(&self) -> &[ExtraField] {
        &self.extra_fields
    }
}
