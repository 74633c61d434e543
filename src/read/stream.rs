// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A ZIP reader which acts over a non-seekable source.
//!
//! # API Design
//! As opposed to a seeking reader, the central directory at the end of the archive is out of
//! reach, so entries are discovered one local file header at a time and the data of an entry must
//! be walked before the proceeding entry becomes visible. The reader owns that walk: requesting
//! the next entry implicitly closes the current one, draining or skipping whatever the caller
//! left unread and repositioning the source at the next header.
//!
//! Since the source cannot seek backwards, any bytes pulled beyond the end of an entry (the
//! decompressor regularly consumes less than the reader buffered, and stored entries with a
//! deferred size are only delimited by the *next* header's signature) are handed back to a
//! pushback layer over the source rather than lost.
//!
//! # Considerations
//! Only the information within each local file header is available. This results in:
//! - CRC and sizes being unknown until the trailing data descriptor has been read, for entries
//!   written with one (the returned [`ZipEntry`] snapshot reports them as absent).
//! - No file comment being available (the comment lives in the central directory).
//! - The extra field data potentially being inconsistent with what's stored in the central
//!   directory.
//! - Stored entries with a data descriptor requiring a signature scan to find their end; this is
//!   heuristic by nature and therefore opt-in via
//!   [`StreamOptions::allow_stored_entries_with_data_descriptor`].
//!
//! # Example
//! ```no_run
//! # use futures_lite::io::Cursor;
//! # use async_zip_stream::error::Result;
//! # use async_zip_stream::read::stream::ZipStreamReader;
//! #
//! # async fn run() -> Result<()> {
//! let mut zip = ZipStreamReader::new(Cursor::new([0; 0]));
//!
//! // Print the name of every file in a ZIP archive.
//! while let Some(entry) = zip.next_entry().await? {
//!     println!("File: {}", entry.filename().as_str().unwrap());
//! }
//! #
//! #     Ok(())
//! # }
//! ```

use crate::entry::ZipEntry;
use crate::error::{Result, ZipError};
use crate::read::detect_filename;
use crate::read::io::descriptor::read_data_descriptor;
use crate::read::io::inflater::Inflater;
use crate::read::io::prepend::PrependReader;
use crate::spec::consts::{
    CDH_SIGNATURE, DATA_DESCRIPTOR_LENGTH, DATA_DESCRIPTOR_SIGNATURE, EOCDR_SIGNATURE, LFH_LENGTH, LFH_SIGNATURE,
    NON_ZIP64_MAX_SIZE, SIGNATURE_LENGTH, ZIP64_DATA_DESCRIPTOR_LENGTH, ZIP64_MIN_VERSION,
};
use crate::spec::header::{ExtraField, LocalFileHeader};
use crate::spec::parse::parse_extra_fields;
use crate::spec::Compression;
use crate::utils::read_fully;

use std::io::Read;

use crc32fast::Hasher;
use futures_lite::io::{AsyncRead, AsyncReadExt};

/// The size of the reader's working buffer. The pushback layer can always take at least one full
/// buffer of overshoot back.
const BUFFER_SIZE: usize = 8192;

/// Checks whether the given leading bytes look like the start of a ZIP archive stream, ie. a
/// local file header or (for an archive without entries) the end of central directory record.
///
/// Self-extracting archives with arbitrary leading content are not recognised.
pub fn matches(signature: &[u8]) -> bool {
    if signature.len() < SIGNATURE_LENGTH {
        return false;
    }

    let leading = u32::from_le_bytes([signature[0], signature[1], signature[2], signature[3]]);
    leading == LFH_SIGNATURE || leading == EOCDR_SIGNATURE
}

/// Options controlling how a [`ZipStreamReader`] handles the archive's edge conventions.
#[derive(Debug, Clone, Copy)]
pub struct StreamOptions {
    pub(crate) unicode_extra_fields: bool,
    pub(crate) allow_stored_entries_with_data_descriptor: bool,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self { unicode_extra_fields: true, allow_stored_entries_with_data_descriptor: false }
    }
}

impl StreamOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an Info-ZIP Unicode Path extra field may override an entry's non-UTF-8 filename.
    ///
    /// The override only ever applies when the field's recorded CRC32 of the original name
    /// matches the name actually present in the header. Defaults to `true`.
    pub fn unicode_extra_fields(mut self, enabled: bool) -> Self {
        self.unicode_extra_fields = enabled;
        self
    }

    /// Whether stored entries which defer their sizes to a data descriptor may be read.
    ///
    /// Such entries have no length information at all until the next header's signature has been
    /// located by a forward scan, so the whole entry is buffered in memory and a payload which
    /// happens to contain signature-like bytes in an unfortunate position can defeat the scan.
    /// Defaults to `false`; reads of such entries fail until enabled.
    pub fn allow_stored_entries_with_data_descriptor(mut self, enabled: bool) -> Self {
        self.allow_stored_entries_with_data_descriptor = enabled;
        self
    }
}

/// A ZIP reader which acts over a non-seekable source.
///
/// See the [module-level docs](.) for more information.
pub struct ZipStreamReader<R> {
    reader: PrependReader<R>,
    inflater: Inflater,
    hasher: Hasher,
    buffer: Box<[u8]>,
    options: StreamOptions,

    current: Option<ZipEntry>,
    closed: bool,
    hit_central_directory: bool,
    has_data_descriptor: bool,
    uses_zip64: bool,

    offset_in_buffer: usize,
    length_of_last_read: usize,
    source_exhausted: bool,
    entry_bytes_produced: u64,
    bytes_read_from_stream: u64,
    last_stored_entry: Option<std::io::Cursor<Vec<u8>>>,
}

impl<R> ZipStreamReader<R>
where
    R: AsyncRead + Unpin,
{
    /// Constructs a new ZIP reader from a non-seekable source, with default options.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, StreamOptions::default())
    }

    /// Constructs a new ZIP reader from a non-seekable source.
    pub fn with_options(reader: R, options: StreamOptions) -> Self {
        Self {
            reader: PrependReader::new(reader),
            inflater: Inflater::new(),
            hasher: Hasher::new(),
            buffer: vec![0; BUFFER_SIZE].into_boxed_slice(),
            options,
            current: None,
            closed: false,
            hit_central_directory: false,
            has_data_descriptor: false,
            uses_zip64: false,
            offset_in_buffer: 0,
            length_of_last_read: 0,
            source_exhausted: false,
            entry_bytes_produced: 0,
            bytes_read_from_stream: 0,
            last_stored_entry: None,
        }
    }

    /// Consumes the `ZipStreamReader` returning the original `reader`.
    ///
    /// Any bytes this reader buffered past its current position are discarded with it.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// Marks the reader as closed.
    ///
    /// Closing is idempotent. A closed reader yields no further entries and fails any read or
    /// skip; the underlying source is released when the reader is dropped.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Whether this reader is able to produce the given entry's data.
    ///
    /// Returns false for encryption, for compression methods this crate doesn't decode, and for
    /// stored entries with a data descriptor unless the scan for them has been enabled.
    pub fn can_read_entry_data(&self, entry: &ZipEntry) -> bool {
        entry.compression().is_readable() && !entry.encrypted() && self.supports_data_descriptor_for(entry)
    }

    fn supports_data_descriptor_for(&self, entry: &ZipEntry) -> bool {
        self.options.allow_stored_entries_with_data_descriptor
            || !entry.data_descriptor()
            || entry.compression() == Compression::Deflate
    }

    /// Opens the next entry for reading, closing the current one first.
    ///
    /// Returns `None` once the central directory (or the end of the source) has been reached;
    /// that terminal state latches, so further calls keep returning `None`.
    pub async fn next_entry(&mut self) -> Result<Option<ZipEntry>> {
        if self.closed || self.hit_central_directory {
            return Ok(None);
        }
        if self.current.is_some() {
            self.close_entry().await?;
        }

        let mut signature = [0u8; SIGNATURE_LENGTH];
        let leading = self.reader.read(&mut signature).await?;
        if leading == 0 {
            // End of the source before any header byte; an archive is allowed to just stop here.
            return Ok(None);
        }
        read_fully(&mut self.reader, &mut signature[leading..], "local file header").await?;

        match u32::from_le_bytes(signature) {
            LFH_SIGNATURE => {}
            CDH_SIGNATURE => {
                tracing::debug!("hit central directory, no further entries");
                self.hit_central_directory = true;
                return Ok(None);
            }
            _ => return Ok(None),
        }

        let mut fixed = [0u8; LFH_LENGTH];
        read_fully(&mut self.reader, &mut fixed, "local file header").await?;
        let header = LocalFileHeader::from(fixed);

        self.uses_zip64 = (header.version & 0xFF) >= ZIP64_MIN_VERSION;
        self.has_data_descriptor = header.flags.data_descriptor;

        let mut name = vec![0u8; header.file_name_length as usize];
        read_fully(&mut self.reader, &mut name, "entry name").await?;

        let mut extra = vec![0u8; header.extra_field_length as usize];
        read_fully(&mut self.reader, &mut extra, "extra field").await?;
        let extra_fields = parse_extra_fields(extra, header.uncompressed_size, header.compressed_size)?;

        let filename = detect_filename(
            name,
            header.flags.filename_unicode,
            self.options.unicode_extra_fields,
            &extra_fields,
        );

        // An entry with a data descriptor has zeroed CRC/size fields; they only become known once
        // the descriptor at the end of its data has been read.
        let (crc32, compressed_size, uncompressed_size) = if self.has_data_descriptor {
            (0, None, None)
        } else {
            let zip64_sizes = self.uses_zip64
                && (header.compressed_size == NON_ZIP64_MAX_SIZE
                    || header.uncompressed_size == NON_ZIP64_MAX_SIZE);
            let (compressed_size, uncompressed_size) = if zip64_sizes {
                let zip64 = extra_fields
                    .iter()
                    .find_map(|field| match field {
                        ExtraField::Zip64ExtendedInformation(field) => Some(field),
                        _ => None,
                    })
                    .ok_or(ZipError::ExpectedZip64ExtendedInformation)?;
                let compressed_size = match header.compressed_size {
                    NON_ZIP64_MAX_SIZE => zip64.compressed_size.ok_or(ZipError::Zip64ExtendedFieldIncomplete)?,
                    other => other.into(),
                };
                let uncompressed_size = match header.uncompressed_size {
                    NON_ZIP64_MAX_SIZE => zip64.uncompressed_size.ok_or(ZipError::Zip64ExtendedFieldIncomplete)?,
                    other => other.into(),
                };
                (compressed_size, uncompressed_size)
            } else {
                (header.compressed_size.into(), header.uncompressed_size.into())
            };
            (header.crc, Some(compressed_size), Some(uncompressed_size))
        };

        let entry = ZipEntry {
            filename,
            compression: Compression::from(header.compression),
            crc32,
            compressed_size,
            uncompressed_size,
            last_modification_date: crate::date::ZipDateTime { date: header.mod_date, time: header.mod_time },
            flags: header.flags,
            extra_fields,
        };

        self.current = Some(entry.clone());
        Ok(Some(entry))
    }

    /// Produces the next bytes of the current entry's (decompressed) data.
    ///
    /// Returns `Ok(0)` once the end of the entry has been reached, or when no entry is current.
    pub async fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        if self.closed {
            return Err(ZipError::ReaderClosed);
        }

        let (compression, encrypted) = match &self.current {
            Some(entry) => (entry.compression, entry.flags.encrypted),
            None => return Ok(0),
        };
        if self.inflater.finished() || buffer.is_empty() {
            return Ok(0);
        }

        if encrypted {
            return Err(ZipError::FeatureNotSupported("encryption"));
        }
        match compression {
            Compression::Stored | Compression::Deflate => {}
            other => return Err(ZipError::CompressionNotSupported(other.into())),
        }
        if compression == Compression::Stored
            && self.has_data_descriptor
            && !self.options.allow_stored_entries_with_data_descriptor
        {
            return Err(ZipError::FeatureNotSupported("stored entries with a data descriptor"));
        }

        if compression == Compression::Stored {
            if self.has_data_descriptor {
                if self.last_stored_entry.is_none() {
                    self.read_stored_entry().await?;
                }
                return self.read_from_cache(buffer);
            }
            return self.read_stored(buffer).await;
        }
        self.read_deflated(buffer).await
    }

    /// Skips over and discards `count` bytes of the current entry's data.
    ///
    /// May return a smaller number than requested if (and only if) the end of the entry is
    /// reached first.
    pub async fn skip(&mut self, count: u64) -> Result<u64> {
        let mut scratch = [0u8; 1024];
        let mut skipped = 0u64;

        while skipped < count {
            let step = scratch.len().min((count - skipped).min(usize::MAX as u64) as usize);
            let read = self.read(&mut scratch[..step]).await?;
            if read == 0 {
                break;
            }
            skipped += read as u64;
        }

        Ok(skipped)
    }

    /// The stored fast path: serve bytes out of the working buffer, pulling a fresh chunk from
    /// the source whenever the window is spent.
    async fn read_stored(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let size = match self.current.as_ref().and_then(|entry| entry.uncompressed_size) {
            Some(size) => size,
            None => return Err(ZipError::FeatureNotSupported("stored entries with a data descriptor")),
        };

        if self.entry_bytes_produced >= size {
            return Ok(0);
        }

        if self.offset_in_buffer >= self.length_of_last_read {
            self.offset_in_buffer = 0;
            let read = self.fill().await?;
            if read == 0 {
                return Err(ZipError::TruncatedArchive("stored entry data"));
            }
            self.bytes_read_from_stream += read as u64;
        }

        let window = self.length_of_last_read - self.offset_in_buffer;
        let mut count = buffer.len().min(window);
        if (size - self.entry_bytes_produced) < count as u64 {
            // Smaller than count, so it fits.
            count = (size - self.entry_bytes_produced) as usize;
        }

        buffer[..count].copy_from_slice(&self.buffer[self.offset_in_buffer..self.offset_in_buffer + count]);
        self.offset_in_buffer += count;
        self.entry_bytes_produced += count as u64;
        self.hasher.update(&buffer[..count]);

        Ok(count)
    }

    /// The deflate path: feed the decompressor whole chunks as it asks for input, and surface
    /// whatever it produces.
    async fn read_deflated(&mut self, buffer: &mut [u8]) -> Result<usize> {
        loop {
            if self.inflater.needs_input() {
                let read = self.fill().await?;
                if read > 0 {
                    self.bytes_read_from_stream += read as u64;
                    self.inflater.set_input(&self.buffer[..read]);
                }
            }

            let produced = self.inflater.inflate(buffer)?;
            if produced == 0 {
                if self.inflater.finished() {
                    return Ok(0);
                }
                if self.source_exhausted {
                    return Err(ZipError::TruncatedArchive("deflated entry data"));
                }
                continue;
            }

            self.hasher.update(&buffer[..produced]);
            self.entry_bytes_produced += produced as u64;
            return Ok(produced);
        }
    }

    /// Serves body reads of a scavenged stored entry out of the in-memory cache.
    fn read_from_cache(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let cache = match self.last_stored_entry.as_mut() {
            Some(cache) => cache,
            None => return Ok(0),
        };
        let count = Read::read(cache, buffer)?;
        self.entry_bytes_produced += count as u64;
        Ok(count)
    }

    /// Pulls the next chunk from the source into the working buffer.
    async fn fill(&mut self) -> Result<usize> {
        if self.closed {
            return Err(ZipError::ReaderClosed);
        }

        let read = self.reader.read(&mut self.buffer[..]).await?;
        self.length_of_last_read = read;
        self.source_exhausted = read == 0;
        Ok(read)
    }

    /// Closes the current entry and positions the source at the beginning of the next header.
    ///
    /// If the compressed size of the entry is known and the reader hasn't pulled beyond it, the
    /// outstanding bytes are skipped from the source without decompressing them; this also allows
    /// an entry with an unsupported compression method to be stepped over. Otherwise the body is
    /// drained to its end and the bytes pulled in excess of what the entry actually consumed are
    /// returned to the source.
    async fn close_entry(&mut self) -> Result<()> {
        if self.closed {
            return Err(ZipError::ReaderClosed);
        }
        let compression = match &self.current {
            Some(entry) => entry.compression,
            None => return Ok(()),
        };

        let known_size = self.current.as_ref().and_then(|entry| entry.compressed_size);
        match known_size {
            Some(size) if !self.has_data_descriptor && self.bytes_read_from_stream <= size => {
                let mut remaining = size - self.bytes_read_from_stream;
                while remaining > 0 {
                    let step = (self.buffer.len() as u64).min(remaining) as usize;
                    let read = self.reader.read(&mut self.buffer[..step]).await?;
                    if read == 0 {
                        return Err(ZipError::TruncatedArchive("entry data"));
                    }
                    remaining -= read as u64;
                }
            }
            _ => {
                self.skip(u64::MAX).await?;

                let consumed = if compression == Compression::Deflate {
                    self.inflater.bytes_read()
                } else {
                    self.entry_bytes_produced
                };

                // Never more than the last chunk pulled from the source.
                let excess = self.bytes_read_from_stream.saturating_sub(consumed) as usize;
                if excess > 0 {
                    let start = self.length_of_last_read.saturating_sub(excess);
                    self.reader.prepend(&self.buffer[start..self.length_of_last_read]);
                    self.bytes_read_from_stream -= excess as u64;
                    tracing::trace!(count = excess, "returned excess bytes to source");
                }
            }
        }

        if self.last_stored_entry.is_none() && self.has_data_descriptor {
            let descriptor = read_data_descriptor(&mut self.reader, self.uses_zip64).await?;
            if let Some(entry) = self.current.as_mut() {
                entry.crc32 = descriptor.crc;
                entry.compressed_size = Some(descriptor.compressed_size);
                entry.uncompressed_size = Some(descriptor.uncompressed_size);
            }
        }

        if self.entry_completed() {
            let computed = std::mem::take(&mut self.hasher).finalize();
            let expected = self.current.as_ref().map(|entry| entry.crc32);
            if expected != Some(computed) {
                return Err(ZipError::CRC32CheckError);
            }
        }

        self.inflater.reset();
        self.hasher = Hasher::new();
        self.entry_bytes_produced = 0;
        self.bytes_read_from_stream = 0;
        self.offset_in_buffer = 0;
        self.length_of_last_read = 0;
        self.source_exhausted = false;
        self.current = None;
        self.last_stored_entry = None;

        Ok(())
    }

    /// Whether every byte of the current entry's body has been produced, making the running CRC
    /// meaningful to check.
    fn entry_completed(&self) -> bool {
        let entry = match &self.current {
            Some(entry) => entry,
            None => return false,
        };
        if entry.flags.encrypted {
            return false;
        }

        match entry.compression {
            Compression::Stored => {
                if self.has_data_descriptor {
                    match &self.last_stored_entry {
                        Some(cache) => cache.position() == cache.get_ref().len() as u64,
                        None => false,
                    }
                } else {
                    entry.uncompressed_size == Some(self.entry_bytes_produced)
                }
            }
            Compression::Deflate => self.inflater.finished(),
            _ => false,
        }
    }

    /// Caches a stored entry that uses a data descriptor.
    ///
    /// The entry's size isn't recorded anywhere ahead of its data, so the scan walks forward
    /// until the signature of a local file header, central directory header, end of central
    /// directory record or data descriptor appears, taking the descriptor to sit immediately in
    /// front of a header signature when the descriptor itself was written without one.
    ///
    /// On success the entry knows its CRC and sizes, its whole payload is cached in memory, and
    /// the source is positioned just past the data descriptor.
    async fn read_stored_entry(&mut self) -> Result<()> {
        let lfh = LFH_SIGNATURE.to_le_bytes();
        let cfh = CDH_SIGNATURE.to_le_bytes();
        let eocdr = EOCDR_SIGNATURE.to_le_bytes();
        let dd = DATA_DESCRIPTOR_SIGNATURE.to_le_bytes();

        let descriptor_length =
            if self.uses_zip64 { ZIP64_DATA_DESCRIPTOR_LENGTH } else { DATA_DESCRIPTOR_LENGTH };

        let mut cached: Vec<u8> = Vec::new();
        let mut offset = 0;

        'scan: loop {
            let read = self.reader.read(&mut self.buffer[offset..]).await?;
            if read == 0 {
                // Ran out of source without ever finding a following header.
                return Err(ZipError::TruncatedArchive("stored entry with data descriptor"));
            }
            let window = offset + read;
            if window < SIGNATURE_LENGTH {
                offset = window;
                continue;
            }

            for index in 0..=window - SIGNATURE_LENGTH {
                if self.buffer[index] != lfh[0] || self.buffer[index + 1] != lfh[1] {
                    continue;
                }
                let tail = [self.buffer[index + 2], self.buffer[index + 3]];

                let descriptor_start = if tail == [lfh[2], lfh[3]]
                    || tail == [cfh[2], cfh[3]]
                    || tail == [eocdr[2], eocdr[3]]
                {
                    // A following header; a descriptor without a signature ends right where the
                    // header starts. A hit closer to the window start than a whole descriptor
                    // can't be the real one.
                    match index.checked_sub(descriptor_length) {
                        Some(start) => start,
                        None => continue,
                    }
                } else if tail == [dd[2], dd[3]] {
                    index
                } else {
                    continue;
                };

                // Push back the descriptor along with everything read beyond it, cache the
                // payload in front of it, then consume the descriptor from the source.
                self.reader.prepend(&self.buffer[descriptor_start..window]);
                cached.extend_from_slice(&self.buffer[..descriptor_start]);
                break 'scan;
            }

            // Worst case the window ends with a signature-less descriptor plus the first three
            // bytes of the next header's signature; keep that tail and flush the rest.
            if window > descriptor_length + 3 {
                let keep = descriptor_length + 3;
                cached.extend_from_slice(&self.buffer[..window - keep]);
                self.buffer.copy_within(window - keep..window, 0);
                offset = keep;
            } else {
                offset = window;
            }
        }

        let descriptor = read_data_descriptor(&mut self.reader, self.uses_zip64).await?;
        if descriptor.compressed_size != cached.len() as u64 {
            return Err(ZipError::StoredSizeMismatch);
        }

        if let Some(entry) = self.current.as_mut() {
            entry.crc32 = descriptor.crc;
            entry.compressed_size = Some(descriptor.compressed_size);
            entry.uncompressed_size = Some(descriptor.uncompressed_size);
        }

        tracing::debug!(cached = cached.len(), "cached stored entry up to its data descriptor");
        self.hasher.update(&cached);
        self.last_stored_entry = Some(std::io::Cursor::new(cached));

        Ok(())
    }
}
