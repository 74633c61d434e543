// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

/// A compression method recognised by this crate.
///
/// Only [`Compression::Stored`] and [`Compression::Deflate`] entries can have their data read back;
/// every other method is carried so the entry can still be inspected and skipped.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Stored,
    Deflate,
    Bz,
    Lzma,
    Zstd,
    Xz,
    /// A method this crate doesn't know by name.
    Other(u16),
}

impl From<u16> for Compression {
    // Convert a u16 stored with little endianness into a recognised compression method.
    // https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT (4.4.5)
    fn from(value: u16) -> Self {
        match value {
            0 => Compression::Stored,
            8 => Compression::Deflate,
            12 => Compression::Bz,
            14 => Compression::Lzma,
            93 => Compression::Zstd,
            95 => Compression::Xz,
            value => Compression::Other(value),
        }
    }
}

impl From<&Compression> for u16 {
    // Convert a recognised compression method into its relevant u16 stored with little endianness.
    // https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT (4.4.5)
    fn from(compression: &Compression) -> u16 {
        match compression {
            Compression::Stored => 0,
            Compression::Deflate => 8,
            Compression::Bz => 12,
            Compression::Lzma => 14,
            Compression::Zstd => 93,
            Compression::Xz => 95,
            Compression::Other(value) => *value,
        }
    }
}

impl From<Compression> for u16 {
    fn from(compression: Compression) -> u16 {
        (&compression).into()
    }
}

impl Compression {
    /// Whether this crate implements decompression for the method.
    pub fn is_readable(&self) -> bool {
        matches!(self, Compression::Stored | Compression::Deflate)
    }
}
