// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

// https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT (4.3.7)
pub struct LocalFileHeader {
    pub version: u16,
    pub flags: GeneralPurposeFlag,
    pub compression: u16,
    pub mod_time: u16,
    pub mod_date: u16,
    pub crc: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name_length: u16,
    pub extra_field_length: u16,
}

impl From<[u8; 26]> for LocalFileHeader {
    fn from(value: [u8; 26]) -> LocalFileHeader {
        LocalFileHeader {
            version: u16::from_le_bytes([value[0], value[1]]),
            flags: GeneralPurposeFlag::from(u16::from_le_bytes([value[2], value[3]])),
            compression: u16::from_le_bytes([value[4], value[5]]),
            mod_time: u16::from_le_bytes([value[6], value[7]]),
            mod_date: u16::from_le_bytes([value[8], value[9]]),
            crc: u32::from_le_bytes([value[10], value[11], value[12], value[13]]),
            compressed_size: u32::from_le_bytes([value[14], value[15], value[16], value[17]]),
            uncompressed_size: u32::from_le_bytes([value[18], value[19], value[20], value[21]]),
            file_name_length: u16::from_le_bytes([value[22], value[23]]),
            extra_field_length: u16::from_le_bytes([value[24], value[25]]),
        }
    }
}

// https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT (4.4.4)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GeneralPurposeFlag {
    pub encrypted: bool,
    pub data_descriptor: bool,
    pub filename_unicode: bool,
}

impl From<u16> for GeneralPurposeFlag {
    fn from(value: u16) -> GeneralPurposeFlag {
        let encrypted = !matches!(value & 0x1, 0);
        let data_descriptor = !matches!((value & 0x8) >> 3, 0);
        let filename_unicode = !matches!((value & 0x800) >> 11, 0);

        GeneralPurposeFlag { encrypted, data_descriptor, filename_unicode }
    }
}

/// The data descriptor record which optionally trails an entry's data.
///
/// https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT (4.3.9)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataDescriptor {
    pub crc: u32,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
}

/// 2 byte header ids.
///
/// https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT (4.5.2)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeaderId {
    Zip64ExtendedInformationExtraField,
    InfoZipUnicodeCommentExtraField,
    InfoZipUnicodePathExtraField,
    Other(u16),
}

impl From<u16> for HeaderId {
    fn from(value: u16) -> Self {
        match value {
            0x0001 => Self::Zip64ExtendedInformationExtraField,
            0x6375 => Self::InfoZipUnicodeCommentExtraField,
            0x7075 => Self::InfoZipUnicodePathExtraField,
            other => Self::Other(other),
        }
    }
}

impl From<HeaderId> for u16 {
    fn from(value: HeaderId) -> Self {
        match value {
            HeaderId::Zip64ExtendedInformationExtraField => 0x0001,
            HeaderId::InfoZipUnicodeCommentExtraField => 0x6375,
            HeaderId::InfoZipUnicodePathExtraField => 0x7075,
            HeaderId::Other(other) => other,
        }
    }
}

/// Represents each extra field.
/// Not strictly part of the spec, but is the most useful way to represent the data.
#[derive(Clone, Debug)]
pub enum ExtraField {
    Zip64ExtendedInformation(Zip64ExtendedInformationExtraField),
    InfoZipUnicodeComment(InfoZipUnicodeCommentExtraField),
    InfoZipUnicodePath(InfoZipUnicodePathExtraField),
    Unknown(UnknownExtraField),
}

/// An extended information header for Zip64.
///
/// In a local file header the size fields are only present when the corresponding 32-bit field
/// holds the `0xFFFFFFFF` sentinel; the offset and disk fields are usually absent.
///
/// https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT (4.5.3)
#[derive(Clone, Debug)]
pub struct Zip64ExtendedInformationExtraField {
    pub uncompressed_size: Option<u64>,
    pub compressed_size: Option<u64>,
    pub relative_header_offset: Option<u64>,
    pub disk_start_number: Option<u32>,
}

/// Stores the UTF-8 version of the file comment as stored in the central directory header.
///
/// https://libzip.org/specifications/extrafld.txt
#[derive(Clone, Debug)]
pub enum InfoZipUnicodeCommentExtraField {
    V1 { crc32: u32, unicode: Vec<u8> },
    Unsupported { version: u8, data: Vec<u8> },
}

/// Stores the UTF-8 version of the file name field as stored in the local header and central
/// directory header.
///
/// https://libzip.org/specifications/extrafld.txt
#[derive(Clone, Debug)]
pub enum InfoZipUnicodePathExtraField {
    V1 { crc32: u32, unicode: Vec<u8> },
    Unsupported { version: u8, data: Vec<u8> },
}

/// Represents any unparsed extra field.
#[derive(Clone, Debug)]
pub struct UnknownExtraField {
    pub header_id: HeaderId,
    pub data_size: u16,
    pub content: Vec<u8>,
}
