// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

pub const SIGNATURE_LENGTH: usize = 4;

// Local file header constants
//
// https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT (4.3.7)
pub const LFH_SIGNATURE: u32 = 0x4034b50;
/// The length of the fixed portion of the LFH, excluding the signature.
pub const LFH_LENGTH: usize = 26;

// Central directory header constants
//
// https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT (4.3.12)
pub const CDH_SIGNATURE: u32 = 0x2014b50;

// End of central directory record constants
//
// https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT (4.3.16)
pub const EOCDR_SIGNATURE: u32 = 0x6054b50;

// https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT (4.3.9)
pub const DATA_DESCRIPTOR_SIGNATURE: u32 = 0x8074b50;

/// The length of a data descriptor excluding its optional signature.
pub const DATA_DESCRIPTOR_LENGTH: usize = 12;
/// The length of a Zip64 data descriptor excluding its optional signature.
pub const ZIP64_DATA_DESCRIPTOR_LENGTH: usize = 20;

/// The contents of a header field when one must reference the zip64 version instead.
pub const NON_ZIP64_MAX_SIZE: u32 = 0xFFFFFFFF;

/// The lowest "version needed to extract" which implies the entry may use zip64 extensions.
pub const ZIP64_MIN_VERSION: u16 = 45;
