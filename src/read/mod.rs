// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A module which supports reading ZIP files.

pub mod stream;

pub(crate) mod io;

use crate::spec::header::{ExtraField, InfoZipUnicodePathExtraField};
use crate::string::{StringEncoding, ZipString};

/// Decides the filename for an entry from its raw header bytes and parsed extra fields.
///
/// When the UTF-8 flag is clear, an Info-ZIP Unicode Path field whose recorded CRC32 matches the
/// raw name takes precedence (if enabled); the header bytes are kept as the alternative form.
pub(crate) fn detect_filename(
    basic: Vec<u8>,
    basic_is_utf8: bool,
    use_unicode_extra_fields: bool,
    extra_fields: &[ExtraField],
) -> ZipString {
    if basic_is_utf8 {
        return ZipString::new(basic, StringEncoding::Utf8);
    }

    if use_unicode_extra_fields {
        let unicode_extra = extra_fields.iter().find_map(|field| match field {
            ExtraField::InfoZipUnicodePath(InfoZipUnicodePathExtraField::V1 { crc32, unicode }) => {
                if *crc32 == crc32fast::hash(&basic) {
                    Some(String::from_utf8(unicode.clone()))
                } else {
                    None
                }
            }
            _ => None,
        });
        if let Some(Ok(s)) = unicode_extra {
            return ZipString::new_with_alternative(s, basic);
        }
    }

    // Do not treat as UTF-8 if UTF-8 flags are not set,
    // some string in MBCS may be valid UTF-8 in form, but they are not in truth.
    if basic.is_ascii() {
        // SAFETY:
        // a valid ASCII string is always a valid UTF-8 string
        unsafe { std::string::String::from_utf8_unchecked(basic).into() }
    } else {
        ZipString::new(basic, StringEncoding::Raw)
    }
}
