// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::error::{Result, ZipError};
use crate::spec::consts::NON_ZIP64_MAX_SIZE;
use crate::spec::header::{
    ExtraField, HeaderId, InfoZipUnicodeCommentExtraField, InfoZipUnicodePathExtraField, UnknownExtraField,
    Zip64ExtendedInformationExtraField,
};

/// Parse a local file header's extra field data into typed records.
///
/// The raw 32-bit size fields of the header drive the Zip64 parse: a 64-bit value is only present
/// in the extended information field for sizes the header deferred with the `0xFFFFFFFF` sentinel.
pub(crate) fn parse_extra_fields(
    data: Vec<u8>,
    uncompressed_size: u32,
    compressed_size: u32,
) -> Result<Vec<ExtraField>> {
    let mut extra_fields = Vec::new();
    let mut remaining = &data[..];

    while !remaining.is_empty() {
        if remaining.len() < 4 {
            return Err(ZipError::MalformedExtraField);
        }
        let header_id = HeaderId::from(u16::from_le_bytes([remaining[0], remaining[1]]));
        let data_size = u16::from_le_bytes([remaining[2], remaining[3]]) as usize;
        if remaining.len() < 4 + data_size {
            return Err(ZipError::MalformedExtraField);
        }
        let field = extra_field_from_bytes(
            header_id,
            data_size as u16,
            &remaining[4..4 + data_size],
            uncompressed_size,
            compressed_size,
        )?;
        extra_fields.push(field);
        remaining = &remaining[4 + data_size..];
    }

    Ok(extra_fields)
}

fn extra_field_from_bytes(
    header_id: HeaderId,
    data_size: u16,
    data: &[u8],
    uncompressed_size: u32,
    compressed_size: u32,
) -> Result<ExtraField> {
    match header_id {
        HeaderId::Zip64ExtendedInformationExtraField => Ok(ExtraField::Zip64ExtendedInformation(
            zip64_extended_information_field_from_bytes(data, uncompressed_size, compressed_size)?,
        )),
        HeaderId::InfoZipUnicodeCommentExtraField => {
            Ok(ExtraField::InfoZipUnicodeComment(info_zip_unicode_comment_extra_field_from_bytes(data)?))
        }
        HeaderId::InfoZipUnicodePathExtraField => {
            Ok(ExtraField::InfoZipUnicodePath(info_zip_unicode_path_extra_field_from_bytes(data)?))
        }
        header_id @ HeaderId::Other(_) => {
            Ok(ExtraField::Unknown(UnknownExtraField { header_id, data_size, content: data.to_vec() }))
        }
    }
}

/// Parse a Zip64 extended information field from bytes.
/// The content of "data" should exclude the header.
fn zip64_extended_information_field_from_bytes(
    data: &[u8],
    uncompressed_size: u32,
    compressed_size: u32,
) -> Result<Zip64ExtendedInformationExtraField> {
    let mut remaining = data;

    let uncompressed_size = if uncompressed_size == NON_ZIP64_MAX_SIZE {
        Some(take_u64(&mut remaining)?)
    } else {
        None
    };
    let compressed_size = if compressed_size == NON_ZIP64_MAX_SIZE {
        Some(take_u64(&mut remaining)?)
    } else {
        None
    };
    let relative_header_offset = if remaining.len() >= 8 { Some(take_u64(&mut remaining)?) } else { None };
    let disk_start_number = if remaining.len() >= 4 {
        let value = u32::from_le_bytes([remaining[0], remaining[1], remaining[2], remaining[3]]);
        Some(value)
    } else {
        None
    };

    Ok(Zip64ExtendedInformationExtraField {
        uncompressed_size,
        compressed_size,
        relative_header_offset,
        disk_start_number,
    })
}

fn info_zip_unicode_comment_extra_field_from_bytes(data: &[u8]) -> Result<InfoZipUnicodeCommentExtraField> {
    if data.is_empty() {
        return Err(ZipError::MalformedExtraField);
    }
    let version = data[0];
    match version {
        1 => {
            if data.len() < 5 {
                return Err(ZipError::MalformedExtraField);
            }
            let crc32 = u32::from_le_bytes([data[1], data[2], data[3], data[4]]);
            let unicode = data[5..].to_vec();
            Ok(InfoZipUnicodeCommentExtraField::V1 { crc32, unicode })
        }
        _ => Ok(InfoZipUnicodeCommentExtraField::Unsupported { version, data: data[1..].to_vec() }),
    }
}

fn info_zip_unicode_path_extra_field_from_bytes(data: &[u8]) -> Result<InfoZipUnicodePathExtraField> {
    if data.is_empty() {
        return Err(ZipError::MalformedExtraField);
    }
    let version = data[0];
    match version {
        1 => {
            if data.len() < 5 {
                return Err(ZipError::MalformedExtraField);
            }
            let crc32 = u32::from_le_bytes([data[1], data[2], data[3], data[4]]);
            let unicode = data[5..].to_vec();
            Ok(InfoZipUnicodePathExtraField::V1 { crc32, unicode })
        }
        _ => Ok(InfoZipUnicodePathExtraField::Unsupported { version, data: data[1..].to_vec() }),
    }
}

fn take_u64(data: &mut &[u8]) -> Result<u64> {
    if data.len() < 8 {
        return Err(ZipError::Zip64ExtendedFieldIncomplete);
    }
    let value =
        u64::from_le_bytes([data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7]]);
    *data = &data[8..];
    Ok(value)
}
