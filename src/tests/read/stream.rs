// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::error::ZipError;
use crate::read::stream::{matches, StreamOptions, ZipStreamReader};
use crate::spec::Compression;
use crate::tests::archive::{empty_archive, ArchiveBuilder, Trickle};
use crate::tests::read::read_entry_to_end;

use futures_lite::io::Cursor;

#[tokio::test]
async fn single_stored_entry() {
    crate::tests::init_logger();

    let archive = ArchiveBuilder::new().stored("a.txt", b"abc").finish();
    let mut zip = ZipStreamReader::new(Cursor::new(archive));

    let entry = zip.next_entry().await.unwrap().unwrap();
    assert_eq!(entry.filename().as_str().unwrap(), "a.txt");
    assert_eq!(entry.compression(), Compression::Stored);
    assert_eq!(entry.compressed_size(), Some(3));
    assert_eq!(entry.uncompressed_size(), Some(3));
    assert_eq!(entry.crc32(), crc32fast::hash(b"abc"));
    assert!(!entry.data_descriptor());

    assert_eq!(read_entry_to_end(&mut zip).await.unwrap(), b"abc");
    assert!(zip.next_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn single_deflated_entry() {
    crate::tests::init_logger();

    let archive = ArchiveBuilder::new().deflated("hello.txt", b"hello").finish();
    let mut zip = ZipStreamReader::new(Cursor::new(archive));

    let entry = zip.next_entry().await.unwrap().unwrap();
    assert_eq!(entry.compression(), Compression::Deflate);
    assert_eq!(entry.uncompressed_size(), Some(5));

    assert_eq!(read_entry_to_end(&mut zip).await.unwrap(), b"hello");
    assert!(zip.next_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn deflated_entry_with_data_descriptor() {
    crate::tests::init_logger();

    let data = b"deferred sizes are only known after the descriptor".as_slice();
    let archive = ArchiveBuilder::new().deflated_with_descriptor("d.txt", data, true).finish();
    let mut zip = ZipStreamReader::new(Cursor::new(archive));

    let entry = zip.next_entry().await.unwrap().unwrap();
    assert!(entry.data_descriptor());
    assert_eq!(entry.crc32(), 0);
    assert_eq!(entry.compressed_size(), None);
    assert_eq!(entry.uncompressed_size(), None);

    assert_eq!(read_entry_to_end(&mut zip).await.unwrap(), data);

    // Closing the entry must consume the descriptor and leave the source at the central
    // directory.
    assert!(zip.next_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn deflated_entry_with_unmarked_data_descriptor() {
    crate::tests::init_logger();

    let data = b"the descriptor signature is optional".as_slice();
    let archive = ArchiveBuilder::new().deflated_with_descriptor("d.txt", data, false).finish();
    let mut zip = ZipStreamReader::new(Cursor::new(archive));

    zip.next_entry().await.unwrap().unwrap();
    assert_eq!(read_entry_to_end(&mut zip).await.unwrap(), data);
    assert!(zip.next_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn second_entry_after_skipping_first_unread() {
    crate::tests::init_logger();

    let archive = ArchiveBuilder::new()
        .deflated("first.txt", b"some leading data of a reasonable length")
        .stored("second.txt", b"second")
        .finish();
    let mut zip = ZipStreamReader::new(Cursor::new(archive));

    // Never read the first entry; the close must skip its compressed bytes exactly.
    let first = zip.next_entry().await.unwrap().unwrap();
    assert_eq!(first.filename().as_str().unwrap(), "first.txt");

    let second = zip.next_entry().await.unwrap().unwrap();
    assert_eq!(second.filename().as_str().unwrap(), "second.txt");
    assert_eq!(read_entry_to_end(&mut zip).await.unwrap(), b"second");
    assert!(zip.next_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn second_entry_after_partially_reading_first() {
    crate::tests::init_logger();

    let archive = ArchiveBuilder::new()
        .stored("first.txt", b"abcdefghij")
        .deflated("second.txt", b"intact")
        .finish();
    let mut zip = ZipStreamReader::new(Cursor::new(archive));

    zip.next_entry().await.unwrap().unwrap();
    let mut partial = [0u8; 3];
    assert_eq!(zip.read(&mut partial).await.unwrap(), 3);
    assert_eq!(&partial, b"abc");

    let second = zip.next_entry().await.unwrap().unwrap();
    assert_eq!(second.filename().as_str().unwrap(), "second.txt");
    assert_eq!(read_entry_to_end(&mut zip).await.unwrap(), b"intact");
}

#[tokio::test]
async fn empty_archive_yields_no_entries() {
    crate::tests::init_logger();

    let mut zip = ZipStreamReader::new(Cursor::new(empty_archive()));
    assert!(zip.next_entry().await.unwrap().is_none());
    assert!(zip.next_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn non_zip_leading_bytes_treated_as_end() {
    crate::tests::init_logger();

    let mut zip = ZipStreamReader::new(Cursor::new(b"this is not a zip archive".to_vec()));
    assert!(zip.next_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn zero_length_entry() {
    crate::tests::init_logger();

    let archive = ArchiveBuilder::new().stored("empty", b"").finish();
    let mut zip = ZipStreamReader::new(Cursor::new(archive));

    let entry = zip.next_entry().await.unwrap().unwrap();
    assert_eq!(entry.uncompressed_size(), Some(0));

    let mut chunk = [0u8; 16];
    assert_eq!(zip.read(&mut chunk).await.unwrap(), 0);
    assert!(zip.next_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn entry_ending_exactly_on_a_buffer_boundary() {
    crate::tests::init_logger();

    // The working buffer holds 8192 bytes; a stored payload of exactly that size leaves nothing
    // to push back when the entry is closed.
    let data = vec![0x42u8; 8192];
    let archive = ArchiveBuilder::new().stored("aligned.bin", &data).stored("after", b"ok").finish();
    let mut zip = ZipStreamReader::new(Cursor::new(archive));

    zip.next_entry().await.unwrap().unwrap();
    assert_eq!(read_entry_to_end(&mut zip).await.unwrap(), data);

    let after = zip.next_entry().await.unwrap().unwrap();
    assert_eq!(after.filename().as_str().unwrap(), "after");
    assert_eq!(read_entry_to_end(&mut zip).await.unwrap(), b"ok");
}

#[tokio::test]
async fn entry_ending_one_byte_before_a_buffer_boundary() {
    crate::tests::init_logger();

    let data = vec![0x42u8; 8191];
    let archive = ArchiveBuilder::new().stored("short.bin", &data).stored("after", b"ok").finish();
    let mut zip = ZipStreamReader::new(Cursor::new(archive));

    zip.next_entry().await.unwrap().unwrap();
    assert_eq!(read_entry_to_end(&mut zip).await.unwrap(), data);

    let after = zip.next_entry().await.unwrap().unwrap();
    assert_eq!(after.filename().as_str().unwrap(), "after");
    assert_eq!(read_entry_to_end(&mut zip).await.unwrap(), b"ok");
}

#[tokio::test]
async fn entry_spanning_multiple_buffers() {
    crate::tests::init_logger();

    let data: Vec<u8> = (0..20000u32).map(|value| value as u8).collect();
    let archive = ArchiveBuilder::new().deflated("big.bin", &data).stored("after", b"ok").finish();
    let mut zip = ZipStreamReader::new(Trickle::new(archive, 997));

    zip.next_entry().await.unwrap().unwrap();
    assert_eq!(read_entry_to_end(&mut zip).await.unwrap(), data);

    let after = zip.next_entry().await.unwrap().unwrap();
    assert_eq!(after.filename().as_str().unwrap(), "after");
    assert_eq!(read_entry_to_end(&mut zip).await.unwrap(), b"ok");
}

#[tokio::test]
async fn skip_steps_over_entry_bytes() {
    crate::tests::init_logger();

    let archive = ArchiveBuilder::new().stored("s.txt", b"abcdef").finish();
    let mut zip = ZipStreamReader::new(Cursor::new(archive));

    zip.next_entry().await.unwrap().unwrap();
    assert_eq!(zip.skip(2).await.unwrap(), 2);
    assert_eq!(read_entry_to_end(&mut zip).await.unwrap(), b"cdef");
    assert_eq!(zip.skip(100).await.unwrap(), 0);
}

#[tokio::test]
async fn skip_returns_short_count_at_end_of_entry() {
    crate::tests::init_logger();

    let archive = ArchiveBuilder::new().stored("s.txt", b"abcdef").finish();
    let mut zip = ZipStreamReader::new(Cursor::new(archive));

    zip.next_entry().await.unwrap().unwrap();
    assert_eq!(zip.skip(100).await.unwrap(), 6);
}

#[tokio::test]
async fn crc_mismatch_fails_entry_close() {
    crate::tests::init_logger();

    let archive = ArchiveBuilder::new().stored_with_bad_crc("bad.txt", b"abc").finish();
    let mut zip = ZipStreamReader::new(Cursor::new(archive));

    zip.next_entry().await.unwrap().unwrap();
    assert_eq!(read_entry_to_end(&mut zip).await.unwrap(), b"abc");

    let err = zip.next_entry().await.unwrap_err();
    assert!(matches!(err, ZipError::CRC32CheckError));
}

#[tokio::test]
async fn truncated_local_file_header() {
    crate::tests::init_logger();

    let archive = ArchiveBuilder::new().stored("cut.txt", b"abc").finish();
    let mut zip = ZipStreamReader::new(Cursor::new(archive[..10].to_vec()));

    let err = zip.next_entry().await.unwrap_err();
    assert!(matches!(err, ZipError::TruncatedArchive(_)));
}

#[tokio::test]
async fn truncated_entry_body() {
    crate::tests::init_logger();

    let archive = ArchiveBuilder::new().deflated("cut.bin", b"payload which never ends").finish_without_directory();
    let truncated = archive[..archive.len() - 6].to_vec();
    let mut zip = ZipStreamReader::new(Cursor::new(truncated));

    zip.next_entry().await.unwrap().unwrap();
    let err = read_entry_to_end(&mut zip).await.unwrap_err();
    assert!(matches!(err, ZipError::TruncatedArchive(_)));
}

#[tokio::test]
async fn encrypted_entry_data_is_unreadable_but_skippable() {
    crate::tests::init_logger();

    let archive = ArchiveBuilder::new()
        .entry_raw(b"secret.bin", 0, 0x1, 20, 0xDEADBEEF, 4, 4, &[], &[1, 2, 3, 4])
        .stored("clear.txt", b"ok")
        .finish();
    let mut zip = ZipStreamReader::new(Cursor::new(archive));

    let entry = zip.next_entry().await.unwrap().unwrap();
    assert!(entry.encrypted());
    assert!(!zip.can_read_entry_data(&entry));

    let mut chunk = [0u8; 4];
    let err = zip.read(&mut chunk).await.unwrap_err();
    assert!(matches!(err, ZipError::FeatureNotSupported("encryption")));

    // The entry's size is known, so it can still be stepped over.
    let clear = zip.next_entry().await.unwrap().unwrap();
    assert_eq!(clear.filename().as_str().unwrap(), "clear.txt");
    assert_eq!(read_entry_to_end(&mut zip).await.unwrap(), b"ok");
}

#[tokio::test]
async fn unsupported_method_is_unreadable_but_skippable() {
    crate::tests::init_logger();

    let archive = ArchiveBuilder::new()
        .entry_raw(b"data.bz2", 12, 0, 46, 0, 5, 9, &[], &[9, 9, 9, 9, 9])
        .stored("clear.txt", b"ok")
        .finish();
    let mut zip = ZipStreamReader::new(Cursor::new(archive));

    let entry = zip.next_entry().await.unwrap().unwrap();
    assert_eq!(entry.compression(), Compression::Bz);
    assert!(!zip.can_read_entry_data(&entry));

    let mut chunk = [0u8; 4];
    let err = zip.read(&mut chunk).await.unwrap_err();
    assert!(matches!(err, ZipError::CompressionNotSupported(12)));

    let clear = zip.next_entry().await.unwrap().unwrap();
    assert_eq!(read_entry_to_end(&mut zip).await.unwrap(), b"ok");
    assert_eq!(clear.compression(), Compression::Stored);
}

#[tokio::test]
async fn closed_reader_fails_reads_and_yields_no_entries() {
    crate::tests::init_logger();

    let archive = ArchiveBuilder::new().stored("a.txt", b"abc").finish();
    let mut zip = ZipStreamReader::new(Cursor::new(archive));

    zip.next_entry().await.unwrap().unwrap();
    zip.close();
    zip.close();

    let mut chunk = [0u8; 4];
    assert!(matches!(zip.read(&mut chunk).await.unwrap_err(), ZipError::ReaderClosed));
    assert!(matches!(zip.skip(1).await.unwrap_err(), ZipError::ReaderClosed));
    assert!(zip.next_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn unicode_path_extra_field_overrides_name() {
    crate::tests::init_logger();

    let raw_name = vec![0xA4, 0xD6, 0x21];
    let unicode = "tæst.txt";

    let mut extra = Vec::new();
    extra.extend_from_slice(&0x7075u16.to_le_bytes());
    extra.extend_from_slice(&((5 + unicode.len()) as u16).to_le_bytes());
    extra.push(1);
    extra.extend_from_slice(&crc32fast::hash(&raw_name).to_le_bytes());
    extra.extend_from_slice(unicode.as_bytes());

    let archive = ArchiveBuilder::new()
        .entry_raw(&raw_name, 0, 0, 20, crc32fast::hash(b"x"), 1, 1, &extra, b"x")
        .finish();

    let mut zip = ZipStreamReader::new(Cursor::new(archive.clone()));
    let entry = zip.next_entry().await.unwrap().unwrap();
    assert_eq!(entry.filename().as_str().unwrap(), unicode);
    assert_eq!(entry.filename().alternative(), Some(raw_name.as_slice()));

    // With the override disabled the raw (non UTF-8) bytes are surfaced unchanged.
    let options = StreamOptions::new().unicode_extra_fields(false);
    let mut zip = ZipStreamReader::with_options(Cursor::new(archive), options);
    let entry = zip.next_entry().await.unwrap().unwrap();
    assert!(entry.filename().as_str().is_err());
    assert_eq!(entry.filename().as_bytes(), raw_name.as_slice());
}

#[tokio::test]
async fn unicode_path_extra_field_with_stale_crc_is_ignored() {
    crate::tests::init_logger();

    let raw_name = vec![0xA4, 0xD6];

    let mut extra = Vec::new();
    extra.extend_from_slice(&0x7075u16.to_le_bytes());
    extra.extend_from_slice(&9u16.to_le_bytes());
    extra.push(1);
    extra.extend_from_slice(&0xBAD0BAD0u32.to_le_bytes());
    extra.extend_from_slice(b"misc");

    let archive = ArchiveBuilder::new()
        .entry_raw(&raw_name, 0, 0, 20, crc32fast::hash(b"x"), 1, 1, &extra, b"x")
        .finish();

    let mut zip = ZipStreamReader::new(Cursor::new(archive));
    let entry = zip.next_entry().await.unwrap().unwrap();
    assert_eq!(entry.filename().as_bytes(), raw_name.as_slice());
    assert!(entry.filename().as_str().is_err());
}

#[tokio::test]
async fn utf8_flag_marks_name_encoding() {
    crate::tests::init_logger();

    let archive = ArchiveBuilder::new()
        .entry_raw("tæst.txt".as_bytes(), 0, 0x800, 20, crc32fast::hash(b"x"), 1, 1, &[], b"x")
        .finish();

    let mut zip = ZipStreamReader::new(Cursor::new(archive));
    let entry = zip.next_entry().await.unwrap().unwrap();
    assert!(entry.general_purpose_flag().filename_unicode);
    assert_eq!(entry.filename().as_str().unwrap(), "tæst.txt");
}

#[tokio::test]
async fn entry_modification_date_is_decoded() {
    crate::tests::init_logger();

    let archive = ArchiveBuilder::new().stored("dated.txt", b"x").finish();
    let mut zip = ZipStreamReader::new(Cursor::new(archive));

    let entry = zip.next_entry().await.unwrap().unwrap();
    let date = entry.last_modification_date();
    assert_eq!(date.year(), 2024);
    assert_eq!(date.month(), 6);
    assert_eq!(date.day(), 15);
    assert_eq!(date.hour(), 12);
    assert_eq!(date.minute(), 34);
    assert_eq!(date.second(), 56);
}

#[cfg(feature = "tokio")]
#[tokio::test]
async fn tokio_compat_reader_streams() {
    crate::tests::init_logger();

    let archive = ArchiveBuilder::new().deflated("t.txt", b"tokio compat").finish();
    let mut zip = crate::tokio::read::stream::ZipStreamReader::new(std::io::Cursor::new(archive));

    let entry = zip.next_entry().await.unwrap().unwrap();
    assert_eq!(entry.filename().as_str().unwrap(), "t.txt");
    assert!(zip.can_read_entry_data(&entry));

    let mut collected = Vec::new();
    let mut chunk = [0u8; 64];
    loop {
        match zip.read(&mut chunk).await.unwrap() {
            0 => break,
            count => collected.extend_from_slice(&chunk[..count]),
        }
    }
    assert_eq!(collected, b"tokio compat");
    assert!(zip.next_entry().await.unwrap().is_none());
}

#[test]
fn matches_recognises_archive_signatures() {
    let stored = ArchiveBuilder::new().stored("a", b"x").finish();
    assert!(matches(&stored));
    assert!(matches(&empty_archive()));

    assert!(!matches(b"PK"));
    assert!(!matches(b"garbage data"));
    assert!(!matches(&[0x50, 0x4B, 0x01, 0x02]));
}
