// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::date::ZipDateTime;

#[test]
fn unpacks_msdos_date_and_time_fields() {
    // 2018-11-17, 16:38:58.
    let date = ZipDateTime { date: 0x4D71, time: 0x84DD };

    assert_eq!(date.year(), 2018);
    assert_eq!(date.month(), 11);
    assert_eq!(date.day(), 17);
    assert_eq!(date.hour(), 16);
    assert_eq!(date.minute(), 38);
    assert_eq!(date.second(), 58);
}

#[test]
fn epoch_is_1980() {
    let date = ZipDateTime { date: 0x0021, time: 0 };

    assert_eq!(date.year(), 1980);
    assert_eq!(date.month(), 1);
    assert_eq!(date.day(), 1);
    assert_eq!(date.hour(), 0);
    assert_eq!(date.minute(), 0);
    assert_eq!(date.second(), 0);
}

#[cfg(feature = "chrono")]
#[test]
fn converts_to_chrono() {
    use chrono::{Datelike, Timelike};

    let date = ZipDateTime { date: 0x4D71, time: 0x84DD };
    let converted = date.as_chrono().single().expect("a unique chrono representation");

    assert_eq!(converted.year(), 2018);
    assert_eq!(converted.month(), 11);
    assert_eq!(converted.day(), 17);
    assert_eq!(converted.hour(), 16);
    assert_eq!(converted.minute(), 38);
    assert_eq!(converted.second(), 58);
}
