//! SMBIOS String Set Resolution
//!
//! Each record's formatted portion is followed by a set of null-terminated
//! strings, terminated by an additional null byte (two consecutive nulls
//! mark the end of the set). Fields reference these strings by 1-based
//! index; index 0 means "not specified".
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!

extern crate alloc;
use alloc::string::String;

/// Returns the byte span of the string set starting at `table_start`,
/// including the terminating double null.
///
/// The walker uses this to advance past a record regardless of whether any
/// string index was resolved. A set with no terminator before the buffer
/// ends is treated as ending at the buffer edge, so the returned span never
/// reaches past the declared buffer.
pub fn string_set_span(buffer: &[u8], table_start: usize) -> usize {
    let len = buffer.len();
    if table_start >= len {
        return 0;
    }

    let mut pos = table_start;
    while pos + 1 < len {
        if buffer[pos] == 0 && buffer[pos + 1] == 0 {
            return pos + 2 - table_start;
        }
        pos += 1;
    }

    // Truncated set: no double null before the buffer ends
    len - table_start
}

/// Resolves a 1-based string index from the set starting at `table_start`.
///
/// Index 0 returns an empty string without scanning. An index beyond the
/// strings present before the terminator also resolves to an empty string;
/// malformed or truncated sets degrade to missing data, not failure.
/// Collected bytes are capped at `max_len` and converted with lossy UTF-8.
pub fn resolve_string(buffer: &[u8], table_start: usize, index: u8, max_len: usize) -> String {
    if index == 0 {
        return String::new();
    }

    let len = buffer.len();
    let mut pos = table_start;
    let mut current: usize = 1;

    while pos < len {
        let start = pos;
        while pos < len && buffer[pos] != 0 {
            pos += 1;
        }
        if pos == start {
            // Empty segment: the set terminator was reached
            return String::new();
        }
        if current == index as usize {
            let end = core::cmp::min(pos, start.saturating_add(max_len));
            return String::from_utf8_lossy(&buffer[start..end]).into_owned();
        }
        current += 1;
        pos += 1; // consume the null terminator
    }

    String::new()
}
