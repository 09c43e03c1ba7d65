//! Hardware Identity Extraction
//!
//! Drives the end-to-end walk over an SMBIOS structure table and
//! consolidates the baseboard, enclosure, and processor records into a
//! single [`HwInfo`] result.
//!
//! Malformed firmware data never produces an error from the walk: the
//! scan stops at the first record it cannot trust and whatever was
//! already resolved is returned, with the remaining fields at their
//! `"Unknown"` defaults. The only `Err` this module produces is for a
//! caller contract violation (an empty input buffer).
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!

extern crate alloc;
use alloc::string::String;

use crate::smbios::{
    DEFAULT_MAX_STRING_LENGTH, SMBIOS_HEADER_SIZE, SMBIOS_TYPE_BASEBOARD_INFORMATION,
    SMBIOS_TYPE_END_OF_TABLE, SMBIOS_TYPE_PROCESSOR_INFORMATION, SMBIOS_TYPE_SYSTEM_ENCLOSURE,
    SmbiosTableHeader, UNKNOWN_NAME,
};
use crate::smbios_record::{BaseboardInfo, ChassisInfo, ProcessorInfo};
use crate::string_pool::string_set_span;

/// Capacity of each [`HwInfo`] text field in bytes, matching the fixed
/// destination buffers of the original wire contract. Longer resolved
/// strings are silently truncated to `capacity - 1` bytes.
pub const HW_INFO_FIELD_CAPACITY: usize = 256;

/// Byte length of the `RawSMBIOSData` envelope the Windows firmware
/// table API prepends to the structure table.
pub const RAW_SMBIOS_ENVELOPE_SIZE: usize = 8;

/// Decoder errors.
///
/// These indicate caller bugs, not firmware data problems; data
/// anomalies degrade to default values instead.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The input buffer was empty
    EmptyBuffer,
    /// The buffer is too short to hold the `RawSMBIOSData` prefix
    TruncatedEnvelope,
}

/// Tuning knobs for a decode pass.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Cap on the bytes collected for any single resolved string.
    /// Bounds worst-case memory use on adversarial tables.
    pub max_string_len: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { max_string_len: DEFAULT_MAX_STRING_LENGTH }
    }
}

/// Consolidated hardware identity extracted from one structure table.
///
/// Every field is bounded to [`HW_INFO_FIELD_CAPACITY`] bytes and
/// defaults to `"Unknown"` when no qualifying record was found or the
/// field could not be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct HwInfo {
    /// Baseboard manufacturer name
    pub motherboard_manufacturer: String,
    /// Baseboard product (model) name
    pub motherboard_model: String,
    /// Chassis form factor display name
    pub chassis_type: String,
    /// CPU socket display name, mapped from the processor upgrade code
    pub cpu_socket: String,
}

impl Default for HwInfo {
    fn default() -> Self {
        Self {
            motherboard_manufacturer: String::from(UNKNOWN_NAME),
            motherboard_model: String::from(UNKNOWN_NAME),
            chassis_type: String::from(UNKNOWN_NAME),
            cpu_socket: String::from(UNKNOWN_NAME),
        }
    }
}

/// The `RawSMBIOSData` header returned by `GetSystemFirmwareTable` on
/// Windows: a small version prefix followed by the structure table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSmbiosEnvelope {
    /// Whether the data came from the legacy 2.0 calling method
    pub used20_calling_method: u8,
    /// SMBIOS major version
    pub major_version: u8,
    /// SMBIOS minor version
    pub minor_version: u8,
    /// DMI revision
    pub dmi_revision: u8,
    /// Declared byte length of the structure table that follows
    pub table_length: u32,
}

impl RawSmbiosEnvelope {
    /// Splits a `RawSMBIOSData` buffer into its envelope and the inner
    /// structure table.
    ///
    /// The declared table length is clamped to the bytes actually
    /// present, so a lying envelope cannot extend the table past the
    /// buffer.
    pub fn parse(buffer: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        if buffer.len() < RAW_SMBIOS_ENVELOPE_SIZE {
            return Err(DecodeError::TruncatedEnvelope);
        }
        let envelope = Self {
            used20_calling_method: buffer[0],
            major_version: buffer[1],
            minor_version: buffer[2],
            dmi_revision: buffer[3],
            table_length: u32::from_le_bytes([buffer[4], buffer[5], buffer[6], buffer[7]]),
        };
        let body = &buffer[RAW_SMBIOS_ENVELOPE_SIZE..];
        let declared = envelope.table_length as usize;
        let table = if declared < body.len() { &body[..declared] } else { body };
        Ok((envelope, table))
    }

    /// True when the reported SMBIOS version is at least `major.minor`.
    pub fn is_version_at_least(&self, major: u8, minor: u8) -> bool {
        self.major_version > major || (self.major_version == major && self.minor_version >= minor)
    }
}

/// Copies `value` into a field of the given byte capacity, truncating to
/// `capacity - 1` bytes on overflow. Truncation backs up to a character
/// boundary so the result stays valid UTF-8.
fn bounded_copy(value: &str, capacity: usize) -> String {
    if value.len() < capacity {
        return String::from(value);
    }
    let mut end = capacity - 1;
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    String::from(&value[..end])
}

/// Decodes a structure table with default [`DecodeOptions`].
///
/// See [`decode_hardware_info_with`].
pub fn decode_hardware_info(buffer: &[u8]) -> Result<HwInfo, DecodeError> {
    decode_hardware_info_with(buffer, &DecodeOptions::default())
}

/// Walks `buffer` as a sequence of back-to-back SMBIOS records and
/// returns the consolidated hardware identity.
///
/// The walk ends at the end-of-table record (type 127), when fewer than
/// four bytes remain, or at the first malformed record (declared length
/// under four bytes, or a record extending past the buffer). The first
/// occurrence of each recognized type wins; later duplicates are walked
/// past like unrecognized types.
pub fn decode_hardware_info_with(buffer: &[u8], options: &DecodeOptions) -> Result<HwInfo, DecodeError> {
    if buffer.is_empty() {
        return Err(DecodeError::EmptyBuffer);
    }

    let mut info = HwInfo::default();
    let mut seen_baseboard = false;
    let mut seen_chassis = false;
    let mut seen_processor = false;

    let mut position = 0usize;
    loop {
        let Some(header) = SmbiosTableHeader::read_at(buffer, position) else {
            // Fewer than four bytes remain; partial results stand
            break;
        };
        if header.record_type == SMBIOS_TYPE_END_OF_TABLE {
            break;
        }

        let length = header.length as usize;
        if length < SMBIOS_HEADER_SIZE {
            log::warn!("malformed SMBIOS record at offset {}: declared length {}", position, length);
            break;
        }
        let record_end = position + length;
        if record_end > buffer.len() {
            log::warn!(
                "SMBIOS record at offset {} overruns the table ({} declared, {} available)",
                position,
                length,
                buffer.len() - position
            );
            break;
        }

        match header.record_type {
            SMBIOS_TYPE_BASEBOARD_INFORMATION => {
                if !seen_baseboard {
                    seen_baseboard = true;
                    let board = BaseboardInfo::decode(buffer, position, &header, options.max_string_len);
                    if !board.manufacturer.is_empty() {
                        info.motherboard_manufacturer = bounded_copy(&board.manufacturer, HW_INFO_FIELD_CAPACITY);
                    }
                    if !board.product.is_empty() {
                        info.motherboard_model = bounded_copy(&board.product, HW_INFO_FIELD_CAPACITY);
                    }
                }
            }
            SMBIOS_TYPE_SYSTEM_ENCLOSURE => {
                if !seen_chassis {
                    seen_chassis = true;
                    let chassis = ChassisInfo::decode(buffer, position, &header, options.max_string_len);
                    info.chassis_type = String::from(chassis.type_name());
                }
            }
            SMBIOS_TYPE_PROCESSOR_INFORMATION => {
                if !seen_processor {
                    seen_processor = true;
                    let processor = ProcessorInfo::decode(buffer, position, &header, options.max_string_len);
                    info.cpu_socket = String::from(processor.socket_name());
                }
            }
            other => {
                log::debug!("skipping SMBIOS record type {} at offset {}", other, position);
            }
        }

        // Advance past the formatted portion and the trailing string set
        let next = record_end + string_set_span(buffer, record_end);
        if next <= position {
            // A non-advancing step would loop forever
            log::warn!("SMBIOS walk stalled at offset {}", position);
            break;
        }
        position = next;
    }

    Ok(info)
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use crate::smbios::SMBIOS_HANDLE_PI_RESERVED;
    use std::vec::Vec;
    use zerocopy::IntoBytes;

    fn record(record_type: u8, fixed: &[u8], strings: &[&str]) -> Vec<u8> {
        let length = (SMBIOS_HEADER_SIZE + fixed.len()) as u8;
        let header = SmbiosTableHeader::new(record_type, length, SMBIOS_HANDLE_PI_RESERVED);
        let mut bytes = Vec::new();
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(fixed);
        if strings.is_empty() {
            bytes.extend_from_slice(&[0, 0]);
        } else {
            for s in strings {
                bytes.extend_from_slice(s.as_bytes());
                bytes.push(0);
            }
            bytes.push(0);
        }
        bytes
    }

    fn end_of_table() -> Vec<u8> {
        record(SMBIOS_TYPE_END_OF_TABLE, &[], &[])
    }

    #[test]
    fn test_empty_buffer_is_rejected() {
        assert_eq!(decode_hardware_info(&[]), Err(DecodeError::EmptyBuffer));
    }

    #[test]
    fn test_lone_end_of_table_yields_all_unknown() {
        let info = decode_hardware_info(&end_of_table()).expect("decode failed");
        assert_eq!(info, HwInfo::default());
        assert_eq!(info.motherboard_manufacturer, "Unknown");
        assert_eq!(info.cpu_socket, "Unknown");
    }

    #[test]
    fn test_end_of_table_without_string_set() {
        // Just the 4-byte sentinel header, no double null after it
        let table = [SMBIOS_TYPE_END_OF_TABLE, 4, 0, 0];
        let info = decode_hardware_info(&table).expect("decode failed");
        assert_eq!(info, HwInfo::default());
    }

    #[test]
    fn test_short_buffer_yields_all_unknown() {
        let info = decode_hardware_info(&[0x7Fu8, 4]).expect("decode failed");
        assert_eq!(info, HwInfo::default());
    }

    #[test]
    fn test_malformed_length_stops_walk() {
        let mut table = record(3, &[1, 0x07, 0], &["Acme"]);
        // A record claiming a 2-byte length is malformed
        table.extend_from_slice(&[4u8, 2, 0, 0]);
        table.extend_from_slice(&end_of_table());

        let info = decode_hardware_info(&table).expect("decode failed");
        // The chassis before the bad record still decodes
        assert_eq!(info.chassis_type, "Tower");
        assert_eq!(info.cpu_socket, "Unknown");
    }

    #[test]
    fn test_record_overrunning_buffer_stops_walk() {
        let mut table = record(3, &[1, 0x07, 0], &["Acme"]);
        // Header whose declared length reaches past the buffer end
        table.extend_from_slice(&[4u8, 0x40, 0, 0, 0, 0]);

        let info = decode_hardware_info(&table).expect("decode failed");
        assert_eq!(info.chassis_type, "Tower");
        assert_eq!(info.cpu_socket, "Unknown");
    }

    #[test]
    fn test_first_record_of_each_type_wins() {
        let mut table = record(3, &[1, 0x07, 0], &["First"]);
        table.extend_from_slice(&record(3, &[1, 0x09, 0], &["Second"]));
        table.extend_from_slice(&end_of_table());

        let info = decode_hardware_info(&table).expect("decode failed");
        assert_eq!(info.chassis_type, "Tower");
    }

    #[test]
    fn test_unrecognized_records_are_skipped_precisely() {
        // A Type 1 (system information) record the decoder does not parse
        let mut table = record(1, &[1, 2, 3, 4], &["Maker", "Product", "1.0", "Serial"]);
        table.extend_from_slice(&record(3, &[1, 0x0D, 0], &["AIO Inc"]));
        table.extend_from_slice(&end_of_table());

        let info = decode_hardware_info(&table).expect("decode failed");
        assert_eq!(info.chassis_type, "All-in-One");
    }

    #[test]
    fn test_empty_baseboard_strings_stay_unknown() {
        // Indices present but 0 ("not specified")
        let mut table = record(2, &[0, 0, 0, 0], &[]);
        table.extend_from_slice(&end_of_table());

        let info = decode_hardware_info(&table).expect("decode failed");
        assert_eq!(info.motherboard_manufacturer, "Unknown");
        assert_eq!(info.motherboard_model, "Unknown");
    }

    #[test]
    fn test_long_string_is_bounded_to_field_capacity() {
        let long_name = "m".repeat(400);
        let mut table = record(2, &[1, 0, 0, 0], &[&long_name]);
        table.extend_from_slice(&end_of_table());

        let info = decode_hardware_info(&table).expect("decode failed");
        assert_eq!(info.motherboard_manufacturer.len(), HW_INFO_FIELD_CAPACITY - 1);
        assert!(long_name.starts_with(&info.motherboard_manufacturer));
    }

    #[test]
    fn test_bounded_copy_respects_char_boundary() {
        // 3-byte characters straddling the truncation point
        let value = "\u{20AC}".repeat(100); // 300 bytes of euro signs
        let copied = bounded_copy(&value, 16);
        assert!(copied.len() <= 15);
        assert_eq!(copied.len() % 3, 0);
        assert!(value.starts_with(&copied));
    }

    #[test]
    fn test_bounded_copy_passthrough_under_capacity() {
        assert_eq!(bounded_copy("short", 256), "short");
        assert_eq!(bounded_copy("", 256), "");
    }

    #[test]
    fn test_envelope_parse_and_clamp() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&[0u8, 3, 6, 0]);
        raw.extend_from_slice(&(1000u32).to_le_bytes()); // lies about the length
        raw.extend_from_slice(&end_of_table());

        let (envelope, table) = RawSmbiosEnvelope::parse(&raw).expect("parse failed");
        assert_eq!(envelope.major_version, 3);
        assert_eq!(envelope.minor_version, 6);
        assert!(envelope.is_version_at_least(3, 0));
        assert!(!envelope.is_version_at_least(3, 7));
        // Declared length is clamped to the bytes actually present
        assert_eq!(table.len(), raw.len() - RAW_SMBIOS_ENVELOPE_SIZE);

        let info = decode_hardware_info(table).expect("decode failed");
        assert_eq!(info, HwInfo::default());
    }

    #[test]
    fn test_envelope_declared_length_trims_trailing_bytes() {
        let table = end_of_table();
        let mut raw = Vec::new();
        raw.extend_from_slice(&[0u8, 3, 2, 0]);
        raw.extend_from_slice(&(table.len() as u32).to_le_bytes());
        raw.extend_from_slice(&table);
        raw.extend_from_slice(&[0xAA; 16]); // allocation slack past the table

        let (_, inner) = RawSmbiosEnvelope::parse(&raw).expect("parse failed");
        assert_eq!(inner, table.as_slice());
    }

    #[test]
    fn test_envelope_too_short() {
        assert_eq!(RawSmbiosEnvelope::parse(&[0u8; 7]), Err(DecodeError::TruncatedEnvelope));
    }

    #[test]
    fn test_decode_options_cap_applies() {
        let long_name = "x".repeat(64);
        let mut table = record(2, &[1, 0, 0, 0], &[&long_name]);
        table.extend_from_slice(&end_of_table());

        let options = DecodeOptions { max_string_len: 8 };
        let info = decode_hardware_info_with(&table, &options).expect("decode failed");
        assert_eq!(info.motherboard_manufacturer, "xxxxxxxx");
    }
}
