//! SMBIOS Record Decoding
//!
//! Type-specific field extraction for the three record kinds this crate
//! understands: baseboard (Type 2), system enclosure (Type 3), and
//! processor (Type 4).
//!
//! The original firmware tooling read these records by aliasing packed
//! structs over the raw bytes. Here every field goes through a
//! bounds-checked reader that validates the field against both the
//! record's declared length and the buffer end, so a short or lying
//! record can never be read past its declared end.
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
    BaseBoardFeatureFlags, ProcessorCharacteristics, SmbiosTableHeader, UNKNOWN_NAME, chassis_type_name,
    processor_upgrade_name,
};
use crate::string_pool::resolve_string;

// Baseboard Information (Type 2) field offsets, header inclusive.
const BASEBOARD_MANUFACTURER: usize = 0x04;
const BASEBOARD_PRODUCT: usize = 0x05;
const BASEBOARD_VERSION: usize = 0x06;
const BASEBOARD_SERIAL_NUMBER: usize = 0x07;
const BASEBOARD_FEATURE_FLAGS: usize = 0x09;

// System Enclosure (Type 3) field offsets.
const CHASSIS_MANUFACTURER: usize = 0x04;
const CHASSIS_TYPE: usize = 0x05;
const CHASSIS_VERSION: usize = 0x06;

/// Bit 7 of the chassis type byte is the chassis lock bit, not part of
/// the enumeration code.
const CHASSIS_LOCK_BIT: u8 = 0x80;

// Processor Information (Type 4) field offsets.
const PROCESSOR_SOCKET_DESIGNATION: usize = 0x04;
const PROCESSOR_TYPE: usize = 0x05;
const PROCESSOR_FAMILY: usize = 0x06;
const PROCESSOR_MANUFACTURER: usize = 0x07;
const PROCESSOR_ID: usize = 0x08;
const PROCESSOR_VERSION: usize = 0x0C;
const PROCESSOR_UPGRADE: usize = 0x16;
const PROCESSOR_CORE_COUNT: usize = 0x20;
const PROCESSOR_THREAD_COUNT: usize = 0x22;
const PROCESSOR_CHARACTERISTICS: usize = 0x23;
const PROCESSOR_FAMILY_2: usize = 0x25;
const PROCESSOR_CORE_COUNT_2: usize = 0x27;
const PROCESSOR_THREAD_COUNT_2: usize = 0x2B;
const PROCESSOR_THREAD_ENABLED: usize = 0x30;
const PROCESSOR_SOCKET_TYPE: usize = 0x32;

/// Declared length of a processor record that predates the SMBIOS 3.x
/// extension fields. Records of this length still carry the socket
/// designation and the processor upgrade code.
pub const PROCESSOR_INFO_LEGACY_LENGTH: u8 = 0x1A;

/// Reads one byte of a record's formatted portion.
///
/// Returns `None` unless `offset` lies within the record's declared
/// length and the underlying buffer.
fn field_u8(buffer: &[u8], record_start: usize, length: u8, offset: usize) -> Option<u8> {
    if offset >= length as usize {
        return None;
    }
    buffer.get(record_start.checked_add(offset)?).copied()
}

/// Reads a little-endian u16 field, gated like [`field_u8`].
fn field_u16(buffer: &[u8], record_start: usize, length: u8, offset: usize) -> Option<u16> {
    if offset.checked_add(2)? > length as usize {
        return None;
    }
    let start = record_start.checked_add(offset)?;
    let bytes = buffer.get(start..start.checked_add(2)?)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Reads a little-endian u32 field, gated like [`field_u8`].
fn field_u32(buffer: &[u8], record_start: usize, length: u8, offset: usize) -> Option<u32> {
    if offset.checked_add(4)? > length as usize {
        return None;
    }
    let start = record_start.checked_add(offset)?;
    let bytes = buffer.get(start..start.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Resolves a string-index field against the record's own string set.
///
/// A field outside the declared length, an index of 0, and a missing
/// string all resolve to an empty string.
fn field_string(
    buffer: &[u8],
    record_start: usize,
    length: u8,
    offset: usize,
    max_string_len: usize,
) -> String {
    let table_start = record_start.saturating_add(length as usize);
    match field_u8(buffer, record_start, length, offset) {
        Some(index) => resolve_string(buffer, table_start, index, max_string_len),
        None => String::new(),
    }
}

/// Decoded Baseboard (or Module) Information record.
#[derive(Debug, Default)]
pub struct BaseboardInfo {
    /// Manufacturer name, empty when not specified
    pub manufacturer: String,
    /// Product (model) name, empty when not specified
    pub product: String,
    /// Version string, empty when not specified
    pub version: String,
    /// Serial number, empty when not specified
    pub serial_number: String,
    /// Raw feature flags byte, when the record is long enough to carry it
    pub feature_flags: Option<u8>,
}

impl BaseboardInfo {
    /// Decodes a Type 2 record whose header was read at `record_start`.
    pub fn decode(
        buffer: &[u8],
        record_start: usize,
        header: &SmbiosTableHeader,
        max_string_len: usize,
    ) -> Self {
        let length = header.length;
        Self {
            manufacturer: field_string(buffer, record_start, length, BASEBOARD_MANUFACTURER, max_string_len),
            product: field_string(buffer, record_start, length, BASEBOARD_PRODUCT, max_string_len),
            version: field_string(buffer, record_start, length, BASEBOARD_VERSION, max_string_len),
            serial_number: field_string(buffer, record_start, length, BASEBOARD_SERIAL_NUMBER, max_string_len),
            feature_flags: field_u8(buffer, record_start, length, BASEBOARD_FEATURE_FLAGS),
        }
    }

    /// Typed view of the feature flags byte.
    pub fn features(&self) -> Option<BaseBoardFeatureFlags> {
        self.feature_flags.map(BaseBoardFeatureFlags)
    }
}

/// Decoded System Enclosure or Chassis record.
#[derive(Debug, Default)]
pub struct ChassisInfo {
    /// Manufacturer name, empty when not specified
    pub manufacturer: String,
    /// Raw chassis type byte, lock bit included
    pub chassis_type: Option<u8>,
    /// Version string, empty when not specified
    pub version: String,
}

impl ChassisInfo {
    /// Decodes a Type 3 record whose header was read at `record_start`.
    pub fn decode(
        buffer: &[u8],
        record_start: usize,
        header: &SmbiosTableHeader,
        max_string_len: usize,
    ) -> Self {
        let length = header.length;
        Self {
            manufacturer: field_string(buffer, record_start, length, CHASSIS_MANUFACTURER, max_string_len),
            chassis_type: field_u8(buffer, record_start, length, CHASSIS_TYPE),
            version: field_string(buffer, record_start, length, CHASSIS_VERSION, max_string_len),
        }
    }

    /// Display name for the chassis form factor, lock bit masked off.
    pub fn type_name(&self) -> &'static str {
        match self.chassis_type {
            Some(code) => chassis_type_name(code & !CHASSIS_LOCK_BIT),
            None => UNKNOWN_NAME,
        }
    }

    /// True when the enclosure reports a chassis lock.
    pub fn locked(&self) -> bool {
        self.chassis_type.is_some_and(|code| code & CHASSIS_LOCK_BIT != 0)
    }
}

/// Decoded Processor Information record.
///
/// Fields past the legacy layout are `None`/empty on records whose
/// declared length does not cover them.
#[derive(Debug, Default)]
pub struct ProcessorInfo {
    /// Socket designation string, e.g. "CPU0" or "AM4"
    pub socket_designation: String,
    /// Processor type code (central, math, DSP, video)
    pub processor_type: Option<u8>,
    /// Processor family code
    pub family: Option<u8>,
    /// Manufacturer name, empty when not specified
    pub manufacturer: String,
    /// Raw processor ID signature bits
    pub processor_id: Option<u32>,
    /// Version string, empty when not specified
    pub version: String,
    /// Raw processor upgrade (socket) code
    pub upgrade: Option<u8>,
    /// Core count (legacy byte field; 0xFF means "see `core_count_2`")
    pub core_count: Option<u8>,
    /// Thread count (legacy byte field; 0xFF means "see `thread_count_2`")
    pub thread_count: Option<u8>,
    /// Raw processor characteristics bits
    pub characteristics: Option<u16>,
    /// Extended family code (SMBIOS 2.6+)
    pub family_2: Option<u16>,
    /// Extended core count (SMBIOS 3.0+)
    pub core_count_2: Option<u16>,
    /// Extended thread count (SMBIOS 3.0+)
    pub thread_count_2: Option<u16>,
    /// Enabled thread count (SMBIOS 3.6+)
    pub thread_enabled: Option<u16>,
    /// Socket type string (SMBIOS 3.6+), empty when absent
    pub socket_type: String,
}

impl ProcessorInfo {
    /// Decodes a Type 4 record whose header was read at `record_start`.
    ///
    /// The socket designation and upgrade code lie within the legacy
    /// layout; everything beyond is read only when the declared length
    /// covers it.
    pub fn decode(
        buffer: &[u8],
        record_start: usize,
        header: &SmbiosTableHeader,
        max_string_len: usize,
    ) -> Self {
        let length = header.length;
        Self {
            socket_designation: field_string(buffer, record_start, length, PROCESSOR_SOCKET_DESIGNATION, max_string_len),
            processor_type: field_u8(buffer, record_start, length, PROCESSOR_TYPE),
            family: field_u8(buffer, record_start, length, PROCESSOR_FAMILY),
            manufacturer: field_string(buffer, record_start, length, PROCESSOR_MANUFACTURER, max_string_len),
            processor_id: field_u32(buffer, record_start, length, PROCESSOR_ID),
            version: field_string(buffer, record_start, length, PROCESSOR_VERSION, max_string_len),
            upgrade: field_u8(buffer, record_start, length, PROCESSOR_UPGRADE),
            core_count: field_u8(buffer, record_start, length, PROCESSOR_CORE_COUNT),
            thread_count: field_u8(buffer, record_start, length, PROCESSOR_THREAD_COUNT),
            characteristics: field_u16(buffer, record_start, length, PROCESSOR_CHARACTERISTICS),
            family_2: field_u16(buffer, record_start, length, PROCESSOR_FAMILY_2),
            core_count_2: field_u16(buffer, record_start, length, PROCESSOR_CORE_COUNT_2),
            thread_count_2: field_u16(buffer, record_start, length, PROCESSOR_THREAD_COUNT_2),
            thread_enabled: field_u16(buffer, record_start, length, PROCESSOR_THREAD_ENABLED),
            socket_type: field_string(buffer, record_start, length, PROCESSOR_SOCKET_TYPE, max_string_len),
        }
    }

    /// Display name for the socket, mapped from the upgrade code.
    pub fn socket_name(&self) -> &'static str {
        match self.upgrade {
            Some(code) => processor_upgrade_name(code),
            None => UNKNOWN_NAME,
        }
    }

    /// Core count with the SMBIOS 3.0 extension applied: a legacy value
    /// of 0xFF defers to the extended field.
    pub fn total_cores(&self) -> Option<u16> {
        match self.core_count {
            Some(0xFF) => self.core_count_2,
            Some(count) => Some(count as u16),
            None => None,
        }
    }

    /// Thread count with the SMBIOS 3.0 extension applied, like
    /// [`Self::total_cores`].
    pub fn total_threads(&self) -> Option<u16> {
        match self.thread_count {
            Some(0xFF) => self.thread_count_2,
            Some(count) => Some(count as u16),
            None => None,
        }
    }

    /// Typed view of the characteristics bits.
    pub fn characteristic_flags(&self) -> Option<ProcessorCharacteristics> {
        self.characteristics.map(ProcessorCharacteristics)
    }
}
