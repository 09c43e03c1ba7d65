//! SMBIOS Standard Definitions
//!
//! Structure-type constants, the common record header, and the
//! enumeration-name tables used to turn raw SMBIOS codes into display
//! strings.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!

use bitfield::bitfield;
use zerocopy::FromBytes;
use zerocopy_derive::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Types 0 through 127 (7Fh) are reserved for and defined by the SMBIOS
/// specification. Types 128 through 255 (80h to FFh) are available for
/// system- and OEM-specific information.
pub type SmbiosType = u8;

/// Per-record identifier used for cross-references between records.
/// Not interpreted by this decoder; carried for completeness.
pub type SmbiosHandle = u16;

/// Byte length of the fixed record header (type, length, handle).
pub const SMBIOS_HEADER_SIZE: usize = 4;

/// Baseboard (or Module) Information (Type 2)
pub const SMBIOS_TYPE_BASEBOARD_INFORMATION: SmbiosType = 2;
/// System Enclosure or Chassis (Type 3)
pub const SMBIOS_TYPE_SYSTEM_ENCLOSURE: SmbiosType = 3;
/// Processor Information (Type 4)
pub const SMBIOS_TYPE_PROCESSOR_INFORMATION: SmbiosType = 4;

/// Inactive structure (Type 126). Walked past like any unrecognized type.
pub const SMBIOS_TYPE_INACTIVE: SmbiosType = 0x7E;

/// End-of-table indicator, used in the last physical structure in a table.
pub const SMBIOS_TYPE_END_OF_TABLE: SmbiosType = 0x7F;

/// Reserved handle value meaning "assign automatically" in table producers.
pub const SMBIOS_HANDLE_PI_RESERVED: SmbiosHandle = 0xFFFE;

/// Default cap on the bytes collected for a single resolved string.
/// Bounds worst-case memory use on adversarial tables; truncation past
/// this point is silent.
pub const DEFAULT_MAX_STRING_LENGTH: usize = 512;

/// Name returned for any enumeration code outside a table's populated range.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Fixed 4-byte prefix of every SMBIOS record.
///
/// `length` is the byte length of the formatted portion only (header
/// included); the trailing string set is not counted. A well-formed
/// record always has `length >= 4`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct SmbiosTableHeader {
    /// Structure type
    pub record_type: SmbiosType,
    /// Length of the formatted portion, header inclusive
    pub length: u8,
    /// Structure handle
    pub handle: SmbiosHandle,
}

impl SmbiosTableHeader {
    /// Creates a header with the given type, length, and handle.
    pub fn new(record_type: SmbiosType, length: u8, handle: SmbiosHandle) -> Self {
        Self { record_type, length, handle }
    }

    /// Reads the header at `offset`, or `None` when fewer than
    /// [`SMBIOS_HEADER_SIZE`] bytes remain.
    pub fn read_at(buffer: &[u8], offset: usize) -> Option<Self> {
        let end = offset.checked_add(SMBIOS_HEADER_SIZE)?;
        let bytes = buffer.get(offset..end)?;
        Self::read_from_bytes(bytes).ok()
    }
}

bitfield! {
    /// Bitfield for baseboard feature flags (Type 2, offset 09h)
    pub struct BaseBoardFeatureFlags(u8);
    impl Debug;
    /// Indicates if the board is a motherboard
    pub motherboard, set_motherboard: 0;
    /// Indicates if the board requires a daughter card
    pub requires_daughter_card, set_requires_daughter_card: 1;
    /// Indicates if the board is removable
    pub removable, set_removable: 2;
    /// Indicates if the board is replaceable
    pub replaceable, set_replaceable: 3;
    /// Indicates if the board is hot swappable
    pub hot_swappable, set_hot_swappable: 4;
    /// Reserved bits
    pub reserved, set_reserved: 7, 5;
}

bitfield! {
    /// Bitfield for processor characteristics (Type 4, offset 23h)
    pub struct ProcessorCharacteristics(u16);
    impl Debug;
    /// Reserved bit
    pub reserved, set_reserved: 0;
    /// Characteristics are unknown
    pub unknown, set_unknown: 1;
    /// 64-bit capable
    pub capable_64_bit, set_capable_64_bit: 2;
    /// Multi-core part
    pub multi_core, set_multi_core: 3;
    /// Hardware threads present
    pub hardware_thread, set_hardware_thread: 4;
    /// Execute protection supported
    pub execute_protection, set_execute_protection: 5;
    /// Enhanced virtualization supported
    pub enhanced_virtualization, set_enhanced_virtualization: 6;
    /// Power/performance control supported
    pub power_performance_control, set_power_performance_control: 7;
    /// 128-bit capable
    pub capable_128_bit, set_capable_128_bit: 8;
    /// Arm64 SoC ID supported
    pub arm64_soc_id, set_arm64_soc_id: 9;
}

/// Chassis type display names, SMBIOS System Enclosure "Type" field.
/// Codes 25h-FFh have no entry and resolve to [`UNKNOWN_NAME`].
static CHASSIS_TYPE_NAMES: [&str; 0x25] = [
    "Reserved",              // 00h
    "Other",                 // 01h
    "Unknown",               // 02h
    "Desktop",               // 03h
    "Low Profile Desktop",   // 04h
    "Pizza Box",             // 05h
    "Mini Tower",            // 06h
    "Tower",                 // 07h
    "Portable",              // 08h
    "Laptop",                // 09h
    "Notebook",              // 0Ah
    "Hand Held",             // 0Bh
    "Docking Station",       // 0Ch
    "All-in-One",            // 0Dh
    "Sub Notebook",          // 0Eh
    "Space-Saving",          // 0Fh
    "Lunch Box",             // 10h
    "Main Server Chassis",   // 11h
    "Expansion Chassis",     // 12h
    "SubChassis",            // 13h
    "Bus Expansion Chassis", // 14h
    "Peripheral Chassis",    // 15h
    "RAID Chassis",          // 16h
    "Rack Mount Chassis",    // 17h
    "Sealed-Case PC",        // 18h
    "Multi-System Chassis",  // 19h
    "Compact PCI",           // 1Ah
    "AdvancedTCA",           // 1Bh
    "Blade",                 // 1Ch
    "Blade Enclosure",       // 1Dh
    "Tablet",                // 1Eh
    "Convertible",           // 1Fh
    "Detachable",            // 20h
    "IoT Gateway",           // 21h
    "Embedded PC",           // 22h
    "Mini PC",               // 23h
    "Stick PC",              // 24h
];

/// Socket display names, SMBIOS Processor Information "Processor Upgrade"
/// field. Codes 58h-FFh have no entry and resolve to [`UNKNOWN_NAME`].
static PROCESSOR_UPGRADE_NAMES: [&str; 0x58] = [
    "Reserved",               // 00h
    "Other",                  // 01h
    "Unknown",                // 02h
    "Daughter Board",         // 03h
    "ZIF Socket",             // 04h
    "Replaceable Piggy Back", // 05h
    "None",                   // 06h
    "LIF Socket",             // 07h
    "Slot 1",                 // 08h
    "Slot 2",                 // 09h
    "370-pin Socket",         // 0Ah
    "Slot A",                 // 0Bh
    "Slot M",                 // 0Ch
    "Socket 423",             // 0Dh
    "Socket A (Socket 462)",  // 0Eh
    "Socket 478",             // 0Fh
    "Socket 754",             // 10h
    "Socket 940",             // 11h
    "Socket 939",             // 12h
    "Socket mPGA604",         // 13h
    "Socket LGA771",          // 14h
    "Socket LGA775",          // 15h
    "Socket S1",              // 16h
    "Socket AM2",             // 17h
    "Socket F (1207)",        // 18h
    "Socket LGA1366",         // 19h
    "Socket G34",             // 1Ah
    "Socket AM3",             // 1Bh
    "Socket C32",             // 1Ch
    "Socket LGA1156",         // 1Dh
    "Socket LGA1567",         // 1Eh
    "Socket PGA988A",         // 1Fh
    "Socket BGA1288",         // 20h
    "Socket rPGA988B",        // 21h
    "Socket BGA1023",         // 22h
    "Socket BGA1224",         // 23h
    "Socket LGA1155",         // 24h
    "Socket LGA1356",         // 25h
    "Socket LGA2011",         // 26h
    "Socket FS1",             // 27h
    "Socket FS2",             // 28h
    "Socket FM1",             // 29h
    "Socket FM2",             // 2Ah
    "Socket LGA2011-3",       // 2Bh
    "Socket LGA1356-3",       // 2Ch
    "Socket LGA1150",         // 2Dh
    "Socket BGA1168",         // 2Eh
    "Socket BGA1234",         // 2Fh
    "Socket BGA1364",         // 30h
    "Socket AM4",             // 31h
    "Socket LGA1151",         // 32h
    "Socket BGA1356",         // 33h
    "Socket BGA1440",         // 34h
    "Socket BGA1515",         // 35h
    "Socket LGA3647-1",       // 36h
    "Socket SP3",             // 37h
    "Socket SP3r2",           // 38h
    "Socket LGA2066",         // 39h
    "Socket BGA1392",         // 3Ah
    "Socket BGA1510",         // 3Bh
    "Socket BGA1528",         // 3Ch
    "Socket LGA4189",         // 3Dh
    "Socket LGA1200",         // 3Eh
    "Socket LGA4677",         // 3Fh
    "Socket LGA1700",         // 40h
    "Socket BGA1744",         // 41h
    "Socket BGA1781",         // 42h
    "Socket BGA1211",         // 43h
    "Socket BGA2422",         // 44h
    "Socket LGA1211",         // 45h
    "Socket LGA2422",         // 46h
    "Socket LGA5773",         // 47h
    "Socket BGA5773",         // 48h
    "Socket AM5",             // 49h
    "Socket SP5",             // 4Ah
    "Socket SP6",             // 4Bh
    "Socket BGA883",          // 4Ch
    "Socket BGA1190",         // 4Dh
    "Socket BGA4129",         // 4Eh
    "Socket LGA4710",         // 4Fh
    "Socket LGA7529",         // 50h
    "Socket BGA1964",         // 51h
    "Socket BGA1792",         // 52h
    "Socket BGA2049",         // 53h
    "Socket BGA2551",         // 54h
    "Socket LGA1851",         // 55h
    "Socket BGA2114",         // 56h
    "Socket BGA2833",         // 57h
];

/// Returns the display name for a raw chassis-type code.
///
/// Total over the full 8-bit range: codes without a table entry return
/// [`UNKNOWN_NAME`], never an out-of-bounds access.
pub fn chassis_type_name(code: u8) -> &'static str {
    CHASSIS_TYPE_NAMES.get(code as usize).copied().unwrap_or(UNKNOWN_NAME)
}

/// Returns the display name for a raw processor-upgrade (socket) code.
///
/// Total over the full 8-bit range, like [`chassis_type_name`].
pub fn processor_upgrade_name(code: u8) -> &'static str {
    PROCESSOR_UPGRADE_NAMES.get(code as usize).copied().unwrap_or(UNKNOWN_NAME)
}
