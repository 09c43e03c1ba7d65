//! SMBIOS Hardware Identity Support
//!
//! Decodes raw SMBIOS/DMI structure tables into the motherboard,
//! chassis, and CPU socket identity of the running machine. The decoder
//! only reads the caller-supplied buffer; acquiring the table from
//! firmware or the OS is left to the platform layer.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
#![cfg_attr(not(feature = "std"), no_std)]

mod component;
mod hw_info;
pub mod smbios;
pub mod smbios_record;
pub mod string_pool;

pub use component::HwInfoProvider;
pub use hw_info::{
    DecodeError, DecodeOptions, HW_INFO_FIELD_CAPACITY, HwInfo, RAW_SMBIOS_ENVELOPE_SIZE,
    RawSmbiosEnvelope, decode_hardware_info, decode_hardware_info_with,
};
