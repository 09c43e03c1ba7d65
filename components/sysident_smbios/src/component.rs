//! Hardware Identity Provider
//!
//! Defines the hardware identity provider for use as a service
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!

use crate::hw_info::{DecodeError, DecodeOptions, HwInfo, RawSmbiosEnvelope, decode_hardware_info_with};

/// Decodes hardware identity from SMBIOS table buffers supplied by a
/// platform-specific acquisition layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct HwInfoProvider {
    options: DecodeOptions,
}

impl HwInfoProvider {
    /// Creates a provider with the given decode options.
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// Decodes a bare SMBIOS structure table.
    pub fn fetch(&self, table: &[u8]) -> Result<HwInfo, DecodeError> {
        let info = decode_hardware_info_with(table, &self.options)?;
        log::info!(
            "SMBIOS hardware identity: board '{}' '{}', chassis '{}', socket '{}'",
            info.motherboard_manufacturer,
            info.motherboard_model,
            info.chassis_type,
            info.cpu_socket
        );
        Ok(info)
    }

    /// Decodes a `RawSMBIOSData` buffer as returned by the Windows
    /// firmware table API, stripping the version envelope first.
    pub fn fetch_from_envelope(&self, raw: &[u8]) -> Result<HwInfo, DecodeError> {
        let (envelope, table) = RawSmbiosEnvelope::parse(raw)?;
        log::debug!(
            "SMBIOS {}.{} table, {} bytes",
            envelope.major_version,
            envelope.minor_version,
            table.len()
        );
        self.fetch(table)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::vec::Vec;

    #[test]
    fn test_fetch_rejects_empty_table() {
        let provider = HwInfoProvider::default();
        assert_eq!(provider.fetch(&[]), Err(DecodeError::EmptyBuffer));
    }

    #[test]
    fn test_fetch_from_envelope_strips_prefix() {
        let table = [0x7Fu8, 4, 0, 0, 0, 0];
        let mut raw = Vec::new();
        raw.extend_from_slice(&[0u8, 3, 4, 0]);
        raw.extend_from_slice(&(table.len() as u32).to_le_bytes());
        raw.extend_from_slice(&table);

        let provider = HwInfoProvider::default();
        let info = provider.fetch_from_envelope(&raw).expect("fetch failed");
        assert_eq!(info, HwInfo::default());
    }

    #[test]
    fn test_fetch_from_envelope_rejects_short_buffer() {
        let provider = HwInfoProvider::default();
        assert_eq!(provider.fetch_from_envelope(&[0u8; 5]), Err(DecodeError::TruncatedEnvelope));
    }
}
