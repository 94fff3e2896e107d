//! Platform variants and their boot tool conventions.
//!
//! - `Efi`: `efibootmgr`, entries keyed by a 4-hex-digit BootNum
//! - `Bcd`: `bcdedit`, firmware entries keyed by a braced GUID

use crate::error::{BootSwitchError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static BOOTNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{4}$").unwrap());

static GUID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\{[0-9A-Fa-f-]+\}$").unwrap());

/// Which firmware boot tool this host uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Linux `efibootmgr`
    Efi,
    /// Windows `bcdedit /enum firmware`
    Bcd,
}

impl Platform {
    /// Platform matching the compilation target.
    pub fn detect() -> Self {
        if cfg!(windows) {
            Self::Bcd
        } else {
            Self::Efi
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Efi => "efi",
            Self::Bcd => "bcd",
        }
    }

    /// Command that dumps the firmware boot menu.
    pub fn enumerate_command(&self) -> &'static str {
        match self {
            Self::Efi => "efibootmgr -v",
            Self::Bcd => "bcdedit /enum firmware",
        }
    }

    /// Composite "boot this next, then restart now" command.
    ///
    /// `id` must already be normalized; it is interpolated into a shell line.
    pub fn boot_command(&self, id: &str) -> String {
        match self {
            Self::Efi => format!("efibootmgr -n {} && reboot", id),
            Self::Bcd => format!(
                "bcdedit /set {{fwbootmgr}} bootsequence {} && shutdown /r /t 0",
                id
            ),
        }
    }

    /// Strict identifier check against the raw form.
    pub fn is_valid_id(&self, id: &str) -> bool {
        match self {
            Self::Efi => BOOTNUM_RE.is_match(id),
            Self::Bcd => GUID_RE.is_match(id),
        }
    }

    /// Normalize a user-supplied identifier into its storage key.
    ///
    /// BootNums are uppercased, GUIDs are trimmed. Nothing else is repaired.
    pub fn normalize_id(&self, raw: &str) -> Result<String> {
        let id = match self {
            Self::Efi => raw.to_uppercase(),
            Self::Bcd => raw.trim().to_string(),
        };
        if self.is_valid_id(&id) {
            Ok(id)
        } else {
            Err(BootSwitchError::InvalidId(raw.to_string()))
        }
    }

    /// Subtitle shown under an entry's label.
    pub fn id_caption(&self, id: &str) -> String {
        match self {
            Self::Efi => format!("BootNum: {}", id),
            Self::Bcd => format!("GUID: {}", id),
        }
    }

    /// Label reported for a dispatch when the user never renamed the entry.
    pub fn fallback_target_label(&self, id: &str) -> String {
        match self {
            Self::Efi => format!("BootNum {}", id),
            Self::Bcd => id.to_string(),
        }
    }

    /// Message used when the boot id in a request is rejected.
    pub fn invalid_id_message(&self) -> &'static str {
        match self {
            Self::Efi => "Invalid BootNum",
            Self::Bcd => "Invalid firmware GUID",
        }
    }

    /// Shown when the list has no entries.
    pub fn empty_list_message(&self) -> &'static str {
        match self {
            Self::Efi => "No BootXXXX entries found.",
            Self::Bcd => "No firmware boot entries found.",
        }
    }

    /// Operator hint attached to tool failures.
    pub fn privilege_hint(&self) -> &'static str {
        match self {
            Self::Efi => "Make sure efibootmgr exists and this service runs as root.",
            Self::Bcd => {
                "Make sure this service is running in an elevated terminal (Administrator) \
                 and that bcdedit is available."
            }
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_efi_normalize_uppercases() {
        assert_eq!(Platform::Efi.normalize_id("000a").unwrap(), "000A");
        assert!(Platform::Efi.normalize_id(" 0001 ").is_err());
    }

    #[test]
    fn test_efi_rejects_malformed() {
        for bad in ["", "001", "00001", "00G1", "0001;", "Boot0001", "0001 && ls"] {
            let err = Platform::Efi.normalize_id(bad).unwrap_err();
            assert!(err.is_validation(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_bcd_normalize_keeps_case() {
        let id = "{AbCdEf01-2222-3333-4444-555555555555}";
        assert_eq!(Platform::Bcd.normalize_id(id).unwrap(), id);
        assert_eq!(Platform::Bcd.normalize_id(&format!("  {id}\t")).unwrap(), id);
    }

    #[test]
    fn test_bcd_rejects_malformed() {
        for bad in ["", "{}", "{fwbootmgr}", "1111-2222", "{1111} & del", "{{1111}}"] {
            assert!(Platform::Bcd.normalize_id(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_boot_commands() {
        assert_eq!(Platform::Efi.boot_command("0002"), "efibootmgr -n 0002 && reboot");
        assert_eq!(
            Platform::Bcd.boot_command("{1111-2222}"),
            "bcdedit /set {fwbootmgr} bootsequence {1111-2222} && shutdown /r /t 0"
        );
    }

    #[test]
    fn test_captions_and_fallbacks() {
        assert_eq!(Platform::Efi.id_caption("0001"), "BootNum: 0001");
        assert_eq!(Platform::Bcd.id_caption("{AB}"), "GUID: {AB}");
        assert_eq!(Platform::Efi.fallback_target_label("0002"), "BootNum 0002");
        assert_eq!(Platform::Bcd.fallback_target_label("{AB}"), "{AB}");
    }

    #[test]
    fn test_platform_serde_names() {
        let p: Platform = serde_json::from_str("\"bcd\"").unwrap();
        assert_eq!(p, Platform::Bcd);
        assert_eq!(serde_json::to_string(&Platform::Efi).unwrap(), "\"efi\"");
    }
}
