//! Boot tool output parsers.
//!
//! Both parsers are total: malformed or truncated records are skipped and
//! never produce an error. An unreadable dump simply yields fewer entries.
//!
//! # Supported Tools
//!
//! - `efibootmgr -v`: `BootCurrent`, `BootOrder` and `BootXXXX` lines
//! - `bcdedit /enum firmware`: "Firmware Application" blocks

pub mod bcdedit;
pub mod efibootmgr;

pub use bcdedit::parse_bcdedit;
pub use efibootmgr::parse_efibootmgr;

use crate::platform::Platform;
use serde::{Deserialize, Serialize};

/// One firmware boot entry as reported by the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootEntry {
    /// BootNum (uppercase) or braced GUID
    pub id: String,
    /// Label text (efibootmgr) or `description` value (bcdedit), may be empty
    pub raw_label: String,
    /// Block header line, bcdedit only
    pub header: Option<String>,
    /// `*` marker on the efibootmgr line
    pub active: bool,
}

/// Parsed listing in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedBootList {
    /// Entry the machine booted from, when the tool reports it
    pub current: Option<String>,
    /// Explicit firmware boot order, when the tool reports it
    pub order: Vec<String>,
    pub entries: Vec<BootEntry>,
}

impl ParsedBootList {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&BootEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}

/// Parse the enumeration output of the given platform's tool.
pub fn parse_listing(platform: Platform, output: &str) -> ParsedBootList {
    match platform {
        Platform::Efi => parse_efibootmgr(output),
        Platform::Bcd => ParsedBootList {
            current: None,
            order: Vec::new(),
            entries: parse_bcdedit(output),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing_dispatches_efi() {
        let output = "BootCurrent: 0001\nBoot0001* Linux\n";
        let list = parse_listing(Platform::Efi, output);
        assert_eq!(list.current.as_deref(), Some("0001"));
        assert_eq!(list.entries.len(), 1);
    }

    #[test]
    fn test_parse_listing_dispatches_bcd() {
        let output = "Firmware Application (101fffff)\n\
                      -------------------------------\n\
                      identifier              {11111111-2222-3333-4444-555555555555}\n";
        let list = parse_listing(Platform::Bcd, output);
        assert!(list.current.is_none());
        assert!(list.order.is_empty());
        assert_eq!(list.entries.len(), 1);
        assert!(list.get("{11111111-2222-3333-4444-555555555555}").is_some());
    }

    #[test]
    fn test_parse_listing_garbage_is_empty() {
        assert!(parse_listing(Platform::Efi, "\u{0}\u{1}garbage").is_empty());
        assert!(parse_listing(Platform::Bcd, "").is_empty());
    }
}
