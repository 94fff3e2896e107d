//! Fallback display labels for entries the user never renamed.
//!
//! Pure functions: same raw input, same label.

use crate::parsers::BootEntry;
use crate::platform::Platform;
use regex::Regex;
use std::sync::LazyLock;

/// `HD(<n>,` device path node carrying the partition index.
static DISK_INDEX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)HD\((\d+),").unwrap());

const DISK_MARKER: &str = "HD(";
const DISK_BASE: &str = "Disk";
const FIRMWARE_ENTRY: &str = "Firmware Entry";
const MAX_BASE_CHARS: usize = 40;
const TRUNCATED_CHARS: usize = 37;

/// Uppercase the first character of each whitespace-separated word and
/// lowercase the rest. Words are rejoined with single spaces.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Derived label for any parsed entry.
pub fn derive_label(platform: Platform, entry: &BootEntry) -> String {
    match platform {
        Platform::Efi => derive_efi_label(&entry.raw_label, &entry.id),
        Platform::Bcd => derive_bcd_label(&entry.raw_label, entry.header.as_deref().unwrap_or("")),
    }
}

/// efibootmgr label: strip the device path, keep the disk index.
///
/// `ubuntu\tHD(1,GPT,...)/File(...)` becomes `Ubuntu HD1`.
pub fn derive_efi_label(raw_label: &str, bootnum: &str) -> String {
    let label = raw_label.trim();
    if label.is_empty() {
        return format!("Boot {}", bootnum);
    }

    let disk_index = DISK_INDEX_RE.captures(label).map(|caps| caps[1].to_string());

    let mut base = label.split(DISK_MARKER).next().unwrap_or("").trim().to_string();
    if base.is_empty() && label.to_lowercase().starts_with("hd(") {
        base = DISK_BASE.to_string();
    }
    if !base.is_empty() {
        base = title_case(&base);
    }

    if let Some(index) = disk_index.filter(|_| !base.is_empty()) {
        return format!("{} HD{}", base, index);
    }

    if base.is_empty() {
        base = label.to_string();
    }
    if base.chars().count() > MAX_BASE_CHARS {
        base = base.chars().take(TRUNCATED_CHARS).collect::<String>() + "...";
    }
    title_case(&base)
}

/// bcdedit label: description first, then the block header without its
/// parenthesised type code.
pub fn derive_bcd_label(description: &str, header: &str) -> String {
    let description = description.trim();
    if !description.is_empty() {
        return description.to_string();
    }

    if !header.trim().is_empty() {
        let base = header.split('(').next().unwrap_or("").trim();
        let base = if base.is_empty() { FIRMWARE_ENTRY } else { base };
        return title_case(base);
    }

    FIRMWARE_ENTRY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("  windows   BOOT manager "), "Windows Boot Manager");
        assert_eq!(title_case("uefi: pxe ipv4"), "Uefi: Pxe Ipv4");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_efi_empty_label_uses_bootnum() {
        assert_eq!(derive_efi_label("", "0007"), "Boot 0007");
        assert_eq!(derive_efi_label("   ", "0007"), "Boot 0007");
    }

    #[test]
    fn test_efi_disk_index_appended() {
        let raw = "ubuntu\tHD(1,GPT,5d0b3c2e-1111-2222-3333-444455556666,0x800,0x100000)/File(\\EFI\\ubuntu\\shimx64.efi)";
        assert_eq!(derive_efi_label(raw, "0000"), "Ubuntu HD1");
    }

    #[test]
    fn test_efi_leading_disk_marker_uses_generic_base() {
        assert_eq!(derive_efi_label("HD(2,GPT,abc,0x1,0x2)/File(\\x.efi)", "0004"), "Disk HD2");
    }

    #[test]
    fn test_efi_on_hd_text_is_not_a_marker() {
        assert_eq!(derive_efi_label("Windows Boot Manager", "0001"), "Windows Boot Manager");
        assert_eq!(
            derive_efi_label("windows boot manager (on HD1)", "0001"),
            "Windows Boot Manager (on Hd1)"
        );
    }

    #[test]
    fn test_efi_long_label_truncated() {
        let raw = "UEFI: PXE IPv4 Intel(R) Ethernet Connection I219-V Onboard";
        let label = derive_efi_label(raw, "0002");
        assert_eq!(label, "Uefi: Pxe Ipv4 Intel(r) Ethernet Conn...");
    }

    #[test]
    fn test_efi_derivation_is_stable() {
        let raw = "Fedora\tHD(3,GPT,aaa,0x1,0x2)";
        assert_eq!(derive_efi_label(raw, "0003"), derive_efi_label(raw, "0003"));
    }

    #[test]
    fn test_bcd_description_verbatim() {
        assert_eq!(
            derive_bcd_label("  UEFI: PXE IP4 Intel(R) Ethernet ", "Firmware Application (101fffff)"),
            "UEFI: PXE IP4 Intel(R) Ethernet"
        );
    }

    #[test]
    fn test_bcd_header_fallback() {
        assert_eq!(derive_bcd_label("", "Firmware Application (101fffff)"), "Firmware Application");
        assert_eq!(derive_bcd_label("", "FIRMWARE application"), "Firmware Application");
    }

    #[test]
    fn test_bcd_generic_fallback() {
        assert_eq!(derive_bcd_label("", ""), "Firmware Entry");
        assert_eq!(derive_bcd_label(" ", "(101fffff)"), "Firmware Entry");
    }

    #[test]
    fn test_derive_label_dispatch() {
        let entry = BootEntry {
            id: "{11111111-2222-3333-4444-555555555555}".to_string(),
            raw_label: String::new(),
            header: Some("Firmware Application (101fffff)".to_string()),
            active: false,
        };
        assert_eq!(derive_label(Platform::Bcd, &entry), "Firmware Application");
    }
}
