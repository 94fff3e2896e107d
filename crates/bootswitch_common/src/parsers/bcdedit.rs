//! Parser for `bcdedit /enum firmware` output.
//!
//! Expected format:
//! ```text
//! Firmware Boot Manager
//! ---------------------
//! identifier              {fwbootmgr}
//! displayorder            {bootmgr}
//!
//! Firmware Application (101fffff)
//! -------------------------------
//! identifier              {11111111-2222-3333-4444-555555555555}
//! description             UEFI: PXE IP4 Intel(R) Ethernet
//! ```
//!
//! Only "Firmware Application" blocks become entries. A block ends at a
//! blank line, at the next qualifying header, or at end of input.

use super::BootEntry;
use crate::platform::Platform;
use regex::Regex;
use std::sync::LazyLock;

const FIRMWARE_APP_HEADER: &str = "Firmware Application";

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^identifier\s+(.+)$").unwrap());

static DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^description\s+(.+)$").unwrap());

/// Scanner state between lines.
#[derive(Debug)]
enum BlockState {
    Outside,
    Inside { header: String, lines: Vec<String> },
}

impl BlockState {
    /// Close the current block, emitting an entry if it qualifies.
    fn flush(&mut self, entries: &mut Vec<BootEntry>) {
        if let BlockState::Inside { header, lines } = std::mem::replace(self, BlockState::Outside) {
            if let Some(entry) = entry_from_block(header, &lines) {
                entries.push(entry);
            }
        }
    }
}

/// Parse `bcdedit /enum firmware` into firmware application entries, in
/// output order.
pub fn parse_bcdedit(output: &str) -> Vec<BootEntry> {
    let mut entries = Vec::new();
    let mut state = BlockState::Outside;

    for line in output.lines() {
        let line = line.trim();

        if line.is_empty() {
            state.flush(&mut entries);
            continue;
        }

        if line.starts_with(FIRMWARE_APP_HEADER) {
            state.flush(&mut entries);
            state = BlockState::Inside {
                header: line.to_string(),
                lines: Vec::new(),
            };
            continue;
        }

        if let BlockState::Inside { lines, .. } = &mut state {
            lines.push(line.to_string());
        }
    }
    state.flush(&mut entries);

    entries
}

fn entry_from_block(header: String, lines: &[String]) -> Option<BootEntry> {
    let id = first_capture(&IDENTIFIER_RE, lines)?;
    if !Platform::Bcd.is_valid_id(&id) {
        return None;
    }

    Some(BootEntry {
        id,
        raw_label: first_capture(&DESCRIPTION_RE, lines).unwrap_or_default(),
        header: Some(header),
        active: false,
    })
}

fn first_capture(re: &Regex, lines: &[String]) -> Option<String> {
    lines
        .iter()
        .find_map(|line| re.captures(line).map(|caps| caps[1].trim().to_string()))
}
