//! Parser for `efibootmgr -v` output.
//!
//! Expected format:
//! ```text
//! BootCurrent: 0001
//! Timeout: 1 seconds
//! BootOrder: 0001,0000,0002
//! Boot0000* ubuntu	HD(1,GPT,5d0b...,0x800,0x100000)/File(\EFI\ubuntu\shimx64.efi)
//! Boot0001* Windows Boot Manager  HD(1,GPT,...)
//! ```

use super::{BootEntry, ParsedBootList};
use regex::Regex;
use std::sync::LazyLock;

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Boot([0-9A-Fa-f]{4})(\*?)\s+(.+?)(\s{2,}|$)").unwrap());

const CURRENT_PREFIX: &str = "BootCurrent:";
const ORDER_PREFIX: &str = "BootOrder:";

/// Parse `efibootmgr -v` into entries sorted by firmware boot order.
pub fn parse_efibootmgr(output: &str) -> ParsedBootList {
    let mut current = None;
    let mut order = Vec::new();
    let mut entries = Vec::new();

    for line in output.lines() {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix(CURRENT_PREFIX) {
            current = Some(rest.trim().to_uppercase());
            continue;
        }
        if let Some(rest) = line.strip_prefix(ORDER_PREFIX) {
            order = parse_order(rest);
            continue;
        }

        if let Some(caps) = ENTRY_RE.captures(line) {
            entries.push(BootEntry {
                id: caps[1].to_uppercase(),
                raw_label: caps[3].trim().to_string(),
                header: None,
                active: !caps[2].is_empty(),
            });
        }
    }

    sort_by_boot_order(&mut entries, &order);

    ParsedBootList {
        current: current.filter(|c| !c.is_empty()),
        order,
        entries,
    }
}

fn parse_order(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Entries listed in `order` come first, in that order. The rest follow by
/// ascending BootNum. Without an order list everything sorts by BootNum.
fn sort_by_boot_order(entries: &mut [BootEntry], order: &[String]) {
    entries.sort_by(|a, b| {
        let rank = |e: &BootEntry| order.iter().position(|o| *o == e.id).unwrap_or(usize::MAX);
        rank(a).cmp(&rank(b)).then_with(|| a.id.cmp(&b.id))
    });
}
