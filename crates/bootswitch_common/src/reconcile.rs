//! Merge the live listing with persisted overrides into the view model.

use crate::labels::derive_label;
use crate::overrides::Overrides;
use crate::parsers::ParsedBootList;
use crate::platform::Platform;
use serde::{Deserialize, Serialize};

/// Display-ready entry, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewEntry {
    pub id: String,
    pub raw_label: String,
    pub header: Option<String>,
    /// Override label when set and non-blank, else the derived label
    pub display_label: String,
    pub is_hidden: bool,
    /// Entry the machine is currently running from
    pub is_current: bool,
}

/// Visible and hidden entries, each in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootView {
    pub platform: Platform,
    pub current: Option<String>,
    pub visible: Vec<ViewEntry>,
    pub hidden: Vec<ViewEntry>,
}

impl BootView {
    pub fn len(&self) -> usize {
        self.visible.len() + self.hidden.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, id: &str) -> Option<&ViewEntry> {
        self.visible.iter().chain(self.hidden.iter()).find(|e| e.id == id)
    }
}

/// Partition every parsed entry into exactly one of the two lists and
/// resolve its display label. Never touches the store.
pub fn reconcile(platform: Platform, list: &ParsedBootList, overrides: &Overrides) -> BootView {
    let mut visible = Vec::new();
    let mut hidden = Vec::new();

    for entry in &list.entries {
        let display_label = match overrides.label_for(&entry.id) {
            Some(label) => label.to_string(),
            None => derive_label(platform, entry),
        };
        let is_hidden = overrides.is_hidden(&entry.id);

        let view = ViewEntry {
            id: entry.id.clone(),
            raw_label: entry.raw_label.clone(),
            header: entry.header.clone(),
            display_label,
            is_hidden,
            is_current: list.current.as_deref() == Some(entry.id.as_str()),
        };

        if is_hidden {
            hidden.push(view);
        } else {
            visible.push(view);
        }
    }

    BootView {
        platform,
        current: list.current.clone(),
        visible,
        hidden,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::parse_listing;

    const LISTING: &str = "BootCurrent: 0002\n\
BootOrder: 0002,0001,0003\n\
Boot0001* Windows Boot Manager  (on HD1)\n\
Boot0002* ubuntu\tHD(1,GPT,abc,0x800,0x100000)/File(\\EFI\\ubuntu\\shimx64.efi)\n\
Boot0003* UEFI: PXE IPv4\n\
Boot0004* UEFI OS\n";

    fn view_with(overrides: &Overrides) -> BootView {
        reconcile(Platform::Efi, &parse_listing(Platform::Efi, LISTING), overrides)
    }

    fn ids(entries: &[ViewEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_no_overrides_all_visible_in_order() {
        let view = view_with(&Overrides::new());
        assert_eq!(ids(&view.visible), vec!["0002", "0001", "0003", "0004"]);
        assert!(view.hidden.is_empty());

        let windows = view.find("0001").unwrap();
        assert_eq!(windows.display_label, "Windows Boot Manager");
        assert_eq!(view.find("0002").unwrap().display_label, "Ubuntu HD1");
        assert!(view.find("0002").unwrap().is_current);
        assert!(!windows.is_current);
    }

    #[test]
    fn test_override_label_wins() {
        let mut overrides = Overrides::new();
        overrides.set_label("0003", "Network Boot");
        overrides.set_label("0004", "  ");
        let view = view_with(&overrides);

        assert_eq!(view.find("0003").unwrap().display_label, "Network Boot");
        assert_eq!(view.find("0004").unwrap().display_label, "Uefi Os");
    }

    #[test]
    fn test_hidden_partition_keeps_order() {
        let mut overrides = Overrides::new();
        overrides.set_hidden("0003", true);
        overrides.set_hidden("0002", true);
        overrides.set_hidden("0001", false);
        let view = view_with(&overrides);

        assert_eq!(ids(&view.visible), vec!["0001", "0004"]);
        assert_eq!(ids(&view.hidden), vec!["0002", "0003"]);
        assert!(view.hidden.iter().all(|e| e.is_hidden));
        assert_eq!(view.len(), 4);
    }

    #[test]
    fn test_stale_overrides_ignored() {
        let mut overrides = Overrides::new();
        overrides.set_label("00FF", "Gone");
        overrides.set_hidden("00FE", true);
        let view = view_with(&overrides);
        assert_eq!(view.visible.len(), 4);
        assert!(view.find("00FF").is_none());
    }

    #[test]
    fn test_bcd_view() {
        let output = "Firmware Application (101fffff)\n\
                      identifier {11111111-2222-3333-4444-555555555555}\n";
        let list = parse_listing(Platform::Bcd, output);
        let view = reconcile(Platform::Bcd, &list, &Overrides::new());

        assert_eq!(view.visible.len(), 1);
        assert_eq!(view.visible[0].display_label, "Firmware Application");
        assert!(!view.visible[0].is_current);
        assert!(view.current.is_none());
    }
}
