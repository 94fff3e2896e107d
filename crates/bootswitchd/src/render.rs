//! HTML pages for the boot switch UI.

use bootswitch_common::{BootView, Platform, ViewEntry};

/// Escape text placed between tags.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Escape text placed inside a double-quoted attribute.
pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

const STYLE: &str = r#"
body {
  margin: 0;
  font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
  background: radial-gradient(circle at top, #111827, #020617);
  color: #e5e7eb;
  display: flex;
  align-items: center;
  justify-content: center;
  min-height: 100vh;
}
.card {
  position: relative;
  background: rgba(15, 23, 42, 0.96);
  border-radius: 1.2rem;
  padding: 2.25rem 2.5rem 2rem;
  box-shadow: 0 25px 50px -12px rgba(0,0,0,0.75);
  max-width: 520px;
  width: 100%;
  border: 1px solid rgba(148, 163, 184, 0.35);
}
h1 { margin: 0 0 0.5rem; font-size: 1.4rem; }
.entries { display: flex; flex-direction: column; gap: 0.75rem; margin: 1.5rem 0; }
.entry {
  width: 100%;
  display: flex;
  justify-content: space-between;
  align-items: center;
  gap: 0.75rem;
  padding: 0.8rem 1.2rem;
  border-radius: 999px;
  border: 1px solid rgba(148,163,184,0.5);
  background: #111827;
  color: #e5e7eb;
  font-size: 0.95rem;
  font-weight: 600;
  cursor: pointer;
}
.entry.primary { background: #2563eb; color: #ffffff; border: none; }
.entry .sub { font-size: 0.7rem; font-weight: 400; opacity: 0.8; }
.hidden-list { font-size: 0.8rem; color: #94a3b8; }
.hidden-list button { font-size: 0.75rem; padding: 0.25rem 0.6rem; border-radius: 999px; background: #020617; color: #e5e7eb; border: 1px solid rgba(148,163,184,0.5); cursor: pointer; }
pre { white-space: pre-wrap; background: #020617; padding: 0.75rem; border-radius: 0.5rem; }
.footer { font-size: 0.75rem; color: #94a3b8; }
#context-menu { position: absolute; display: none; background: #0f172a; border: 1px solid rgba(148,163,184,0.5); border-radius: 0.5rem; overflow: hidden; }
#context-menu button { display: block; width: 100%; padding: 0.4rem 1rem; background: none; border: none; color: #e5e7eb; text-align: left; cursor: pointer; }
#context-menu button:hover { background: #1e293b; }
"#;

const SCRIPT: &str = r#"
document.addEventListener("DOMContentLoaded", function () {
  const card = document.getElementById("card-root");
  const menu = document.getElementById("context-menu");
  let currentId = null;
  let currentLabel = null;

  function hideMenu() {
    menu.style.display = "none";
    currentId = null;
    currentLabel = null;
  }

  document.addEventListener("click", hideMenu);

  card.addEventListener("contextmenu", function (e) {
    const target = e.target.closest("button[data-id]");
    if (!target) return;
    e.preventDefault();
    currentId = target.getAttribute("data-id");
    currentLabel = target.getAttribute("data-label") || "";
    const rect = card.getBoundingClientRect();
    menu.style.left = (e.clientX - rect.left) + "px";
    menu.style.top = (e.clientY - rect.top) + "px";
    menu.style.display = "block";
  });

  document.getElementById("ctx-rename").addEventListener("click", function () {
    if (!currentId) return;
    const id = currentId;
    const newLabel = prompt("New name:", currentLabel);
    hideMenu();
    if (!newLabel) return;
    window.location.href = "/rename?id=" + encodeURIComponent(id) + "&label=" + encodeURIComponent(newLabel);
  });

  document.getElementById("ctx-hide").addEventListener("click", function () {
    if (!currentId) return;
    const id = currentId;
    hideMenu();
    window.location.href = "/hide?id=" + encodeURIComponent(id) + "&hidden=1";
  });

  window.unhideEntry = function (id) {
    window.location.href = "/hide?id=" + encodeURIComponent(id) + "&hidden=0";
  };
});
"#;

fn layout(title: &str, body: &str, script: bool) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<link rel=\"icon\" href=\"/favicon.ico\">\n<style>{STYLE}</style>\n</head>\n\
         <body>\n{body}\n{script}</body>\n</html>\n",
        title = escape_html(title),
        body = body,
        script = if script { format!("<script>{}</script>\n", SCRIPT) } else { String::new() },
    )
}

/// Percent-encode an id for use in a URL path segment.
fn encode_path_segment(id: &str) -> String {
    id.bytes()
        .map(|b| match b {
            b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' | b'-' => (b as char).to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}

fn entry_subtitle(platform: Platform, entry: &ViewEntry) -> String {
    let caption = platform.id_caption(&entry.id);
    if entry.is_current {
        format!("{} · Currently booted", caption)
    } else {
        caption
    }
}

fn entry_button(platform: Platform, entry: &ViewEntry, primary: bool) -> String {
    format!(
        "<form method=\"post\" action=\"/boot/{action}\" \
         onsubmit=\"return confirm('Reboot now into this entry?');\">\n\
         <button type=\"submit\" class=\"entry{class}\" data-id=\"{id}\" data-label=\"{label_attr}\">\n\
         <span>{label}</span><span class=\"sub\">{subtitle}</span>\n</button>\n</form>",
        action = encode_path_segment(&entry.id),
        class = if primary { " primary" } else { "" },
        id = escape_attr(&entry.id),
        label_attr = escape_attr(&entry.display_label),
        label = escape_html(&entry.display_label),
        subtitle = escape_html(&entry_subtitle(platform, entry)),
    )
}

fn hidden_section(entries: &[ViewEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let items: Vec<String> = entries
        .iter()
        .map(|e| {
            format!(
                "<li>{label} <button type=\"button\" data-unhide=\"{id}\" \
                 onclick=\"window.unhideEntry(this.getAttribute('data-unhide'))\">Unhide</button></li>",
                label = escape_html(&e.display_label),
                id = escape_attr(&e.id),
            )
        })
        .collect();
    format!(
        "<div class=\"hidden-list\">Hidden entries:\n<ul>\n{}\n</ul>\n</div>",
        items.join("\n")
    )
}

/// Main page: one boot button per visible entry, hidden entries below.
pub fn index_page(view: &BootView) -> String {
    let buttons = if view.visible.is_empty() {
        format!("<p>{}</p>", view.platform.empty_list_message())
    } else {
        view.visible
            .iter()
            .enumerate()
            .map(|(idx, entry)| entry_button(view.platform, entry, idx == 0))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let footer = match view.platform {
        Platform::Efi => format!(
            "Powered by <code>{}</code>. Current entry: <code>{}</code>.",
            view.platform.enumerate_command(),
            escape_html(view.current.as_deref().unwrap_or("unknown")),
        ),
        Platform::Bcd => format!(
            "Powered by <code>{}</code> and <code>shutdown /r /t 0</code>.",
            view.platform.enumerate_command(),
        ),
    };

    let body = format!(
        "<div class=\"card\" id=\"card-root\">\n<h1>Boot Switch</h1>\n\
         <p>Detected firmware boot entries. Choose one to boot <strong>next</strong>; \
         the host will reboot immediately after your choice. Right-click an entry to rename or hide it.</p>\n\
         <div class=\"entries\">\n{buttons}\n</div>\n{hidden}\n<p class=\"footer\">{footer}</p>\n\
         <div id=\"context-menu\"><button id=\"ctx-rename\" type=\"button\">Rename</button>\
         <button id=\"ctx-hide\" type=\"button\">Hide</button></div>\n</div>",
        buttons = buttons,
        hidden = hidden_section(&view.hidden),
        footer = footer,
    );
    layout("Boot Switch", &body, true)
}

/// Enumeration command failed.
pub fn list_failed_page(platform: Platform, command: &str, diagnostic: &str) -> String {
    let body = format!(
        "<div class=\"card\">\n<h1>Could not read boot entries</h1>\n\
         <p>Running <code>{command}</code> failed. {hint}</p>\n<pre>{diagnostic}</pre>\n</div>",
        command = escape_html(command),
        hint = escape_html(platform.privilege_hint()),
        diagnostic = escape_html(diagnostic),
    );
    layout("Boot Switch - error", &body, false)
}

/// Reboot scheduled.
pub fn rebooting_page(target_label: &str) -> String {
    let body = format!(
        "<div class=\"card\">\n<h1>Rebooting into {}…</h1>\n\
         <p>The next boot entry has been set. The host is restarting now.</p>\n</div>",
        escape_html(target_label)
    );
    layout("Boot Switch - rebooting", &body, false)
}

/// Boot selection or restart failed.
pub fn boot_failed_page(platform: Platform, target_label: &str, diagnostic: &str) -> String {
    let body = format!(
        "<div class=\"card\">\n<h1>Failed to boot into {label}</h1>\n\
         <pre>{diagnostic}</pre>\n<p>{hint}</p>\n<p><a href=\"/\">Back to the list</a></p>\n</div>",
        label = escape_html(target_label),
        diagnostic = escape_html(diagnostic),
        hint = escape_html(platform.privilege_hint()),
    );
    layout("Boot Switch - error", &body, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, label: &str, current: bool, hidden: bool) -> ViewEntry {
        ViewEntry {
            id: id.to_string(),
            raw_label: label.to_string(),
            header: None,
            display_label: label.to_string(),
            is_hidden: hidden,
            is_current: current,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_html("<b>&</b>"), "&lt;b&gt;&amp;&lt;/b&gt;");
        assert_eq!(escape_attr("a\"b&c"), "a&quot;b&amp;c");
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("000A"), "000A");
        assert_eq!(encode_path_segment("{AB-12}"), "%7BAB-12%7D");
    }

    #[test]
    fn test_index_page_marks_primary_and_current() {
        let view = BootView {
            platform: Platform::Efi,
            current: Some("0002".to_string()),
            visible: vec![
                entry("0001", "Windows Boot Manager", false, false),
                entry("0002", "Ubuntu <HD1>", true, false),
            ],
            hidden: vec![entry("0003", "PXE", false, true)],
        };
        let html = index_page(&view);

        assert!(html.contains("class=\"entry primary\" data-id=\"0001\""));
        assert!(html.contains("BootNum: 0001</span>"));
        assert!(html.contains("BootNum: 0002 · Currently booted"));
        assert!(html.contains("Ubuntu &lt;HD1&gt;"));
        assert!(html.contains("Hidden entries:"));
        assert!(html.contains("data-unhide=\"0003\""));
        assert!(html.contains("Current entry: <code>0002</code>"));
    }

    #[test]
    fn test_index_page_empty() {
        let view = BootView {
            platform: Platform::Bcd,
            current: None,
            visible: vec![],
            hidden: vec![],
        };
        let html = index_page(&view);
        assert!(html.contains("No firmware boot entries found."));
        assert!(!html.contains("Hidden entries:"));
    }

    #[test]
    fn test_failure_pages_escape_diagnostic() {
        let html = boot_failed_page(Platform::Efi, "BootNum 0002", "<script>x</script>");
        assert!(html.contains("Failed to boot into BootNum 0002"));
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));

        let html = list_failed_page(Platform::Bcd, "bcdedit /enum firmware", "Access is denied.");
        assert!(html.contains("Access is denied."));
        assert!(html.contains("Administrator"));
    }
}
