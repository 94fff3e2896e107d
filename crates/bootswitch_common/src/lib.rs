//! Bootswitch Common - firmware boot entry model shared by the daemon.
//!
//! Parses the platform boot tool output, merges it with persisted user
//! overrides and dispatches the "boot next + reboot" command.

pub mod command_exec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod labels;
pub mod overrides;
pub mod parsers;
pub mod platform;
pub mod reconcile;
pub mod switch;

pub use command_exec::{CommandOutput, CommandRunner, FakeRunner, ShellRunner};
pub use config::{Config, PlatformChoice};
pub use dispatch::{BootOutcome, Dispatcher};
pub use error::{BootSwitchError, Result};
pub use labels::{derive_label, title_case};
pub use overrides::{FileOverrideStore, MemoryOverrideStore, Override, OverrideStore, Overrides};
pub use parsers::{parse_listing, BootEntry, ParsedBootList};
pub use platform::Platform;
pub use reconcile::{reconcile, BootView, ViewEntry};
pub use switch::BootSwitch;
