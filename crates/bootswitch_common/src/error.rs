//! Error types for Bootswitch.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BootSwitchError {
    #[error("Invalid boot entry identifier: {0:?}")]
    InvalidId(String),

    #[error("Invalid label for {0}: label must not be blank")]
    InvalidLabel(String),

    #[error("`{command}` failed: {diagnostic}")]
    ToolExecution { command: String, diagnostic: String },

    #[error("Override store error: {0}")]
    Persistence(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BootSwitchError {
    /// Validation errors come from malformed or forged requests and never
    /// reach the tool or the store.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidId(_) | Self::InvalidLabel(_))
    }
}

pub type Result<T> = std::result::Result<T, BootSwitchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(BootSwitchError::InvalidId("zz".to_string()).is_validation());
        assert!(BootSwitchError::InvalidLabel("0001".to_string()).is_validation());
        assert!(!BootSwitchError::Persistence("disk full".to_string()).is_validation());
        assert!(!BootSwitchError::ToolExecution {
            command: "efibootmgr -v".to_string(),
            diagnostic: "Permission denied".to_string(),
        }
        .is_validation());
    }

    #[test]
    fn test_tool_error_message() {
        let err = BootSwitchError::ToolExecution {
            command: "efibootmgr -v".to_string(),
            diagnostic: "EFI variables are not supported".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "`efibootmgr -v` failed: EFI variables are not supported"
        );
    }
}
