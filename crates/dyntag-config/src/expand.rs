//! Environment variable expansion for configuration strings.

use std::borrow::Cow;

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` names the configuration key in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_literal_unchanged() {
        assert_eq!(expand_env("Acme Inc", "f").unwrap(), "Acme Inc");
    }

    #[test]
    fn test_expand_default_value() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DYNTAG_EXPAND_UNSET");
        }
        assert_eq!(
            expand_env("${DYNTAG_EXPAND_UNSET:-fallback}", "f").unwrap(),
            "fallback"
        );
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DYNTAG_EXPAND_MISSING");
        }
        let err = expand_env("${DYNTAG_EXPAND_MISSING}", "tags[0].value").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("DYNTAG_EXPAND_MISSING"));
        assert!(msg.contains("tags[0].value"));
    }
}
