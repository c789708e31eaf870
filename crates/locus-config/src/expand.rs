//! `${VAR}` / `${VAR:-default}` expansion for config strings.

use std::borrow::Cow;

use crate::ConfigError;

/// Expand environment references in the value of `field`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}
