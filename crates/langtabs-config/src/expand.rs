//! Environment variable expansion for configuration strings.
//!
//! Only the braced forms are recognized:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// A value without `${` is returned unchanged, so paths holding a literal
/// `$` (or bare `$VAR`) are taken as written. `field` names the
/// configuration key for error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(UnsetVar),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.var_name),
    })
}

/// Lookup failure for a variable with no default.
struct UnsetVar;
