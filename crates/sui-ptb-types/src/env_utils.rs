//! Typed lookups of `SUI_PTB_*` environment variables.
//!
//! Unset, blank and unparsable values all read as "not configured", so callers
//! only decide the fallback:
//!
//! ```
//! use sui_ptb_types::env_utils::{env_var, env_var_or};
//!
//! let ttl: u64 = env_var_or("SUI_PTB_INTERFACE_CACHE_TTL_SECS", 300);
//! let budget: Option<u64> = env_var("SUI_PTB_GAS_BUDGET");
//! ```

use std::str::FromStr;

fn raw(key: &str) -> Option<String> {
    let value = std::env::var(key).ok()?;
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Value of `key` parsed as `T`, or `None` when unset, blank or unparsable.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    raw(key)?.parse().ok()
}

pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// `true` for `1`, `true`, `yes` or `on` in any case; anything else is `false`.
pub fn env_bool(key: &str) -> bool {
    raw(key).is_some_and(|v| {
        matches!(
            v.to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}
