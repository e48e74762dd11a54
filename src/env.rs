use std::collections::HashMap;

/// Return the env value, falling back to the provided default
pub fn env_or(name: &str, default: &str) -> String {
    std::env::vars()
        .collect::<HashMap<_, _>>()
        .get(name)
        .map(|s| s.to_owned())
        .unwrap_or_else(|| default.to_string())
}
