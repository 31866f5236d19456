// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 tmbkoren

//! Runtime settings with defaults and environment overrides.

/// Disables the startup release check when set to anything but empty or `0`.
pub const ENV_NO_UPDATE_CHECK: &str = "MCCURVE_NO_UPDATE_CHECK";
/// Overrides the `owner/name` repository queried for releases.
pub const ENV_UPDATE_REPO: &str = "MCCURVE_UPDATE_REPO";

/// Repository the release workflow publishes to.
pub const DEFAULT_REPO: &str = "tmbkoren/MinecraftCurveGenerator";

/// Settings consumed by the bootstrap and the main window.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    pub check_for_updates: bool,
    pub update_repo: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_size: [1400.0, 900.0],
            min_window_size: [800.0, 500.0],
            check_for_updates: true,
            update_repo: DEFAULT_REPO.to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults with overrides read from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_NO_UPDATE_CHECK) {
            let value = value.trim();
            if !value.is_empty() && value != "0" {
                config.check_for_updates = false;
            }
        }

        if let Some(repo) = lookup(ENV_UPDATE_REPO) {
            let repo = repo.trim();
            if is_repo_slug(repo) {
                config.update_repo = repo.to_string();
            } else {
                log::warn!("Ignoring {ENV_UPDATE_REPO}={repo:?}: expected owner/name");
            }
        }

        config
    }
}

fn is_repo_slug(value: &str) -> bool {
    let mut parts = value.split('/');
    let valid = |p: &str| {
        !p.is_empty()
            && p
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(owner), Some(name), None) if valid(owner) && valid(name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_without_overrides() {
        assert_eq!(config_with(&[]), AppConfig::default());
        assert!(AppConfig::default().check_for_updates);
    }

    #[test]
    fn update_check_can_be_disabled() {
        assert!(!config_with(&[(ENV_NO_UPDATE_CHECK, "1")]).check_for_updates);
        assert!(!config_with(&[(ENV_NO_UPDATE_CHECK, "yes")]).check_for_updates);
        assert!(config_with(&[(ENV_NO_UPDATE_CHECK, "0")]).check_for_updates);
        assert!(config_with(&[(ENV_NO_UPDATE_CHECK, "")]).check_for_updates);
    }

    #[test]
    fn repo_override_requires_owner_and_name() {
        assert_eq!(
            config_with(&[(ENV_UPDATE_REPO, "someone/fork")]).update_repo,
            "someone/fork"
        );
        assert_eq!(
            config_with(&[(ENV_UPDATE_REPO, "https://evil/x/y")]).update_repo,
            DEFAULT_REPO
        );
        assert_eq!(
            config_with(&[(ENV_UPDATE_REPO, "noslash")]).update_repo,
            DEFAULT_REPO
        );
    }
}
