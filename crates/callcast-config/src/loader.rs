// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./callcast.toml` > `~/.config/callcast/callcast.toml`
//! > `/etc/callcast/callcast.toml`, with `CALLCAST_` environment overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CallcastConfig;

/// Config file name looked up in every layer.
pub const CONFIG_FILE_NAME: &str = "callcast.toml";

/// System-wide config location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/callcast/callcast.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/callcast/callcast.toml`
/// 3. `~/.config/callcast/callcast.toml`
/// 4. `./callcast.toml`
/// 5. `CALLCAST_*` environment variables
pub fn load_config() -> Result<CallcastConfig, figment::Error> {
    tracing::debug!(
        system = SYSTEM_CONFIG_PATH,
        user = ?user_config_path(),
        local = CONFIG_FILE_NAME,
        "loading layered configuration"
    );
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<CallcastConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CallcastConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CallcastConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CallcastConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(CallcastConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// `~/.config/callcast/callcast.toml`, when a config dir exists.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("callcast").join(CONFIG_FILE_NAME))
}

/// Placeholder printed in place of configured credentials.
pub const REDACTED: &str = "[REDACTED]";

/// Serialize the effective configuration as TOML with credentials masked.
pub fn to_redacted_toml(config: &CallcastConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    for secret in [
        &mut shown.provider.api_key,
        &mut shown.gateway.bearer_token,
        &mut shown.gateway.webhook_secret,
    ] {
        if secret.is_some() {
            *secret = Some(REDACTED.to_string());
        }
    }
    toml::to_string_pretty(&shown)
}

/// Environment provider mapping `CALLCAST_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `CALLCAST_PROVIDER_API_KEY` must become `provider.api_key`,
/// not `provider.api.key`.
fn env_provider() -> Env {
    Env::prefixed("CALLCAST_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("service_", "service.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("provider_", "provider.", 1)
            .replacen("dispatch_", "dispatch.", 1)
            .replacen("ingest_", "ingest.", 1)
            .replacen("tenancy_", "tenancy.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_vars_override_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CALLCAST_PROVIDER_API_KEY", "vapi-secret");
            jail.set_env("CALLCAST_DISPATCH_BATCH_SIZE", "8");
            jail.set_env("CALLCAST_TENANCY_DEFAULT_TENANT_ID", "flowaix");
            jail.create_file("callcast.toml", "[gateway]\nport = 8088\n")?;

            let config = load_config_from_path(Path::new("callcast.toml"))?;
            assert_eq!(config.provider.api_key.as_deref(), Some("vapi-secret"));
            assert_eq!(config.dispatch.batch_size, 8);
            assert_eq!(config.tenancy.default_tenant_id, "flowaix");
            assert_eq!(config.gateway.port, 8088);
            Ok(())
        });
    }

    #[test]
    fn redacted_toml_masks_credentials() {
        let mut config = CallcastConfig::default();
        config.provider.api_key = Some("vapi-secret".into());
        config.gateway.bearer_token = Some("admin".into());

        let rendered = to_redacted_toml(&config).unwrap();
        assert!(!rendered.contains("vapi-secret"));
        assert!(!rendered.contains("\"admin\""));
        assert!(rendered.contains(REDACTED));
        assert!(!rendered.contains("webhook_secret"));

        let reparsed = load_config_from_str(&rendered).unwrap();
        assert_eq!(reparsed.gateway.port, config.gateway.port);
        assert_eq!(reparsed.dispatch.batch_size, config.dispatch.batch_size);
    }
}
