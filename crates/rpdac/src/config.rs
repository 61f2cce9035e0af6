//! CLI configuration, a thin wrapper around `rpdac_config`.
//!
//! Adds the resolution that respects `GlobalOpts` flag overrides
//! (--endpoint, --token, --project, ...).

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use rpdac_core::ServiceConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use rpdac_config::{Config, Profile, discover_config_path, load_config_from, save_config_to};

/// The config file this invocation reads and writes.
pub fn active_config_path(global: &GlobalOpts) -> PathBuf {
    discover_config_path(global.config.as_deref())
}

/// Load the active config file. A missing file yields the defaults.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(load_config_from(&active_config_path(global))?)
}

pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

pub fn profile_not_found(name: &str, config: &Config) -> CliError {
    let available: Vec<_> = config.profiles.keys().cloned().collect();
    CliError::ProfileNotFound {
        name: name.into(),
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

/// Build the `ServiceConfig` for this invocation.
///
/// Flags win over the profile. Without a profile, `--endpoint` and
/// `--token` alone are enough.
pub fn resolve_service_config(global: &GlobalOpts, config: &Config) -> Result<ServiceConfig, CliError> {
    let profile_name = active_profile_name(global, config);
    let flags_only = Profile::default();

    let profile = match config.profiles.get(&profile_name) {
        Some(profile) => profile,
        // An explicitly requested profile must exist.
        None if global.profile.is_some() => return Err(profile_not_found(&profile_name, config)),
        None => &flags_only,
    };

    let endpoint = global
        .endpoint
        .clone()
        .or_else(|| Some(profile.endpoint.clone()).filter(|e| !e.is_empty()))
        .ok_or_else(|| CliError::NoConfig {
            path: active_config_path(global).display().to_string(),
        })?;
    rpdac_config::validate_endpoint(&endpoint)?;

    let token = match global.token {
        Some(ref token) => SecretString::from(token.clone()),
        None => rpdac_config::resolve_token(profile, &profile_name)?,
    };

    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(config.defaults.timeout);

    Ok(ServiceConfig {
        endpoint,
        token,
        timeout: Duration::from_secs(timeout),
        insecure: global.insecure || profile.insecure.unwrap_or(config.defaults.insecure),
    })
}

/// Project to operate on: `--project`, else the profile's.
pub fn resolve_project(global: &GlobalOpts, config: &Config) -> Result<String, CliError> {
    if let Some(ref project) = global.project {
        return Ok(project.clone());
    }

    config
        .profiles
        .get(&active_profile_name(global, config))
        .and_then(|p| p.project.clone())
        .ok_or(CliError::NoProject)
}
