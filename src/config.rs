use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::CheckError;
use crate::license::expression::Expr;
use crate::models::PolicyVerdict;

const CONFIG_DIR: &str = ".clearance-checkr";
const CONFIG_FILE: &str = "config.toml";

/// Root configuration structure, deserialized from `.clearance-checkr/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Remote clearance service settings.
    #[serde(default)]
    pub clearance: ClearanceConfig,
    /// Local policy used when the clearance service has no record.
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Where and how to query the clearance service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClearanceConfig {
    /// Endpoint receiving batched lookup requests.
    pub url: String,
    /// Maximum number of ids per request.
    pub batch_size: usize,
    /// Maximum number of requests in flight.
    pub max_concurrent: usize,
    /// Retries per batch after the first attempt.
    pub max_retries: u8,
    /// Delay before the first retry; doubles on each further retry.
    pub backoff_ms: u64,
    /// Timeout for a single HTTP request.
    pub request_timeout_secs: u64,
    /// Bound on the whole lookup phase.
    pub timeout_secs: u64,
}

impl Default for ClearanceConfig {
    fn default() -> Self {
        ClearanceConfig {
            url: "https://www.eclipse.org/projects/services/license_check.php".to_string(),
            batch_size: 500,
            max_concurrent: 4,
            max_retries: 3,
            backoff_ms: 1000,
            request_timeout_secs: 30,
            timeout_secs: 300,
        }
    }
}

impl ClearanceConfig {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Defines how declared licenses are judged locally.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Verdict applied to any license not explicitly listed in `licenses`.
    #[serde(default = "default_policy_action")]
    pub default: PolicyAction,
    /// Per-license overrides keyed by SPDX identifier (e.g. `"MIT"`, `"GPL-3.0"`).
    #[serde(default)]
    pub licenses: HashMap<String, PolicyAction>,
}

fn default_policy_action() -> PolicyAction {
    PolicyAction::Warn
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PolicyAction {
    /// License is acceptable without review.
    Pass,
    /// License needs a human to look at it.
    Warn,
    /// License is not acceptable.
    Error,
}

impl PolicyAction {
    pub fn to_verdict(self) -> PolicyVerdict {
        match self {
            PolicyAction::Pass => PolicyVerdict::Pass,
            PolicyAction::Warn => PolicyVerdict::Warn,
            PolicyAction::Error => PolicyVerdict::Error,
        }
    }
}

impl Default for PolicyConfig {
    /// Built-in policy: common permissive licenses and the Eclipse licenses
    /// pass, strong copyleft is an error, everything else warns.
    fn default() -> Self {
        let pass = [
            "MIT", "Apache-2.0", "BSD-2-Clause", "BSD-3-Clause", "ISC", "EPL-1.0", "EPL-2.0",
            "EDL-1.0", "CC0-1.0", "Unlicense", "0BSD",
        ];
        let error = ["GPL-2.0", "GPL-3.0", "AGPL-3.0"];

        let mut licenses: HashMap<String, PolicyAction> = pass
            .iter()
            .map(|id| (id.to_string(), PolicyAction::Pass))
            .collect();
        licenses.extend(error.iter().map(|id| (id.to_string(), PolicyAction::Error)));
        licenses.insert("LGPL-2.1".to_string(), PolicyAction::Warn);

        PolicyConfig {
            default: PolicyAction::Warn,
            licenses,
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<project_path>/.clearance-checkr/config.toml`
/// 3. `~/.config/clearance-checkr/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config, CheckError> {
    if let Some(path) = config_override {
        if !path.exists() {
            return Err(CheckError::NotFound {
                path: path.to_path_buf(),
            });
        }
        return read_config(path);
    }

    let project_config = project_path.join(CONFIG_DIR).join(CONFIG_FILE);
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("clearance-checkr")
            .join(CONFIG_FILE);
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    tracing::debug!("no config file found, using built-in defaults");
    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config, CheckError> {
    tracing::debug!(path = %path.display(), "loading config");
    let content = std::fs::read_to_string(path).map_err(|source| CheckError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| CheckError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Judge a license identifier or expression against the policy.
///
/// An exact entry wins (covers whole expressions listed verbatim and the
/// literal `"unknown"`); otherwise the expression is evaluated with OR taking
/// the most lenient verdict and AND the strictest. Unparseable input gets
/// the default verdict.
pub fn apply_policy(policy: &PolicyConfig, license: Option<&str>) -> PolicyVerdict {
    let license = license.unwrap_or("unknown");

    if let Some(action) = policy.licenses.get(license) {
        return action.to_verdict();
    }

    let single = |id: &str| match policy.licenses.get(id) {
        Some(action) => action.to_verdict(),
        None => policy.default.to_verdict(),
    };

    match Expr::parse(license) {
        Some(expr) => expr.evaluate(&single, verdict_and, verdict_or),
        None => policy.default.to_verdict(),
    }
}

/// Pass < Warn < Error; OR keeps the most lenient.
fn verdict_or(a: PolicyVerdict, b: PolicyVerdict) -> PolicyVerdict {
    match (a, b) {
        (PolicyVerdict::Pass, _) | (_, PolicyVerdict::Pass) => PolicyVerdict::Pass,
        (PolicyVerdict::Warn, _) | (_, PolicyVerdict::Warn) => PolicyVerdict::Warn,
        _ => PolicyVerdict::Error,
    }
}

/// AND keeps the most severe.
fn verdict_and(a: PolicyVerdict, b: PolicyVerdict) -> PolicyVerdict {
    match (a, b) {
        (PolicyVerdict::Error, _) | (_, PolicyVerdict::Error) => PolicyVerdict::Error,
        (PolicyVerdict::Warn, _) | (_, PolicyVerdict::Warn) => PolicyVerdict::Warn,
        _ => PolicyVerdict::Pass,
    }
}
