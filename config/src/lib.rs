//! Shieldkit Configuration
//!
//! Handles loading configuration from:
//! 1. SHIELDKIT_CONFIG env var (explicit path)
//! 2. ./shieldkit.toml (current directory)
//! 3. ~/.shieldkit/config.toml (user home)
//!
//! Environment variables take precedence over TOML config. The loaded
//! [`ShieldConfig`] is handed to whoever builds the shield context; there
//! is no process-wide instance.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use shieldkit_field::HashMode;
use std::path::{Path, PathBuf};
use std::{env, fs};

const CONFIG_FILE_NAME: &str = "shieldkit.toml";
const CONFIG_DIR_NAME: &str = ".shieldkit";
const HOME_CONFIG_FILE_NAME: &str = "config.toml";

/// Outputs of a batch transfer and inputs of a consolidation. Fixed by the
/// circuits, so it is a constant rather than a tunable.
pub const BATCH_SIZE: usize = 20;

// ============================================================================
// Default Constants
// ============================================================================

const DEFAULT_TREE_DEPTH: usize = 32;
const DEFAULT_ROOT_HISTORY: usize = 100;
const DEFAULT_ZOKRATES: &str = "zokrates";
const DEFAULT_SCHEME: &str = "gm17";
const DEFAULT_CODE_DIR: &str = "./code/gm17";

// ============================================================================
// Config Structs
// ============================================================================

/// Root configuration structure (matches TOML layout)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShieldConfig {
    #[serde(default)]
    pub hash: HashConfig,
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub protocol: ProtocolConfig,
    #[serde(default)]
    pub prover: ProverConfig,
    #[serde(default)]
    pub compliance: ComplianceConfig,
}

/// Hash selection; must match the deployed circuits and shield contract
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HashConfig {
    #[serde(default)]
    pub mode: HashMode,
}

/// Commitment tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    #[serde(default = "default_tree_depth")]
    pub depth: usize,
    /// Number of recent roots the ledger still accepts
    #[serde(default = "default_root_history")]
    pub root_history: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_TREE_DEPTH,
            root_history: DEFAULT_ROOT_HISTORY,
        }
    }
}

fn default_tree_depth() -> usize {
    DEFAULT_TREE_DEPTH
}
fn default_root_history() -> usize {
    DEFAULT_ROOT_HISTORY
}

/// Protocol constants, checked against the compiled values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            batch_size: BATCH_SIZE,
        }
    }
}

fn default_batch_size() -> usize {
    BATCH_SIZE
}

/// Which proving backend to run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProverBackendToml {
    #[default]
    Mock,
    Zokrates,
}

/// Compiled program and proving key of one circuit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgramConfig {
    pub program: String,
    pub proving_key: String,
}

impl ProgramConfig {
    fn under(dir: &str) -> Self {
        Self {
            program: format!("{DEFAULT_CODE_DIR}/{dir}/out"),
            proving_key: format!("{DEFAULT_CODE_DIR}/{dir}/proving.key"),
        }
    }
}

/// One program per protocol operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramsConfig {
    #[serde(default = "default_mint_program")]
    pub mint: ProgramConfig,
    #[serde(default = "default_transfer_program")]
    pub transfer: ProgramConfig,
    #[serde(default = "default_batch_program")]
    pub batch_transfer: ProgramConfig,
    #[serde(default = "default_consolidation_program")]
    pub consolidation_transfer: ProgramConfig,
    #[serde(default = "default_burn_program")]
    pub burn: ProgramConfig,
}

impl Default for ProgramsConfig {
    fn default() -> Self {
        Self {
            mint: default_mint_program(),
            transfer: default_transfer_program(),
            batch_transfer: default_batch_program(),
            consolidation_transfer: default_consolidation_program(),
            burn: default_burn_program(),
        }
    }
}

fn default_mint_program() -> ProgramConfig {
    ProgramConfig::under("ft-mint")
}
fn default_transfer_program() -> ProgramConfig {
    ProgramConfig::under("ft-transfer")
}
fn default_batch_program() -> ProgramConfig {
    ProgramConfig::under("ft-batch-transfer")
}
fn default_consolidation_program() -> ProgramConfig {
    ProgramConfig::under("ft-consolidation-transfer")
}
fn default_burn_program() -> ProgramConfig {
    ProgramConfig::under("ft-burn")
}

/// External prover configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProverConfig {
    #[serde(default)]
    pub backend: ProverBackendToml,
    #[serde(default = "default_zokrates")]
    pub zokrates_path: String,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Parent directory for per-call workspaces (system temp dir if unset)
    #[serde(default)]
    pub output_directory: Option<String>,
    #[serde(default)]
    pub programs: ProgramsConfig,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            backend: ProverBackendToml::Mock,
            zokrates_path: DEFAULT_ZOKRATES.into(),
            scheme: DEFAULT_SCHEME.into(),
            output_directory: None,
            programs: ProgramsConfig::default(),
        }
    }
}

fn default_zokrates() -> String {
    DEFAULT_ZOKRATES.into()
}
fn default_scheme() -> String {
    DEFAULT_SCHEME.into()
}

/// Regulatory compliance extension
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplianceConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Hex-encoded authority private keys, one per encrypted field
    #[serde(default)]
    pub authority_private_keys: Vec<String>,
}

// ============================================================================
// Environment Variable Helpers
// ============================================================================

/// Set field from env var if present and parseable
fn env_parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    field: &mut T,
) {
    if let Some(v) = lookup(key) {
        match v.parse() {
            Ok(parsed) => *field = parsed,
            Err(_) => log::warn!("Ignoring unparseable {key}={v}"),
        }
    }
}

/// Set field from env var if present
fn env_string(lookup: &impl Fn(&str) -> Option<String>, key: &str, field: &mut String) {
    if let Some(v) = lookup(key) {
        *field = v;
    }
}

/// Set Option<String> from env var if present
fn env_option_string(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    field: &mut Option<String>,
) {
    if let Some(v) = lookup(key) {
        *field = Some(v);
    }
}

/// Truthy value ("1" or "true")
fn env_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    lookup(key).map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

// ============================================================================
// Implementation
// ============================================================================

impl ShieldConfig {
    /// Load configuration from config file with env var overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => {
                log::info!("Loading config from: {}", path.display());
                Self::parse_file(&path)?
            }
            None => {
                log::info!("No config file found, using defaults and environment variables");
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::parse_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn parse_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Find the config file path
    fn find_config_file() -> Option<PathBuf> {
        if let Ok(path) = env::var("SHIELDKIT_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            log::warn!("SHIELDKIT_CONFIG points at missing file {}", path.display());
        }

        let local_path = PathBuf::from(CONFIG_FILE_NAME);
        if local_path.exists() {
            return Some(local_path);
        }

        Self::default_config_path().filter(|p| p.exists())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(&|key| env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        // Hash
        env_parse(lookup, "HASH_TYPE", &mut self.hash.mode);

        // Tree
        env_parse(lookup, "SHIELDKIT_TREE_DEPTH", &mut self.tree.depth);
        env_parse(lookup, "SHIELDKIT_ROOT_HISTORY", &mut self.tree.root_history);

        // Prover
        if let Some(v) = lookup("SHIELDKIT_PROVER") {
            self.prover.backend = match v.to_ascii_lowercase().as_str() {
                "zokrates" => ProverBackendToml::Zokrates,
                _ => ProverBackendToml::Mock,
            };
        }
        env_string(lookup, "SHIELDKIT_ZOKRATES", &mut self.prover.zokrates_path);
        env_string(lookup, "SHIELDKIT_SCHEME", &mut self.prover.scheme);
        env_option_string(lookup, "SHIELDKIT_OUTPUT_DIR", &mut self.prover.output_directory);

        // Compliance
        if let Some(v) = env_bool(lookup, "COMPLIANCE") {
            self.compliance.enabled = v;
        }
        if let Some(keys) = lookup("SHIELDKIT_AUTHORITY_KEYS") {
            self.compliance.authority_private_keys = keys
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect();
        }
    }

    /// Reject settings the circuits cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.protocol.batch_size != BATCH_SIZE {
            bail!(
                "protocol.batch_size is {} but the circuits are compiled for {BATCH_SIZE}",
                self.protocol.batch_size
            );
        }
        if self.tree.depth == 0 || self.tree.depth > 63 {
            bail!("tree.depth must be between 1 and 63, got {}", self.tree.depth);
        }
        if self.tree.root_history == 0 {
            bail!("tree.root_history must be positive");
        }
        if self.compliance.enabled && self.compliance.authority_private_keys.is_empty() {
            bail!("compliance is enabled but no authority_private_keys are configured");
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(CONFIG_DIR_NAME).join(HOME_CONFIG_FILE_NAME))
    }

    /// Generate a sample config file
    pub fn generate_sample() -> String {
        let mut sample = Self::default();
        sample.prover.output_directory = Some("./proofs".into());
        sample.compliance.authority_private_keys = vec!["0x01".into(), "0x02".into(), "0x03".into()];
        toml::to_string_pretty(&sample).unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ShieldConfig::default();
        assert_eq!(config.hash.mode, HashMode::Sha);
        assert_eq!(config.tree.depth, DEFAULT_TREE_DEPTH);
        assert_eq!(config.protocol.batch_size, BATCH_SIZE);
        assert_eq!(config.prover.backend, ProverBackendToml::Mock);
        assert!(!config.compliance.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generate_sample() {
        let sample = ShieldConfig::generate_sample();
        assert!(sample.contains("[hash]"));
        assert!(sample.contains("[tree]"));
        assert!(sample.contains("[prover.programs.transfer]"));
        assert!(sample.contains("[compliance]"));
    }

    #[test]
    fn test_parse_sample() {
        let sample = ShieldConfig::generate_sample();
        let parsed: ShieldConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.prover.scheme, DEFAULT_SCHEME);
        assert_eq!(parsed.compliance.authority_private_keys.len(), 3);
        assert_eq!(
            parsed.prover.programs.burn.proving_key,
            "./code/gm17/ft-burn/proving.key"
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: ShieldConfig = toml::from_str("[hash]\nmode = \"mimc\"\n").unwrap();
        assert_eq!(parsed.hash.mode, HashMode::Mimc);
        assert_eq!(parsed.tree.root_history, DEFAULT_ROOT_HISTORY);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("HASH_TYPE", "mimc"),
            ("SHIELDKIT_TREE_DEPTH", "16"),
            ("SHIELDKIT_PROVER", "zokrates"),
            ("COMPLIANCE", "true"),
            ("SHIELDKIT_AUTHORITY_KEYS", "0x01, 0x02,,0x03"),
            ("SHIELDKIT_ROOT_HISTORY", "not-a-number"),
        ]);
        let mut config = ShieldConfig::default();
        config.apply_overrides(&|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.hash.mode, HashMode::Mimc);
        assert_eq!(config.tree.depth, 16);
        assert_eq!(config.tree.root_history, DEFAULT_ROOT_HISTORY, "bad values are ignored");
        assert_eq!(config.prover.backend, ProverBackendToml::Zokrates);
        assert!(config.compliance.enabled);
        assert_eq!(config.compliance.authority_private_keys, vec!["0x01", "0x02", "0x03"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_batch_size() {
        let mut config = ShieldConfig::default();
        config.protocol.batch_size = 10;
        assert!(config.validate().is_err());

        let mut config = ShieldConfig::default();
        config.compliance.enabled = true;
        assert!(config.validate().is_err(), "compliance needs keys");
    }
}
