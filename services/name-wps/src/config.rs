//! Service configuration.
//!
//! Values come from an optional YAML file and are then overridden by
//! environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listen address
    pub listen: String,

    /// Directory under which each job gets its own working directory
    pub output_dir: PathBuf,

    /// Public URL that `output_dir` is served under; reference outputs are
    /// reported as filesystem paths when unset
    pub base_url: Option<String>,

    /// Reject inverted ranges and reversed dates
    pub strict_validation: bool,

    /// External model runner; the advanced process is only offered when set
    pub runner: Option<RunnerConfig>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:5000".to_string(),
            output_dir: PathBuf::from("/tmp/name-wps"),
            base_url: None,
            strict_validation: false,
            runner: None,
        }
    }
}

/// How to invoke the NAME model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Executable to run
    pub command: PathBuf,

    /// Extra arguments
    #[serde(default)]
    pub args: Vec<String>,

    /// Kill the run after this many seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    6 * 3600
}

impl ServiceConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        Self::from_yaml_str(&content).with_context(|| format!("Failed to parse config: {:?}", path))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load from `path` if given (defaults otherwise), then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Recognised keys: `NAME_WPS_LISTEN`, `NAME_WPS_OUTPUT_DIR`,
    /// `NAME_WPS_BASE_URL`, `NAME_WPS_STRICT`, `NAME_RUNNER_COMMAND`, `NAME_RUNNER_TIMEOUT_SECS`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(listen) = lookup("NAME_WPS_LISTEN") {
            self.listen = listen;
        }
        if let Some(dir) = lookup("NAME_WPS_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("NAME_WPS_BASE_URL") {
            self.base_url = Some(url).filter(|u| !u.is_empty());
        }
        if let Some(strict) = lookup("NAME_WPS_STRICT") {
            self.strict_validation = matches!(strict.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(command) = lookup("NAME_RUNNER_COMMAND") {
            match self.runner.as_mut() {
                Some(runner) => runner.command = PathBuf::from(command),
                None => {
                    self.runner = Some(RunnerConfig {
                        command: PathBuf::from(command),
                        args: Vec::new(),
                        timeout_secs: default_timeout_secs(),
                    })
                }
            }
        }
        if let Some(timeout) = lookup("NAME_RUNNER_TIMEOUT_SECS") {
            let timeout: u64 = timeout
                .parse()
                .with_context(|| format!("Invalid NAME_RUNNER_TIMEOUT_SECS: {}", timeout))?;
            if let Some(runner) = self.runner.as_mut() {
                runner.timeout_secs = timeout;
            }
        }
        Ok(self)
    }

    /// Reference for an artifact at `path`.
    ///
    /// Paths under `output_dir` become URLs below `base_url`; anything else,
    /// or everything when no base URL is configured, is returned unchanged.
    pub fn output_href(&self, path: &str) -> String {
        let Some(base) = self.base_url.as_deref() else {
            return path.to_string();
        };
        match Path::new(path).strip_prefix(&self.output_dir) {
            Ok(relative) => {
                let segments: Vec<_> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect();
                format!("{}/{}", base.trim_end_matches('/'), segments.join("/"))
            }
            Err(_) => path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_yaml_partial_uses_defaults() {
        let config = ServiceConfig::from_yaml_str("output_dir: /data/name\n").unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/data/name"));
        assert_eq!(config.listen, "0.0.0.0:5000");
        assert!(config.runner.is_none());
    }

    #[test]
    fn test_yaml_runner() {
        let yaml = "runner:\n  command: /opt/name/run.sh\n  args: [\"--quiet\"]\n";
        let config = ServiceConfig::from_yaml_str(yaml).unwrap();
        let runner = config.runner.unwrap();
        assert_eq!(runner.command, PathBuf::from("/opt/name/run.sh"));
        assert_eq!(runner.args, vec!["--quiet".to_string()]);
        assert_eq!(runner.timeout_secs, 6 * 3600);
    }

    #[test]
    fn test_env_overrides() {
        let config = ServiceConfig::default()
            .with_overrides(lookup(&[
                ("NAME_WPS_LISTEN", "127.0.0.1:9000"),
                ("NAME_WPS_STRICT", "true"),
                ("NAME_RUNNER_COMMAND", "/usr/bin/name"),
                ("NAME_RUNNER_TIMEOUT_SECS", "60"),
            ]))
            .unwrap();

        assert_eq!(config.listen, "127.0.0.1:9000");
        assert!(config.strict_validation);
        let runner = config.runner.unwrap();
        assert_eq!(runner.command, PathBuf::from("/usr/bin/name"));
        assert_eq!(runner.timeout_secs, 60);
    }

    #[test]
    fn test_base_url_override() {
        let config = ServiceConfig::default()
            .with_overrides(lookup(&[("NAME_WPS_BASE_URL", "https://name.example.org/outputs/")]))
            .unwrap();
        assert_eq!(
            config.base_url.as_deref(),
            Some("https://name.example.org/outputs/")
        );

        let cleared = config.with_overrides(lookup(&[("NAME_WPS_BASE_URL", "")])).unwrap();
        assert!(cleared.base_url.is_none());
    }

    #[test]
    fn test_output_href_under_output_dir() {
        let config = ServiceConfig {
            output_dir: PathBuf::from("/data/name"),
            base_url: Some("https://name.example.org/outputs/".to_string()),
            ..ServiceConfig::default()
        };
        assert_eq!(
            config.output_href("/data/name/job-1/out.txt"),
            "https://name.example.org/outputs/job-1/out.txt"
        );
        assert_eq!(config.output_href("/elsewhere/plot.png"), "/elsewhere/plot.png");
    }

    #[test]
    fn test_output_href_without_base_url() {
        let config = ServiceConfig::default();
        assert_eq!(
            config.output_href("/tmp/name-wps/job-1/out.txt"),
            "/tmp/name-wps/job-1/out.txt"
        );
    }

    #[test]
    fn test_yaml_base_url() {
        let config =
            ServiceConfig::from_yaml_str("base_url: http://localhost:8080/files\n").unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/files"));
    }

    #[test]
    fn test_bad_timeout_override() {
        let result = ServiceConfig::default()
            .with_overrides(lookup(&[("NAME_RUNNER_TIMEOUT_SECS", "soon")]));
        assert!(result.is_err());
    }
}
