// FwCollect - Firmware Artifact Collector
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

mod subst;

pub use subst::{subst, SubstError, Variables};

pub const SCHEMA_VERSION: &str = "1.0";

/// Name of the directory under the project root that receives the copies.
pub const DESTINATION_DIR_NAME: &str = "firmware";

/// Default schema version for YAML configs
fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// Everything the collector needs to know about the build that just finished.
///
/// Supplied by the invoking build tool and never mutated by the collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildContext {
    pub build_output_dir: PathBuf,
    pub project_root: PathBuf,
    pub env_name: String, // e.g. "pico_w"
}

impl BuildContext {
    pub fn new(
        build_output_dir: impl Into<PathBuf>,
        project_root: impl Into<PathBuf>,
        env_name: impl Into<String>,
    ) -> Self {
        Self {
            build_output_dir: build_output_dir.into(),
            project_root: project_root.into(),
            env_name: env_name.into(),
        }
    }

    pub fn destination_dir(&self) -> PathBuf {
        self.project_root.join(DESTINATION_DIR_NAME)
    }

    pub fn validate(&self) -> Result<()> {
        if self.build_output_dir.as_os_str().is_empty() {
            anyhow::bail!("Build output directory cannot be empty");
        }
        if self.project_root.as_os_str().is_empty() {
            anyhow::bail!("Project root cannot be empty");
        }
        validate_env_name(&self.env_name)
    }
}

/// The env name ends up inside a file name, so it must stay a single path component.
fn validate_env_name(name: &str) -> Result<()> {
    if name.is_empty() {
        anyhow::bail!("Environment name cannot be empty");
    }
    if name == "." || name == ".." {
        anyhow::bail!("Environment name '{}' is not allowed", name);
    }
    if name.contains(['/', '\\']) {
        anyhow::bail!(
            "Environment name '{}' must not contain path separators",
            name
        );
    }
    Ok(())
}

/// Which build targets the post-build action is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookStrategy {
    /// One hook per generated image: `firmware.bin`, `firmware.hex`, `firmware.uf2`.
    #[default]
    PerArtifact,
    /// A single hook on the final program output.
    Program,
}

impl FromStr for HookStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "per-artifact" => Ok(Self::PerArtifact),
            "program" => Ok(Self::Program),
            other => Err(format!(
                "Unknown hook strategy '{}' (expected 'per-artifact' or 'program')",
                other
            )),
        }
    }
}

impl fmt::Display for HookStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerArtifact => f.write_str("per-artifact"),
            Self::Program => f.write_str("program"),
        }
    }
}

/// Build context as the build tool hands it over: strings that may still
/// reference `$PROJECT_DIR`, `$PIOENV` or `$ENV`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBuildContext {
    pub build_dir: String,
    pub project_dir: String,
    pub env: String,
}

impl RawBuildContext {
    pub fn resolve(&self) -> Result<BuildContext> {
        validate_env_name(&self.env)?;

        let project_dir = subst(&self.project_dir, &Variables::new())
            .with_context(|| format!("Failed to expand project_dir '{}'", self.project_dir))?;
        let project_root = absolute_dir(PathBuf::from(project_dir))?;

        let mut vars = Variables::new();
        vars.insert(
            "PROJECT_DIR".to_string(),
            project_root.to_string_lossy().into_owned(),
        );
        vars.insert("PIOENV".to_string(), self.env.clone());
        vars.insert("ENV".to_string(), self.env.clone());

        let build_dir = subst(&self.build_dir, &vars)
            .with_context(|| format!("Failed to expand build_dir '{}'", self.build_dir))?;

        let build_output_dir = {
            let path = PathBuf::from(build_dir);
            // Relative build dirs are relative to the project, not the caller's cwd.
            if path.is_relative() && !path.as_os_str().is_empty() {
                project_root.join(path)
            } else {
                path
            }
        };

        let ctx = BuildContext {
            build_output_dir,
            project_root,
            env_name: self.env.clone(),
        };
        ctx.validate()?;
        debug!("Resolved build context: {:?}", ctx);
        Ok(ctx)
    }
}

/// Anchors a relative project dir at the cwd, so hook targets handed over by
/// the build tool as absolute paths compare equal. Empty stays empty for
/// `BuildContext::validate` to reject.
fn absolute_dir(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() || path.as_os_str().is_empty() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path).components().collect())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(flatten)]
    pub context: RawBuildContext,
    #[serde(default)]
    pub hook: HookStrategy,
}

impl CollectorConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read collector config {:?}", path))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid collector config {:?}", path))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).context("Failed to parse collector config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema_version != SCHEMA_VERSION {
            anyhow::bail!(
                "Unsupported schema_version '{}'. Supported: {}",
                self.schema_version,
                SCHEMA_VERSION
            );
        }
        Ok(())
    }
}
