// FwCollect - Firmware Artifact Collector
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use clap::Args;
use fwcollect_config::{BuildContext, CollectorConfig, HookStrategy, RawBuildContext};
use std::path::PathBuf;
use tracing::debug;

/// Build context as passed by the build tool, either inline or through a config file.
#[derive(Args, Debug)]
pub struct ContextArgs {
    /// Path to a collector config (YAML) holding build_dir, project_dir and env
    #[arg(short, long, conflicts_with_all = ["build_dir", "project_dir", "env"])]
    pub config: Option<PathBuf>,

    /// Build output directory (may reference $PROJECT_DIR and $PIOENV)
    #[arg(long)]
    pub build_dir: Option<String>,

    /// Project root; copies land in <project-dir>/firmware
    #[arg(long)]
    pub project_dir: Option<String>,

    /// Build environment name, e.g. pico_w
    #[arg(short, long)]
    pub env: Option<String>,
}

pub struct ResolvedContext {
    pub ctx: BuildContext,
    pub hook: HookStrategy,
}

impl ContextArgs {
    /// `hook_override` wins over the strategy in the config file.
    pub fn resolve(&self, hook_override: Option<HookStrategy>) -> Result<ResolvedContext> {
        let (raw, file_hook) = match &self.config {
            Some(path) => {
                let config = CollectorConfig::from_file(path)?;
                debug!("Loaded collector config {:?}", path);
                (config.context, config.hook)
            }
            None => {
                let raw = RawBuildContext {
                    build_dir: self
                        .build_dir
                        .clone()
                        .context("Missing required --build-dir argument")?,
                    project_dir: self
                        .project_dir
                        .clone()
                        .context("Missing required --project-dir argument")?,
                    env: self.env.clone().context("Missing required --env argument")?,
                };
                (raw, HookStrategy::default())
            }
        };

        let ctx = raw.resolve()?;
        Ok(ResolvedContext {
            ctx,
            hook: hook_override.unwrap_or(file_hook),
        })
    }
}
