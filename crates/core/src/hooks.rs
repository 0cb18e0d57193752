// FwCollect - Firmware Artifact Collector
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Where the collector is attached in the build graph.
//!
//! Both strategies run the same [`collect_firmware`]; they only differ in
//! which generated files trigger it.

use crate::artifact::ArtifactFormat;
use crate::collect::{collect_firmware, CollectReport};
use crate::CollectResult;
use fwcollect_config::{BuildContext, HookStrategy};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Targets watched by each strategy.
///
/// `.bin` is produced after `.elf`, and `.uf2` after `.bin` on RP2040
/// boards, so hooking every derived image catches whichever comes last.
pub(crate) fn hooked_formats(strategy: HookStrategy) -> &'static [ArtifactFormat] {
    match strategy {
        HookStrategy::PerArtifact => &[
            ArtifactFormat::Bin,
            ArtifactFormat::Hex,
            ArtifactFormat::Uf2,
        ],
        HookStrategy::Program => &[ArtifactFormat::Elf],
    }
}

#[derive(Debug, Clone)]
pub struct HookRegistry {
    strategy: HookStrategy,
    targets: Vec<PathBuf>,
}

impl HookRegistry {
    pub fn new(strategy: HookStrategy, build_output_dir: &Path) -> Self {
        let targets = hooked_formats(strategy)
            .iter()
            .map(|f| f.source_path(build_output_dir))
            .collect();
        Self { strategy, targets }
    }

    pub fn for_context(strategy: HookStrategy, ctx: &BuildContext) -> Self {
        Self::new(strategy, &ctx.build_output_dir)
    }

    pub fn strategy(&self) -> HookStrategy {
        self.strategy
    }

    pub fn targets(&self) -> &[PathBuf] {
        &self.targets
    }

    pub fn is_attached(&self, target: &Path) -> bool {
        self.targets.iter().any(|t| t == target)
    }

    /// Post-action callback for a finished build target.
    ///
    /// Returns `Ok(None)` when nothing is attached to `target`.
    pub fn on_target_built(
        &self,
        target: &Path,
        ctx: &BuildContext,
    ) -> CollectResult<Option<CollectReport>> {
        if !self.is_attached(target) {
            debug!("No post-action attached to {:?}", target);
            return Ok(None);
        }
        debug!("Post-action fired for {:?} ({})", target, self.strategy);
        collect_firmware(ctx).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_artifact_targets() {
        let reg = HookRegistry::new(HookStrategy::PerArtifact, Path::new("/b"));
        assert_eq!(
            reg.targets(),
            [
                PathBuf::from("/b/firmware.bin"),
                PathBuf::from("/b/firmware.hex"),
                PathBuf::from("/b/firmware.uf2"),
            ]
        );
        assert!(reg.is_attached(Path::new("/b/firmware.hex")));
        assert!(!reg.is_attached(Path::new("/b/firmware.elf")));
    }

    #[test]
    fn test_program_target() {
        let reg = HookRegistry::new(HookStrategy::Program, Path::new("/b"));
        assert_eq!(reg.targets(), [PathBuf::from("/b/firmware.elf")]);
        assert_eq!(reg.strategy(), HookStrategy::Program);
    }

    #[test]
    fn test_unattached_target_does_nothing() {
        let root = tempfile::tempdir().unwrap();
        let ctx = BuildContext::new(root.path().join("build"), root.path(), "uno");
        let reg = HookRegistry::for_context(HookStrategy::Program, &ctx);

        let out = reg
            .on_target_built(&ctx.build_output_dir.join("firmware.bin"), &ctx)
            .unwrap();
        assert!(out.is_none());
        assert!(!ctx.destination_dir().exists());
    }
}
