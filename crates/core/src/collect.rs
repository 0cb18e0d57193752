// FwCollect - Firmware Artifact Collector
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::artifact::ArtifactFormat;
use crate::{CollectError, CollectResult};
use fwcollect_config::BuildContext;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize)]
pub struct CopiedArtifact {
    pub format: ArtifactFormat,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub bytes: u64,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectReport {
    pub env_name: String,
    pub destination_dir: PathBuf,
    pub copied: Vec<CopiedArtifact>,
}

impl CollectReport {
    pub fn is_empty(&self) -> bool {
        self.copied.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, format: ArtifactFormat) -> Option<&CopiedArtifact> {
        self.copied.iter().find(|a| a.format == format)
    }
}

/// Copies every firmware image present in the build output directory into
/// `<project>/firmware`, renamed `firmware-<env>.<ext>`.
///
/// Missing images are skipped. Existing copies are overwritten. Any I/O
/// failure aborts the run.
pub fn collect_firmware(ctx: &BuildContext) -> CollectResult<CollectReport> {
    let destination_dir = ctx.destination_dir();
    fs::create_dir_all(&destination_dir).map_err(|source| CollectError::CreateDestination {
        path: destination_dir.clone(),
        source,
    })?;

    let mut copied = Vec::new();

    for format in ArtifactFormat::ALL {
        let source = format.source_path(&ctx.build_output_dir);
        if !source.exists() {
            debug!(
                "No {} in {:?}, skipping",
                format.source_file_name(),
                ctx.build_output_dir
            );
            continue;
        }

        let destination = destination_dir.join(format.destination_file_name(&ctx.env_name));
        info!(
            "Copying {} to {}...",
            format.source_file_name(),
            destination.display()
        );

        let bytes = fs::copy(&source, &destination).map_err(|e| CollectError::Copy {
            from: source.clone(),
            to: destination.clone(),
            source: e,
        })?;

        let data = fs::read(&destination).map_err(|e| CollectError::Read {
            path: destination.clone(),
            source: e,
        })?;
        let mut hasher = Sha256::new();
        hasher.update(&data);
        let sha256 = format!("{:x}", hasher.finalize());

        copied.push(CopiedArtifact {
            format,
            source,
            destination,
            bytes,
            sha256,
        });
    }

    if !copied.is_empty() {
        info!("Done copying firmware files.");
    }

    Ok(CollectReport {
        env_name: ctx.env_name.clone(),
        destination_dir,
        copied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn setup(env: &str) -> (TempDir, BuildContext) {
        let root = tempfile::tempdir().unwrap();
        let build = root.path().join(".pio/build").join(env);
        fs::create_dir_all(&build).unwrap();
        let ctx = BuildContext::new(build, root.path(), env);
        (root, ctx)
    }

    fn write(dir: &Path, name: &str, data: &[u8]) {
        fs::write(dir.join(name), data).unwrap();
    }

    #[test]
    fn test_renames_with_env() {
        let (_root, ctx) = setup("pico_w");
        write(&ctx.build_output_dir, "firmware.uf2", b"UF2\n");

        let report = collect_firmware(&ctx).unwrap();

        assert_eq!(report.copied.len(), 1);
        let copied = report.get(ArtifactFormat::Uf2).unwrap();
        assert_eq!(
            copied.destination.file_name().unwrap(),
            "firmware-pico_w.uf2"
        );
        assert_eq!(copied.bytes, 4);
        assert_eq!(fs::read(&copied.destination).unwrap(), b"UF2\n");
    }

    #[test]
    fn test_empty_build_dir_is_noop() {
        let (_root, ctx) = setup("uno");

        let report = collect_firmware(&ctx).unwrap();

        assert!(report.is_empty());
        assert!(ctx.destination_dir().is_dir());
        assert_eq!(fs::read_dir(ctx.destination_dir()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_build_dir_is_noop() {
        let root = tempfile::tempdir().unwrap();
        let ctx = BuildContext::new(root.path().join("does-not-exist"), root.path(), "uno");
        assert!(collect_firmware(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_report_order_and_hash() {
        let (_root, ctx) = setup("esp32dev");
        write(&ctx.build_output_dir, "firmware.hex", b":00000001FF\n");
        write(&ctx.build_output_dir, "firmware.elf", b"\x7fELF");
        write(&ctx.build_output_dir, "firmware.bin", b"");

        let report = collect_firmware(&ctx).unwrap();
        let formats: Vec<_> = report.copied.iter().map(|a| a.format).collect();
        assert_eq!(
            formats,
            [ArtifactFormat::Elf, ArtifactFormat::Bin, ArtifactFormat::Hex]
        );

        // SHA-256 of the empty input
        assert_eq!(
            report.get(ArtifactFormat::Bin).unwrap().sha256,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_copy_failure_is_fatal() {
        let (_root, ctx) = setup("uno");
        write(&ctx.build_output_dir, "firmware.bin", b"abc");
        // A directory where the copy should land makes the copy fail.
        fs::create_dir_all(ctx.destination_dir().join("firmware-uno.bin")).unwrap();

        let err = collect_firmware(&ctx).unwrap_err();
        assert!(matches!(err, CollectError::Copy { .. }));
    }

    #[test]
    fn test_destination_blocked_by_file() {
        let (_root, ctx) = setup("uno");
        fs::write(ctx.destination_dir(), b"not a dir").unwrap();

        let err = collect_firmware(&ctx).unwrap_err();
        assert!(matches!(err, CollectError::CreateDestination { .. }));
    }
}
