// FwCollect - Firmware Artifact Collector
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base name the build tool gives every firmware image.
pub const FIRMWARE_BASE_NAME: &str = "firmware";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    Elf,
    Bin,
    Hex,
    Uf2,
}

impl ArtifactFormat {
    /// Recognised formats, in the order they are collected.
    pub const ALL: [ArtifactFormat; 4] = [Self::Elf, Self::Bin, Self::Hex, Self::Uf2];

    /// Extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Elf => ".elf",
            Self::Bin => ".bin",
            Self::Hex => ".hex",
            Self::Uf2 => ".uf2",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::ALL
            .into_iter()
            .find(|f| f.extension()[1..].eq_ignore_ascii_case(ext))
    }

    /// `firmware.<ext>`
    pub fn source_file_name(self) -> String {
        format!("{}{}", FIRMWARE_BASE_NAME, self.extension())
    }

    /// `firmware-<env>.<ext>`
    pub fn destination_file_name(self, env_name: &str) -> String {
        format!("{}-{}{}", FIRMWARE_BASE_NAME, env_name, self.extension())
    }

    pub fn source_path(self, build_output_dir: &Path) -> PathBuf {
        build_output_dir.join(self.source_file_name())
    }
}
