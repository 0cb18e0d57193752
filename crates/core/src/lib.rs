// FwCollect - Firmware Artifact Collector
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod artifact;
pub mod collect;
pub mod hooks;

pub use artifact::ArtifactFormat;
pub use collect::{collect_firmware, CollectReport, CopiedArtifact};
pub use fwcollect_config::{BuildContext, HookStrategy};
pub use hooks::HookRegistry;

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("Failed to create destination directory {path:?}")]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to copy {from:?} to {to:?}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read back {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type CollectResult<T> = Result<T, CollectError>;
