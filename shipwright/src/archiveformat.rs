//! Picking the archive format for a target

use shipwright_schema::Archive;

use crate::errors::{ShipError, ShipResult};
use crate::platform::BuildTarget;

/// Archive format that ships the raw binary instead of an archive
pub const FORMAT_BINARY: &str = "binary";

/// The archive format to use for the target
///
/// The first override whose os matches wins, otherwise the configured default.
pub fn format_for<'a>(archive: &'a Archive, target: &BuildTarget) -> &'a str {
    archive
        .format_overrides
        .iter()
        .find(|o| o.os == target.os)
        .map(|o| o.format.as_str())
        .unwrap_or(&archive.format)
}

/// A parsed archive format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// `.tar.gz`
    TarGz,
    /// `.tar.xz`
    TarXz,
    /// `.tar.zst`
    TarZstd,
    /// `.zip`
    Zip,
    /// no archive, just the binary
    Binary,
}

impl ArchiveFormat {
    /// Parse a configured format string
    pub fn parse(format: &str) -> ShipResult<Self> {
        let format = match format {
            "tar.gz" | "tgz" => Self::TarGz,
            "tar.xz" | "txz" => Self::TarXz,
            "tar.zst" | "tar.zstd" => Self::TarZstd,
            "zip" => Self::Zip,
            FORMAT_BINARY => Self::Binary,
            _ => {
                return Err(ShipError::UnsupportedArchiveFormat {
                    format: format.to_owned(),
                })
            }
        };
        Ok(format)
    }

    /// Extension of the produced file, with the leading dot
    ///
    /// Binaries use the target's executable extension instead.
    pub fn ext(self) -> &'static str {
        match self {
            Self::TarGz => ".tar.gz",
            Self::TarXz => ".tar.xz",
            Self::TarZstd => ".tar.zst",
            Self::Zip => ".zip",
            Self::Binary => "",
        }
    }
}
