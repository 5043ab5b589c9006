//! Writing the checksums file for every artifact

use axoasset::LocalAsset;
use camino::Utf8Path;
use sha2::Digest;
use tracing::info;

use crate::context::Context;
use crate::errors::{ShipError, ShipResult};
use crate::pipeline::Pipe;

/// A supported checksum algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    /// sha256
    Sha256,
    /// sha512
    Sha512,
}

impl ChecksumAlgorithm {
    /// Parse a configured algorithm name
    pub fn parse(algorithm: &str) -> ShipResult<Self> {
        match algorithm {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            _ => Err(ShipError::UnsupportedChecksum {
                algorithm: algorithm.to_owned(),
            }),
        }
    }

    /// Hex digest of some bytes
    pub fn digest(self, bytes: &[u8]) -> String {
        match self {
            Self::Sha256 => format!("{:x}", sha2::Sha256::digest(bytes)),
            Self::Sha512 => format!("{:x}", sha2::Sha512::digest(bytes)),
        }
    }
}

/// Hex digest of a file's contents
pub fn file_checksum(algorithm: ChecksumAlgorithm, path: &Utf8Path) -> ShipResult<String> {
    let bytes = LocalAsset::load_bytes(path)?;
    Ok(algorithm.digest(&bytes))
}

/// Creates the checksums file
#[derive(Debug, Clone, Copy, Default)]
pub struct ChecksumsPipe;

impl Pipe for ChecksumsPipe {
    fn name(&self) -> &'static str {
        "checksums"
    }

    fn description(&self) -> &'static str {
        "Calculating checksums"
    }

    fn run(&self, ctx: &mut Context) -> ShipResult<()> {
        let algorithm = ChecksumAlgorithm::parse(&ctx.config.checksum.algorithm)?;
        let name = ctx
            .templates
            .render_str(&ctx.config.checksum.name_template, &ctx.base_template_vars())?;

        let mut entries = vec![];
        for artifact in ctx.artifacts() {
            let sum = file_checksum(algorithm, &artifact)?;
            let file_name = artifact.file_name().unwrap_or(artifact.as_str()).to_owned();
            entries.push((file_name, sum));
        }

        let path = ctx.dist_dir().join(&name);
        info!("writing {name}");
        LocalAsset::write_new_all(&checksums_file(entries), &path)?;
        ctx.add_artifact(path);
        Ok(())
    }
}

/// The contents of a checksums file, one `<hex>  <name>` line per entry, sorted by name
pub fn checksums_file(mut entries: Vec<(String, String)>) -> String {
    entries.sort();
    entries
        .iter()
        .map(|(name, sum)| format!("{sum}  {name}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digests() {
        assert_eq!(
            ChecksumAlgorithm::Sha256.digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(ChecksumAlgorithm::Sha512.digest(b"").len(), 128);
    }

    #[test]
    fn unknown_algorithm() {
        assert!(matches!(
            ChecksumAlgorithm::parse("md5"),
            Err(ShipError::UnsupportedChecksum { .. })
        ));
    }

    #[test]
    fn file_layout() {
        let contents = checksums_file(vec![
            ("mybin_linux_amd64.tar.gz".to_owned(), "bbbb".to_owned()),
            ("mybin_darwin_amd64.tar.gz".to_owned(), "aaaa".to_owned()),
        ]);
        insta::assert_snapshot!(contents, @r###"
        aaaa  mybin_darwin_amd64.tar.gz
        bbbb  mybin_linux_amd64.tar.gz
        "###);
    }

    #[test]
    fn checksum_of_file() {
        let tmp = temp_dir::TempDir::new().unwrap();
        let path = Utf8Path::from_path(tmp.path()).unwrap().join("empty");
        LocalAsset::write_new("", &path).unwrap();
        assert_eq!(
            file_checksum(ChecksumAlgorithm::Sha256, &path).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
