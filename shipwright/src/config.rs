//! Loading and writing `shipwright.toml`

use axoasset::{LocalAsset, SourceFile};
use camino::{Utf8Path, Utf8PathBuf};
use shipwright_schema::Project;
use tracing::{info, warn};

use crate::errors::{ShipError, ShipResult};

/// Where the config lives when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "shipwright.toml";

/// Parse a config file
pub fn load(path: &Utf8Path) -> ShipResult<Project> {
    let src = SourceFile::load_local(path)?;
    parse(&src)
}

/// Parse an already loaded config file
pub fn parse(src: &SourceFile) -> ShipResult<Project> {
    Ok(src.deserialize_toml()?)
}

/// Load the config for a run
///
/// A missing file is only fatal if the path was given explicitly, otherwise we
/// warn and carry on with an empty config for the defaults stage to fill in.
pub fn load_or_default(root: &Utf8Path, explicit: Option<&Utf8Path>) -> ShipResult<Project> {
    let path = config_path(root, explicit);
    if path.exists() {
        info!("loading config from {path}");
        return load(&path);
    }
    if explicit.is_some() {
        return Err(ShipError::ConfigNotFound { path });
    }
    warn!("could not load {path}, using defaults");
    Ok(Project::default())
}

/// The config path to use, relative paths are relative to `root`
pub fn config_path(root: &Utf8Path, explicit: Option<&Utf8Path>) -> Utf8PathBuf {
    root.join(explicit.unwrap_or(Utf8Path::new(DEFAULT_CONFIG_PATH)))
}

/// Write a config to a new file, refusing to clobber an existing one
pub fn write_new(config: &Project, path: &Utf8Path) -> ShipResult<()> {
    if path.exists() {
        return Err(ShipError::ConfigExists {
            path: path.to_owned(),
        });
    }
    let text = axoasset::toml::to_string_pretty(config)?;
    LocalAsset::write_new(&text, path)?;
    Ok(())
}
