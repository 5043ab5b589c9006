//! Figuring out which GitHub repository a git remote points at

use camino::Utf8Path;
use shipwright_schema::Repo;
use url::Url;

use crate::errors::{ShipError, ShipResult};
use crate::git;

const SSH_PREFIX: &str = "git@github.com:";

/// The GitHub repository of the `origin` remote of the repo at `root`
pub fn remote_repo(root: &Utf8Path) -> ShipResult<Repo> {
    let url = git::run(root, &["config", "--get", "remote.origin.url"])?;
    parse_github_remote(&url)
}

/// Parse a GitHub https or ssh remote url into owner/name
pub fn parse_github_remote(url: &str) -> ShipResult<Repo> {
    let url = url.trim();
    // Handle git+https just the same as https
    if url.starts_with("https") || url.starts_with("git+https") {
        parse_https(url)
    } else if url.starts_with("git@") {
        parse_ssh(url)
    } else {
        Err(ShipError::RepoParse {
            url: url.to_owned(),
        })
    }
}

fn parse_https(url: &str) -> ShipResult<Repo> {
    let parsed = Url::parse(url)?;
    if parsed.domain() != Some("github.com") {
        return Err(ShipError::NotGitHub {
            url: url.to_owned(),
        });
    }
    let segments = parsed
        .path_segments()
        .map(|c| c.collect::<Vec<_>>())
        .unwrap_or_default();
    repo_from_segments(&segments).ok_or_else(|| ShipError::RepoParse {
        url: url.to_owned(),
    })
}

fn parse_ssh(url: &str) -> ShipResult<Repo> {
    let Some(core) = url.strip_prefix(SSH_PREFIX) else {
        return Err(ShipError::NotGitHub {
            url: url.to_owned(),
        });
    };
    let segments = core.split('/').collect::<Vec<_>>();
    repo_from_segments(&segments).ok_or_else(|| ShipError::RepoParse {
        url: url.to_owned(),
    })
}

/// owner/name from path segments, trailing empty segments allowed
fn repo_from_segments(segments: &[&str]) -> Option<Repo> {
    let [owner, name, rest @ ..] = segments else {
        return None;
    };
    if owner.is_empty() || name.is_empty() || !rest.iter().all(|s| s.trim().is_empty()) {
        return None;
    }
    let name = name.strip_suffix(".git").unwrap_or(name);
    Some(Repo {
        owner: owner.to_string(),
        name: name.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_remote() {
        let repo = parse_github_remote("https://github.com/axodotdev/axolotlsay.git").unwrap();
        assert_eq!(repo.to_string(), "axodotdev/axolotlsay");
    }

    #[test]
    fn https_remote_without_suffix() {
        let repo = parse_github_remote("https://github.com/axodotdev/axolotlsay/").unwrap();
        assert_eq!(repo.owner, "axodotdev");
        assert_eq!(repo.name, "axolotlsay");
    }

    #[test]
    fn git_plus_https_remote() {
        let repo = parse_github_remote("git+https://github.com/axodotdev/axolotlsay.git").unwrap();
        assert_eq!(repo.to_string(), "axodotdev/axolotlsay");
    }

    #[test]
    fn ssh_remote() {
        let repo = parse_github_remote("git@github.com:axodotdev/axolotlsay.git\n").unwrap();
        assert_eq!(repo.to_string(), "axodotdev/axolotlsay");
    }

    #[test]
    fn not_github() {
        assert!(matches!(
            parse_github_remote("https://gitlab.com/axodotdev/axolotlsay.git"),
            Err(ShipError::NotGitHub { .. })
        ));
        assert!(matches!(
            parse_github_remote("git@gitlab.com:axodotdev/axolotlsay.git"),
            Err(ShipError::NotGitHub { .. })
        ));
    }

    #[test]
    fn unparseable() {
        assert!(matches!(
            parse_github_remote("https://github.com/axodotdev"),
            Err(ShipError::RepoParse { .. })
        ));
        assert!(matches!(
            parse_github_remote("https://github.com/axodotdev/axolotlsay/tree/main"),
            Err(ShipError::RepoParse { .. })
        ));
        assert!(matches!(
            parse_github_remote("/home/user/axolotlsay"),
            Err(ShipError::RepoParse { .. })
        ));
    }
}
