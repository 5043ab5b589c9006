//! Pushing a Homebrew formula to a tap repository

use camino::Utf8Path;
use serde::Serialize;
use tracing::{info, warn};

use crate::archiveformat::{format_for, ArchiveFormat, FORMAT_BINARY};
use crate::client::{Client, FileUpdate, GithubClient};
use crate::context::Context;
use crate::errors::{ShipError, ShipResult};
use crate::pipeline::Pipe;
use crate::pipes::checksums::{file_checksum, ChecksumAlgorithm};
use crate::platform::{BuildTarget, ARCH_AMD64, OS_DARWIN};
use crate::templates::TEMPLATE_BREW_FORMULA;

/// Pushes a formula to a brew tap
#[derive(Debug, Clone, Copy, Default)]
pub struct BrewPipe;

impl Pipe for BrewPipe {
    fn name(&self) -> &'static str {
        "brew"
    }

    fn description(&self) -> &'static str {
        "Creating homebrew formula"
    }

    fn run(&self, ctx: &mut Context) -> ShipResult<()> {
        if !should_push(ctx) {
            return Ok(());
        }
        let client = GithubClient::new(ctx.token.clone().unwrap_or_default())?;
        push_formula(ctx, &client)
    }
}

/// Whether there's a formula to push, logging why not
pub fn should_push(ctx: &Context) -> bool {
    if !ctx.publish() {
        warn!("skipped because publishing is disabled");
        return false;
    }
    if ctx.config.brew.github.is_empty() {
        warn!("skipped because brew section is not configured");
        return false;
    }
    if ctx.config.release.draft {
        warn!("skipped because release is marked as draft");
        return false;
    }
    if ctx.config.archive.format == FORMAT_BINARY {
        warn!("skipped because archive format is binary");
        return false;
    }
    true
}

/// Render the formula and push it to the tap
pub fn push_formula(ctx: &Context, client: &dyn Client) -> ShipResult<()> {
    let formula = render_formula(ctx)?;
    let brew = &ctx.config.brew;
    let path = Utf8Path::new(&brew.folder).join(format!("{}.rb", ctx.config.project_name));
    info!("pushing {path} to {}", brew.github);
    let message = format!(
        "Brew formula update for {} version {}",
        ctx.config.project_name, ctx.git.current_tag
    );
    client.create_file(
        &brew.github,
        &FileUpdate {
            path: path.as_str(),
            content: &formula,
            message: &message,
            author: &brew.commit_author,
        },
    )
}

/// Values the formula template is rendered with
#[derive(Debug, Clone, Serialize)]
pub struct FormulaInfo {
    /// Formula class name
    pub name: String,
    /// A brief description of the project
    pub desc: String,
    /// The project homepage
    pub homepage: String,
    /// Release repository, owner/name
    pub repo: String,
    /// Tag the release is for
    pub tag: String,
    /// Version being released
    pub version: String,
    /// Name of the darwin/amd64 archive
    pub file: String,
    /// sha256 of the darwin/amd64 archive
    pub sha256: String,
    /// Formulae this one depends on
    pub dependencies: Vec<String>,
    /// Formulae this one conflicts with
    pub conflicts: Vec<String>,
    /// Post-install caveats
    pub caveats: String,
    /// launchd plist
    pub plist: String,
    /// Lines of the install block
    pub install: Vec<String>,
    /// Lines of the test block
    pub test: Vec<String>,
}

/// Gather everything the formula needs from the darwin/amd64 build
pub fn formula_info(ctx: &Context) -> ShipResult<FormulaInfo> {
    let target = BuildTarget::new(OS_DARWIN, ARCH_AMD64, "");
    let folder = ctx
        .binaries_for(&target)
        .and_then(|group| group.into_keys().next())
        .ok_or(ShipError::NoDarwinAmd64Build)?;
    let format = ArchiveFormat::parse(format_for(&ctx.config.archive, &target))?;
    let file = format!("{folder}{}", format.ext());
    let sha256 = file_checksum(ChecksumAlgorithm::Sha256, &ctx.dist_dir().join(&file))?;

    let brew = &ctx.config.brew;
    Ok(FormulaInfo {
        name: to_class_case(&ctx.config.project_name),
        desc: brew.description.clone(),
        homepage: brew.homepage.clone(),
        repo: ctx.config.release.github.to_string(),
        tag: ctx.git.current_tag.clone(),
        version: ctx.version.clone(),
        file,
        sha256,
        dependencies: brew.dependencies.clone(),
        conflicts: brew.conflicts.clone(),
        caveats: brew.caveats.clone(),
        plist: brew.plist.clone(),
        install: split_lines(&brew.install),
        test: split_lines(&brew.test),
    })
}

/// The formula's ruby source
pub fn render_formula(ctx: &Context) -> ShipResult<String> {
    let info = formula_info(ctx)?;
    ctx.templates
        .render_file_to_clean_string(TEMPLATE_BREW_FORMULA, &info)
}

fn split_lines(s: &str) -> Vec<String> {
    s.trim()
        .lines()
        .map(|line| line.trim().to_owned())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Converts the provided project name into a Ruby class-compatible
/// string suitable for use as the class in a Homebrew formula.
// Homebrew implementation is Formulary.class_s:
// https://github.com/Homebrew/brew/blob/8c7cd3c0fd46f7808e782e40359c19271f950a75/Library/Homebrew/formulary.rb#L447-L453
pub fn to_class_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    let mut at_replaced = false;
    let mut first = true;
    while let Some(c) = chars.next() {
        if first {
            out.push(c.to_ascii_uppercase());
            first = false;
            continue;
        }
        match c {
            // invalid in class names: dropped, and the next alphanumeric is uppercased
            '-' | '_' | '.' => match chars.peek() {
                Some(next) if next.is_ascii_alphanumeric() => {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                }
                _ => out.push(c),
            },
            // openssl@3 => OpensslAT3, only once
            '@' => match chars.peek() {
                Some(next) if next.is_ascii_digit() && !at_replaced => {
                    out.push_str("AT");
                    out.push(*next);
                    chars.next();
                    at_replaced = true;
                }
                _ => out.push(c),
            },
            // c++ => Cxx
            '+' => out.push('x'),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::to_class_case;

    #[test]
    fn class_case_basic() {
        assert_eq!(to_class_case("ccd2cue"), "Ccd2cue");
    }

    #[test]
    fn handles_dashes_and_underscores() {
        assert_eq!(to_class_case("akaikatana-repack"), "AkaikatanaRepack");
        assert_eq!(to_class_case("c-lang"), "CLang");
        assert_eq!(to_class_case("abc_def"), "AbcDef");
    }

    #[test]
    fn handles_dots() {
        assert_eq!(to_class_case("last.fm"), "LastFm");
    }

    #[test]
    fn handles_plus_and_at() {
        assert_eq!(to_class_case("c++"), "Cxx");
        assert_eq!(to_class_case("openssl@3"), "OpensslAT3");
        assert_eq!(to_class_case("foo@1@2"), "FooAT1@2");
    }

    #[test]
    fn handles_empty() {
        assert_eq!(to_class_case(""), "");
    }
}
