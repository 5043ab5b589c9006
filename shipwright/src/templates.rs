//! Logic for resolving/rendering templates
//!
//! Two kinds of templates get rendered: the ones baked into the binary
//! (see `templates/` next to this crate's Cargo.toml) and the little
//! name templates users put in their config.

use camino::Utf8Path;
use include_dir::{include_dir, Dir};
use minijinja::Environment;
use newline_converter::dos2unix;
use serde::Serialize;

use crate::errors::ShipResult;

const TEMPLATE_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");
/// Key used for looking up templates (relative path from the templates dir)
pub type TemplateId = &'static str;
/// Template key for the Homebrew formula
pub const TEMPLATE_BREW_FORMULA: TemplateId = "brew/formula.rb.j2";

/// Main templates struct that gets passed around in the application.
#[derive(Debug)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Load + Parse templates from the binary
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_debug(true);
        env.set_keep_trailing_newline(true);
        // These are baked into the binary, so if this fails it fails every time,
        // and only for someone editing the templates locally.
        load_dir(&mut env, &TEMPLATE_DIR).expect("failed to load jinja2 templates from binary");
        Self { env }
    }

    /// Render a baked-in template to a string, cleaning all newlines to be unix-y
    pub fn render_file_to_clean_string(
        &self,
        key: TemplateId,
        val: &impl Serialize,
    ) -> ShipResult<String> {
        let template = self.env.get_template(key)?;
        let rendered = template.render(val)?;
        Ok(dos2unix(&rendered).into_owned())
    }

    /// Render a template that came from the config
    pub fn render_str(&self, source: &str, val: &impl Serialize) -> ShipResult<String> {
        Ok(self.env.render_str(source, val)?)
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

fn load_dir(env: &mut Environment<'static>, dir: &Dir<'_>) -> ShipResult<()> {
    for file in dir.files() {
        let Some(path) = Utf8Path::from_path(file.path()) else {
            continue;
        };
        let Some(contents) = file.contents_utf8() else {
            continue;
        };
        env.add_template_owned(path.as_str().replace('\\', "/"), contents.to_owned())?;
    }
    for subdir in dir.dirs() {
        load_dir(env, subdir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use minijinja::context;

    use super::*;

    #[test]
    fn user_templates_render() {
        let templates = Templates::new();
        let name = templates
            .render_str(
                "{{ binary }}_{{ os }}_{{ arch }}{% if arm %}v{{ arm }}{% endif %}",
                &context! { binary => "mybin", os => "linux", arch => "arm", arm => "6" },
            )
            .unwrap();
        assert_eq!(name, "mybin_linux_armv6");
    }

    #[test]
    fn missing_vars_render_empty() {
        let templates = Templates::new();
        let name = templates
            .render_str(
                "{{ binary }}_{{ os }}{% if arm %}v{{ arm }}{% endif %}",
                &context! { binary => "mybin", os => "linux" },
            )
            .unwrap();
        assert_eq!(name, "mybin_linux");
    }

    #[test]
    fn bad_template_is_an_error() {
        let templates = Templates::new();
        assert!(templates
            .render_str("{{ binary", &context! { binary => "mybin" })
            .is_err());
    }
}
