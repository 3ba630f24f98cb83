pub mod database;
pub mod scaffold;
pub mod server;

use minijinja::{AutoEscape, Environment};
use mockgen_core::error::GeneratorError;

/// TLS key and certificate read by the https server, created by the
/// Dockerfile or the Makefile.
pub const KEY_FILE: &str = "key.pem";
pub const CERT_FILE: &str = "cert.pem";

const TEMPLATES: &[(&str, &str)] = &[
    ("server.js.j2", include_str!("../../templates/server.js.j2")),
    ("package.json.j2", include_str!("../../templates/package.json.j2")),
    ("Dockerfile.j2", include_str!("../../templates/Dockerfile.j2")),
    ("compose.yaml.j2", include_str!("../../templates/compose.yaml.j2")),
    ("Makefile.j2", include_str!("../../templates/Makefile.j2")),
];

fn environment() -> Result<Environment<'static>, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_keep_trailing_newline(true);
    // Generated JS, JSON and YAML are not HTML.
    env.set_auto_escape_callback(|_| AutoEscape::None);
    for &(name, source) in TEMPLATES {
        env.add_template(name, source)
            .map_err(|err| render_error(name, err))?;
    }
    Ok(env)
}

/// Render one of the bundled templates.
pub(crate) fn render(name: &str, ctx: minijinja::Value) -> Result<String, GeneratorError> {
    let env = environment()?;
    env.get_template(name)
        .and_then(|template| template.render(ctx))
        .map_err(|err| render_error(name, err))
}

fn render_error(name: &str, err: minijinja::Error) -> GeneratorError {
    GeneratorError::Render {
        template: name.to_string(),
        message: err.to_string(),
    }
}

/// `server.js` -> `server`.
pub fn file_stem(file: &str) -> &str {
    file.rsplit_once('.').map_or(file, |(stem, _)| stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_templates_compile() {
        let env = environment().unwrap();
        for (name, _) in TEMPLATES {
            assert!(env.get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("server.js"), "server");
        assert_eq!(file_stem("mock.server.js"), "mock.server");
        assert_eq!(file_stem("server"), "server");
    }
}
