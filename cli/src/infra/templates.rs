//! Embedded config templates — the files `pushdeploy init` generates.
//!
//! At compile time, `include_dir!` embeds everything under `assets/templates/`:
//!   - `nginx.site`       — reverse proxy site uploaded by `configure_nginx`
//!   - `supervisor.conf`  — program definition uploaded by `configure_supervisor`
//!   - `post-receive`     — hook installed by `configure_git`
//!   - `pushdeploy.yaml`  — sample deployment config

use std::path::Path;

use anyhow::{Context, Result};
use include_dir::{Dir, include_dir};

use crate::domain::DeployConfig;
use crate::domain::template::{ConfigFile, GeneratedFile, TemplateParams, render, template_vars};

static TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets/templates");

/// Return the text of a single embedded template.
///
/// # Errors
///
/// Returns an error if no template with the given `name` exists or it is not
/// UTF-8.
pub fn get_template(name: &str) -> Result<&'static str> {
    TEMPLATES
        .get_file(name)
        .and_then(|f| f.contents_utf8())
        .ok_or_else(|| anyhow::anyhow!("embedded template not found: {name}"))
}

/// Render every template for `cfg` and write the ones that do not exist yet.
///
/// Paths are resolved against `root`. Existing files are never overwritten.
///
/// # Errors
///
/// Returns an error if a directory or file cannot be written.
pub fn write_missing(
    cfg: &DeployConfig,
    params: &TemplateParams<'_>,
    root: &Path,
    files: &[ConfigFile],
) -> Result<Vec<GeneratedFile>> {
    let vars = template_vars(cfg, params);
    let mut written = Vec::with_capacity(files.len());
    for &file in files {
        let target = file.target(cfg);
        let path = root.join(&target);
        if path.exists() {
            tracing::debug!(path = %path.display(), "exists, leaving untouched");
            written.push(GeneratedFile {
                path: target,
                created: false,
            });
            continue;
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = render(get_template(file.template_name())?, &vars);
        std::fs::write(&path, content)
            .with_context(|| format!("cannot write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if file.executable() {
                std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                    .with_context(|| format!("cannot set permissions on {}", path.display()))?;
            }
        }
        written.push(GeneratedFile {
            path: target,
            created: true,
        });
    }
    Ok(written)
}
