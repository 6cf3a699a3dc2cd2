//! Template cache.
//!
//! All page templates are compiled once at startup into an immutable
//! name -> template mapping, so no request ever pays disk or parse cost.
//! Each cache entry is a self-contained [`tera::Tera`] instance composed
//! from one page fragment plus every shared layout and partial fragment.
//!
//! Fragment discovery is by file name pattern within one directory:
//!
//! - `*.page.html` - one per logical page ("home.page.html" -> "home")
//! - `*.layout.html` - shared chrome, merged into every page
//! - `*.partial.html` - shared sub-components, merged into every page
//!
//! Any parse failure fails the build, so the process does not start with a
//! broken template. A lookup for a name the cache does not contain is an
//! internal error (a handler referencing a page that was never shipped),
//! never a user-facing 404.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::DateTime;
use serde::Serialize;
use tera::Tera;

use crate::error::AppError;
use crate::forms::Form;
use crate::store::Snippet;

/// Per-response payload bag handed to [`TemplateCache::render`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateData {
    /// Current year, for the footer. Computed at render time.
    pub current_year: i32,
    /// One-shot flash message consumed from the session, if any.
    pub flash: Option<String>,
    /// Form being (re)displayed, on the create paths only.
    pub form: Option<Form>,
    /// Single snippet, on the show page.
    pub snippet: Option<Snippet>,
    /// Snippet list, on the home page.
    pub snippets: Option<Vec<Snippet>>,
}

/// A fully-composed page template, ready for repeated execution.
struct PageTemplate {
    /// Registered name of the page fragment within `tera`.
    file: String,
    tera: Tera,
}

/// Immutable page-name -> compiled-template mapping, built once at startup.
/// Safe for unsynchronized concurrent reads.
pub struct TemplateCache {
    pages: HashMap<String, PageTemplate>,
}

impl TemplateCache {
    /// Compile every page template under `dir`.
    pub fn build(dir: &str) -> Result<Self, AppError> {
        let dir = Path::new(dir);
        let page_files = fragment_files(dir, ".page.html")?;
        let layout_files = fragment_files(dir, ".layout.html")?;
        let partial_files = fragment_files(dir, ".partial.html")?;

        if page_files.is_empty() {
            tracing::warn!(dir = %dir.display(), "no page templates found");
        }

        let mut pages = HashMap::new();
        for page_path in &page_files {
            let file = file_name(page_path);
            let name = file
                .strip_suffix(".page.html")
                .unwrap_or(&file)
                .to_string();

            let mut tera = Tera::default();
            tera.register_filter("human_date", human_date);

            let mut files: Vec<(PathBuf, Option<String>)> =
                vec![(page_path.clone(), Some(file.clone()))];
            for path in layout_files.iter().chain(partial_files.iter()) {
                files.push((path.clone(), Some(file_name(path))));
            }
            tera.add_template_files(files)?;

            pages.insert(name, PageTemplate { file, tera });
        }

        tracing::info!(
            dir = %dir.display(),
            pages = pages.len(),
            layouts = layout_files.len(),
            partials = partial_files.len(),
            "template cache built"
        );

        Ok(Self { pages })
    }

    /// Render the named page into an owned buffer.
    ///
    /// Only a fully successful render is returned, so a late template
    /// failure can never leak a half-written page into a response.
    pub fn render(&self, name: &str, data: &TemplateData) -> Result<String, AppError> {
        let page = self
            .pages
            .get(name)
            .ok_or_else(|| AppError::TemplateMissing(name.to_string()))?;

        let context = tera::Context::from_serialize(data).map_err(AppError::Template)?;
        let html = page.tera.render(&page.file, &context)?;
        Ok(html)
    }

    /// Names of all cached pages. Used by tests.
    pub fn page_names(&self) -> Vec<&str> {
        self.pages.keys().map(String::as_str).collect()
    }
}

/// List files in `dir` whose name ends with `suffix`, sorted by name.
fn fragment_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>, AppError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| anyhow::anyhow!("reading template dir {}: {e}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| anyhow::anyhow!("reading template dir entry: {e}"))?;
        let path = entry.path();
        if path.is_file() && file_name(&path).ends_with(suffix) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Tera filter formatting an RFC 3339 timestamp as "23 Aug 2026 at 12:04".
fn human_date(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let raw = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("human_date expects a timestamp string"))?;
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| tera::Error::msg(format!("human_date: {e}")))?;
    Ok(tera::Value::String(
        parsed.format("%d %b %Y at %H:%M").to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Utc};

    /// Build the cache from the real ui/html tree shipped with the crate.
    fn cache() -> TemplateCache {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/ui/html");
        TemplateCache::build(dir).unwrap()
    }

    fn sample_snippet() -> Snippet {
        Snippet {
            id: 1,
            title: "O snail".to_string(),
            content: "Climb Mount Fuji,\nBut slowly, slowly!".to_string(),
            created: "2026-08-23T12:00:00Z".parse().unwrap(),
            expires: "2026-08-30T12:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn cache_contains_all_pages() {
        let cache = cache();
        let mut names = cache.page_names();
        names.sort();
        assert_eq!(names, vec!["create", "home", "show"]);
    }

    #[test]
    fn unknown_page_name_is_an_internal_error() {
        let cache = cache();
        let err = cache.render("about", &TemplateData::default()).unwrap_err();
        assert!(matches!(err, AppError::TemplateMissing(name) if name == "about"));
    }

    #[test]
    fn render_is_idempotent() {
        let cache = cache();
        let data = TemplateData {
            current_year: 2026,
            snippets: Some(vec![sample_snippet()]),
            ..Default::default()
        };
        let first = cache.render("home", &data).unwrap();
        let second = cache.render("home", &data).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn show_page_includes_snippet_fields() {
        let cache = cache();
        let data = TemplateData {
            current_year: 2026,
            snippet: Some(sample_snippet()),
            ..Default::default()
        };
        let html = cache.render("show", &data).unwrap();
        assert!(html.contains("O snail"));
        assert!(html.contains("Climb Mount Fuji"));
        // human_date output, not the raw RFC 3339 form.
        assert!(html.contains("23 Aug 2026 at 12:00"));
        assert!(!html.contains("2026-08-23T12:00:00"));
    }

    #[test]
    fn create_page_redisplays_form_errors_and_input() {
        let cache = cache();
        let mut form = Form::new(vec![
            ("title".to_string(), String::new()),
            ("content".to_string(), "But slowly, slowly!".to_string()),
            ("expires".to_string(), "7".to_string()),
        ]);
        form.required(&["title", "content", "expires"]);

        let data = TemplateData {
            current_year: 2026,
            form: Some(form),
            ..Default::default()
        };
        let html = cache.render("create", &data).unwrap();
        assert!(html.contains("This field cannot be blank"));
        assert!(html.contains("But slowly, slowly!"));
    }

    #[test]
    fn base_layout_shows_flash_when_set() {
        let cache = cache();
        let data = TemplateData {
            current_year: 2026,
            flash: Some("Snippet successfully created!".to_string()),
            snippets: Some(vec![]),
            ..Default::default()
        };
        let html = cache.render("home", &data).unwrap();
        assert!(html.contains("Snippet successfully created!"));
    }

    #[test]
    fn human_date_formats_timestamps() {
        let value = tera::Value::String("2026-01-02T15:04:00Z".to_string());
        let out = human_date(&value, &HashMap::new()).unwrap();
        assert_eq!(out, tera::Value::String("02 Jan 2026 at 15:04".to_string()));
    }

    #[test]
    fn current_year_reaches_the_footer() {
        let cache = cache();
        let data = TemplateData {
            current_year: Utc::now().year(),
            snippets: Some(vec![]),
            ..Default::default()
        };
        let html = cache.render("home", &data).unwrap();
        assert!(html.contains(&Utc::now().year().to_string()));
    }
}
