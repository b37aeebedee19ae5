//! File name and content rewriting for template archives
//!
//! Only files ending in `.tpl` are rendered; everything else is passed
//! through untouched so binary assets survive. Placeholders use the
//! mustache-compatible `{{Name}}` syntax and are never HTML-escaped.

use handlebars::Handlebars;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::{ScaffoldError, ScaffoldResult};

/// Extension marking a file as a template
pub const TEMPLATE_FILE_EXT: &str = ".tpl";

/// Rewrites an entry name; receives the raw entry name and its bytes
pub type NameReplaceFn = Arc<dyn Fn(&str, &[u8]) -> ScaffoldResult<String> + Send + Sync>;

/// Rewrites entry content; receives the raw entry name and its bytes
pub type DataReplaceFn = Arc<dyn Fn(&str, &[u8]) -> ScaffoldResult<Vec<u8>> + Send + Sync>;

/// Template variables, e.g. `ProjectName`
pub type TemplateVars = BTreeMap<String, String>;

/// Renders template text with a fixed set of variables
pub struct TemplateRenderer {
    registry: Handlebars<'static>,
    vars: Value,
}

impl TemplateRenderer {
    /// Create a renderer for the given variables
    #[must_use]
    pub fn new(vars: &TemplateVars) -> Self {
        let mut registry = Handlebars::new();
        // Generating source files, not HTML
        registry.register_escape_fn(handlebars::no_escape);

        let vars = Value::Object(
            vars.iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        );

        Self { registry, vars }
    }

    /// Render a template string
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Render`] if the text is not a valid template.
    pub fn render(&self, name: &str, text: &str) -> ScaffoldResult<String> {
        self.registry
            .render_template(text, &self.vars)
            .map_err(|e| ScaffoldError::Render {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    /// Render file data if `file_name` is a template, else return it unchanged
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Render`] if a template is not valid UTF-8 or
    /// fails to render.
    pub fn render_file_data(&self, file_name: &str, data: &[u8]) -> ScaffoldResult<Vec<u8>> {
        if !is_template_file(file_name) {
            return Ok(data.to_vec());
        }
        let text = std::str::from_utf8(data).map_err(|e| ScaffoldError::Render {
            name: file_name.to_string(),
            reason: e.to_string(),
        })?;
        self.render(file_name, text).map(String::into_bytes)
    }

    /// Render a file name, then strip the first `.tpl`
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Render`] if the name fails to render.
    pub fn render_file_name(&self, file_name: &str) -> ScaffoldResult<String> {
        self.render(file_name, file_name)
            .map(|rendered| rendered.replacen(TEMPLATE_FILE_EXT, "", 1))
    }
}

/// Whether a file name carries the template extension
#[must_use]
pub fn is_template_file(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext == &TEMPLATE_FILE_EXT[1..])
}

/// Content rewrite rendering `.tpl` files with `vars`
#[must_use]
pub fn file_data_replace_fn(vars: &TemplateVars) -> DataReplaceFn {
    let renderer = TemplateRenderer::new(vars);
    Arc::new(move |name: &str, data: &[u8]| renderer.render_file_data(name, data))
}

/// Name rewrite rendering placeholders with `vars` and stripping `.tpl`
#[must_use]
pub fn file_name_replace_fn(vars: &TemplateVars) -> NameReplaceFn {
    let renderer = TemplateRenderer::new(vars);
    Arc::new(move |name: &str, _data: &[u8]| renderer.render_file_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> TemplateVars {
        TemplateVars::from([
            ("ProjectName".to_string(), "My App".to_string()),
            ("SafeProjectName".to_string(), "MyApp".to_string()),
        ])
    }

    #[test]
    fn test_is_template_file() {
        assert!(is_template_file("src/index.ts.tpl"));
        assert!(is_template_file(".env.tpl"));
        assert!(!is_template_file("src/index.ts"));
        assert!(!is_template_file("tpl"));
    }

    #[test]
    fn test_renders_template_content_without_escaping() {
        let renderer = TemplateRenderer::new(&vars());
        let out = renderer
            .render_file_data("package.json.tpl", br#"{"name": "{{SafeProjectName}}", "title": "<{{ProjectName}}>"}"#)
            .unwrap();
        assert_eq!(out, br#"{"name": "MyApp", "title": "<My App>"}"#);
    }

    #[test]
    fn test_binary_files_pass_through() {
        let renderer = TemplateRenderer::new(&vars());
        let png = [0x89, b'P', b'N', b'G', 0xff, 0x00, b'{', b'{'];
        assert_eq!(renderer.render_file_data("icon.png", &png).unwrap(), png.to_vec());
    }

    #[test]
    fn test_missing_variable_renders_empty() {
        let renderer = TemplateRenderer::new(&vars());
        let out = renderer.render_file_data("a.txt.tpl", b"[{{Unknown}}]").unwrap();
        assert_eq!(out, b"[]");
    }

    #[test]
    fn test_name_rewrite_strips_tpl_once() {
        let name_fn = file_name_replace_fn(&vars());
        assert_eq!(name_fn("{{SafeProjectName}}.csproj.tpl", b"".as_slice()).unwrap(), "MyApp.csproj");
        assert_eq!(name_fn("src/a.tpl.b.tpl", b"".as_slice()).unwrap(), "src/a.b.tpl");
    }

    #[test]
    fn test_invalid_template_is_render_error() {
        let data_fn = file_data_replace_fn(&vars());
        let err = data_fn("broken.txt.tpl", b"{{#if}}".as_slice()).unwrap_err();
        assert!(matches!(err, ScaffoldError::Render { name, .. } if name == "broken.txt.tpl"));
    }
}
