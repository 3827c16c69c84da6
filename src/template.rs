//! The page template every rendered page goes through.
//!
//! Templates are [Liquid](https://shopify.github.io/liquid/) files with three
//! variables:
//!
//! | Variable | Value |
//! |----------|-------|
//! | `{{ SiteName }}` | `site_name` from config |
//! | `{{ Body }}` | the page's rendered HTML |
//! | `{{ RelRoot }}` | relative path from the page's directory to the site root (`.`, `..`, `../..`) |
//!
//! Values are inserted as-is, without HTML escaping. `RelRoot` lets one
//! template link shared resources from pages at any depth:
//!
//! ```html
//! <link rel="stylesheet" href="{{ RelRoot }}/res/style.css">
//! ```

use liquid::Template;
use maud::{DOCTYPE, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Cannot read page template {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid page template {path}: {source}")]
    Parse {
        path: PathBuf,
        source: liquid::Error,
    },
    #[error("Rendering page template failed: {0}")]
    Render(liquid::Error),
}

/// Values substituted into the page template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext<'a> {
    pub site_name: &'a str,
    pub body: &'a str,
    pub rel_root: &'a str,
}

/// A parsed page template, loaded once per build.
pub struct PageTemplate {
    template: Template,
}

impl PageTemplate {
    /// Read and parse the template file.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let source = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source).map_err(|source| TemplateError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse template text directly.
    pub fn parse(source: &str) -> Result<Self, liquid::Error> {
        let parser = liquid::ParserBuilder::with_stdlib().build()?;
        let template = parser.parse(source)?;
        Ok(Self { template })
    }

    pub fn render(&self, context: &TemplateContext<'_>) -> Result<String, TemplateError> {
        let globals = liquid::object!({
            "SiteName": context.site_name,
            "Body": context.body,
            "RelRoot": context.rel_root,
        });
        self.template
            .render(&globals)
            .map_err(TemplateError::Render)
    }
}

/// Stock page template printed by `gen-template`.
pub fn stock_template() -> String {
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "{{ SiteName }}" }
                link rel="stylesheet" href="{{ RelRoot }}/res/style.css";
            }
            body {
                header.site-header {
                    img.avatar src="{{ RelRoot }}/images/avatar.jpg" alt="";
                    a href="{{ RelRoot }}/index.html" { "{{ SiteName }}" }
                    " · "
                    a href="{{ RelRoot }}/posts.html" { "Posts" }
                }
                main {
                    (PreEscaped("{{ Body }}"))
                }
            }
        }
    };
    markup.into_string()
}
