//! Construction-time configuration.
//!
//! All rendering behavior is driven by a single [`SiteConfig`] value
//! passed to the pipeline and site constructors. There is no ambient
//! or global configuration.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::frontmatter::{FIELD_DATE, FIELD_DESCRIPTION, FIELD_TITLE};

/// Static configuration for a content site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Root directory of the content store.
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Front-matter fields a document must carry to be considered
    /// valid. `title` and `date` are enforced regardless of this set;
    /// listing order and display depend on them.
    #[serde(default = "default_required_fields")]
    pub required_fields: BTreeSet<String>,

    /// Highlight theme identifier (e.g. "github-dark").
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Parse `$...$` / `$$...$$` spans and typeset them as MathML.
    #[serde(default)]
    pub math_enabled: bool,

    /// Preserve raw HTML embedded in the source. When false, embedded
    /// HTML is escaped into literal text.
    #[serde(default = "default_raw_html_allowed")]
    pub raw_html_allowed: bool,
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("posts")
}

fn default_required_fields() -> BTreeSet<String> {
    [FIELD_TITLE, FIELD_DATE, FIELD_DESCRIPTION]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_theme() -> String {
    "github-dark".to_string()
}

fn default_raw_html_allowed() -> bool {
    true
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            required_fields: default_required_fields(),
            theme: default_theme(),
            math_enabled: false,
            raw_html_allowed: default_raw_html_allowed(),
        }
    }
}
