//! The document transformation pipeline.
//!
//! Rendering runs a fixed, ordered chain over the parsed event tree:
//!
//! 1. Parse markdown into the event tree
//! 2. Raw-HTML policy (escape embedded HTML unless allowed)
//! 3. Heading anchors (stable ids, collected for the TOC)
//! 4. Code block highlighting
//! 5. Math typesetting (only when enabled)
//! 6. Serialize to HTML
//!
//! Stages are pure `tree -> Result<tree>` functions composed by a
//! single driver that short-circuits on the first failure; a failed
//! stage abandons the whole render for that document and callers map
//! the error to "not found". There is no transformer registry and no
//! shared mutable tree.

mod error;
mod stages;

pub use error::{ParseError, RenderError};

use pulldown_cmark::{Event, Options, Parser, html};
use serde::Serialize;

use crate::config::SiteConfig;
use crate::frontmatter::{self, FrontMatter, SchemaError};
use crate::highlight::Highlighter;
use crate::toc::{self, Heading, TocNode};

use stages::{Collected, Stage, StageContext};

/// Everything produced by one full render of a document body.
#[derive(Debug, Clone, Serialize)]
pub struct RenderOutput {
    pub html: String,
    pub headings: Vec<Heading>,
    pub toc: Vec<TocNode>,
}

/// The configured transformation pipeline.
///
/// Construction fixes the stage list and parser options; rendering is
/// stateless after that, so one pipeline can serve any number of
/// concurrent renders.
pub struct Pipeline {
    options: Options,
    stages: Vec<Stage>,
    highlighter: Highlighter,
    required_fields: std::collections::BTreeSet<String>,
}

impl Pipeline {
    pub fn new(config: &SiteConfig) -> Self {
        let mut options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        if config.math_enabled {
            options.insert(Options::ENABLE_MATH);
        }

        let mut stage_list: Vec<Stage> = Vec::new();
        if !config.raw_html_allowed {
            stage_list.push(Stage {
                name: "escape-raw-html",
                run: stages::escape_raw_html,
            });
        }
        stage_list.push(Stage {
            name: "anchor-headings",
            run: stages::anchor_headings,
        });
        stage_list.push(Stage {
            name: "highlight-code",
            run: stages::highlight_code,
        });
        if config.math_enabled {
            stage_list.push(Stage {
                name: "typeset-math",
                run: stages::typeset_math,
            });
        }

        Self {
            options,
            stages: stage_list,
            highlighter: Highlighter::new(&config.theme),
            required_fields: config.required_fields.clone(),
        }
    }

    /// Render a document body to HTML with heading anchors and a TOC.
    ///
    /// Deterministic: identical input yields byte-identical HTML and
    /// identical id assignments.
    pub fn render(&self, raw_body: &str) -> Result<RenderOutput, RenderError> {
        let mut tree: Vec<Event<'_>> = Parser::new_ext(raw_body, self.options).collect();

        let ctx = StageContext {
            highlighter: &self.highlighter,
        };
        let mut collected = Collected::default();
        for stage in &self.stages {
            tree = (stage.run)(tree, &ctx, &mut collected)?;
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, tree.into_iter());

        let toc = toc::build_toc(&collected.headings);
        Ok(RenderOutput {
            html: html_output,
            headings: collected.headings,
            toc,
        })
    }

    /// Validate and extract front matter without rendering the body.
    ///
    /// The corpus listing calls this once per document; it must stay
    /// cheap, so it never touches the markdown parser.
    pub fn extract_metadata_only(&self, raw_document: &str) -> Result<FrontMatter, SchemaError> {
        frontmatter::parse(raw_document, &self.required_fields).map(|doc| doc.front_matter)
    }

    /// The names of the configured stages, in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name).collect()
    }
}

/// Decode raw stored bytes into source text.
pub fn decode(bytes: &[u8]) -> Result<&str, ParseError> {
    Ok(std::str::from_utf8(bytes)?)
}
