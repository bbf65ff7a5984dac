//! Tree transformation stages.
//!
//! Each stage is a pure function over the parsed event tree: it takes
//! ownership of the events and returns either the transformed tree or
//! an error that fails the whole render. Stages never produce output
//! themselves; the driver serializes whatever the last stage returns.

use latex2mathml::{DisplayStyle, latex_to_mathml};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};

use super::error::RenderError;
use crate::highlight::{Highlighter, escape_html};
use crate::toc::{self, Heading};

/// Services shared by the stages of one render.
pub(super) struct StageContext<'p> {
    pub highlighter: &'p Highlighter,
}

/// Data a stage contributes beyond the tree itself.
#[derive(Default)]
pub(super) struct Collected {
    pub headings: Vec<Heading>,
}

/// A pure `tree -> Result<tree>` transformation.
pub(super) type StageFn = for<'a> fn(
    Vec<Event<'a>>,
    &StageContext<'_>,
    &mut Collected,
) -> Result<Vec<Event<'a>>, RenderError>;

pub(super) struct Stage {
    pub name: &'static str,
    pub run: StageFn,
}

/// Escape raw HTML embedded in the source into literal text.
///
/// Must run before any stage that injects generated markup, since
/// those emit `Event::Html` themselves.
pub(super) fn escape_raw_html<'a>(
    events: Vec<Event<'a>>,
    _ctx: &StageContext<'_>,
    _out: &mut Collected,
) -> Result<Vec<Event<'a>>, RenderError> {
    Ok(events
        .into_iter()
        .map(|event| match event {
            Event::Html(html) => Event::Text(html),
            Event::InlineHtml(html) => Event::Text(html),
            event => event,
        })
        .collect())
}

/// Assign stable anchor ids to headings and record them for the TOC.
///
/// First pass collects each heading's level and text content; the id
/// assignment itself is the pure function in [`crate::toc`]. Second
/// pass attaches the ids to the heading start tags, leaving the
/// heading content untouched.
pub(super) fn anchor_headings<'a>(
    events: Vec<Event<'a>>,
    _ctx: &StageContext<'_>,
    out: &mut Collected,
) -> Result<Vec<Event<'a>>, RenderError> {
    let mut sequence: Vec<(u8, String)> = Vec::new();
    let mut current: Option<(u8, String)> = None;

    for event in &events {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((*level as u8, String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                let Some(heading) = current.take() else {
                    return Err(RenderError::stage(
                        "anchor-headings",
                        "heading end without start",
                    ));
                };
                sequence.push(heading);
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push(' ');
                }
            }
            _ => {}
        }
    }
    if current.is_some() {
        return Err(RenderError::stage("anchor-headings", "unterminated heading"));
    }

    let anchored = toc::assign_anchors(sequence);

    let mut next = 0;
    let events = events
        .into_iter()
        .map(|event| match event {
            Event::Start(Tag::Heading {
                level,
                classes,
                attrs,
                ..
            }) => {
                let id = anchored.get(next).map(|h| CowStr::from(h.id.clone()));
                next += 1;
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                })
            }
            event => event,
        })
        .collect();

    out.headings = anchored;
    Ok(events)
}

/// Replace fenced and indented code blocks with highlighted HTML.
pub(super) fn highlight_code<'a>(
    events: Vec<Event<'a>>,
    ctx: &StageContext<'_>,
    _out: &mut Collected,
) -> Result<Vec<Event<'a>>, RenderError> {
    let mut result = Vec::with_capacity(events.len());
    let mut block: Option<(String, String)> = None;

    for event in events {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split([' ', ',', '\t'])
                        .next()
                        .unwrap_or("")
                        .to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                block = Some((language, String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                let Some((language, code)) = block.take() else {
                    return Err(RenderError::stage(
                        "highlight-code",
                        "code block end without start",
                    ));
                };
                let html = ctx.highlighter.block(&language, &code);
                result.push(Event::Html(html.into()));
            }
            Event::Text(text) if block.is_some() => {
                if let Some((_, code)) = block.as_mut() {
                    code.push_str(&text);
                }
            }
            event => result.push(event),
        }
    }

    Ok(result)
}

/// Typeset math spans and blocks as MathML.
pub(super) fn typeset_math<'a>(
    events: Vec<Event<'a>>,
    _ctx: &StageContext<'_>,
    _out: &mut Collected,
) -> Result<Vec<Event<'a>>, RenderError> {
    Ok(events
        .into_iter()
        .map(|event| match event {
            Event::InlineMath(expr) => Event::Html(render_math(&expr, false).into()),
            Event::DisplayMath(expr) => Event::Html(render_math(&expr, true).into()),
            event => event,
        })
        .collect())
}

/// Malformed expressions degrade to escaped literal text instead of
/// failing the render.
fn render_math(expr: &str, display_block: bool) -> String {
    let style = if display_block {
        DisplayStyle::Block
    } else {
        DisplayStyle::Inline
    };
    match latex_to_mathml(expr, style) {
        Ok(mathml) => mathml,
        Err(_) if display_block => {
            format!("<div class=\"math math-display\">{}</div>", escape_html(expr))
        }
        Err(_) => {
            format!("<span class=\"math math-inline\">{}</span>", escape_html(expr))
        }
    }
}
