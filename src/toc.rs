//! Heading anchors and table-of-contents construction.
//!
//! Pure functions over an ordered heading sequence: no I/O, no shared
//! state, and identical output for identical input — re-running a
//! render can never shift an anchor.

use std::collections::HashSet;

use serde::Serialize;

/// Sentinel id for headings whose text slugifies to nothing.
const EMPTY_SLUG: &str = "section";

/// A heading extracted during rendering, with its assigned anchor id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub id: String,
    pub level: u8,
    pub text: String,
}

/// One node of the table of contents. Mirrors the heading structure;
/// the headings themselves are untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocNode {
    pub id: String,
    pub text: String,
    pub children: Vec<TocNode>,
}

/// Slugify heading text: lower-case, collapse each maximal run of
/// non-alphanumeric characters into a single hyphen, trim hyphens.
/// Text with no alphanumeric content maps to the `section` sentinel.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}

/// Assign a collision-free id to every heading in `sequence`.
///
/// The first heading with a given slug keeps it bare; later collisions
/// get `-1`, `-2`, ... suffixes, counted per base slug. Ids are a pure
/// function of the (level, text) sequence.
pub fn assign_anchors(sequence: Vec<(u8, String)>) -> Vec<Heading> {
    let mut used: HashSet<String> = HashSet::new();
    sequence
        .into_iter()
        .map(|(level, text)| {
            let base = slugify(&text);
            let mut id = base.clone();
            let mut suffix = 1;
            while !used.insert(id.clone()) {
                id = format!("{base}-{suffix}");
                suffix += 1;
            }
            Heading { id, level, text }
        })
        .collect()
}

/// Build a nested table of contents from headings in document order.
///
/// Each heading nests under the nearest preceding heading with a
/// smaller level; a heading at or above its predecessor's level closes
/// that subtree.
pub fn build_toc(headings: &[Heading]) -> Vec<TocNode> {
    let mut pos = 0;
    nest(headings, &mut pos, 0)
}

/// Collect the run of siblings deeper than `parent_level`.
fn nest(headings: &[Heading], pos: &mut usize, parent_level: u8) -> Vec<TocNode> {
    let mut nodes = Vec::new();
    while let Some(heading) = headings.get(*pos) {
        if heading.level <= parent_level {
            break;
        }
        *pos += 1;
        let children = nest(headings, pos, heading.level);
        nodes.push(TocNode {
            id: heading.id.clone(),
            text: heading.text.clone(),
            children,
        });
    }
    nodes
}
