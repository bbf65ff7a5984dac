//! Front-matter parsing and schema validation.
//!
//! Front matter is a YAML block delimited by `---` at the start of a
//! document:
//!
//! ```markdown
//! ---
//! title: My Post
//! date: 2024-06-01
//! description: A description
//! ---
//!
//! Body starts here.
//! ```
//!
//! Validation is all-or-nothing: a document either yields a complete
//! [`FrontMatter`] or a [`SchemaError`]. There is no partially
//! populated form, so a schema failure can never leak half-validated
//! metadata downstream.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const FIELD_TITLE: &str = "title";
pub const FIELD_DATE: &str = "date";
pub const FIELD_DESCRIPTION: &str = "description";

/// Front-matter dates are plain calendar dates.
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    #[error("missing front matter block")]
    MissingBlock,

    #[error("unterminated front matter block")]
    Unterminated,

    #[error("malformed front matter: {0}")]
    Malformed(#[from] serde_yaml::Error),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("field '{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("invalid date {value:?}: {source}")]
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },
}

/// Validated document metadata.
///
/// Only produced by [`parse`]; `title` is non-empty and `date` is a
/// real calendar date by construction.
#[derive(Debug, Clone, Serialize)]
pub struct FrontMatter {
    pub title: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    /// Author-supplied fields outside the fixed schema, preserved for
    /// the presentation layer.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Deserialization target before validation. Every field is optional
/// here; [`validate`] decides what is missing.
#[derive(Debug, Deserialize)]
struct RawFrontMatter {
    title: Option<String>,
    date: Option<String>,
    description: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_yaml::Value>,
}

/// A document split into validated metadata and its unparsed body.
#[derive(Debug)]
pub struct ParsedDocument<'a> {
    pub front_matter: FrontMatter,
    pub body: &'a str,
}

/// Split the front matter block from `raw` and validate it against the
/// required-field set.
pub fn parse<'a>(
    raw: &'a str,
    required: &BTreeSet<String>,
) -> Result<ParsedDocument<'a>, SchemaError> {
    let (block, body) = split_block(raw)?;
    let front_matter = validate(block, required)?;
    Ok(ParsedDocument { front_matter, body })
}

/// Split `raw` into the YAML block and the remaining body.
fn split_block(raw: &str) -> Result<(&str, &str), SchemaError> {
    let trimmed = raw.trim_start();
    let Some(after_open) = trimmed.strip_prefix("---") else {
        return Err(SchemaError::MissingBlock);
    };

    let Some(close) = after_open.find("\n---") else {
        return Err(SchemaError::Unterminated);
    };

    let block = after_open[..close].trim_start_matches('\n');
    // Skip past "\n---" and the delimiter's own line ending.
    let body = after_open[close + 4..]
        .strip_prefix('\n')
        .unwrap_or(&after_open[close + 4..]);

    Ok((block, body))
}

/// Type-check the YAML block into a [`FrontMatter`].
fn validate(block: &str, required: &BTreeSet<String>) -> Result<FrontMatter, SchemaError> {
    let raw: RawFrontMatter = serde_yaml::from_str(block)?;

    let title = raw.title.ok_or(SchemaError::MissingField(FIELD_TITLE))?;
    if title.trim().is_empty() {
        return Err(SchemaError::EmptyField(FIELD_TITLE));
    }

    let value = raw.date.ok_or(SchemaError::MissingField(FIELD_DATE))?;
    let date = NaiveDate::parse_from_str(&value, DATE_FORMAT)
        .map_err(|source| SchemaError::InvalidDate { value, source })?;

    if required.contains(FIELD_DESCRIPTION) && raw.description.is_none() {
        return Err(SchemaError::MissingField(FIELD_DESCRIPTION));
    }

    Ok(FrontMatter {
        title,
        date,
        description: raw.description,
        extra: raw.extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required_all() -> BTreeSet<String> {
        [FIELD_TITLE, FIELD_DATE, FIELD_DESCRIPTION]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_basic() {
        let raw = "---\ntitle: My Post\ndate: 2024-06-01\ndescription: About things\n---\n\n# Hello\n";
        let doc = parse(raw, &required_all()).unwrap();
        assert_eq!(doc.front_matter.title, "My Post");
        assert_eq!(
            doc.front_matter.date,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert_eq!(doc.front_matter.description.as_deref(), Some("About things"));
        assert_eq!(doc.body.trim(), "# Hello");
    }

    #[test]
    fn test_extra_fields_preserved() {
        let raw = "---\ntitle: T\ndate: 2024-01-01\ndescription: d\nauthor: Jane\n---\nbody";
        let doc = parse(raw, &required_all()).unwrap();
        assert!(doc.front_matter.extra.contains_key("author"));
    }

    #[test]
    fn test_missing_block() {
        let err = parse("# Just Markdown", &required_all()).unwrap_err();
        assert!(matches!(err, SchemaError::MissingBlock));
    }

    #[test]
    fn test_unterminated_block() {
        let err = parse("---\ntitle: T\n", &required_all()).unwrap_err();
        assert!(matches!(err, SchemaError::Unterminated));
    }

    #[test]
    fn test_missing_title() {
        let raw = "---\ndate: 2024-01-01\ndescription: d\n---\nbody";
        let err = parse(raw, &required_all()).unwrap_err();
        assert!(matches!(err, SchemaError::MissingField("title")));
    }

    #[test]
    fn test_empty_title() {
        let raw = "---\ntitle: \"  \"\ndate: 2024-01-01\ndescription: d\n---\nbody";
        let err = parse(raw, &required_all()).unwrap_err();
        assert!(matches!(err, SchemaError::EmptyField("title")));
    }

    #[test]
    fn test_invalid_date() {
        let raw = "---\ntitle: T\ndate: June 1st\ndescription: d\n---\nbody";
        let err = parse(raw, &required_all()).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDate { .. }));
    }

    #[test]
    fn test_description_optional_when_not_required() {
        let required: BTreeSet<String> = [FIELD_TITLE, FIELD_DATE]
            .into_iter()
            .map(String::from)
            .collect();
        let raw = "---\ntitle: T\ndate: 2024-01-01\n---\nbody";
        let doc = parse(raw, &required).unwrap();
        assert!(doc.front_matter.description.is_none());

        let err = parse(raw, &required_all()).unwrap_err();
        assert!(matches!(err, SchemaError::MissingField("description")));
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let raw = "---\ntitle: [not, a, string]\ndate: 2024-01-01\ndescription: d\n---\nbody";
        let err = parse(raw, &required_all()).unwrap_err();
        assert!(matches!(err, SchemaError::Malformed(_)));
    }

    #[test]
    fn test_empty_body_after_block() {
        let raw = "---\ntitle: T\ndate: 2024-01-01\ndescription: d\n---";
        let doc = parse(raw, &required_all()).unwrap();
        assert_eq!(doc.body, "");
    }
}
