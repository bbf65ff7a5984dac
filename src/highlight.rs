//! Fenced code block highlighting.

use autumnus::{HtmlLinkedBuilder, formatter::Formatter, languages::Language, themes};

/// Highlights fenced code blocks using tree-sitter grammars.
///
/// Unrecognized languages degrade to a plain escaped
/// `<pre><code>` block; a single odd fence never fails a render.
pub struct Highlighter {
    theme: String,
}

impl Highlighter {
    /// Create a highlighter for the given theme identifier.
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
        }
    }

    /// Render one fenced block to HTML with CSS classes.
    pub fn block(&self, language: &str, code: &str) -> String {
        let lang = Language::guess(language, code);

        // Language::guess falls back to PlainText for anything it does
        // not know; only treat that as highlightable when the author
        // actually asked for plain text.
        if matches!(lang, Language::PlainText) && !is_plain_tag(language) {
            return plain_block(language, code);
        }

        let Ok(formatter) = HtmlLinkedBuilder::new().source(code).lang(lang).build() else {
            return plain_block(language, code);
        };

        let mut output: Vec<u8> = Vec::new();
        if formatter.format(&mut output).is_err() {
            return plain_block(language, code);
        }
        String::from_utf8(output).unwrap_or_else(|_| plain_block(language, code))
    }

    /// Stylesheet for the configured theme, for the page layer to
    /// inline or serve.
    pub fn theme_css(&self) -> Option<String> {
        let theme = themes::get(&self.theme).ok()?;
        Some(theme.css(false))
    }
}

fn is_plain_tag(language: &str) -> bool {
    language.is_empty() || language == "plaintext" || language == "text"
}

/// Escaped preformatted block for unhighlightable code.
fn plain_block(language: &str, code: &str) -> String {
    let escaped = escape_html(code);
    if language.is_empty() {
        format!("<pre><code>{escaped}</code></pre>")
    } else {
        format!(
            "<pre><code class=\"language-{}\">{escaped}</code></pre>",
            escape_html(language)
        )
    }
}

/// Escape HTML special characters.
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
