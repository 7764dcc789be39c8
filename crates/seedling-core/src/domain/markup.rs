//! Asset tag rendering and HTML marker splicing.
//!
//! This is deliberately not an HTML parser. Blocks are spliced in front of the
//! first literal `</head>` and `</body>` in the document, so marker text that
//! appears earlier inside a comment or an inline script will be matched.
//!
//! Output format, one line per asset, two-space indent:
//!
//! ```text
//!   <link rel="stylesheet" href="{src}"[ integrity="{integrity}"][ crossorigin="anonymous"]>
//!   <script src="{src}"[ defer][ integrity="{integrity}"][ crossorigin="anonymous"]></script>
//! ```

use std::borrow::Cow;

use serde::Serialize;

use super::library::{AssetTag, LibraryDefinition, LibraryId};

pub const HEAD_CLOSE: &str = "</head>";
pub const BODY_CLOSE: &str = "</body>";

const INDENT: &str = "  ";

/// How `src` and `integrity` values are written into attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttributeEscaping {
    /// Insert values exactly as they appear in the registry.
    #[default]
    Verbatim,
    /// Escape `& < > " '` so a hostile registry cannot break out of the
    /// attribute. Changes output bytes for values containing those characters.
    Html,
}

impl AttributeEscaping {
    pub fn apply<'a>(self, value: &'a str) -> Cow<'a, str> {
        match self {
            Self::Verbatim => Cow::Borrowed(value),
            Self::Html => escape_html(value),
        }
    }
}

fn escape_html(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// Shared tail: `[ integrity="…"][ crossorigin="anonymous"]`.
fn push_sri_attributes(line: &mut String, tag: &AssetTag, escaping: AttributeEscaping) {
    if let Some(integrity) = &tag.integrity {
        line.push_str(" integrity=\"");
        line.push_str(&escaping.apply(integrity));
        line.push('"');
    }
    if tag.crossorigin {
        line.push_str(" crossorigin=\"anonymous\"");
    }
}

/// Render one stylesheet `<link>` line (without indentation).
pub fn stylesheet_tag(tag: &AssetTag, escaping: AttributeEscaping) -> String {
    let mut line = format!(
        "<link rel=\"stylesheet\" href=\"{}\"",
        escaping.apply(&tag.src)
    );
    push_sri_attributes(&mut line, tag, escaping);
    line.push('>');
    line
}

/// Render one `<script>` line (without indentation).
pub fn script_tag(tag: &AssetTag, escaping: AttributeEscaping) -> String {
    let mut line = format!("<script src=\"{}\"", escaping.apply(&tag.src));
    if tag.defer {
        line.push_str(" defer");
    }
    push_sri_attributes(&mut line, tag, escaping);
    line.push_str("></script>");
    line
}

fn block(tags: &[AssetTag], render: impl Fn(&AssetTag) -> String) -> String {
    tags.iter()
        .map(|tag| format!("{INDENT}{}", render(tag)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// All stylesheet lines for `tags`, in order, joined by `\n`.
pub fn css_block(tags: &[AssetTag], escaping: AttributeEscaping) -> String {
    block(tags, |t| stylesheet_tag(t, escaping))
}

/// All script lines for `tags`, in order, joined by `\n`.
pub fn js_block(tags: &[AssetTag], escaping: AttributeEscaping) -> String {
    block(tags, |t| script_tag(t, escaping))
}

/// Replace the first `marker` with `{block}\n{marker}`.
///
/// Returns `None` when the marker is absent.
fn insert_before_marker(html: &str, marker: &str, block: &str) -> Option<String> {
    let at = html.find(marker)?;
    let mut out = String::with_capacity(html.len() + block.len() + 1);
    out.push_str(&html[..at]);
    out.push_str(block);
    out.push('\n');
    out.push_str(&html[at..]);
    Some(out)
}

/// Which blocks made it into the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InjectionOutcome {
    pub library: Option<LibraryId>,
    pub css_inserted: bool,
    pub js_inserted: bool,
}

impl InjectionOutcome {
    /// Outcome for the "nothing selected" case.
    pub fn skipped() -> Self {
        Self::default()
    }

    pub fn changed(&self) -> bool {
        self.css_inserted || self.js_inserted
    }
}

/// Result of splicing a library into a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spliced {
    pub html: String,
    pub outcome: InjectionOutcome,
    /// Markers that were needed but not found, for logging.
    pub missing_markers: Vec<&'static str>,
}

/// Splice `definition`'s asset blocks into `html`.
///
/// Each block goes in as `{block}\n` right before its marker, so an empty
/// list still leaves a blank line behind. A missing marker skips that block
/// without failing. The outcome flags only report blocks that carried tags.
pub fn splice(html: &str, definition: &LibraryDefinition, escaping: AttributeEscaping) -> Spliced {
    let mut document = html.to_owned();
    let mut outcome = InjectionOutcome {
        library: Some(definition.id.clone()),
        ..InjectionOutcome::default()
    };
    let mut missing_markers = Vec::new();

    let css = css_block(&definition.css, escaping);
    match insert_before_marker(&document, HEAD_CLOSE, &css) {
        Some(updated) => {
            document = updated;
            outcome.css_inserted = !definition.css.is_empty();
        }
        None => missing_markers.push(HEAD_CLOSE),
    }

    let js = js_block(&definition.js, escaping);
    match insert_before_marker(&document, BODY_CLOSE, &js) {
        Some(updated) => {
            document = updated;
            outcome.js_inserted = !definition.js.is_empty();
        }
        None => missing_markers.push(BODY_CLOSE),
    }

    Spliced {
        html: document,
        outcome,
        missing_markers,
    }
}
