//! Plain-text extraction from markdown or HTML note bodies.

use pulldown_cmark::{Event, Options, Parser, Tag};
use regex::Regex;
use std::sync::OnceLock;

fn html_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("static regex is valid"))
}

/// Strips HTML tags, keeping the text between them.
pub fn strip_html_tags(s: &str) -> String {
    html_tag_re().replace_all(s, "").into_owned()
}

/// Converts a markdown (or HTML) note body to plain text.
///
/// Formatting markers are dropped, paragraph and line breaks become single
/// spaces, and whitespace runs are collapsed.
///
/// # Examples
///
/// ```
/// use corpus_vault::infra::to_plain_text;
///
/// assert_eq!(to_plain_text("**Tawheed** is _oneness_"), "Tawheed is oneness");
/// assert_eq!(to_plain_text("<p>Hello <b>world</b></p>"), "Hello world");
/// ```
pub fn to_plain_text(body: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let mut out = String::with_capacity(body.len());
    for event in Parser::new_ext(body, options) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::Html(html) => out.push_str(&strip_html_tags(&html)),
            Event::SoftBreak | Event::HardBreak | Event::Rule => out.push(' '),
            Event::End(Tag::Paragraph | Tag::Heading(..) | Tag::Item | Tag::CodeBlock(_)) => {
                out.push(' ')
            }
            Event::End(Tag::TableCell) => out.push(' '),
            _ => {}
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
