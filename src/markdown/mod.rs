//! Markdown to HTML fragment conversion.
//!
//! Parsing is delegated to `pulldown-cmark`. On top of CommonMark (which
//! always recognizes fenced code) the following extensions can be toggled:
//!
//! - **extra**: footnotes, definition lists, strikethrough, heading attributes
//! - **tables**: GFM pipe tables
//! - **codehilite**: code blocks wrapped in `<div class="codehilite">` with a
//!   `language-*` class on the `<code>` element
//! - **toc**: heading ids plus `[TOC]` expansion (see [`toc`])

mod slugify;
pub mod toc;

pub use slugify::{SlugRegistry, slugify};

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};
use quick_xml::escape::escape;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Parser extensions. All are enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Extensions {
    pub extra: bool,
    pub tables: bool,
    pub codehilite: bool,
    pub toc: bool,
}

impl Default for Extensions {
    fn default() -> Self {
        Self {
            extra: true,
            tables: true,
            codehilite: true,
            toc: true,
        }
    }
}

impl Extensions {
    /// Plain CommonMark.
    pub fn none() -> Self {
        Self {
            extra: false,
            tables: false,
            codehilite: false,
            toc: false,
        }
    }

    /// pulldown-cmark options for these extensions.
    pub fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.extra {
            options |= Options::ENABLE_FOOTNOTES
                | Options::ENABLE_DEFINITION_LIST
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_HEADING_ATTRIBUTES;
        }
        if self.tables {
            options |= Options::ENABLE_TABLES;
        }
        options
    }
}

/// Convert Markdown text to an HTML fragment.
///
/// CommonMark is permissive: every input is valid Markdown, so this only
/// returns an error through [`parse_bytes`] when the bytes cannot be decoded.
///
/// # Example
///
/// ```
/// use mdstyle::markdown::{Extensions, parse};
///
/// let html = parse("# Title\n\nHello world.", &Extensions::none()).unwrap();
/// assert_eq!(html, "<h1>Title</h1>\n<p>Hello world.</p>\n");
/// ```
pub fn parse(markdown: &str, extensions: &Extensions) -> Result<String> {
    let mut events: Vec<Event<'_>> =
        Parser::new_ext(markdown, extensions.parser_options()).collect();
    if extensions.toc {
        events = toc::apply(events);
    }
    if extensions.codehilite {
        events = wrap_code_blocks(events);
    }

    let mut fragment = String::with_capacity(markdown.len() + markdown.len() / 2);
    html::push_html(&mut fragment, events.into_iter());

    tracing::debug!(bytes = fragment.len(), "parsed markdown");
    Ok(fragment)
}

/// Decode Markdown bytes and convert them to an HTML fragment.
///
/// A UTF-8 or UTF-16 byte order mark selects the encoding; without one the
/// input must be UTF-8.
pub fn parse_bytes(bytes: &[u8], extensions: &Extensions) -> Result<String> {
    let text = decode_markdown(bytes)?;
    parse(&text, extensions)
}

/// Decode Markdown input, honoring a byte order mark.
pub fn decode_markdown(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    let body = &bytes[bom_len..];

    if encoding == UTF_8 {
        return std::str::from_utf8(body).map(Cow::Borrowed).map_err(|e| {
            Error::Parse(format!(
                "input is not valid UTF-8 (first bad byte at offset {})",
                bom_len + e.valid_up_to()
            ))
        });
    }

    let (text, malformed) = encoding.decode_without_bom_handling(body);
    if malformed {
        return Err(Error::Parse(format!(
            "input is not valid {}",
            encoding.name()
        )));
    }
    Ok(text)
}

/// Render code blocks as `<div class="codehilite"><pre><code>…`.
fn wrap_code_blocks(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut code: Option<(Option<String>, String)> = None;

    for event in events {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|lang| lang.to_string()),
                    CodeBlockKind::Indented => None,
                };
                code = Some((language, String::new()));
            }
            Event::Text(text) => match code.as_mut() {
                Some((_, body)) => body.push_str(&text),
                None => out.push(Event::Text(text)),
            },
            Event::End(TagEnd::CodeBlock) => {
                if let Some((language, body)) = code.take() {
                    let html = code_block_html(language.as_deref(), &body);
                    out.push(Event::Html(CowStr::from(html)));
                }
            }
            event => out.push(event),
        }
    }
    out
}

fn code_block_html(language: Option<&str>, body: &str) -> String {
    let class = language
        .map(|lang| format!(" class=\"language-{}\"", escape(lang)))
        .unwrap_or_default();
    format!(
        "<div class=\"codehilite\"><pre><code{class}>{}</code></pre></div>\n",
        escape(body)
    )
}
