//! Heading anchors and `[TOC]` expansion.

use std::fmt::Write;

use pulldown_cmark::{CowStr, Event, HeadingLevel, Tag, TagEnd};
use quick_xml::escape::escape;

use super::slugify::SlugRegistry;

/// Paragraph text that is replaced by the table of contents.
pub const TOC_MARKER: &str = "[TOC]";

#[derive(Debug, Clone, PartialEq, Eq)]
struct TocEntry {
    level: u8,
    id: String,
    title: String,
}

/// Give every heading an `id` and replace `[TOC]` paragraphs with a nested
/// list of links to those headings.
pub(super) fn apply(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut slugs = SlugRegistry::default();
    let mut entries = Vec::new();
    let mut markers = Vec::new();
    let mut out = Vec::with_capacity(events.len());

    let mut events = events.into_iter();
    while let Some(event) = events.next() {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let body = take_until(&mut events, |e| matches!(e, Event::End(TagEnd::Heading(_))));
                let title = inline_text(&body);
                let id = match id {
                    Some(id) => {
                        slugs.reserve(&id);
                        id
                    }
                    None => CowStr::from(slugs.unique(&title)),
                };
                entries.push(TocEntry {
                    level: heading_level(level),
                    id: id.to_string(),
                    title,
                });
                out.push(Event::Start(Tag::Heading {
                    level,
                    id: Some(id),
                    classes,
                    attrs,
                }));
                out.extend(body);
            }
            Event::Start(Tag::Paragraph) => {
                let body = take_until(&mut events, |e| matches!(e, Event::End(TagEnd::Paragraph)));
                if is_toc_marker(&body) {
                    markers.push(out.len());
                    out.push(Event::Html(CowStr::Borrowed("")));
                } else {
                    out.push(Event::Start(Tag::Paragraph));
                    out.extend(body);
                }
            }
            other => out.push(other),
        }
    }

    if !markers.is_empty() {
        let toc = render_toc(&entries);
        for index in markers {
            out[index] = Event::Html(CowStr::from(toc.clone()));
        }
    }
    out
}

/// Collect events up to and including the first one matching `is_end`.
fn take_until<'a>(
    events: &mut impl Iterator<Item = Event<'a>>,
    is_end: impl Fn(&Event<'a>) -> bool,
) -> Vec<Event<'a>> {
    let mut body = Vec::new();
    for event in events.by_ref() {
        let done = is_end(&event);
        body.push(event);
        if done {
            break;
        }
    }
    body
}

fn inline_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text.trim().to_string()
}

fn is_toc_marker(body: &[Event<'_>]) -> bool {
    let mut text = String::new();
    for event in body {
        match event {
            Event::Text(t) => text.push_str(t),
            Event::End(TagEnd::Paragraph) => {}
            _ => return false,
        }
    }
    text.trim() == TOC_MARKER
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn render_toc(entries: &[TocEntry]) -> String {
    let mut html = String::from("<div class=\"toc\">\n");
    let mut open: Vec<u8> = Vec::new();

    for entry in entries {
        while open.last().is_some_and(|&level| level > entry.level) {
            html.push_str("</li>\n</ul>\n");
            open.pop();
        }
        match open.last() {
            Some(&level) if level == entry.level => html.push_str("</li>\n"),
            _ => {
                html.push_str("<ul>\n");
                open.push(entry.level);
            }
        }
        let _ = write!(
            html,
            "<li><a href=\"#{}\">{}</a>",
            escape(entry.id.as_str()),
            escape(entry.title.as_str())
        );
    }
    while open.pop().is_some() {
        html.push_str("</li>\n</ul>\n");
    }

    html.push_str("</div>\n");
    html
}

#[cfg(test)]
mod tests {
    use pulldown_cmark::{Options, Parser};

    use super::*;

    fn toc_events(markdown: &str) -> Vec<Event<'_>> {
        apply(Parser::new_ext(markdown, Options::ENABLE_HEADING_ATTRIBUTES).collect())
    }

    fn heading_ids(events: &[Event<'_>]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::Start(Tag::Heading { id, .. }) => id.as_ref().map(|id| id.to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_headings_get_unique_ids() {
        let events = toc_events("# Intro\n\n## Intro\n\n## Usage `cli`\n");
        assert_eq!(heading_ids(&events), vec!["intro", "intro-1", "usage-cli"]);
    }

    #[test]
    fn test_explicit_ids_are_kept() {
        let events = toc_events("# Setup {#install}\n\n# Install\n");
        assert_eq!(heading_ids(&events), vec!["install", "install-1"]);
    }

    #[test]
    fn test_marker_is_replaced() {
        let events = toc_events("[TOC]\n\n# A\n\n## B\n");
        let html = events
            .iter()
            .find_map(|e| match e {
                Event::Html(html) if html.contains("toc") => Some(html.to_string()),
                _ => None,
            })
            .expect("toc html");
        assert!(html.contains(r##"<a href="#a">A</a>"##));
        assert!(html.contains(r##"<a href="#b">B</a>"##));
    }

    #[test]
    fn test_marker_inside_text_is_not_replaced() {
        let events = toc_events("see [TOC] here\n");
        assert!(events.iter().all(|e| !matches!(e, Event::Html(_))));
    }

    #[test]
    fn test_render_toc_nesting() {
        let entry = |level, id: &str| TocEntry {
            level,
            id: id.to_string(),
            title: id.to_uppercase(),
        };
        let html = render_toc(&[entry(1, "a"), entry(3, "b"), entry(2, "c"), entry(1, "d")]);
        assert_eq!(html.matches("<ul>").count(), html.matches("</ul>").count());
        assert_eq!(html.matches("<li>").count(), html.matches("</li>").count());
        assert_eq!(html.matches("<ul>").count(), 3);
    }

    #[test]
    fn test_render_toc_escapes_titles() {
        let html = render_toc(&[TocEntry {
            level: 2,
            id: "a-b".into(),
            title: "A & <B>".into(),
        }]);
        assert!(html.contains("A &amp; &lt;B&gt;"));
    }
}
