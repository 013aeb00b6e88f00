// src/markdown.rs
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

/// Converts the backend's markdown analysis to HTML.
///
/// Raw HTML in the source is emitted as escaped text and link or image targets
/// outside http, https, mailto and relative paths are replaced with `#`, so the
/// result can be embedded in the page unescaped.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image { link_type, dest_url, title, id }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    // A scheme is everything before the first ':' that comes before any '/', '?' or '#'.
    let scheme = url
        .split_once(':')
        .map(|(scheme, _)| scheme)
        .filter(|scheme| !scheme.contains(['/', '?', '#']));

    match scheme.map(|scheme| scheme.trim().to_ascii_lowercase()) {
        None => url,
        Some(scheme) if matches!(scheme.as_str(), "http" | "https" | "mailto") => url,
        Some(_) => CowStr::Borrowed("#"),
    }
}
