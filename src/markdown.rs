//! Markdown-to-HTML conversion for post bodies.

use pulldown_cmark::{html, Event, Options, Parser, Tag};

/// Converts `markdown` to HTML, appending the result onto `out`.
pub fn to_html(out: &mut String, markdown: &str) {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    // The headings in the post itself need to be demoted twice to be
    // subordinate to both the site title (h1) and the post title (h2), so
    // `#` becomes h3 instead of h1.
    let events = Parser::new_ext(markdown, options).map(|ev| match ev {
        Event::Start(Tag::Heading(level)) => {
            Event::Start(Tag::Heading(level + 2))
        }
        Event::End(Tag::Heading(level)) => Event::End(Tag::Heading(level + 2)),
        _ => ev,
    });
    html::push_html(out, events);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_to_html() {
        let mut out = String::new();
        to_html(&mut out, "*World*");
        assert_eq!("<p><em>World</em></p>\n", out);
    }

    #[test]
    fn test_to_html_demotes_headings() {
        let mut out = String::new();
        to_html(&mut out, "# Hello\n\n## Again");
        assert_eq!("<h3>Hello</h3>\n<h4>Again</h4>\n", out);
    }

    #[test]
    fn test_to_html_appends() {
        let mut out = String::from("<h2>Title</h2>");
        to_html(&mut out, "body");
        assert_eq!("<h2>Title</h2><p>body</p>\n", out);
    }
}
