// Markdown image syntax: `![alt](path)`.
//
// This is a narrow pattern matcher, not a Markdown parser. Alt text is any
// run of characters other than `]` (possibly empty); the path is a
// non-empty run of characters other than `)`. Neither may span a line break.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static RE_IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[([^\]\n]*)\]\(([^)\n]+)\)").unwrap());

/// One occurrence of image syntax in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub alt: String,
    /// Path token exactly as written between the parentheses.
    pub path: String,
    /// Byte range of the whole match in the scanned text.
    pub span: Range<usize>,
}

/// Find every image reference in `text`, left to right.
pub fn scan(text: &str) -> Vec<ImageRef> {
    RE_IMAGE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(ImageRef {
                alt: caps[1].to_string(),
                path: caps[2].to_string(),
                span: whole.range(),
            })
        })
        .collect()
}

/// Build the `<img>` tag that replaces a reference.
pub fn img_tag(alt: &str, src: &str) -> String {
    format!(
        r#"<img alt="{}" src="{}" />"#,
        quick_xml::escape::escape(alt),
        quick_xml::escape::escape(src)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_basic_reference() {
        let text = "before ![alt](pic.png) after";
        let refs = scan(text);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].alt, "alt");
        assert_eq!(refs[0].path, "pic.png");
        assert_eq!(&text[refs[0].span.clone()], "![alt](pic.png)");
    }

    #[test]
    fn empty_alt_is_allowed() {
        let refs = scan("![](missing.png)");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].alt, "");
    }

    #[test]
    fn empty_path_does_not_match() {
        assert!(scan("![alt]()").is_empty());
    }

    #[test]
    fn plain_links_do_not_match() {
        assert!(scan("see [docs](docs.md) for more").is_empty());
    }

    #[test]
    fn finds_several_on_one_line_in_order() {
        let refs = scan("![a](one.png) and ![b](dir/two.jpg)");
        let paths: Vec<_> = refs.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["one.png", "dir/two.jpg"]);
        assert!(refs[0].span.end <= refs[1].span.start);
    }

    #[test]
    fn unclosed_reference_does_not_swallow_later_lines() {
        let refs = scan("![broken](oops\n\n![ok](pic.png)\n");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].alt, "ok");
        assert_eq!(refs[0].path, "pic.png");
    }

    #[test]
    fn alt_text_cannot_span_lines() {
        assert!(scan("![first\nsecond](pic.png)").is_empty());
    }

    #[test]
    fn img_tags_do_not_match() {
        assert!(scan(r#"<img alt="a" src="https://x/p.png" />"#).is_empty());
    }

    #[test]
    fn img_tag_escapes_attributes() {
        assert_eq!(
            img_tag(r#"say "hi" & <wave>"#, "https://x/p.png"),
            r#"<img alt="say &quot;hi&quot; &amp; &lt;wave&gt;" src="https://x/p.png" />"#
        );
    }
}
