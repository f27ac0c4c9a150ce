use std::borrow::Cow;
use std::sync::OnceLock;

use quick_xml::escape::partial_escape;
use regex::Regex;
use scraper::Html;

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"))
}

/// Escape `&`, `<` and `>` only. Quotes are left as-is.
pub fn escape(s: &str) -> String {
    partial_escape(s).into_owned()
}

/// Free text for the feed: strip markup, decode entities, drop control
/// characters XML 1.0 forbids, trim, then escape.
pub fn sanitize(raw: Option<&str>) -> String {
    let Some(raw) = raw else { return String::new() };
    if raw.trim().is_empty() {
        return String::new();
    }
    let stripped = tag_re().replace_all(raw, "");
    let decoded = decode_entities(&stripped);
    let cleaned: String = decoded.chars().filter(|c| is_xml_char(*c)).collect();
    escape(cleaned.trim())
}

fn is_xml_char(c: char) -> bool {
    !c.is_ascii_control() || matches!(c, '\t' | '\n' | '\r') || c == '\u{7f}'
}

// The HTML parser does the entity table lookup for us. Any `<` that survived
// tag stripping is pre-encoded so the parser cannot mistake it for a tag.
fn decode_entities(s: &str) -> Cow<'_, str> {
    if !s.contains('&') && !s.contains('<') {
        return Cow::Borrowed(s);
    }
    let guarded = s.replace('<', "&lt;");
    let frag = Html::parse_fragment(&guarded);
    Cow::Owned(frag.root_element().text().collect::<String>())
}

/// Wrap `raw` in a CDATA section, splitting on `]]>` so it cannot close early.
pub fn cdata(raw: &str) -> String {
    format!("<![CDATA[{}]]>", raw.replace("]]>", "]]]]><![CDATA[>"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_tags_and_reescapes() {
        assert_eq!(sanitize(Some("<b>Nice &amp; Shiny</b>")), "Nice &amp; Shiny");
    }

    #[test]
    fn sanitize_decodes_named_and_numeric_entities() {
        assert_eq!(sanitize(Some("Caf&eacute;&nbsp;&#8364;5")), "Café\u{a0}€5");
        assert_eq!(sanitize(Some("&lt;script&gt;")), "&lt;script&gt;");
    }

    #[test]
    fn sanitize_trims_and_handles_missing() {
        assert_eq!(sanitize(Some("  <p>\n Hello </p>\n")), "Hello");
        assert_eq!(sanitize(Some("   ")), "");
        assert_eq!(sanitize(None), "");
    }

    #[test]
    fn sanitize_keeps_lone_angle_bracket() {
        assert_eq!(sanitize(Some("5 < 6 & 7")), "5 &lt; 6 &amp; 7");
        assert_eq!(sanitize(Some("a <b")), "a &lt;b");
    }

    #[test]
    fn sanitize_drops_illegal_control_chars() {
        assert_eq!(sanitize(Some("\0z")), "z");
        assert_eq!(sanitize(Some("a\u{1}b\u{1b}[0mc\u{1f}")), "ab[0mc");
        assert_eq!(sanitize(Some("&#1;x&#8;")), "x");
        assert_eq!(sanitize(Some("line1\n\tline2")), "line1\n\tline2");
    }

    #[test]
    fn escape_leaves_quotes() {
        assert_eq!(
            escape(r#"https://x/p?a=1&b="2"<>"#),
            r#"https://x/p?a=1&amp;b="2"&lt;&gt;"#
        );
    }

    #[test]
    fn cdata_splits_terminator() {
        assert_eq!(cdata("Home>Garden"), "<![CDATA[Home>Garden]]>");
        assert_eq!(cdata("a]]>b"), "<![CDATA[a]]]]><![CDATA[>b]]>");
    }
}
