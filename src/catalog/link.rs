/// Extract the `rel="next"` target from an RFC 8288 `Link` header value.
///
/// Shopify sends `<url>; rel="previous", <url>; rel="next"`; either relation
/// may be missing. Returns `None` when no `next` relation is present.
pub fn next_link(header: &str) -> Option<String> {
    for part in split_links(header) {
        let part = part.trim();
        let Some(rest) = part.strip_prefix('<') else { continue };
        let Some(end) = rest.find('>') else { continue };
        let target = &rest[..end];
        let params = &rest[end + 1..];
        let is_next = params.split(';').any(|p| {
            let Some((key, value)) = p.split_once('=') else { return false };
            key.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|rel| rel.eq_ignore_ascii_case("next"))
        });
        if is_next && !target.is_empty() {
            return Some(target.to_string());
        }
    }
    None
}

// Commas may appear inside the bracketed URL (page_info tokens), so only split
// on commas outside `<...>`.
fn split_links(header: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in header.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&header[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_next_after_previous() {
        let h = r#"<https://s.example/admin/api/2024-01/products.json?limit=250&page_info=abc>; rel="previous", <https://s.example/admin/api/2024-01/products.json?limit=250&page_info=def>; rel="next""#;
        assert_eq!(
            next_link(h).as_deref(),
            Some("https://s.example/admin/api/2024-01/products.json?limit=250&page_info=def")
        );
    }

    #[test]
    fn previous_only_means_last_page() {
        let h = r#"<https://s.example/products.json?page_info=abc>; rel="previous""#;
        assert_eq!(next_link(h), None);
    }

    #[test]
    fn tolerates_unquoted_rel_and_commas_in_url() {
        let h = "<https://s.example/p.json?ids=1,2,3>; rel=next";
        assert_eq!(next_link(h).as_deref(), Some("https://s.example/p.json?ids=1,2,3"));
    }

    #[test]
    fn empty_header_has_no_next() {
        assert_eq!(next_link(""), None);
    }
}
