//! GitHub REST pagination via the `Link` response header.
//!
//! Every listing response carries absolute URLs for adjacent pages:
//!
//! ```text
//! <https://api.github.com/user/1/repos?per_page=100&page=2>; rel="next",
//! <https://api.github.com/user/1/repos?per_page=100&page=5>; rel="last"
//! ```
//!
//! The `rel="next"` URL is used verbatim as the cursor for the following page.

/// Extracts the `rel="next"` URL from a `Link` header value.
///
/// Returns `None` when the header is absent, has no `next` relation (last
/// page reached), or the relation carries no bracketed URL.
#[must_use]
pub fn extract_next_link(link_header: Option<&str>) -> Option<String> {
    let header = link_header?;

    for segment in header.split(',') {
        let segment = segment.trim();
        if !segment.contains(r#"rel="next""#) {
            continue;
        }
        return extract_angle_bracket_url(segment).map(str::to_owned);
    }

    None
}

/// Extracts the URL between `<` and `>` in a link directive segment.
fn extract_angle_bracket_url(segment: &str) -> Option<&str> {
    let start = segment.find('<')? + 1;
    let end = segment.find('>')?;
    if start >= end {
        return None;
    }
    Some(&segment[start..end])
}
