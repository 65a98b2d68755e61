//! Output sanitization: user-supplied text is stripped of embedded markup
//! before it leaves the system.

use crate::database::bookmarks::Bookmark;

/// Sanitize an outbound record. `title`, `url` and `description` pass through
/// the markup strip; `id` and `rating` are returned unchanged.
pub fn sanitize_bookmark(bookmark: Bookmark) -> Bookmark {
    Bookmark {
        id: bookmark.id,
        title: strip_markup(&bookmark.title),
        url: strip_markup(&bookmark.url),
        rating: bookmark.rating,
        description: strip_markup(&bookmark.description),
    }
}

/// Remove every `<...>` span, repeating until the text no longer changes so
/// that a tag reassembled from the pieces of stripped ones cannot survive.
pub fn strip_markup(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        let stripped = strip_tags(&current);
        if stripped == current {
            return stripped;
        }
        current = stripped;
    }
}

fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find('<') {
        match rest[open..].find('>') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            // A lone '<' with no closing '>' cannot form a tag
            None => break,
        }
    }
    out.push_str(rest);
    out
}
