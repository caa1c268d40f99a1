//! Markup stripping for user-supplied text.
//!
//! Participant names and message text arrive from untrusted clients and are
//! served back verbatim to every poller, so tags are stripped before
//! validation and persistence.

/// Strip `<...>` tag spans from `input` and trim surrounding whitespace.
///
/// An unclosed `<` swallows the rest of the string; partial markup is
/// treated as markup, not text.
pub fn strip_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;

    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }

    out.trim().to_string()
}
