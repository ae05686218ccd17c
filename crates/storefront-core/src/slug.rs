//! URL slug generation for catalog entries.

/// Converts a display name into a URL slug.
///
/// Lowercases ASCII letters, drops characters that are not alphanumerics,
/// spaces, hyphens or underscores, and collapses runs of whitespace and
/// hyphens into a single `-`. Leading and trailing separators are stripped.
#[must_use]
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for c in value.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }

    slug.trim_matches(['-', '_']).to_string()
}
