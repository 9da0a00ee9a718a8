/// Tokenize free text into lowercase words.
///
/// ASCII-scoped: any character outside `[a-z0-9 space hyphen]`
/// (including non-ASCII bytes) is replaced with a space before splitting,
/// and tokens shorter than 2 characters are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut cleaned = String::with_capacity(text.len());
    for c in text.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' ' || c == '-' {
            cleaned.push(c);
        } else {
            cleaned.push(' ');
        }
    }

    cleaned
        .split_whitespace()
        .filter(|t| t.len() >= 2)
        .map(str::to_string)
        .collect()
}

/// Normalize a surface form: lowercase, trim, collapse internal whitespace.
pub fn normalize_surface(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert text to a canonical slug.
///
/// Lowercases, drops characters outside `[a-z0-9 space hyphen]`, turns
/// whitespace runs into single hyphens, collapses repeated hyphens and trims
/// hyphens from both edges. Idempotent: `slugify(slugify(x)) == slugify(x)`.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(c);
        } else if c == ' ' || c == '-' {
            pending_separator = true;
        }
        // Everything else is dropped without acting as a separator,
        // matching slug derivation for inputs like "chicken, raw".
    }

    out
}
