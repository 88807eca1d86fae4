//! Slug derivation for gallery names.
//!
//! A slug is the lowercase, hyphen-delimited identifier used both as the
//! gallery's URL segment and as its folder name under the static photo root.
//! The same function feeds both, so a gallery's page and its files always
//! agree on the name.
//!
//! The transform, in order:
//! 1. trim and lowercase
//! 2. whitespace runs → a single hyphen
//! 3. any remaining non-alphanumeric → hyphen
//! 4. hyphen runs collapsed
//! 5. leading/trailing hyphens stripped
//!
//! Total over all inputs (empty in, empty out) and idempotent: slugifying a
//! slug returns it unchanged.

/// Derive a URL- and filesystem-safe slug from a display name.
pub fn slugify(name: &str) -> String {
    let lowered = name.trim().to_lowercase();

    let mut out = String::with_capacity(lowered.len());
    let mut prev_hyphen = false;
    for c in lowered.chars() {
        let mapped = if c.is_ascii_alphanumeric() { c } else { '-' };
        if mapped == '-' {
            if !prev_hyphen {
                out.push('-');
            }
            prev_hyphen = true;
        } else {
            out.push(mapped);
            prev_hyphen = false;
        }
    }

    out.trim_matches('-').to_string()
}
