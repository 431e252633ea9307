// Field-name to column-name casing.

/// Converts a camel-case identifier to underscore case: `MediaID` => `media_id`.
///
/// An uppercase ASCII letter is lowercased and gets a leading `_` when it starts a
/// lowercase run or ends one. Leading and trailing underscores are trimmed.
pub fn camel_to_underscore(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_ascii_uppercase() {
            out.push(ch);
            continue;
        }
        let next_is_lower = chars.get(i + 1).is_some_and(|next| !next.is_ascii_uppercase());
        let prev_is_lower = i > 0 && !chars[i - 1].is_ascii_uppercase();
        if (next_is_lower || prev_is_lower) && !out.ends_with('_') {
            out.push('_');
        }
        out.push(ch.to_ascii_lowercase());
    }

    out.trim_matches('_').to_string()
}
