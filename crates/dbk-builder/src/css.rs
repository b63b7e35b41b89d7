//! CSS declaration list micro-parser.

/// Iterate over `(name, value)` pairs of an inline style declaration list.
///
/// Names are lowercased, both sides are trimmed, `!important` is dropped and
/// malformed or empty declarations are skipped.
pub(crate) fn declarations(style: &str) -> impl Iterator<Item = (String, &str)> {
    style.split(';').filter_map(|chunk| {
        let (name, value) = chunk.split_once(':')?;
        let name = name.trim().to_ascii_lowercase();
        let value = strip_important(value.trim());
        if name.is_empty() || value.is_empty() {
            return None;
        }
        Some((name, value))
    })
}

fn strip_important(value: &str) -> &str {
    let lower = value.to_ascii_lowercase();
    match lower.strip_suffix("!important") {
        Some(rest) => value[..rest.len()].trim_end(),
        None => value,
    }
}
