//! Character entity reference mapping.
//!
//! A handful of typographic code points are written as literal characters;
//! every other reference is passed through to the output unchanged.

use crate::error::BuildError;

/// Code points emitted as literal characters instead of references.
const LITERAL_CODE_POINTS: &[u32] = &[215, 8211, 8212, 8220, 8221, 8216, 8217];

/// How an entity reference is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Glyph<'a> {
    /// Write the character itself.
    Literal(char),
    /// Write the reference as given.
    Reference(&'a str),
}

/// Resolve an entity reference body such as `amp`, `#215` or `#x2013`.
///
/// Named references always pass through. Numeric references must parse as
/// decimal (`#<digits>`) or hex (`#x<digits>`).
pub(crate) fn resolve(entity: &str) -> Result<Glyph<'_>, BuildError> {
    let Some(numeric) = entity.strip_prefix('#') else {
        return Ok(Glyph::Reference(entity));
    };

    let (digits, radix) = match numeric.strip_prefix(['x', 'X']) {
        Some(hex) => (hex, 16),
        None => (numeric, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(BuildError::MalformedEntity(entity.to_owned()));
    }
    let code_point = u32::from_str_radix(digits, radix)
        .map_err(|_| BuildError::MalformedEntity(entity.to_owned()))?;

    if LITERAL_CODE_POINTS.contains(&code_point)
        && let Some(ch) = char::from_u32(code_point)
    {
        return Ok(Glyph::Literal(ch));
    }
    Ok(Glyph::Reference(entity))
}
