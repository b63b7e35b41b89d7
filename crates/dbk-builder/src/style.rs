//! Image sizing from inline CSS and CSS class inspection.

use std::sync::LazyLock;

use regex::Regex;

use crate::css;

/// Matches a whole percentage value such as `50%`.
static PERCENTAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)%$").expect("invalid percentage regex"));

/// Matches the `inline` class token bounded by whitespace or the string ends.
static INLINE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s+)inline(\s+|$)").expect("invalid inline class regex"));

/// Image size attributes derived from an inline style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ImageSize<'a> {
    /// Percentage width, numeric part only.
    Scale(&'a str),
    /// Absolute width with optional height, written as `width` / `depth`.
    Dimensions {
        width: &'a str,
        depth: Option<&'a str>,
    },
}

/// Extract image sizing from a CSS declaration list.
///
/// The last `width` and `height` declarations win. Without a width there is
/// nothing to size, even when a height is present.
pub(crate) fn image_size(style: &str) -> Option<ImageSize<'_>> {
    let mut width = None;
    let mut height = None;
    for (name, value) in css::declarations(style) {
        match name.as_str() {
            "width" => width = Some(value),
            "height" => height = Some(value),
            _ => {}
        }
    }

    let width = width?;
    match PERCENTAGE.captures(width).and_then(|caps| caps.get(1)) {
        Some(scale) => Some(ImageSize::Scale(scale.as_str())),
        None => Some(ImageSize::Dimensions {
            width,
            depth: height,
        }),
    }
}

/// Whether a CSS class attribute marks an image as inline.
pub(crate) fn is_inline_class(css_class: &str) -> bool {
    INLINE_CLASS.is_match(css_class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_width_is_scale() {
        assert_eq!(image_size("width: 50%"), Some(ImageSize::Scale("50")));
    }

    #[test]
    fn test_percentage_ignores_height() {
        assert_eq!(
            image_size("height: 30px; width: 75%"),
            Some(ImageSize::Scale("75"))
        );
    }

    #[test]
    fn test_absolute_width_and_height() {
        assert_eq!(
            image_size("width: 200px; height: 100px"),
            Some(ImageSize::Dimensions {
                width: "200px",
                depth: Some("100px"),
            })
        );
    }

    #[test]
    fn test_absolute_width_only() {
        assert_eq!(
            image_size("width:3in"),
            Some(ImageSize::Dimensions {
                width: "3in",
                depth: None,
            })
        );
    }

    #[test]
    fn test_fractional_percentage_is_not_scale() {
        assert_eq!(
            image_size("width: 12.5%"),
            Some(ImageSize::Dimensions {
                width: "12.5%",
                depth: None,
            })
        );
    }

    #[test]
    fn test_height_without_width() {
        assert_eq!(image_size("height: 10px"), None);
        assert_eq!(image_size("border: none"), None);
    }

    #[test]
    fn test_last_declaration_wins() {
        assert_eq!(
            image_size("width: 10%; width: 20%"),
            Some(ImageSize::Scale("20"))
        );
    }

    #[test]
    fn test_inline_class_detection() {
        assert!(is_inline_class("inline"));
        assert!(is_inline_class("figure inline"));
        assert!(is_inline_class("inline figure"));
        assert!(is_inline_class("a  inline\tb"));
    }

    #[test]
    fn test_inline_class_requires_whitespace_boundaries() {
        assert!(!is_inline_class("foo-inline"));
        assert!(!is_inline_class("inline-block"));
        assert!(!is_inline_class("Inline"));
        assert!(!is_inline_class("inlined"));
    }
}
