//! CSS properties that accept colors.

/// Properties scanned for `egal(...)` calls unless the host gives its own
/// list. Custom properties (`--*`) are handled separately.
pub const COLOR_PROPERTIES: &[&str] = &[
    "accent-color",
    "background",
    "background-color",
    "background-image",
    "border",
    "border-block",
    "border-block-color",
    "border-block-end",
    "border-block-end-color",
    "border-block-start",
    "border-block-start-color",
    "border-bottom",
    "border-bottom-color",
    "border-color",
    "border-image",
    "border-image-source",
    "border-inline",
    "border-inline-color",
    "border-inline-end",
    "border-inline-end-color",
    "border-inline-start",
    "border-inline-start-color",
    "border-left",
    "border-left-color",
    "border-right",
    "border-right-color",
    "border-top",
    "border-top-color",
    "box-shadow",
    "caret-color",
    "color",
    "column-rule",
    "column-rule-color",
    "fill",
    "flood-color",
    "lighting-color",
    "list-style-image",
    "mask",
    "mask-image",
    "outline",
    "outline-color",
    "scrollbar-color",
    "stop-color",
    "stroke",
    "text-decoration",
    "text-decoration-color",
    "text-emphasis",
    "text-emphasis-color",
    "text-shadow",
    "-webkit-tap-highlight-color",
    "-webkit-text-fill-color",
    "-webkit-text-stroke",
    "-webkit-text-stroke-color",
];

/// Returns true if `property` is a custom property such as `--brand`.
#[must_use]
pub fn is_custom_property(property: &str) -> bool {
    property.starts_with("--")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_is_sorted_and_unique() {
        let standard: Vec<_> = COLOR_PROPERTIES
            .iter()
            .filter(|p| !p.starts_with('-'))
            .collect();
        assert!(standard.windows(2).all(|w| w[0] < w[1]));
        assert!(COLOR_PROPERTIES.contains(&"color"));
    }

    #[test]
    fn test_custom_property() {
        assert!(is_custom_property("--brand"));
        assert!(!is_custom_property("-webkit-text-fill-color"));
    }
}
