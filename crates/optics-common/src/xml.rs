//! Namespace-agnostic XML tree accessors.
//!
//! Vendor telemetry documents qualify every element with a release-specific
//! namespace URI. All lookups here match on the local tag name only, so the
//! same extractor code works across OS releases and hardware generations.

use roxmltree::Node;

/// Find the first direct child element with the given local tag name.
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

/// Find all direct child elements with the given local tag name.
pub fn find_children<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Vec<Node<'a, 'input>> {
    node.children()
        .filter(|child| child.is_element() && child.tag_name().name() == tag)
        .collect()
}

/// Find all descendant elements with the given local tag name, at any depth.
pub fn find_descendants<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Vec<Node<'a, 'input>> {
    node.descendants()
        .filter(|desc| desc.is_element() && desc.tag_name().name() == tag)
        .collect()
}

/// Text content of the first matching direct child, ignoring namespace.
///
/// Empty text is reported as absent, matching how the hardware leaves
/// unpopulated fields.
pub fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    find_child(node, tag)
        .and_then(|child| child.text())
        .filter(|text| !text.is_empty())
}

/// Extract a numeric value from telemetry text, tolerating unit suffixes.
///
/// Hardware reports measurements as a leading numeric token followed by
/// descriptive text (e.g. `"3.25 V"`, `"-2.50 dBm"`, `"36 degrees C / 96
/// degrees F"`). The first whitespace-delimited token is parsed as `f64`;
/// anything non-numeric (including vendor strings like `"Not supported"`)
/// yields `None` rather than an error.
pub fn numeric_value(text: Option<&str>) -> Option<f64> {
    let token = text?.split_whitespace().next()?;
    token.parse::<f64>().ok()
}

/// Extract a counter value, tolerating thousands separators and scientific
/// notation (`"1,234"` -> 1234.0, `"1.5e-10"` -> 1.5e-10).
pub fn counter_value(text: Option<&str>) -> Option<f64> {
    let cleaned = text?.trim().replace(',', "");
    cleaned.parse::<f64>().ok()
}

/// Filter out the vendor "field not populated" sentinels.
///
/// Returns the trimmed value unless it is empty or a case-insensitive
/// `n/a`, `na`, or `none`.
pub fn clean_field(text: Option<&str>) -> Option<String> {
    let trimmed = text?.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "n/a" | "na" | "none" => None,
        _ => Some(trimmed.to_string()),
    }
}

/// Like [`clean_field`], with the additional firmware-only sentinel `0.0`.
pub fn clean_firmware(text: Option<&str>) -> Option<String> {
    clean_field(text).filter(|value| value != "0.0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    const SAMPLE: &str = r#"
        <root xmlns="http://xml.example.net/device/22.1R1/device">
            <item><name>first</name></item>
            <item><name>second</name></item>
            <nested>
                <item><name>deep</name></item>
            </nested>
            <empty></empty>
        </root>"#;

    #[test]
    fn test_find_child_ignores_namespace() {
        let doc = Document::parse(SAMPLE).unwrap();
        let item = find_child(doc.root_element(), "item").unwrap();
        assert_eq!(child_text(item, "name"), Some("first"));
    }

    #[test]
    fn test_find_children_direct_only() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(find_children(doc.root_element(), "item").len(), 2);
    }

    #[test]
    fn test_find_descendants_all_depths() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(find_descendants(doc.root_element(), "item").len(), 3);
    }

    #[test]
    fn test_child_text_missing() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(child_text(doc.root_element(), "absent"), None);
    }

    #[test]
    fn test_child_text_empty_is_none() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(child_text(doc.root_element(), "empty"), None);
    }

    #[test]
    fn test_numeric_value_with_units() {
        assert_eq!(numeric_value(Some("3.25 V")), Some(3.25));
        assert_eq!(numeric_value(Some("-2.50 dBm")), Some(-2.50));
        assert_eq!(numeric_value(Some("36 degrees C / 96 degrees F")), Some(36.0));
    }

    #[test]
    fn test_numeric_value_not_supported() {
        assert_eq!(numeric_value(Some("Not supported")), None);
        assert_eq!(numeric_value(Some("")), None);
        assert_eq!(numeric_value(None), None);
    }

    #[test]
    fn test_counter_value_commas_and_scientific() {
        assert_eq!(counter_value(Some("1,234")), Some(1234.0));
        assert_eq!(counter_value(Some("1.5e-10")), Some(1.5e-10));
        assert_eq!(counter_value(Some("123")), Some(123.0));
        assert_eq!(counter_value(Some("garbage")), None);
    }

    #[test]
    fn test_clean_field_sentinels() {
        assert_eq!(clean_field(Some("N/A")), None);
        assert_eq!(clean_field(Some("na")), None);
        assert_eq!(clean_field(Some("None")), None);
        assert_eq!(clean_field(Some("  ")), None);
        assert_eq!(clean_field(None), None);
        assert_eq!(clean_field(Some(" LC ")), Some("LC".to_string()));
    }

    #[test]
    fn test_clean_firmware_zero_sentinel() {
        assert_eq!(clean_firmware(Some("0.0")), None);
        assert_eq!(clean_firmware(Some("1.2")), Some("1.2".to_string()));
        assert_eq!(clean_firmware(Some("n/a")), None);
    }
}
