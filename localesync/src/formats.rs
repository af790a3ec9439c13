/// File formats with a well-known extension.
///
/// Unknown formats are fine: they are passed through to the remote as-is and
/// just skip the extension cross-check.
const KNOWN_FORMATS: &[(&str, &str)] = &[
    ("angular_translate", "json"),
    ("arb", "arb"),
    ("csv", "csv"),
    ("ember_js", "js"),
    ("gettext", "po"),
    ("gettext_template", "pot"),
    ("go_i18n", "json"),
    ("i18next", "json"),
    ("ini", "ini"),
    ("json", "json"),
    ("laravel", "php"),
    ("mozilla_properties", "properties"),
    ("nested_json", "json"),
    ("php_array", "php"),
    ("plist", "plist"),
    ("properties", "properties"),
    ("qph", "qph"),
    ("react_simple_json", "json"),
    ("resx", "resx"),
    ("simple_json", "json"),
    ("strings", "strings"),
    ("stringsdict", "stringsdict"),
    ("ts", "ts"),
    ("xlf", "xlf"),
    ("xliff", "xlf"),
    ("xml", "xml"),
    ("yml", "yml"),
    ("yml_symfony", "yml"),
    ("yml_symfony2", "yml"),
];

/// The extension files of this format normally have.
pub fn extension_for(format: &str) -> Option<&'static str> {
    KNOWN_FORMATS
        .iter()
        .find(|(name, _)| *name == format)
        .map(|(_, extension)| *extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_formats_have_extensions() {
        assert_eq!(extension_for("yml"), Some("yml"));
        assert_eq!(extension_for("yml_symfony2"), Some("yml"));
        assert_eq!(extension_for("xml"), Some("xml"));
        assert_eq!(extension_for("gettext"), Some("po"));
    }

    #[test]
    fn unknown_formats_have_none() {
        assert_eq!(extension_for("my_custom_format"), None);
        assert_eq!(extension_for(""), None);
    }

    #[test]
    fn table_is_sorted_and_unique() {
        let names: Vec<_> = KNOWN_FORMATS.iter().map(|(name, _)| *name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
    }
}
