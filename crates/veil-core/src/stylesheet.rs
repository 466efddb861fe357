//! Style sheet codec
//!
//! Serializes a selector list into chunked CSS rules and re-extracts rules
//! from previously generated style sheets. Rules are capped at
//! [`SELECTOR_GROUP_SIZE`] selectors each so that no single rule grows beyond
//! what rendering engines handle comfortably.

use thiserror::Error;

/// Maximum number of selectors combined into a single CSS rule.
pub const SELECTOR_GROUP_SIZE: usize = 1024;

/// Errors produced by the style sheet codec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StyleSheetError {
    /// The input was not produced by [`create_style_sheet`]: every rule,
    /// including the last, must be newline-terminated.
    #[error("style sheet text is not newline-terminated")]
    MissingTerminator,
}

/// Build a style sheet hiding every selector in the input.
///
/// Consecutive groups of at most [`SELECTOR_GROUP_SIZE`] selectors are joined
/// into one rule each. Grouping is purely positional: no re-ordering, no
/// deduplication. An empty input yields an empty string.
pub fn create_style_sheet<S: AsRef<str>>(selectors: &[S]) -> String {
    let mut css = String::new();

    for group in selectors.chunks(SELECTOR_GROUP_SIZE) {
        for (i, selector) in group.iter().enumerate() {
            if i > 0 {
                css.push_str(", ");
            }
            css.push_str(selector.as_ref());
        }
        css.push_str(" {display: none !important;}\n");
    }

    css
}

/// Extract the individual rules from a style sheet produced by
/// [`create_style_sheet`].
///
/// Returns a finite iterator yielding each rule with its newline terminator
/// stripped. Input that is not newline-terminated (the upstream
/// implementation looped forever on it) is rejected up front.
pub fn rules_from_style_sheet(css: &str) -> Result<StyleSheetRules<'_>, StyleSheetError> {
    if !css.is_empty() && !css.ends_with('\n') {
        return Err(StyleSheetError::MissingTerminator);
    }
    Ok(StyleSheetRules { rest: css })
}

/// Iterator over the rules of a generated style sheet.
///
/// Obtain a fresh instance via [`rules_from_style_sheet`] to re-iterate;
/// iteration is not restartable mid-stream.
pub struct StyleSheetRules<'a> {
    rest: &'a str,
}

impl<'a> Iterator for StyleSheetRules<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        // The terminator was validated at construction time.
        let end = self.rest.find('\n')?;
        let rule = &self.rest[..end];
        self.rest = &self.rest[end + 1..];
        Some(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_style_sheet() {
        assert_eq!(create_style_sheet::<&str>(&[]), "");

        assert_eq!(
            create_style_sheet(&[
                "html",
                "#foo",
                ".bar",
                "#foo .bar",
                "#foo > .bar",
                "#foo[data-bar='bar']",
            ]),
            "html, #foo, .bar, #foo .bar, #foo > .bar, #foo[data-bar='bar'] \
             {display: none !important;}\n"
        );
    }

    #[test]
    fn test_create_style_sheet_groups() {
        let selectors: Vec<String> = (0..50000).map(|i| format!(".s{}", i)).collect();
        let css = create_style_sheet(&selectors);

        let expected_rules = (50000 + SELECTOR_GROUP_SIZE - 1) / SELECTOR_GROUP_SIZE;
        assert_eq!(css.matches('\n').count(), expected_rules);
    }

    #[test]
    fn test_create_style_sheet_tolerates_duplicates() {
        let css = create_style_sheet(&["#a", "#a", "#b"]);
        assert_eq!(css, "#a, #a, #b {display: none !important;}\n");
    }

    #[test]
    fn test_rules_from_style_sheet() {
        let rules: Vec<&str> = rules_from_style_sheet("").unwrap().collect();
        assert_eq!(rules, Vec::<&str>::new());

        let rules: Vec<&str> = rules_from_style_sheet("#foo {}\n").unwrap().collect();
        assert_eq!(rules, vec!["#foo {}"]);

        let rules: Vec<&str> = rules_from_style_sheet("#foo {}\n#bar {}\n")
            .unwrap()
            .collect();
        assert_eq!(rules, vec!["#foo {}", "#bar {}"]);
    }

    #[test]
    fn test_rules_from_style_sheet_rejects_unterminated() {
        assert_eq!(
            rules_from_style_sheet("#foo {}").err(),
            Some(StyleSheetError::MissingTerminator)
        );
    }

    #[test]
    fn test_round_trip_preserves_groups() {
        let selectors: Vec<String> = (0..(SELECTOR_GROUP_SIZE * 2 + 7))
            .map(|i| format!(".s{}", i % 100))
            .collect();
        let css = create_style_sheet(&selectors);

        let mut reconstructed = Vec::new();
        for rule in rules_from_style_sheet(&css).unwrap() {
            let body = rule
                .strip_suffix(" {display: none !important;}")
                .expect("rule should carry the hiding declaration");
            reconstructed.extend(body.split(", ").map(|s| s.to_string()));
        }

        assert_eq!(reconstructed, selectors);
    }
}
