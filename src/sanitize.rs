//! ASCII folding for report text.

use unicode_normalization::UnicodeNormalization;

/// Folds `text` to plain ASCII.
///
/// `■` becomes `_`, everything else is compatibility-decomposed (NFKD) and
/// non-ASCII code points are dropped, so `é` becomes `e`.
pub fn sanitize(text: &str) -> String {
    text.replace('■', "_")
        .nfkd()
        .filter(char::is_ascii)
        .collect()
}

/// Expands tabs to four spaces.
pub fn expand_tabs(text: &str) -> String {
    text.replace('\t', "    ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_box_characters() {
        assert_eq!(sanitize("Café ■ naïve"), "Cafe _ naive");
    }

    #[test]
    fn compatibility_forms_are_folded() {
        assert_eq!(sanitize("ﬁle №1"), "file No1");
    }

    #[test]
    fn drops_symbols_without_ascii_form() {
        assert_eq!(sanitize("ok ✅ 漢字"), "ok  ");
    }

    #[test]
    fn tabs_become_four_spaces() {
        assert_eq!(expand_tabs("\tlet x = 1"), "    let x = 1");
    }
}
