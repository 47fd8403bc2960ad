/// Property-based tests for truncation and configuration clamping
use draftpilot_completion::{
    truncate_around, truncate_tail, EngineConfig, EngineConfigUpdate, MAX_CUSTOM_PARAGRAPHS,
    MIN_CUSTOM_PARAGRAPHS,
};
use proptest::prelude::*;

proptest! {
    /// Inputs within budget pass through untouched.
    #[test]
    fn prop_truncate_is_identity_below_limit(text in ".{0,200}") {
        let chars = text.chars().count();
        prop_assert_eq!(truncate_tail(&text, chars + 1), text.clone());
        prop_assert_eq!(truncate_around(&text, chars / 2, chars + 1), text);
    }

    /// The result never exceeds the char budget, whatever the input.
    #[test]
    fn prop_truncate_tail_respects_budget(text in ".{0,500}", max in 0usize..300) {
        prop_assert!(truncate_tail(&text, max).chars().count() <= max);
    }

    #[test]
    fn prop_truncate_around_respects_budget(
        text in ".{0,500}",
        focus in 0usize..600,
        max in 0usize..300,
    ) {
        prop_assert!(truncate_around(&text, focus, max).chars().count() <= max);
    }

    /// Without a sentence terminator near the cut, the fallback is a hard cut
    /// of exactly the budget.
    #[test]
    fn prop_truncate_tail_hard_cut_without_terminators(
        text in "[a-z ]{301,500}",
        max in 1usize..300,
    ) {
        // No '.', '!', '?', or newline anywhere, so none within the search
        // window either; trailing spaces are trimmed from the cut.
        let result = truncate_tail(&text, max);
        let expected: String = text
            .chars()
            .skip(text.chars().count() - max)
            .collect::<String>()
            .trim_start()
            .to_string();
        prop_assert_eq!(result, expected);
    }

    /// The tail (the text closest to the edit point) survives truncation.
    #[test]
    fn prop_truncate_tail_keeps_suffix(text in "[a-z]{100,400}", max in 10usize..90) {
        let result = truncate_tail(&text, max);
        prop_assert!(text.ends_with(&result));
    }

    /// Truncation never splits a UTF-8 code point.
    #[test]
    fn prop_truncate_multibyte_safe(text in "[\\u{4e00}-\\u{4eff}]{0,300}", max in 0usize..200) {
        // Reaching here without a panic means no byte-level slicing occurred;
        // the budget still holds for non-ASCII input.
        prop_assert!(truncate_tail(&text, max).chars().count() <= max);
        prop_assert!(truncate_around(&text, max / 2, max).chars().count() <= max);
    }

    /// custom_paragraphs lands in [1, 10] for every input.
    #[test]
    fn prop_custom_paragraphs_always_clamped(value in any::<usize>()) {
        let config = EngineConfig::default().merged(&EngineConfigUpdate {
            custom_paragraphs: Some(value),
            ..EngineConfigUpdate::default()
        });
        prop_assert!(config.custom_paragraphs >= MIN_CUSTOM_PARAGRAPHS);
        prop_assert!(config.custom_paragraphs <= MAX_CUSTOM_PARAGRAPHS);
    }
}
