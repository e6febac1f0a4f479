//! Plain-text post-filter for streamed fragments.
//!
//! The terminal sink is plain text only, so emoji are stripped from output
//! fragments after generation instead of being listed as stop tokens, which
//! would otherwise terminate streams early.

/// Remove emoji (and their presentation selectors) from a fragment.
///
/// Returns the input unchanged (allocated) when nothing matches.
pub fn strip_emoji(fragment: &str) -> String {
    fragment.chars().filter(|c| !is_emoji(*c)).collect()
}

/// Whether a character falls in one of the emoji blocks.
fn is_emoji(c: char) -> bool {
    matches!(u32::from(c),
        // Misc symbols, dingbats.
        0x2600..=0x27BF
        // Misc pictographs, emoticons, transport, supplemental, extended.
        | 0x1F300..=0x1F5FF
        | 0x1F600..=0x1F64F
        | 0x1F680..=0x1F6FF
        | 0x1F900..=0x1F9FF
        | 0x1FA70..=0x1FAFF
        // Regional indicators (flag pairs).
        | 0x1F1E6..=0x1F1FF
        // Variation selector-16 and zero-width joiner used in sequences.
        | 0xFE0F
        | 0x200D
    )
}

#[cfg(test)]
mod tests {
    use super::strip_emoji;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(strip_emoji("just words, no pictures"), "just words, no pictures");
    }

    #[test]
    fn emoji_are_removed_mid_fragment() {
        assert_eq!(strip_emoji("hello 👋 there 🚀!"), "hello  there !");
    }

    #[test]
    fn joined_sequences_are_removed_entirely() {
        // Family emoji: four code points joined by ZWJ.
        assert_eq!(strip_emoji("a👨‍👩‍👧b"), "ab");
    }

    #[test]
    fn non_emoji_unicode_survives() {
        assert_eq!(strip_emoji("ástríður naïve café"), "ástríður naïve café");
    }
}
