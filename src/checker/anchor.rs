// src/checker/anchor.rs
// =============================================================================
// This module turns heading text into the anchor a link fragment points at.
//
// The algorithm copies the way GitHub-style renderers build heading ids:
// 1. Lowercase the whole heading
// 2. Trim whitespace from both ends
// 3. Replace every space and tab with a hyphen
// 4. Keep only a-z, 0-9 and '-' (everything else is dropped)
//
// Hyphens are never collapsed and nothing is trimmed after step 4, so
// "A - B" becomes "a---b". Links written against GitHub rely on exactly this.
// =============================================================================

// Generates the anchor slug for a heading
//
// Example:
//   generate_anchor("Getting Started!") == "getting-started"
pub fn generate_anchor(heading: &str) -> String {
    heading
        .to_lowercase()
        .trim()
        .chars()
        .map(|c| if c == ' ' || c == '\t' { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_heading() {
        assert_eq!(generate_anchor("Intro"), "intro");
        assert_eq!(generate_anchor("Getting Started"), "getting-started");
    }

    #[test]
    fn test_tabs_become_hyphens() {
        assert_eq!(generate_anchor("Tabs\tTabs"), "tabs-tabs");
    }

    #[test]
    fn test_special_characters_dropped() {
        assert_eq!(generate_anchor("Special!@#"), "special");
        assert_eq!(generate_anchor("What's new in v2.0?"), "whats-new-in-v20");
    }

    #[test]
    fn test_hyphens_not_collapsed() {
        assert_eq!(generate_anchor("A - B"), "a---b");
        assert_eq!(generate_anchor("Trailing !"), "trailing-");
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert_eq!(generate_anchor("  Padded Heading \n"), "padded-heading");
    }

    #[test]
    fn test_non_ascii_letters_dropped() {
        assert_eq!(generate_anchor("Café Über"), "caf-ber");
    }

    #[test]
    fn test_empty_heading() {
        assert_eq!(generate_anchor(""), "");
        assert_eq!(generate_anchor("   "), "");
    }

    #[test]
    fn test_slug_is_stable() {
        for heading in ["Intro", "Tabs\tTabs", "A - B", "Special!@#", "  x Y z  "] {
            let once = generate_anchor(heading);
            assert_eq!(generate_anchor(&once), once);
        }
    }
}
