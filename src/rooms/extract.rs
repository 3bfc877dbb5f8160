//! Room-count extractor.
//!
//! A request message is scanned line by line. Only lines mentioning `ROOM`
//! or `ROOMS` are considered. Two passes run over those lines:
//!
//! 1. **Category-qualified pass**: the first line containing the category
//!    label and a `<digits> ROOM(S)` run wins outright.
//! 2. **Fallback pass**: the first line that *ends* in a bare
//!    `<digits> ROOM(S)` count, with nothing after it.
//!
//! When neither pass matches the result is `0`. The extractor never fails
//! and holds no state, so the same input always gives the same count.

use std::sync::LazyLock;

use regex::Regex;

/// Category used when none is configured.
pub const DEFAULT_ROOM_CATEGORY: &str = "ECONOMY";

// ---------------------------------------------------------------------------
// Patterns (compiled once via LazyLock)
// ---------------------------------------------------------------------------

static ROOM_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)ROOMS?").unwrap());

static ROOM_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*ROOMS?").unwrap());

static BARE_ROOM_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*ROOMS?\s*$").unwrap());

/// Extractor bound to a single room category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomCountExtractor {
    category: String,
}

impl Default for RoomCountExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM_CATEGORY)
    }
}

impl RoomCountExtractor {
    /// Create an extractor for `category` (case-insensitive, may be empty).
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }

    /// The category this extractor looks for.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Number of rooms requested in `message`.
    pub fn extract(&self, message: &str) -> u32 {
        extract_room_count(message, &self.category)
    }
}

/// Return how many rooms of `category` `message` asks for.
///
/// Falls back to an unqualified count when no line carries the category,
/// and to `0` when nothing parses. An empty `category` skips straight to the
/// fallback pass. The category is matched as given, surrounding spaces
/// included.
pub fn extract_room_count(message: &str, category: &str) -> u32 {
    let room_lines: Vec<&str> = message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| ROOM_TOKEN.is_match(line))
        .collect();

    let category = category.to_uppercase();
    if !category.is_empty() {
        let qualified = room_lines
            .iter()
            .filter(|line| line.to_uppercase().contains(&category))
            .find_map(|line| leading_count(&ROOM_COUNT, line));
        if let Some(count) = qualified {
            return count;
        }
    }

    room_lines
        .iter()
        .find_map(|line| leading_count(&BARE_ROOM_COUNT, line))
        .unwrap_or(0)
}

/// Parse the first capture of `pattern` in `line`. The capture is all ASCII
/// digits, so the only parse failure is overflow, which saturates.
fn leading_count(pattern: &Regex, line: &str) -> Option<u32> {
    pattern
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|digits| digits.as_str().parse().unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(room_line: &str) -> String {
        format!(
            "\n      Hi All,\n\n      NEW DELAYED SQ ARR\n\n      NO. OF ROOMS\n      {}\n      DEPARTURE\n      MULTIPLE\n    ",
            room_line
        )
    }

    #[test]
    fn test_category_qualified_count() {
        assert_eq!(extract_room_count(&request("10 ROOMS (ECONOMY)"), "ECONOMY"), 10);
    }

    #[test]
    fn test_singular_room_token() {
        assert_eq!(extract_room_count(&request("10 ROOM (ECONOMY)"), "ECONOMY"), 10);
    }

    #[test]
    fn test_no_space_between_digits_and_token() {
        assert_eq!(extract_room_count(&request("10ROOMS (ECONOMY)"), "ECONOMY"), 10);
        assert_eq!(extract_room_count(&request("10ROOM (ECONOMY)"), "ECONOMY"), 10);
        assert_eq!(extract_room_count(&request("10ROOM"), "ECONOMY"), 10);
    }

    #[test]
    fn test_bare_count_fallback() {
        assert_eq!(extract_room_count(&request("5 ROOMS"), "ECONOMY"), 5);
        assert_eq!(extract_room_count(&request("10 ROOM"), "ECONOMY"), 10);
    }

    #[test]
    fn test_other_category_only_yields_zero() {
        assert_eq!(extract_room_count(&request("10 ROOMS (BUSINESS)"), "ECONOMY"), 0);
    }

    #[test]
    fn test_category_is_case_insensitive() {
        assert_eq!(extract_room_count(&request("10 ROOMS (ECONOMY)"), "economy"), 10);
        assert_eq!(extract_room_count(&request("7 rooms (Economy)"), "ECONOMY"), 7);
    }

    #[test]
    fn test_first_matching_category_line_wins() {
        let message = "NO. OF ROOMS\n02 ROOMS (BUSINESS)\n\nNO. OF ROOMS\n03 ROOMS (ECONOMY)\n04 ROOMS (ECONOMY)\n";
        assert_eq!(extract_room_count(message, "ECONOMY"), 3);
        assert_eq!(extract_room_count(message, "BUSINESS"), 2);
    }

    #[test]
    fn test_crlf_line_endings() {
        let message = "Hi All,\r\nNO. OF ROOMS\r\n4 ROOMS (ECONOMY)\r\nDEPARTURE\r\n";
        assert_eq!(extract_room_count(message, "ECONOMY"), 4);
    }

    #[test]
    fn test_qualified_match_ignores_trailing_text() {
        let message = "6 ROOMS (ECONOMY) PLEASE CONFIRM ASAP";
        assert_eq!(extract_room_count(message, "ECONOMY"), 6);
    }

    #[test]
    fn test_fallback_requires_count_at_line_end() {
        assert_eq!(extract_room_count("6 ROOMS PLEASE", "ECONOMY"), 0);
        assert_eq!(extract_room_count("6 ROOMS   ", "ECONOMY"), 6);
    }

    #[test]
    fn test_empty_category_uses_fallback_only() {
        assert_eq!(extract_room_count("8 ROOMS (ECONOMY)\n3 ROOMS", ""), 3);
    }

    #[test]
    fn test_category_is_matched_untrimmed() {
        assert_eq!(extract_room_count("8 ROOMS ECONOMY", " ECONOMY"), 8);
        assert_eq!(extract_room_count("8 ROOMS (ECONOMY)", " ECONOMY"), 0);
        assert_eq!(extract_room_count("8 ROOMS (ECONOMY)\n3 ROOMS", "   "), 3);
    }

    #[test]
    fn test_category_line_without_digits_falls_through() {
        let message = "ROOMS FOR ECONOMY CREW\n2 ROOMS";
        assert_eq!(extract_room_count(message, "ECONOMY"), 2);
    }

    #[test]
    fn test_no_room_lines() {
        assert_eq!(extract_room_count("", "ECONOMY"), 0);
        assert_eq!(extract_room_count("hello\nworld 12", "ECONOMY"), 0);
    }

    #[test]
    fn test_overflowing_count_saturates() {
        let message = "99999999999 ROOMS (ECONOMY)\n3 ROOMS (ECONOMY)";
        assert_eq!(extract_room_count(message, "ECONOMY"), u32::MAX);
        assert_eq!(extract_room_count("2 ROOMS\n99999999999 ROOMS", ""), 2);
        assert_eq!(extract_room_count("99999999999 ROOMS\n2 ROOMS", ""), u32::MAX);
    }

    #[test]
    fn test_non_ascii_digits_are_ignored() {
        assert_eq!(extract_room_count("٣ ROOMS (ECONOMY)", "ECONOMY"), 0);
    }

    #[test]
    fn test_extractor_is_idempotent() {
        let extractor = RoomCountExtractor::new("business");
        let message = request("02 ROOMS (BUSINESS)");
        assert_eq!(extractor.extract(&message), 2);
        assert_eq!(extractor.extract(&message), extractor.extract(&message));
        assert_eq!(extractor.category(), "business");
    }

    #[test]
    fn test_default_extractor_targets_economy() {
        let extractor = RoomCountExtractor::default();
        assert_eq!(extractor.category(), DEFAULT_ROOM_CATEGORY);
        assert_eq!(extractor.extract("9 ROOMS (ECONOMY)"), 9);
    }
}
