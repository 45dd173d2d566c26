use std::borrow::Cow;

use unicode_general_category::{get_general_category, GeneralCategory};

/// Estimates the rendered width of a single line of text.
///
/// There is no font available when the card is generated, so every character
/// gets a weight relative to the font size and the weights are summed up:
///
/// - whitespace, including the U+001C..U+001F separators : 0.33
/// - code points from U+1100 on (Hangul, CJK, most emoji) : 1.0
/// - uppercase letters : 0.72
/// - lowercase letters and digits (vulgar fractions are not digits) : 0.62
/// - anything else : 0.7
///
/// # Arguments
///
/// * `text` - The text to measure
/// * `font_size` - The font size the text is rendered with
///
/// # Returns
///
/// The estimated width, truncated to an integer
///
/// # Examples
///
/// ```
/// use ytcard::string_utils::estimate_text_width;
///
/// assert_eq!(estimate_text_width("hi", 18), 22);
/// assert_eq!(estimate_text_width("안녕", 18), 36);
/// assert_eq!(estimate_text_width("", 18), 0);
/// ```
pub fn estimate_text_width(text: &str, font_size: u32) -> u32 {
    let mut w = 0.0_f64;
    for ch in text.chars() {
        w += if is_space(ch) {
            0.33
        } else if ch as u32 >= 0x1100 {
            1.0
        } else if ch.is_uppercase() {
            0.72
        } else if ch.is_lowercase() || is_digit(ch) {
            0.62
        } else {
            0.7
        };
    }
    (w * font_size as f64) as u32
}

fn is_space(ch: char) -> bool {
    ch.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&ch)
}

// Decimal digits plus the superscripts below U+1100 that count as digits.
fn is_digit(ch: char) -> bool {
    get_general_category(ch) == GeneralCategory::DecimalNumber
        || matches!(ch, '\u{b2}' | '\u{b3}' | '\u{b9}')
}

/// Escapes a value so it can be placed inside SVG text or a quoted attribute.
///
/// # Examples
///
/// ```
/// use ytcard::string_utils::escape_markup;
///
/// assert_eq!(escape_markup("Tom & \"Jerry\" <3"), "Tom &amp; &quot;Jerry&quot; &lt;3");
/// assert_eq!(escape_markup("plain"), "plain");
/// ```
pub fn escape_markup(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 16);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_text_width() {
        // Lowercase and digits
        assert_eq!(estimate_text_width("hi", 18), 22);
        assert_eq!(estimate_text_width("42", 18), 22);

        // Whitespace
        assert_eq!(estimate_text_width("a b", 18), 28);
        assert_eq!(estimate_text_width(" ", 18), 5);
        assert_eq!(estimate_text_width("\u{1c}", 18), 5);
        assert_eq!(estimate_text_width("\u{1f}", 18), 5);

        // Superscripts are digits, fractions are not
        assert_eq!(estimate_text_width("²", 18), 11);
        assert_eq!(estimate_text_width("½", 18), 12);
        assert_eq!(estimate_text_width("٣", 18), 11);

        // Uppercase and punctuation
        assert_eq!(estimate_text_width("Hi!", 18), 36);
        assert_eq!(estimate_text_width("-", 18), 12);

        // Wide characters
        assert_eq!(estimate_text_width("안녕", 18), 36);
        assert_eq!(estimate_text_width("こんにちは", 18), 90);
        assert_eq!(estimate_text_width("🦀", 18), 18);

        // Font size scales the estimate
        assert_eq!(estimate_text_width("hi", 36), 44);
        assert_eq!(estimate_text_width("", 18), 0);
    }

    #[test]
    fn test_estimate_text_width_is_deterministic() {
        let title = "Nujabes - Aruarian Dance (feat. 안녕) [Official]";
        let first = estimate_text_width(title, 18);
        for _ in 0..10 {
            assert_eq!(estimate_text_width(title, 18), first);
        }
    }

    #[test]
    fn test_escape_markup() {
        assert_eq!(escape_markup("a & b"), "a &amp; b");
        assert_eq!(escape_markup("<svg>"), "&lt;svg&gt;");
        assert_eq!(escape_markup("it's \"quoted\""), "it&#39;s &quot;quoted&quot;");
        assert_eq!(escape_markup("안녕 🦀"), "안녕 🦀");

        // Already escaped text is escaped again
        assert_eq!(escape_markup("&amp;"), "&amp;amp;");

        // No allocation when nothing needs escaping
        assert!(matches!(escape_markup("data:image/gif;base64,R0lG+/="), Cow::Borrowed(_)));
    }
}
