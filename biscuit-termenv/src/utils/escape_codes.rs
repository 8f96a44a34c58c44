//! ANSI escape code constants and removal.
//!
//! ## Examples
//!
//! ```
//! use biscuit_termenv::utils::escape_codes::{strip, ERASE_LINE};
//!
//! assert_eq!(strip("\x1b[31mHello, World!\x1b[0m"), "Hello, World!");
//! assert_eq!(strip(format!("{ERASE_LINE}done")), "done");
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// Clears the screen and moves the cursor home.
pub const RESET: &str = "\x1B[2J\x1B[0;0H";
/// Erases the whole screen.
pub const ERASE_SCREEN: &str = "\x1B[2J";
/// Erases from the start of the screen to the cursor.
pub const ERASE_SCREEN_LEFT: &str = "\x1B[1J";
/// Erases from the cursor to the end of the screen.
pub const ERASE_SCREEN_RIGHT: &str = "\x1B[J";
/// Erases the current line.
pub const ERASE_LINE: &str = "\x1B[2K";
/// Erases from the start of the line to the cursor.
pub const ERASE_LINE_LEFT: &str = "\x1B[1K";
/// Erases from the cursor to the end of the line.
pub const ERASE_LINE_RIGHT: &str = "\x1B[K";

/// Regex pattern for ANSI escape sequences.
///
/// Matches:
/// - OSC sequences: `\x1b]` followed by the shortest run of anything up to
///   a string terminator: BEL (`\x07`), ST (`\x1b\\`) or the C1 ST (`\u{9c}`)
/// - CSI and related sequences: `\x1b` or the C1 CSI (`\u{9b}`), optional
///   introducer/intermediate bytes (`[ ] ( ) # ; ?`), optional numeric
///   parameters separated by `;` or `:`, then exactly one final byte
pub static ANSI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\x1B\](?s:.)*?(?:\x07|\x1B\\|\x{9C})",          // OSC sequences
        r"|[\x1B\x{9B}][\[\]()#;?]*",                        // CSI introducer
        r"(?:[0-9]{1,4}(?:[;:][0-9]{0,4})*)?",               // parameters
        r"[0-9A-PR-TZcf-nq-uy=><~]",                         // final byte
    ))
    .expect("Invalid ANSI escape regex")
});

/// Longest span, in bytes, on either side of a removed sequence that is
/// rejoined when looking for a spliced sequence.
const SPLICE_WINDOW: usize = 256;

/// Strips **all** ANSI escape sequences out of the passed in text.
///
/// Every other character, including multi-byte Unicode, is kept in order.
/// Removing a sequence can splice its neighbours into a new one; those are
/// removed in the same left-to-right scan, so the result is a fixed point.
pub fn strip<T: AsRef<str>>(text: T) -> String {
    let mut current = strip_pass(text.as_ref());
    // only splices wider than `SPLICE_WINDOW` survive a pass
    while ANSI_REGEX.is_match(&current) {
        current = strip_pass(&current);
    }
    current
}

fn is_introducer(c: char) -> bool {
    c == '\x1B' || c == '\u{9B}'
}

/// One scan over `text`. Clean text is appended to `out`; after every
/// removal the tail of `out` is rejoined with the head of the input.
fn strip_pass(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // byte offsets of the escape introducers in `out`
    let mut introducers: Vec<usize> = Vec::new();
    let mut rest = text;

    while let Some(m) = ANSI_REGEX.find(rest) {
        push_clean(&mut out, &mut introducers, &rest[..m.start()]);
        rest = &rest[m.end()..];
        while let Some(consumed) = remove_splice(&mut out, &mut introducers, rest) {
            rest = &rest[consumed..];
        }
    }
    push_clean(&mut out, &mut introducers, rest);
    out
}

fn push_clean(out: &mut String, introducers: &mut Vec<usize>, clean: &str) {
    let base = out.len();
    introducers.extend(
        clean
            .char_indices()
            .filter(|(_, c)| is_introducer(*c))
            .map(|(idx, _)| base + idx),
    );
    out.push_str(clean);
}

/// Removes a sequence that starts at the last introducer in `out` and ends
/// in `rest`, returning how many bytes of `rest` it consumed.
fn remove_splice(out: &mut String, introducers: &mut Vec<usize>, rest: &str) -> Option<usize> {
    let start = *introducers.last()?;
    let carry = out.len() - start;
    if carry > SPLICE_WINDOW || rest.is_empty() {
        return None;
    }

    let mut end = rest.len().min(SPLICE_WINDOW);
    while !rest.is_char_boundary(end) {
        end -= 1;
    }
    let joined = format!("{}{}", &out[start..], &rest[..end]);
    let m = ANSI_REGEX.find(&joined)?;
    // a match touching a cut window may be longer in the full text
    let truncated = end < rest.len() && m.end() == joined.len();
    if m.start() != 0 || m.end() <= carry || truncated {
        return None;
    }

    out.truncate(start);
    introducers.pop();
    Some(m.end() - carry)
}

/// Detects if the content contains any ANSI escape sequences.
///
/// ```
/// use biscuit_termenv::utils::escape_codes::has_escape_codes;
///
/// assert!(!has_escape_codes("plain text"));
/// assert!(has_escape_codes("\x1b[31mred\x1b[0m"));
/// assert!(has_escape_codes("\x1b]8;;http://example.com\x07link\x1b]8;;\x07"));
/// ```
pub fn has_escape_codes<T: AsRef<str>>(text: T) -> bool {
    ANSI_REGEX.is_match(text.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    // === constants ===

    #[test]
    fn test_constants() {
        assert_eq!(RESET, "\x1B[2J\x1B[0;0H");
        assert_eq!(ERASE_SCREEN, "\x1B[2J");
        assert_eq!(ERASE_SCREEN_LEFT, "\x1B[1J");
        assert_eq!(ERASE_SCREEN_RIGHT, "\x1B[J");
        assert_eq!(ERASE_LINE, "\x1B[2K");
        assert_eq!(ERASE_LINE_LEFT, "\x1B[1K");
        assert_eq!(ERASE_LINE_RIGHT, "\x1B[K");
    }

    #[test]
    fn test_constants_are_fully_stripped() {
        for code in [
            RESET,
            ERASE_SCREEN,
            ERASE_SCREEN_LEFT,
            ERASE_SCREEN_RIGHT,
            ERASE_LINE,
            ERASE_LINE_LEFT,
            ERASE_LINE_RIGHT,
        ] {
            assert_eq!(strip(code), "", "{code:?}");
        }
    }

    // === strip ===

    #[test]
    fn test_strip_plain() {
        assert_eq!(strip("Hello, World!"), "Hello, World!");
        assert_eq!(strip(""), "");
    }

    #[test]
    fn test_strip_sgr() {
        assert_eq!(strip("\x1b[31mHello, World!\x1b[0m"), "Hello, World!");
        assert_eq!(strip("\x1b[1;4;33mwarning\x1b[0m"), "warning");
        assert_eq!(
            strip("\x1b[31m\x1b[1mBold Red\x1b[0m\x1b[32m Green\x1b[0m"),
            "Bold Red Green"
        );
    }

    #[test]
    fn test_strip_extended_colors() {
        assert_eq!(strip("\x1b[38;2;255;0;0mRGB Red\x1b[0m"), "RGB Red");
        assert_eq!(strip("\x1b[38;5;196mred\x1b[0m"), "red");
        assert_eq!(strip("\x1b[38:2::255:0:0mcolon\x1b[0m"), "colon");
    }

    #[test]
    fn test_strip_does_not_over_consume() {
        assert_eq!(strip("\x1b[0mX"), "X");
        assert_eq!(strip("\x1b[0m1"), "1");
        assert_eq!(strip("\x1b[31mm"), "m");
    }

    #[test]
    fn test_strip_cursor_and_erase() {
        assert_eq!(strip("\x1b[Hstart"), "start");
        assert_eq!(strip("pre\x1b[2Jpost"), "prepost");
        assert_eq!(strip("\x1b[5Aup\x1b[10Bdown"), "updown");
        assert_eq!(strip("\x1b[12;40Hat"), "at");
    }

    #[test]
    fn test_strip_private_modes() {
        assert_eq!(strip("\x1b[?25lhidden\x1b[?25h"), "hidden");
        assert_eq!(strip("\x1b[?1049hscreen\x1b[?1049l"), "screen");
    }

    #[test]
    fn test_strip_charset_selection() {
        assert_eq!(strip("\x1b(Bplain"), "plain");
    }

    #[test]
    fn test_strip_osc_bel() {
        assert_eq!(strip("\x1b]0;window title\x07text"), "text");
        assert_eq!(
            strip("\x1b]8;;https://example.com\x07click\x1b]8;;\x07"),
            "click"
        );
    }

    #[test]
    fn test_strip_osc_st() {
        assert_eq!(
            strip("\x1b]8;;https://example.com\x1b\\click\x1b]8;;\x1b\\"),
            "click"
        );
        assert_eq!(strip("\x1b]8;id=1;https://a.b/c?d=e&f=g\x1b\\x"), "x");
    }

    #[test]
    fn test_strip_osc_c1_terminator() {
        assert_eq!(strip("\x1b]0;title\u{9c}text"), "text");
    }

    #[test]
    fn test_strip_c1_csi() {
        assert_eq!(strip("\u{9b}31mred\u{9b}0m"), "red");
    }

    #[test]
    fn test_strip_preserves_unicode() {
        assert_eq!(strip("\x1b[32m你好\x1b[0m"), "你好");
        assert_eq!(strip("\x1b[31m\u{1F389}\x1b[0m"), "\u{1F389}");
        assert_eq!(strip("héllo \x1b[1mwörld\x1b[0m"), "héllo wörld");
    }

    #[test]
    fn test_strip_multiline_in_one_pass() {
        let content = "\x1b[31mred\x1b[0m\n\x1b[32mgreen\x1b[0m\n\x1b[34mblue\x1b[0m";
        assert_eq!(strip(content), "red\ngreen\nblue");
    }

    #[test]
    fn test_strip_spliced_sequence() {
        // removing the inner sequence leaves a new `\x1b[0m` behind
        assert_eq!(strip("\x1b\x1b[0m[0mX"), "X");
    }

    #[test]
    fn test_strip_splice_after_text() {
        assert_eq!(strip("a\x1b\x1b[31m[0mb"), "ab");
        assert_eq!(strip("\x1b\x1b\x1b[1m[2m[3mtext"), "text");
    }

    #[test]
    fn test_strip_deeply_spliced_input_in_one_pass() {
        // ~100 KB where every removal splices the next sequence together
        let depth = 33_000;
        let nested = format!("{}{}done", "\x1b".repeat(depth), "[0m".repeat(depth));

        let once = strip_pass(&nested);
        assert_eq!(once, "done");
        assert!(!ANSI_REGEX.is_match(&once));
        assert_eq!(strip(&nested), "done");
    }

    #[test]
    fn test_strip_wide_splice_still_converges() {
        let params = "1;".repeat(200);
        let nested = format!("\x1b\x1b[0m[{params}mX");
        assert_eq!(strip(&nested), "X");
    }

    #[test]
    fn test_strip_accepts_owned_strings() {
        let owned = String::from("\x1b[1mbold\x1b[0m");
        assert_eq!(strip(&owned), "bold");
        assert_eq!(strip(owned), "bold");
    }

    // === has_escape_codes ===

    #[test]
    fn test_has_escape_codes_plain_text() {
        assert!(!has_escape_codes("plain text"));
        assert!(!has_escape_codes(""));
        assert!(!has_escape_codes("hello\nworld"));
    }

    #[test]
    fn test_has_escape_codes_sgr() {
        assert!(has_escape_codes("\x1b[31m"));
        assert!(has_escape_codes("\x1b[0m"));
        assert!(has_escape_codes("\x1b[38;5;196m"));
        assert!(has_escape_codes("\x1b[38;2;255;0;0m"));
    }

    #[test]
    fn test_has_escape_codes_osc() {
        assert!(has_escape_codes("\x1b]0;title\x07"));
        assert!(has_escape_codes("\x1b]52;c;base64\x07"));
    }

    #[test]
    fn test_has_escape_codes_embedded_in_text() {
        assert!(has_escape_codes("Hello \x1b[31mworld\x1b[0m!"));
        assert!(has_escape_codes("prefix\x1b[32mtext\x1b[0msuffix"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Text dense in escape-looking characters.
    const ESCAPE_SOUP: &str = "[\\x1b\\x9b\\x9c\\x07\\[\\]\\\\();?:0-9a-zA-Z ~]{0,40}";

    proptest! {
        /// Property: strip never panics on any input
        #[test]
        fn strip_never_panics(s in ".*") {
            let _ = strip(&s);
        }

        /// Property: strip is idempotent
        #[test]
        fn strip_is_idempotent(s in ESCAPE_SOUP) {
            let once = strip(&s);
            prop_assert_eq!(strip(&once), once);
        }

        /// Property: strip is idempotent on arbitrary text
        #[test]
        fn strip_is_idempotent_any(s in ".*") {
            let once = strip(&s);
            prop_assert_eq!(strip(&once), once);
        }

        /// Property: strip never lengthens its input
        #[test]
        fn strip_never_lengthens(s in ESCAPE_SOUP) {
            prop_assert!(strip(&s).len() <= s.len());
        }

        /// Property: text without an escape introducer is returned unchanged
        #[test]
        fn clean_text_round_trips(s in "[^\\x1b\\x9b]*") {
            prop_assert_eq!(strip(&s), s.clone());
            prop_assert!(!has_escape_codes(&s));
        }

        /// Property: wrapping text in SGR codes strips back to the text
        #[test]
        fn sgr_wrapped_text_strips_to_text(
            text in "[a-zA-Z0-9 ]{0,20}",
            code in 0u8..108
        ) {
            let styled = format!("\x1b[{}m{}\x1b[0m", code, text);
            prop_assert!(has_escape_codes(&styled));
            prop_assert_eq!(strip(&styled), text);
        }

        /// Property: OSC8 links strip down to their label
        #[test]
        fn osc8_links_strip_to_label(
            url in "https://[a-z]{1,10}\\.com/[a-z0-9/]{0,10}",
            label in "[a-zA-Z ]{0,12}"
        ) {
            let link = format!("\x1b]8;;{}\x07{}\x1b]8;;\x07", url, label);
            prop_assert_eq!(strip(&link), label);
        }
    }
}
