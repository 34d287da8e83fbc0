//! Roll-number extraction from device labels.
//!
//! Discovery does not guarantee a usable label, so extraction is a pure
//! function over an optional input: an absent label, or a label matching
//! none of the rules, yields `None` rather than an error.

use crate::types::RollNumber;

/// Candidate prefixes for the prefixed-token rule, tried in order at each
/// position. `rollno` must come first so `RollNo_42` captures `42` rather
/// than `No_42`.
const PREFIXES: [&str; 2] = ["rollno", "roll"];

/// Extract a roll number from a device label.
///
/// Three rules are applied in fixed priority order; the first match wins and
/// results are never merged across rules:
///
/// 1. A case-insensitive `RollNo`/`ROLL` prefix anywhere in the label,
///    optionally followed by one separator (`_`, `-`, `:`), followed by a
///    run of word characters. The run is returned.
/// 2. A label consisting entirely of decimal digits is returned unchanged.
/// 3. A label of exactly two letters (either case) followed by 5-7 digits
///    is returned unchanged, case preserved.
///
/// # Examples
///
/// ```
/// use rollcall_types::matcher::extract;
///
/// assert_eq!(extract(Some("RollNo_12345")).unwrap().as_str(), "12345");
/// assert_eq!(extract(Some("20230042")).unwrap().as_str(), "20230042");
/// assert_eq!(extract(Some("cs2023001")).unwrap().as_str(), "cs2023001");
/// assert_eq!(extract(Some("Pixel 7")), None);
/// assert_eq!(extract(None), None);
/// ```
#[must_use]
pub fn extract(raw_label: Option<&str>) -> Option<RollNumber> {
    let label = raw_label?;

    if let Some(token) = prefixed_token(label) {
        return Some(RollNumber::new(token));
    }
    if is_bare_number(label) || is_department_code(label) {
        return Some(RollNumber::new(label));
    }
    None
}

/// Rule 1: find a `RollNo`/`ROLL` prefix anywhere in the label and capture
/// the token after it.
///
/// Matches `(?:RollNo|ROLL)[_\-:]?(\w+)` case-insensitively, including its
/// backtracking: the separator is consumed greedily, and if no word
/// characters follow it the match retries without consuming it (`_` is a
/// word character itself, so `RollNo_` captures `_`).
fn prefixed_token(label: &str) -> Option<&str> {
    let bytes = label.as_bytes();
    for start in 0..bytes.len() {
        for prefix in PREFIXES {
            let Some(rest) = match_prefix(&bytes[start..], prefix) else {
                continue;
            };
            if let Some(token) = capture_token(rest) {
                // Word runs are ASCII, so the slice is always valid UTF-8.
                return std::str::from_utf8(token).ok();
            }
        }
    }
    None
}

/// Case-insensitive ASCII prefix match; returns the remainder on success.
fn match_prefix<'a>(bytes: &'a [u8], prefix: &str) -> Option<&'a [u8]> {
    let prefix = prefix.as_bytes();
    if bytes.len() >= prefix.len() && bytes[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&bytes[prefix.len()..])
    } else {
        None
    }
}

/// Capture the token after a matched prefix: an optional single separator,
/// then a non-empty word run.
fn capture_token(rest: &[u8]) -> Option<&[u8]> {
    if let Some((&first, tail)) = rest.split_first()
        && is_separator(first)
    {
        let run = word_run(tail);
        if !run.is_empty() {
            return Some(run);
        }
    }
    let run = word_run(rest);
    (!run.is_empty()).then_some(run)
}

/// Longest leading run of word characters (ASCII letters, digits, `_`).
fn word_run(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .position(|&b| !is_word_byte(b))
        .unwrap_or(bytes.len());
    &bytes[..end]
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_separator(b: u8) -> bool {
    matches!(b, b'_' | b'-' | b':')
}

/// Rule 2: the whole label is one or more decimal digits.
fn is_bare_number(label: &str) -> bool {
    !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit())
}

/// Rule 3: exactly two letters followed by 5-7 digits, nothing else.
fn is_department_code(label: &str) -> bool {
    let bytes = label.as_bytes();
    if !(7..=9).contains(&bytes.len()) {
        return false;
    }
    let (letters, digits) = bytes.split_at(2);
    letters.iter().all(u8::is_ascii_alphabetic) && digits.iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(label: &str) -> Option<String> {
        extract(Some(label)).map(RollNumber::into_inner)
    }

    #[test]
    fn prefixed_labels_capture_the_token() {
        assert_eq!(extracted("RollNo_12345").as_deref(), Some("12345"));
        assert_eq!(extracted("ROLL-67890").as_deref(), Some("67890"));
        assert_eq!(extracted("roll:42A").as_deref(), Some("42A"));
        assert_eq!(extracted("rollno17").as_deref(), Some("17"));
        assert_eq!(extracted("My Phone ROLL_55").as_deref(), Some("55"));
    }

    #[test]
    fn prefix_match_is_case_insensitive() {
        assert_eq!(extracted("ROLLNO_42").as_deref(), Some("42"));
        assert_eq!(extracted("rOlLnO-42").as_deref(), Some("42"));
        assert_eq!(extracted("Roll:9").as_deref(), Some("9"));
    }

    #[test]
    fn token_stops_at_the_first_non_word_character() {
        assert_eq!(extracted("RollNo_12 extra").as_deref(), Some("12"));
        assert_eq!(extracted("ROLL:a_b-c").as_deref(), Some("a_b"));
    }

    #[test]
    fn bare_digit_labels_are_returned_unchanged() {
        assert_eq!(extracted("12345").as_deref(), Some("12345"));
        assert_eq!(extracted("7").as_deref(), Some("7"));
        assert_eq!(extracted("007").as_deref(), Some("007"));
    }

    #[test]
    fn department_codes_are_returned_with_case_preserved() {
        assert_eq!(extracted("CS2023001").as_deref(), Some("CS2023001"));
        assert_eq!(extracted("EE123456").as_deref(), Some("EE123456"));
        assert_eq!(extracted("ab12345").as_deref(), Some("ab12345"));
        assert_eq!(extracted("Xy1234567").as_deref(), Some("Xy1234567"));
    }

    #[test]
    fn department_code_shape_is_exact() {
        assert_eq!(extracted("CS1234"), None); // four digits
        assert_eq!(extracted("CS12345678"), None); // eight digits
        assert_eq!(extracted("C1234567"), None); // one letter
        assert_eq!(extracted("ABC12345"), None); // three letters
        assert_eq!(extracted("CS12345 "), None); // trailing space
        assert_eq!(extracted(" CS12345"), None); // leading space
    }

    #[test]
    fn prefix_rule_wins_over_later_rules() {
        // The token is captured by rule 1, not resolved by the digit rules
        // against the whole label.
        assert_eq!(extracted("RollNo_12345").as_deref(), Some("12345"));
        assert_eq!(extracted("ROLL_CS2023001").as_deref(), Some("CS2023001"));
    }

    #[test]
    fn unmatched_labels_yield_none() {
        assert_eq!(extract(None), None);
        assert_eq!(extracted(""), None);
        assert_eq!(extracted("Pixel 7"), None);
        assert_eq!(extracted("JBL Flip 5"), None);
        assert_eq!(extracted("123abc"), None);
        assert_eq!(extracted("12 34"), None);
    }

    #[test]
    fn separator_backtracking_retries_without_the_separator() {
        // `_` is itself a word character, so a dangling underscore is the
        // captured run when nothing follows it.
        assert_eq!(extracted("RollNo_").as_deref(), Some("_"));
        // A bare `RollNo` resolves through the `roll` alternative.
        assert_eq!(extracted("RollNo").as_deref(), Some("No"));
        // `-` and `:` are not word characters, so a dangling one fails.
        assert_eq!(extracted("ROLL-"), None);
        assert_eq!(extracted("ROLL"), None);
    }

    #[test]
    fn non_ascii_labels_do_not_panic() {
        assert_eq!(extracted("émile's phone"), None);
        assert_eq!(extracted("端末ROLL:9").as_deref(), Some("9"));
    }
}
