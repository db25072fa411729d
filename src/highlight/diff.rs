//! Digit diffing between two formatted prices.

/// Number of trailing digits that changed between two diff-form prices.
///
/// Only ASCII digits are compared; signs and the decimal point are ignored.
/// The shorter digit string is left-padded with zeros, so a carry such as
/// `999.99 -> 1000.00` reports every digit as changed. Never returns less
/// than 1.
pub fn changed_digits_from_end(previous_diff: &str, next_diff: &str) -> usize {
    let previous = digits(previous_diff);
    let next = digits(next_diff);
    let width = previous.len().max(next.len());

    let previous = left_pad(previous, width);
    let next = left_pad(next, width);

    let changed = previous
        .iter()
        .zip(next.iter())
        .position(|(a, b)| a != b)
        .map_or(0, |first| width - first);

    changed.max(1)
}

/// Byte offset in `display` where the last `digits_from_end` digits start.
///
/// Separators, signs and currency symbols are skipped while counting. When
/// the string holds fewer digits than requested the whole string is the
/// suffix and the offset is 0.
pub fn suffix_split_index(display: &str, digits_from_end: usize) -> usize {
    if digits_from_end == 0 {
        return display.len();
    }

    let mut counted = 0;
    for (idx, ch) in display.char_indices().rev() {
        if ch.is_ascii_digit() {
            counted += 1;
            if counted == digits_from_end {
                return idx;
            }
        }
    }
    0
}

/// Clamps `index` into `display` and backs off to a char boundary.
pub fn clamp_split_index(display: &str, index: usize) -> usize {
    let mut index = index.min(display.len());
    while !display.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn digits(s: &str) -> Vec<u8> {
    s.bytes().filter(u8::is_ascii_digit).collect()
}

fn left_pad(mut digits: Vec<u8>, width: usize) -> Vec<u8> {
    if digits.len() < width {
        let mut padded = vec![b'0'; width - digits.len()];
        padded.append(&mut digits);
        padded
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cents_change() {
        assert_eq!(changed_digits_from_end("1234.56", "1234.99"), 2);
        assert_eq!(changed_digits_from_end("1234.56", "1234.57"), 1);
        assert_eq!(changed_digits_from_end("1234.56", "1244.56"), 4);
    }

    #[test]
    fn carry_pads_shorter_value() {
        // "099999" vs "100000"
        assert_eq!(changed_digits_from_end("999.99", "1000.00"), 6);
        // "100000" vs "099999"
        assert_eq!(changed_digits_from_end("1000.00", "999.99"), 6);
        assert_eq!(changed_digits_from_end("9.5", "10.5"), 3);
    }

    #[test]
    fn identical_digits_still_mark_one() {
        assert_eq!(changed_digits_from_end("1.00", "1.00"), 1);
        // sign flips leave the digits untouched
        assert_eq!(changed_digits_from_end("-0.50", "0.50"), 1);
    }

    #[test]
    fn split_skips_grouping_separators() {
        let display = "1,234.99";
        assert_eq!(suffix_split_index(display, 2), 6);
        assert_eq!(&display[..6], "1,234.");
        assert_eq!(suffix_split_index(display, 3), 4);
        assert_eq!(suffix_split_index(display, 4), 3);
        assert_eq!(suffix_split_index(display, 5), 2);
        assert_eq!(suffix_split_index(display, 6), 0);
    }

    #[test]
    fn split_saturates_at_start() {
        assert_eq!(suffix_split_index("999.99", 6), 0);
        assert_eq!(suffix_split_index("-1.5", 5), 0);
    }

    #[test]
    fn split_respects_multibyte_separators() {
        let display = "1\u{202f}234,50";
        let idx = suffix_split_index(display, 5);
        assert!(display.is_char_boundary(idx));
        assert_eq!(&display[idx..], "234,50");
    }

    #[test]
    fn clamp_backs_off_to_char_boundary() {
        let display = "1\u{202f}234";
        assert_eq!(clamp_split_index(display, 2), 1);
        assert_eq!(clamp_split_index(display, 99), display.len());
        assert_eq!(clamp_split_index("", 3), 0);
    }
}
