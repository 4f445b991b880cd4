//! Compound strings: an ordered list of strings packed into one cell.
//!
//! Elements are joined with `" , "`. Inside an element every backslash and
//! every comma is prefixed with a backslash, as is any whitespace at the very
//! start or end of the element, so the whitespace trimming done on decode can
//! only ever remove the padding around delimiters.
//!
//! Two shapes need a special form because they would otherwise both encode
//! to the empty string: the empty list is `""`, and a list holding a single
//! empty string is `" "`.

/// Element separator.
pub const DELIMITER: char = ',';

/// Escape character.
pub const ESCAPE: char = '\\';

const JOINER: &str = " , ";

/// Encode a list of strings into a single compound string
pub fn encode<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] if only.as_ref().is_empty() => " ".to_string(),
        _ => {
            let mut out = String::new();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(JOINER);
                }
                escape_into(item.as_ref(), &mut out);
            }
            out
        }
    }
}

fn escape_into(item: &str, out: &mut String) {
    let chars: Vec<char> = item.chars().collect();
    let lead = chars.iter().take_while(|c| c.is_whitespace()).count();
    let trail_start = chars.len() - chars.iter().rev().take_while(|c| c.is_whitespace()).count();

    for (i, &c) in chars.iter().enumerate() {
        let edge_space = c.is_whitespace() && (i < lead || i >= trail_start);
        if c == ESCAPE || c == DELIMITER || edge_space {
            out.push(ESCAPE);
        }
        out.push(c);
    }
}

/// Decode a compound string back into its list of strings
pub fn decode(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }

    let mut items = Vec::new();
    // (char, was escaped)
    let mut current: Vec<(char, bool)> = Vec::new();
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c == ESCAPE {
            match chars.next() {
                Some(next) => current.push((next, true)),
                // dangling escape at end of input is kept literally
                None => current.push((ESCAPE, true)),
            }
        } else if c == DELIMITER {
            items.push(finish_element(&current));
            current.clear();
        } else {
            current.push((c, false));
        }
    }
    items.push(finish_element(&current));
    items
}

fn finish_element(chars: &[(char, bool)]) -> String {
    let is_padding = |&(c, escaped): &(char, bool)| !escaped && c.is_whitespace();
    let start = chars.iter().take_while(|p| is_padding(p)).count();
    let end = chars.len() - chars[start..].iter().rev().take_while(|p| is_padding(p)).count();
    chars[start..end].iter().map(|&(c, _)| c).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn round_trip(items: &[&str]) {
        let owned: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        let encoded = encode(&owned);
        assert_eq!(decode(&encoded), owned, "encoded form was {:?}", encoded);
    }

    #[test]
    fn test_encode_pads_delimiter() {
        assert_eq!(encode(&["Aa", "Bb"]), "Aa , Bb");
        assert_eq!(encode(&["a,b"]), r"a\,b");
        assert_eq!(encode(&[r"c:\tmp"]), r"c:\\tmp");
    }

    #[test]
    fn test_empty_shapes() {
        assert_eq!(encode::<&str>(&[]), "");
        assert!(decode("").is_empty());
        assert_eq!(encode(&[""]), " ");
        assert_eq!(decode(" "), vec![String::new()]);
        round_trip(&["", ""]);
        round_trip(&["", "x", ""]);
    }

    #[test]
    fn test_decode_trims_padding_only() {
        assert_eq!(decode("a ,b,  c  "), vec!["a", "b", "c"]);
        assert_eq!(decode(r"\ a\ "), vec![" a "]);
    }

    #[test]
    fn test_escape_makes_any_char_literal() {
        assert_eq!(decode(r"\q\,\\"), vec![r"q,\"]);
        assert_eq!(decode(r"abc\"), vec![r"abc\"]);
    }

    #[test]
    fn test_awkward_elements_survive() {
        let awkward = [r"\", ",", r"\,", "", "Ciao, bella.", ",,", r"\\", r",\"];
        for s in awkward {
            round_trip(&["Aa", s, "Bb"]);
        }
        round_trip(&awkward);
        round_trip(&["Aa", "Bb"]);
        round_trip(&[" leading", "trailing\t", "  "]);
    }

    proptest! {
        #[test]
        fn prop_round_trip(items in prop::collection::vec(".*", 0..8)) {
            let encoded = encode(&items);
            prop_assert_eq!(decode(&encoded), items);
        }

        #[test]
        fn prop_round_trip_delimiter_heavy(
            items in prop::collection::vec(r"[\\, a]{0,6}", 0..6)
        ) {
            let encoded = encode(&items);
            prop_assert_eq!(decode(&encoded), items);
        }
    }
}
