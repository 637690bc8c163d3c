/// Base58 alphabet without the look-alike glyphs `0`, `O`, `I` and `l`
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const BASE: u64 = 58;

/// Converts a number to its base58 representation. Zero encodes to "1".
pub fn encode(mut num: u64) -> String {
    if num == 0 {
        return (ALPHABET[0] as char).to_string();
    }

    let mut result = Vec::new();

    while num > 0 {
        result.push(ALPHABET[(num % BASE) as usize] as char);
        num /= BASE;
    }

    result.iter().rev().collect()
}

/// Position of a symbol in the alphabet, `None` for anything outside it
pub fn index_of(c: char) -> Option<usize> {
    if !c.is_ascii() {
        return None;
    }
    ALPHABET.iter().position(|&b| b == c as u8)
}

/// Checks that a string is non-empty and made only of alphabet symbols
pub fn is_base58(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| index_of(c).is_some())
}

/// Decodes a base58 string back into a number.
///
/// Returns `None` when a symbol is outside the alphabet or the value does
/// not fit in a `u64`.
pub fn decode(s: &str) -> Option<u64> {
    if s.is_empty() {
        return None;
    }

    s.chars().try_fold(0u64, |acc, c| {
        let digit = index_of(c)? as u64;
        acc.checked_mul(BASE)?.checked_add(digit)
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_alphabet_has_58_unique_symbols() {
        let unique: HashSet<_> = ALPHABET.iter().collect();
        assert_eq!(unique.len(), 58);
        for ambiguous in [b'0', b'O', b'I', b'l'] {
            assert!(!ALPHABET.contains(&ambiguous));
        }
    }

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode(0), "1");
        assert_eq!(encode(57), "z");
        assert_eq!(encode(58), "21");
        assert_eq!(encode(9000), "3gB");
        assert_eq!(encode(58 * 58 - 1), "zz");
    }

    #[test]
    fn test_decode_inverts_encode() {
        for n in [0u64, 1, 57, 58, 9000, 1_000_000, u64::MAX] {
            assert_eq!(decode(&encode(n)), Some(n));
        }
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("0"), None);
        assert_eq!(decode("abcl"), None);
        assert_eq!(decode("é"), None);
        // one symbol past u64::MAX
        assert_eq!(decode(&format!("{}1", encode(u64::MAX))), None);
    }

    #[test]
    fn test_is_base58() {
        assert!(is_base58("Abc123"));
        assert!(!is_base58(""));
        assert!(!is_base58("0OIl"));
        assert!(!is_base58("ab-c"));
    }
}
