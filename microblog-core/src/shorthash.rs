//! Compact, deterministic, non-cryptographic string digests
//!
//! A 32-bit wrapping string hash over UTF-16 code units, rendered in base 61.
//! Negative hashes are prefixed with `Z`, the one alphanumeric the base-61
//! digit table leaves out, so a sign never collides with a digit.

const DIGITS: &[u8; 61] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXY";
const RADIX: i64 = 61;

/// 32-bit string hash: `h = (h << 5) - h + unit`, wrapping.
pub fn hash32(text: &str) -> i32 {
    text.encode_utf16().fold(0i32, |h, unit| {
        (h << 5).wrapping_sub(h).wrapping_add(i32::from(unit))
    })
}

/// Short textual digest of `text`.
///
/// Empty for a zero hash; callers that need a fixed width pad the result.
pub fn digest(text: &str) -> String {
    render(hash32(text))
}

/// Base-61 rendering of a 32-bit hash, `Z` marking negatives.
pub fn render(hash: i32) -> String {
    let mut n = i64::from(hash).abs();
    let mut digits = Vec::new();

    while n > 0 {
        digits.push(DIGITS[(n % RADIX) as usize]);
        n /= RADIX;
    }
    if hash < 0 {
        digits.push(b'Z');
    }
    digits.reverse();

    // Every byte comes from an ASCII table
    digits.into_iter().map(char::from).collect()
}
