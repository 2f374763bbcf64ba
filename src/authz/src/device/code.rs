//! Device and user code generation and normalization
//!
//! User codes are short, human-enterable strings drawn from a base-32
//! alphabet with the visually ambiguous symbols removed (`I`, `L`, `O`, `U`),
//! displayed in groups of four for entry. The normalization transform is the
//! single bit-exact contract this subsystem owns: uppercase, map ambiguous
//! characters onto the canonical alphabet, strip grouping punctuation, and
//! always compare normalized-to-normalized.
//!
//! Device codes are opaque, machine-held, and never normalized.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::{thread_rng, Rng, RngCore};

/// Canonical user-code alphabet (Crockford base-32)
pub const USER_CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Grouping size for human display (`XXXX-XXXX`)
const DISPLAY_GROUP: usize = 4;

/// Entropy of the opaque device code, in bytes
const DEVICE_CODE_BYTES: usize = 32;

/// Generates a fresh user code of `len` symbols, already normalized
pub fn generate_user_code(len: usize) -> String {
    let mut rng = thread_rng();
    (0..len)
        .map(|_| USER_CODE_ALPHABET[rng.gen_range(0..USER_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Generates the opaque device code handed to the polling device
pub fn generate_device_code() -> String {
    let mut bytes = [0u8; DEVICE_CODE_BYTES];
    thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Formats a normalized user code for human entry (`ABCD-EFGH`)
pub fn format_user_code(code: &str) -> String {
    code.as_bytes()
        .chunks(DISPLAY_GROUP)
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("-")
}

/// Normalizes human-entered input onto the canonical alphabet
///
/// Uppercases, drops grouping punctuation and whitespace, and maps the
/// ambiguous characters: `O` to `0`, `I` and `L` to `1`. Lookups never match
/// on raw, unnormalized input.
pub fn normalize_user_code(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' ' | '\t'))
        .map(|c| match c.to_ascii_uppercase() {
            'O' => '0',
            'I' | 'L' => '1',
            upper => upper,
        })
        .collect()
}
