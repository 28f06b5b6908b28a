/// Takes a set of sets of byte characters, return a 2^8 array with non-zero
/// values at the indices corresponding to the character byte values.
const fn char_table(sets: &[&[u8]]) -> [u8; 256] {
    let mut table = [0u8; 256];

    let mut i = 0;
    while i < sets.len() {
        let set: &[u8] = sets[i];

        let mut j = 0;
        while j < set.len() {
            let c: u8 = set[j];
            table[c as usize] = c;
            j += 1;
        }

        i += 1;
    }

    table
}

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

const UNRESERVED: &[u8] = b"-._~";

const PCT_ENCODED: &[u8] = b"%";

const SUB_DELIMS: &[u8] = b"!$&'()+,;=";

const WILDCARDS: &[u8] = b"*?";

const PATH_CHARS: [u8; 256] = char_table(&[
    ALPHANUMERIC, UNRESERVED, PCT_ENCODED, SUB_DELIMS, b":@/",

    // Seen unencoded in real-world page paths.
    b"[]",
]);

const PATTERN_CHARS: [u8; 256] = char_table(&[&PATH_CHARS, WILDCARDS]);

#[inline(always)]
pub const fn is_path_char(&c: &u8) -> bool { PATH_CHARS[c as usize] != 0 }

#[inline(always)]
pub const fn is_pattern_char(&c: &u8) -> bool { PATTERN_CHARS[c as usize] != 0 }
