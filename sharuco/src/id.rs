use nanoid::nanoid;

/// Snippet id alphabet, without ambiguous glyphs.
const SNIPPET_ID_ALPHABET: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y',
    'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'j', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];
const SNIPPET_ID_LENGTH: usize = 20;

/// Generates a new snippet identifier.
pub fn generate_snippet_id() -> String {
    nanoid!(SNIPPET_ID_LENGTH, SNIPPET_ID_ALPHABET)
}
