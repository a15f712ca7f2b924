/// Compare two byte strings in constant time
///
/// Runs over the full length of both inputs regardless of where the first
/// mismatch is, so the comparison does not leak how much of a secret matched.
pub fn constant_time_eq(provided: &[u8], expected: &[u8]) -> bool {
    provided.len() == expected.len()
        && provided
            .iter()
            .zip(expected.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// Verify the admin API key
pub fn verify_api_key(provided: &str, expected: &str) -> bool {
    constant_time_eq(provided.as_bytes(), expected.as_bytes())
}
