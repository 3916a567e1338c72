/// Characters suggestions are drawn from. Lowercase only, since names are
/// stored lowercased anyway.
const SUGGESTION_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| SUGGESTION_CHARSET[rand::random_range(0..SUGGESTION_CHARSET.len())] as char)
        .take(length.max(1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_code_length_and_charset() {
        let code = generate_random_code(8);
        assert_eq!(code.len(), 8);
        assert!(
            code.bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        );
    }

    #[test]
    fn test_zero_length_still_yields_a_code() {
        assert_eq!(generate_random_code(0).len(), 1);
    }
}
