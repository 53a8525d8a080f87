use uuid::Uuid;

pub const CODE_LEN: usize = 10;

/// Public booking reference: the leading hex digits of a random v4 UUID,
/// uppercased. 40 bits of randomness, the storage unique index settles
/// the rare collision.
pub fn generate_code() -> String {
    Uuid::new_v4().simple().to_string()[..CODE_LEN].to_uppercase()
}

pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LEN
        && code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}
