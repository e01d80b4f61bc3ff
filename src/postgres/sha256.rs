use crate::transform::{Transform, full_column_name};

/// Hex SHA-256 digest of the value, truncated to `length` characters.
///
/// Uses `DIGEST` from the `pgcrypto` extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sha256 {
    length: usize,
}

impl Sha256 {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Transform for Sha256 {
    fn emit(&self, table: &str, column: &str) -> String {
        // SUBSTRING from position 0 loses one character: request length + 1
        format!(
            "SUBSTRING(ENCODE(DIGEST(({})::text, 'sha256'), 'hex'), 0, {})",
            full_column_name(table, column),
            self.length + 1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256() {
        assert_eq!(
            Sha256::new(7).emit("foo", "bar"),
            "SUBSTRING(ENCODE(DIGEST((foo.bar)::text, 'sha256'), 'hex'), 0, 8)"
        );
    }

    #[test]
    fn test_full_digest_length() {
        assert!(Sha256::new(64).emit("foo", "bar").ends_with(", 0, 65)"));
    }
}
