//! Limits enforced while decoding untrusted update records.

/// Decode-time limits for a single update record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum number of changed property indices in one record.
    pub max_updated_props: usize,
    /// Maximum number of bytes in a decoded string value.
    pub max_string_bytes: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_updated_props: 4096,
            max_string_bytes: 511,
        }
    }
}

impl DecodeLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_updated_props: 64,
            max_string_bytes: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_are_reasonable() {
        let limits = DecodeLimits::default();
        assert!(limits.max_updated_props >= 1024);
        // The 9-bit string length prefix caps at 511 bytes.
        assert!(limits.max_string_bytes <= 511);
    }

    #[test]
    fn testing_limits_smaller() {
        let test_limits = DecodeLimits::for_testing();
        let default_limits = DecodeLimits::default();
        assert!(test_limits.max_updated_props < default_limits.max_updated_props);
        assert!(test_limits.max_string_bytes < default_limits.max_string_bytes);
    }
}
