//! Document reference numbering (`DEV-2026-0001`, `FAC-2026-0042`).
//!
//! Sequence values are allocated by the database per (kind, year); this
//! module only formats references.

/// Reference prefix for quotes.
pub const PREFIX_DEVIS: &str = "DEV";

/// Reference prefix for invoices.
pub const PREFIX_FACTURE: &str = "FAC";

/// Minimum number of digits of the sequence part.
pub const SEQUENCE_WIDTH: usize = 4;

/// Format a document reference.
pub fn format_reference(prefix: &str, year: i32, sequence: i64) -> String {
    format!("{prefix}-{year}-{sequence:0width$}", width = SEQUENCE_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_sequence_to_four_digits() {
        assert_eq!(format_reference(PREFIX_DEVIS, 2026, 1), "DEV-2026-0001");
        assert_eq!(format_reference(PREFIX_FACTURE, 2026, 42), "FAC-2026-0042");
    }

    #[test]
    fn long_sequences_are_not_truncated() {
        assert_eq!(format_reference(PREFIX_FACTURE, 2026, 12345), "FAC-2026-12345");
    }
}
