//! Invoice number generation
//!
//! Numbers follow `INV-{year}-{seq}` with the sequence zero-padded to
//! three digits and scoped to the calendar year. The function here is the
//! pure max-scan step; uniqueness under concurrent creation is enforced
//! by the database's unique index on the number column, with the caller
//! retrying allocation on conflict.

/// Computes the next invoice number for the given year
///
/// Scans `existing` for numbers with the `INV-{year}` prefix, extracts
/// the trailing sequence of each, and increments the maximum (starting
/// from zero when none match). Numbers whose trailing segment is not
/// numeric are ignored.
pub fn next_invoice_number<'a, I>(existing: I, year: i32) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = format!("INV-{year}");

    let max_seq = existing
        .into_iter()
        .filter(|number| number.starts_with(&prefix))
        .filter_map(|number| number.rsplit('-').next())
        .filter_map(|seq| seq.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    format!("INV-{year}-{:03}", max_seq + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number_of_the_year() {
        assert_eq!(next_invoice_number([], 2026), "INV-2026-001");
    }

    #[test]
    fn test_increments_past_gaps() {
        let existing = ["INV-2026-001", "INV-2026-003"];
        assert_eq!(next_invoice_number(existing, 2026), "INV-2026-004");
    }

    #[test]
    fn test_scoped_to_year() {
        let existing = ["INV-2025-087", "INV-2026-002"];
        assert_eq!(next_invoice_number(existing, 2026), "INV-2026-003");
        assert_eq!(next_invoice_number(existing, 2027), "INV-2027-001");
    }

    #[test]
    fn test_ignores_malformed_sequences() {
        let existing = ["INV-2026-abc", "INV-2026-009"];
        assert_eq!(next_invoice_number(existing, 2026), "INV-2026-010");
    }

    #[test]
    fn test_padding_grows_past_three_digits() {
        let existing = ["INV-2026-999"];
        assert_eq!(next_invoice_number(existing, 2026), "INV-2026-1000");
    }
}
