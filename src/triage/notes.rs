//! Back-reference marker embedded in tracked item notes.
//!
//! A tracked item created from a candidate carries the candidate id as the
//! last line of its notes, after a fixed disclaimer block. This is the only
//! link between the two, so both directions live here.

/// Disclaimer written above the id line.
pub const NOTES_DISCLAIMER: &str = "*** \
Made automatically with Blueprint. \
Please add notes above this line, \
and do not edit anything below this line. \
Blueprint needs this information to better serve you. \
Thank you for your understanding. \
***\n";

/// Prefix of the id line.
pub const EMAIL_ID_PREFIX: &str = "emailId:";

/// Notes for a tracked item created from candidate `candidate_id`.
pub fn format_tracked_notes(candidate_id: &str) -> String {
    format!("{NOTES_DISCLAIMER}{EMAIL_ID_PREFIX}{candidate_id}")
}

/// Candidate id referenced by `notes`: everything after the last `emailId:`.
///
/// Returns `None` for missing or empty notes, or notes without the prefix.
pub fn extract_reference_id(notes: Option<&str>) -> Option<&str> {
    let notes = notes.filter(|n| !n.is_empty())?;
    let idx = notes.rfind(EMAIL_ID_PREFIX)?;
    Some(&notes[idx + EMAIL_ID_PREFIX.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disclaimer_ends_with_marker_line() {
        assert!(NOTES_DISCLAIMER.starts_with("*** Made automatically with Blueprint. "));
        assert!(NOTES_DISCLAIMER.ends_with("understanding. ***\n"));
    }

    #[test]
    fn formatted_notes_end_with_id() {
        let notes = format_tracked_notes("42");
        assert!(notes.ends_with("***\nemailId:42"));
        assert_eq!(extract_reference_id(Some(&notes)), Some("42"));
    }

    #[test]
    fn extracts_suffix_after_marker() {
        assert_eq!(
            extract_reference_id(Some("...\n***\nemailId:abc123")),
            Some("abc123")
        );
    }

    #[test]
    fn uses_last_occurrence() {
        let notes = "user wrote emailId:zzz here\n***\nemailId:real";
        assert_eq!(extract_reference_id(Some(notes)), Some("real"));
    }

    #[test]
    fn absent_marker_yields_none() {
        assert_eq!(extract_reference_id(None), None);
        assert_eq!(extract_reference_id(Some("")), None);
        assert_eq!(extract_reference_id(Some("buy milk")), None);
    }

    #[test]
    fn marker_at_end_yields_empty_id() {
        assert_eq!(extract_reference_id(Some("emailId:")), Some(""));
    }
}
