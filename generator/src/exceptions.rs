// exceptions.rs — Ignored-signature registry
//
// The registry of signatures the test synthesizer must skip (functions
// that do not support expression arguments yet). Entries use the same line
// format as the input stream, including multi-line wrapping, so the same
// record reader reassembles them. Loaded once per run, read-only after;
// matched by exact record text.

use std::collections::HashSet;

use crate::reader;

/// Parse exceptions from already-read text. An unterminated tail is
/// dropped, matching the tolerance of the registry format (a final entry
/// without its closing paren can never match a real record anyway).
pub fn parse_exceptions(text: &str) -> HashSet<String> {
    let (records, _) = reader::read_records(text);
    records.into_iter().collect()
}
