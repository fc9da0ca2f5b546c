// instantiate.rs — Explicit template-instantiation emitter
//
// Walks the expanded Cartesian product of every retained record and renders
// one explicit-instantiation declaration per unique concrete signature,
// writing through the run's deduplication cache. Emission order is input
// order of raw records, product order within a record, first-seen order per
// unique rendering.
//
// Preconditions: records come from `reader::read_records`.
// Postconditions: no two emitted lines render to the same text.
// Failure modes: malformed records and unknown type tokens are fatal.
// Side effects: none (pure string assembly).

use std::fmt::Write as _;

use crate::diag::GenError;
use crate::expand::expand;
use crate::pipeline::GeneratorRun;
use crate::resolve;
use crate::types::NumericMode;

/// Fixed namespace wrapper around the declaration block.
pub const NAMESPACE_OPEN: &str = "namespace stan {\nnamespace math {\n\n";
pub const NAMESPACE_CLOSE: &str = "\n}  // namespace math\n}  // namespace stan\n";

/// Standard-library-shadowing calls excluded from this emission path.
/// A coarse substring filter over the raw record text, not a structural
/// match — a record merely containing one of these strings anywhere is
/// dropped.
pub const EXCLUDED_CALLS: &[&str] = &[
    "is_nan(real)",
    "abs(int)",
    "add(int, int)",
    "add(real, real)",
    "subtract(int, int)",
    "subtract(real, real)",
    "multiply(int, int)",
    "multiply(real, real)",
    "divide(int, int)",
    "divide(real, real)",
    "max(int, int)",
    "min(int, int)",
];

/// Render the instantiation declaration file for a record stream.
///
/// Policy skips (silent): records mentioning the unsupported row-vector
/// variant, records matching the exclusion list, and randomness-suffixed
/// functions. Everything else must parse and resolve, or the run aborts.
pub fn emit_instantiations(
    records: &[String],
    run: &mut GeneratorRun,
) -> Result<String, GenError> {
    let mut lines = String::new();

    for record in records {
        if record.contains("row vector") {
            continue;
        }
        if EXCLUDED_CALLS.iter().any(|call| record.contains(call)) {
            continue;
        }
        let sig = resolve::parse_record(record)?;
        if sig.name.ends_with("_rng") {
            continue;
        }

        for mode in NumericMode::INSTANTIATION_MODES {
            for binding in expand(&sig, mode) {
                let params = binding
                    .args
                    .iter()
                    .enumerate()
                    .map(|(i, ty)| format!("const {}& arg{}", ty, i + 1))
                    .collect::<Vec<_>>()
                    .join(", ");
                let key = format!("{}({});", sig.name, params);
                if run.offer_once(&key) {
                    writeln!(lines, "template {} {}", binding.return_type, key).unwrap();
                }
            }
        }
    }

    Ok(format!("{NAMESPACE_OPEN}{lines}{NAMESPACE_CLOSE}"))
}

// ── Tests ──
