// expand.rs — Cartesian type expansion
//
// Computes all concrete type bindings for a signature under one numeric
// mode. The product is walked in fixed odometer order (leftmost argument
// varies slowest) so that emission order is stable across runs — output
// byte-stability is depended upon by downstream build caching.
//
// Preconditions: `sig` is a resolved signature.
// Postconditions: bindings appear in a deterministic traversal order; the
//   return type of each binding obeys the promotion rule.
// Failure modes: none (resolution is total over the vocabulary).
// Side effects: none.

use crate::ast::Signature;
use crate::types::{instantiation_candidates, promoted_return, NumericMode, VAR_SCALAR};

/// One concrete type assignment for every argument position, plus the
/// promoted return type. Transient: consumed by the emitter, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedBinding {
    pub args: Vec<String>,
    pub return_type: String,
}

/// Expand a signature into the Cartesian product of per-argument candidate
/// types. The return type is promoted exactly when the rendered argument
/// list contains the differentiable scalar — a textual containment check
/// mirroring C++ template return-type deduction, not a semantic one.
pub fn expand(sig: &Signature, mode: NumericMode) -> Vec<ExpandedBinding> {
    let candidates: Vec<Vec<String>> = sig
        .args
        .iter()
        .map(|tok| instantiation_candidates(*tok, mode))
        .collect();

    let mut bindings = Vec::new();
    let mut indices = vec![0usize; candidates.len()];
    loop {
        let args: Vec<String> = indices
            .iter()
            .zip(candidates.iter())
            .map(|(&i, cands)| cands[i].clone())
            .collect();
        let promote = args.join(", ").contains(VAR_SCALAR);
        bindings.push(ExpandedBinding {
            return_type: promoted_return(sig.return_type, promote),
            args,
        });

        // Odometer step, rightmost position fastest.
        let mut pos = candidates.len();
        loop {
            if pos == 0 {
                return bindings;
            }
            pos -= 1;
            indices[pos] += 1;
            if indices[pos] < candidates[pos].len() {
                break;
            }
            indices[pos] = 0;
        }
    }
}

// ── Tests ──
