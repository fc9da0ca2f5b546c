// types.rs — Numeric modes and concrete C++ type resolution
//
// The type grammar: every vocabulary token maps to exactly one concrete
// C++ type expression per scalar, with array depth wrapping the base in
// nested `std::vector`. Resolution is total over the `TypeToken` variant —
// unknown tokens cannot reach this module (they fail in `resolve`).
//
// Preconditions: tokens come from a resolved `Signature`.
// Postconditions: returned strings are complete C++ type expressions.
// Failure modes: none (total functions).
// Side effects: none.

use crate::ast::TypeToken;

/// The reverse-mode differentiable scalar. Return-type promotion is a
/// textual containment check against this exact expression.
pub const VAR_SCALAR: &str = "stan::math::var";

// ── Numeric modes ──

/// Which concrete scalar representation a generated artifact targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericMode {
    Prim,
    Rev,
    Fwd,
}

impl NumericMode {
    /// Modes exercised by the equivalence test synthesizer, in emission order.
    pub const TEST_MODES: [NumericMode; 3] =
        [NumericMode::Prim, NumericMode::Rev, NumericMode::Fwd];

    /// Modes exercised by the instantiation emitter, in emission order.
    pub const INSTANTIATION_MODES: [NumericMode; 2] = [NumericMode::Prim, NumericMode::Rev];

    /// Label used in generated test names.
    pub fn label(self) -> &'static str {
        match self {
            NumericMode::Prim => "Prim",
            NumericMode::Rev => "Rev",
            NumericMode::Fwd => "Fwd",
        }
    }

    /// The concrete scalar type expression for this mode.
    pub fn scalar(self) -> &'static str {
        match self {
            NumericMode::Prim => "double",
            NumericMode::Rev => VAR_SCALAR,
            NumericMode::Fwd => "stan::math::fvar<double>",
        }
    }
}

// ── Concrete type rendering ──

/// Render the concrete C++ type for a token with the given scalar.
/// Total over the vocabulary; the functor always renders as `auto` and the
/// rng handle ignores the scalar.
pub fn cpp_type(token: TypeToken, scalar: &str) -> String {
    let (base, depth) = match token {
        TypeToken::Int { depth } => ("int".to_string(), depth),
        TypeToken::Real { depth } => (scalar.to_string(), depth),
        TypeToken::Vector { depth } => (
            format!("Eigen::Matrix<{scalar}, Eigen::Dynamic, 1>"),
            depth,
        ),
        TypeToken::RowVector { depth } => (
            format!("Eigen::Matrix<{scalar}, 1, Eigen::Dynamic>"),
            depth,
        ),
        TypeToken::Matrix { depth } => (
            format!("Eigen::Matrix<{scalar}, Eigen::Dynamic, Eigen::Dynamic>"),
            depth,
        ),
        TypeToken::Functor => ("auto".to_string(), 0),
        TypeToken::Rng => ("std::minstd_rand".to_string(), 0),
    };
    wrap_arrays(base, depth)
}

fn wrap_arrays(base: String, depth: u8) -> String {
    (0..depth).fold(base, |inner, _| format!("std::vector<{inner}>"))
}

// ── Instantiation candidates ──

/// Candidate concrete types for one argument position of an explicit
/// instantiation. `Prim` yields the plain form only. `Rev` also yields the
/// form with the innermost scalar replaced by the differentiable scalar —
/// integer-typed formal parameters are nonetheless invoked with
/// differentiable arguments at some call sites, so `int` overrides to the
/// differentiable scalar itself. The functor and rng kinds never get a
/// differentiable form. Callers deduplicate by rendered text.
pub fn instantiation_candidates(token: TypeToken, mode: NumericMode) -> Vec<String> {
    let plain = cpp_type(token, "double");
    match mode {
        NumericMode::Prim | NumericMode::Fwd => vec![plain],
        NumericMode::Rev => match token {
            TypeToken::Functor | TypeToken::Rng => vec![plain],
            TypeToken::Int { depth } => {
                vec![plain, wrap_arrays(VAR_SCALAR.to_string(), depth)]
            }
            _ => vec![plain, cpp_type(token, VAR_SCALAR)],
        },
    }
}

/// Render the return type under the promotion rule: if any chosen argument
/// expression is the differentiable scalar, the return promotes to its
/// differentiable form (`int` returns promote to the scalar itself).
pub fn promoted_return(token: TypeToken, promote: bool) -> String {
    if promote {
        match token {
            TypeToken::Int { depth } => wrap_arrays(VAR_SCALAR.to_string(), depth),
            _ => cpp_type(token, VAR_SCALAR),
        }
    } else {
        cpp_type(token, "double")
    }
}

// ── Tests ──
