// Signature model for the math function-signature language.
//
// Two layers: the parser produces the structural `RawSignature` (identifier
// text plus bracket depth, functor shape unchecked), and `resolve` maps it
// onto the closed `TypeToken` vocabulary.
//
// Preconditions: produced by the parser from a reassembled signature record.
// Postconditions: a resolved `Signature` contains only vocabulary tokens.
// Failure modes: none (data-only module).
// Side effects: none.

use serde::Serialize;
use std::fmt;

// ── Structural layer (parser output) ──

/// One parsed record before vocabulary resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSignature {
    pub return_type: RawType,
    pub name: String,
    pub args: Vec<RawArg>,
}

/// A type as written: base identifier with bracket depth, or a
/// parenthesized functor with its own argument list and return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawType {
    Base { name: String, depth: u8 },
    Functor { args: Vec<RawArg>, ret: Box<RawType> },
}

/// An argument position: optional `data` qualifier plus a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArg {
    pub data: bool,
    pub ty: RawType,
}

impl fmt::Display for RawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawType::Base { name, depth } => {
                write!(f, "{name}")?;
                if *depth > 0 {
                    write!(f, "[")?;
                    for _ in 1..*depth {
                        write!(f, ",")?;
                    }
                    write!(f, "]")?;
                }
                Ok(())
            }
            RawType::Functor { args, ret } => {
                write!(f, "(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ") => {ret}")
            }
        }
    }
}

impl fmt::Display for RawArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.data {
            write!(f, "data ")?;
        }
        write!(f, "{}", self.ty)
    }
}

// ── Resolved layer ──

/// A type drawn from the closed vocabulary. Array nesting is explicit and
/// finite; depth 0 means "not an array". The functor kind has one fixed
/// shape and the rng handle carries no nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeToken {
    Int { depth: u8 },
    Real { depth: u8 },
    Vector { depth: u8 },
    RowVector { depth: u8 },
    Matrix { depth: u8 },
    Functor,
    Rng,
}

impl TypeToken {
    /// Whether this argument is one of the fixed matrix-like trio at depth 0.
    /// Array-nested matrix types do not count: the instrumentation transform
    /// wraps a bare Eigen expression, not a container of them.
    pub fn is_matrix_like(self) -> bool {
        matches!(
            self,
            TypeToken::Vector { depth: 0 }
                | TypeToken::RowVector { depth: 0 }
                | TypeToken::Matrix { depth: 0 }
        )
    }

    /// Whether the base kind (array depth disregarded) participates in the
    /// reverse-mode gradient check on return values.
    pub fn is_differentiable_return(self) -> bool {
        matches!(
            self,
            TypeToken::Real { .. }
                | TypeToken::Vector { .. }
                | TypeToken::RowVector { .. }
                | TypeToken::Matrix { .. }
        )
    }
}

/// A resolved function signature: return type, name, ordered argument types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub return_type: TypeToken,
    pub name: String,
    pub args: Vec<TypeToken>,
}
