// resolve.rs — Vocabulary resolution
//
// Maps a structural `RawSignature` onto the closed `TypeToken` vocabulary.
// The vocabulary is closed by design: an identifier outside it (or a
// functor whose shape differs from the single supported one) is the fatal
// `UnknownTypeToken` error, never a silent default.
//
// Preconditions: input produced by `parser::parse` without errors.
// Postconditions: every token in the returned `Signature` is a vocabulary
//   member.
// Failure modes: `UnknownTypeToken`; `MalformedSignature` when called via
//   `parse_record` on a structurally bad record.
// Side effects: none.

use crate::ast::{RawArg, RawSignature, RawType, Signature, TypeToken};
use crate::diag::GenError;

/// Resolve one structural signature against the type vocabulary.
/// `record` is the raw text, carried into errors for context.
pub fn resolve(raw: &RawSignature, record: &str) -> Result<Signature, GenError> {
    let return_type = resolve_type(&raw.return_type, record)?;
    let args = raw
        .args
        .iter()
        .map(|arg| resolve_type(&arg.ty, record))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Signature {
        return_type,
        name: raw.name.clone(),
        args,
    })
}

/// Parse and resolve one record in a single step.
pub fn parse_record(record: &str) -> Result<Signature, GenError> {
    let result = crate::parser::parse(record);
    if let Some(err) = result.errors.first() {
        return Err(GenError::MalformedSignature {
            record: record.to_string(),
            detail: err.to_string(),
        });
    }
    let raw = result.signature.ok_or_else(|| GenError::MalformedSignature {
        record: record.to_string(),
        detail: "empty record".to_string(),
    })?;
    resolve(&raw, record)
}

fn resolve_type(ty: &RawType, record: &str) -> Result<TypeToken, GenError> {
    match ty {
        RawType::Base { name, depth } => match (name.as_str(), *depth) {
            ("int", depth) => Ok(TypeToken::Int { depth }),
            ("real", depth) => Ok(TypeToken::Real { depth }),
            ("vector", depth) => Ok(TypeToken::Vector { depth }),
            ("row_vector", depth) => Ok(TypeToken::RowVector { depth }),
            ("matrix", depth) => Ok(TypeToken::Matrix { depth }),
            ("rng", 0) => Ok(TypeToken::Rng),
            _ => Err(unknown(ty, record)),
        },
        RawType::Functor { args, ret } => {
            if is_supported_functor(args, ret) {
                Ok(TypeToken::Functor)
            } else {
                Err(unknown(ty, record))
            }
        }
    }
}

/// The single supported functor shape:
/// `(vector, vector, data real[], data int[]) => vector`.
fn is_supported_functor(args: &[RawArg], ret: &RawType) -> bool {
    let expected = [
        (false, "vector", 0u8),
        (false, "vector", 0),
        (true, "real", 1),
        (true, "int", 1),
    ];
    args.len() == expected.len()
        && args.iter().zip(expected.iter()).all(|(arg, (data, name, depth))| {
            arg.data == *data
                && matches!(&arg.ty, RawType::Base { name: n, depth: d } if n == name && d == depth)
        })
        && matches!(ret, RawType::Base { name, depth: 0 } if name == "vector")
}

fn unknown(ty: &RawType, record: &str) -> GenError {
    GenError::UnknownTypeToken {
        token: ty.to_string(),
        record: record.to_string(),
    }
}

// ── Tests ──
