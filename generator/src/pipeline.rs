// pipeline.rs — Generation run state and orchestration
//
// Holds the mutable state shared across one generator invocation (the
// deduplication cache and the per-function overload counters) as an
// explicit context object, so multiple runs can execute in isolation
// within one process. Also computes provenance hashes for hermetic-build
// cache keys, and wires the phase functions together for the CLI.
//
// Preconditions: records come from `reader::read_records`.
// Postconditions: all fatal errors surface before any caller writes files.
// Failure modes: any `GenError`.
// Side effects: none (pure state + string assembly; file IO lives in
//   `partition` and `main`).

use std::collections::{HashMap, HashSet};

use crate::diag::GenError;
use crate::exceptions;
use crate::instantiate;
use crate::partition;
use crate::reader;
use crate::testgen;

// ── Run context ──

/// Mutable state threaded through one generation run.
#[derive(Debug, Default)]
pub struct GeneratorRun {
    emitted: HashSet<String>,
    ordinals: HashMap<String, u32>,
}

impl GeneratorRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an emitted key. Returns true if newly inserted, false if the
    /// rendered text was already seen this run. Keys are never removed.
    pub fn offer_once(&mut self, key: &str) -> bool {
        self.emitted.insert(key.to_string())
    }

    /// Next overload ordinal for a function name. Increments monotonically
    /// per retained signature, in input order.
    pub fn next_ordinal(&mut self, name: &str) -> u32 {
        let counter = self.ordinals.entry(name.to_string()).or_insert(0);
        let ordinal = *counter;
        *counter += 1;
        ordinal
    }
}

// ── Provenance ──

/// Provenance metadata for hermetic builds and cache-key use.
///
/// `stream_hash`: SHA-256 of the raw signature stream text.
/// `exceptions_fingerprint`: SHA-256 of the raw exceptions-file text.
/// `generator_version`: crate version from `Cargo.toml`.
#[derive(Debug, Clone)]
pub struct Provenance {
    pub stream_hash: [u8; 32],
    pub exceptions_fingerprint: [u8; 32],
    pub generator_version: &'static str,
}

impl Provenance {
    /// Hex string of the stream hash (64 characters).
    pub fn stream_hash_hex(&self) -> String {
        bytes_to_hex(&self.stream_hash)
    }

    /// Hex string of the exceptions fingerprint (64 characters).
    pub fn exceptions_fingerprint_hex(&self) -> String {
        bytes_to_hex(&self.exceptions_fingerprint)
    }

    /// Serialize provenance as a JSON string for `--emit build-info`.
    pub fn to_json(&self) -> String {
        format!(
            "{{\n  \"stream_hash\": \"{}\",\n  \"exceptions_fingerprint\": \"{}\",\n  \"generator_version\": \"{}\"\n}}\n",
            self.stream_hash_hex(),
            self.exceptions_fingerprint_hex(),
            self.generator_version,
        )
    }
}

fn bytes_to_hex(bytes: &[u8; 32]) -> String {
    let mut s = String::with_capacity(64);
    for b in bytes {
        use std::fmt::Write;
        let _ = write!(s, "{:02x}", b);
    }
    s
}

/// Compute provenance from the raw stream and exceptions texts.
pub fn compute_provenance(stream: &str, exceptions_text: &str) -> Provenance {
    use sha2::{Digest, Sha256};

    let hash_of = |text: &str| {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    };

    Provenance {
        stream_hash: hash_of(stream),
        exceptions_fingerprint: hash_of(exceptions_text),
        generator_version: env!("CARGO_PKG_VERSION"),
    }
}

// ── Phase wiring ──

/// Reassemble records from a stream, failing fast on an unterminated tail.
pub fn records_from_stream(stream: &str) -> Result<Vec<String>, GenError> {
    let (records, tail) = reader::read_records(stream);
    if let Some(partial) = tail {
        return Err(GenError::MalformedSignature {
            record: partial,
            detail: "unterminated record (missing closing paren before end of input)".to_string(),
        });
    }
    Ok(records)
}

/// Full instantiation path: stream text in, one declaration file out.
pub fn generate_instantiations(stream: &str) -> Result<String, GenError> {
    let records = records_from_stream(stream)?;
    let mut run = GeneratorRun::new();
    instantiate::emit_instantiations(&records, &mut run)
}

/// Full test-synthesis path: stream text in, `n_files` file contents out.
/// All fatal conditions (including unresolved filter names) surface here,
/// before anything is written.
pub fn generate_tests(
    stream: &str,
    filter: &[String],
    exceptions_text: &str,
    n_files: usize,
) -> Result<Vec<String>, GenError> {
    let records = records_from_stream(stream)?;
    let ignored = exceptions::parse_exceptions(exceptions_text);
    let mut run = GeneratorRun::new();
    let tests = testgen::synthesize(&records, filter, &ignored, &mut run)?;
    Ok(partition::partition(&tests, n_files))
}

// ── Tests ──
