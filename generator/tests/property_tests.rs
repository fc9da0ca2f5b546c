// Property-based tests for generator invariants.
//
// Three categories:
// 1. Record reader: lossless reassembly, line-wrapping insensitivity
// 2. Instantiation emitter: determinism and global uniqueness of lines
// 3. Test synthesizer: mode counts, ordinal density, partition coverage
//
// Uses proptest with explicit configuration to prevent CI flakiness.

use proptest::prelude::*;

use siggen::pipeline::{generate_instantiations, generate_tests, GeneratorRun};
use siggen::reader::read_records;
use siggen::resolve::parse_record;
use siggen::testgen::synthesize;

// ── Signature generator ─────────────────────────────────────────────────────

/// One argument type as source text. Depths 0-2 over the base vocabulary.
fn arb_arg() -> impl Strategy<Value = String> {
    let base = prop_oneof![
        Just("int"),
        Just("real"),
        Just("vector"),
        Just("row_vector"),
        Just("matrix"),
    ];
    let depth = prop_oneof![Just(""), Just("[]"), Just("[,]")];
    (base, depth).prop_map(|(b, d)| format!("{b}{d}"))
}

fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("alpha".to_string()),
        Just("beta".to_string()),
        Just("gamma_fun".to_string()),
        Just("delta2".to_string()),
    ]
}

/// One well-formed signature record, terminator included.
fn arb_record() -> impl Strategy<Value = String> {
    (
        arb_arg(),
        arb_name(),
        prop::collection::vec(arb_arg(), 1..=3),
    )
        .prop_map(|(ret, name, args)| format!("{} {}({})\n", ret, name, args.join(", ")))
}

fn arb_stream() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_record(), 0..8)
}

// ── Record reader ───────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reader_reassembly_is_lossless(records in arb_stream()) {
        let text: String = records.concat();
        let (out, tail) = read_records(&text);
        prop_assert!(tail.is_none());
        prop_assert_eq!(out.concat(), text);
    }

    #[test]
    fn reader_yields_one_record_per_signature(records in arb_stream()) {
        let text: String = records.concat();
        let (out, _) = read_records(&text);
        prop_assert_eq!(out.len(), records.len());
        for rec in &out {
            prop_assert!(rec.ends_with(")\n"));
        }
    }

    #[test]
    fn wrapping_after_commas_preserves_parse(record in arb_record()) {
        // Breaking a record after each comma simulates front-end line
        // wrapping; the reassembled record must parse identically.
        let wrapped = record.replace(", ", ",\n ");
        let (out, tail) = read_records(&wrapped);
        prop_assert!(tail.is_none());
        prop_assert_eq!(out.len(), 1);
        let a = parse_record(&record).unwrap();
        let b = parse_record(&out[0]).unwrap();
        prop_assert_eq!(a, b);
    }
}

// ── Instantiation emitter ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn instantiations_are_deterministic(records in arb_stream()) {
        let text: String = records.concat();
        let first = generate_instantiations(&text).unwrap();
        let second = generate_instantiations(&text).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn instantiation_lines_are_globally_unique(records in arb_stream()) {
        let text: String = records.concat();
        let out = generate_instantiations(&text).unwrap();
        let lines: Vec<&str> = out.lines().filter(|l| l.starts_with("template ")).collect();
        let unique: std::collections::HashSet<&&str> = lines.iter().collect();
        prop_assert_eq!(lines.len(), unique.len());
    }

    #[test]
    fn promoted_lines_promote_return_too(records in arb_stream()) {
        // Any emitted line whose argument list mentions the differentiable
        // scalar must carry a differentiable (or int-free) return: the
        // plain return form never pairs with var arguments.
        let text: String = records.concat();
        let out = generate_instantiations(&text).unwrap();
        for line in out.lines().filter(|l| l.starts_with("template ")) {
            let open = line.find('(').unwrap();
            let (head, args) = line.split_at(open);
            if args.contains("stan::math::var") {
                prop_assert!(
                    head.contains("stan::math::var"),
                    "unpromoted return in: {}", line
                );
            }
        }
    }
}

// ── Test synthesizer ────────────────────────────────────────────────────────

/// Count retained records: at least one depth-0 matrix-like argument.
fn retained(records: &[String]) -> usize {
    records
        .iter()
        .filter(|r| {
            let sig = parse_record(r).unwrap();
            sig.args.iter().any(|t| t.is_matrix_like())
        })
        .count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn three_tests_per_retained_signature(records in arb_stream()) {
        let text: String = records.concat();
        let files = generate_tests(&text, &[], "", 1).unwrap();
        prop_assert_eq!(files[0].matches("TEST(").count(), 3 * retained(&records));
    }

    #[test]
    fn ordinals_are_dense_per_function(records in arb_stream()) {
        let owned: Vec<String> = records.clone();
        let ignored = std::collections::HashSet::new();
        let mut run = GeneratorRun::new();
        let tests = synthesize(&owned, &[], &ignored, &mut run).unwrap();
        let mut per_name: std::collections::HashMap<&str, Vec<u32>> = Default::default();
        for t in tests.iter().filter(|t| t.mode_label == "Prim") {
            per_name.entry(&t.function_name).or_default().push(t.ordinal);
        }
        for (name, ordinals) in per_name {
            let expected: Vec<u32> = (0..ordinals.len() as u32).collect();
            prop_assert_eq!(&ordinals, &expected, "non-dense ordinals for {}", name);
        }
    }

    #[test]
    fn partitioning_preserves_every_test(records in arb_stream(), n in 1usize..5) {
        let text: String = records.concat();
        let files = generate_tests(&text, &[], "", n).unwrap();
        prop_assert_eq!(files.len(), n);
        let total: usize = files.iter().map(|f| f.matches("TEST(").count()).sum();
        prop_assert_eq!(total, 3 * retained(&records));
    }
}
