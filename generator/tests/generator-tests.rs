// End-to-end scenarios for the two generators, driven through the library
// API the same way the CLI drives it.

use siggen::pipeline::{generate_instantiations, generate_tests};

fn instantiation_lines(output: &str) -> Vec<&str> {
    output
        .lines()
        .filter(|l| l.starts_with("template "))
        .collect()
}

// ── Instantiation scenarios ──

#[test]
fn std_library_shadow_produces_no_lines() {
    let out = generate_instantiations("real add(real, real)\n").unwrap();
    assert!(instantiation_lines(&out).is_empty());
}

#[test]
fn matrix_unary_produces_exactly_two_lines() {
    let out = generate_instantiations("matrix foo(matrix)\n").unwrap();
    let lines = instantiation_lines(&out);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Eigen::Matrix<double, Eigen::Dynamic, Eigen::Dynamic>"));
    assert!(!lines[0].contains("stan::math::var"));
    // Second line: argument and return are both the reverse-mode matrix form.
    assert_eq!(
        lines[1].matches("Eigen::Matrix<stan::math::var, Eigen::Dynamic, Eigen::Dynamic>").count(),
        2
    );
}

#[test]
fn int_pair_promotes_return_in_rev_mode() {
    let out = generate_instantiations("int foo(int, int)\n").unwrap();
    let lines = instantiation_lines(&out);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "template int foo(const int& arg1, const int& arg2);");
    assert!(lines[1..]
        .iter()
        .all(|l| l.starts_with("template stan::math::var foo(")));
}

#[test]
fn row_vector_and_rng_rows_produce_no_lines() {
    let stream = "row vector foo(row vector)\nreal normal_rng(real, real)\n";
    let out = generate_instantiations(stream).unwrap();
    assert!(instantiation_lines(&out).is_empty());
}

#[test]
fn no_two_emitted_lines_render_identically() {
    let stream = "\
real foo(real)
real foo(real)
int bar(int, int)
matrix baz(matrix, real)
real qux(real[], vector)
";
    let out = generate_instantiations(stream).unwrap();
    let lines = instantiation_lines(&out);
    let unique: std::collections::HashSet<&&str> = lines.iter().collect();
    assert_eq!(lines.len(), unique.len());
    assert!(!lines.is_empty());
}

#[test]
fn instantiation_output_is_deterministic() {
    let stream = "matrix foo(matrix)\nreal bar(vector, int)\nint baz(int, int)\n";
    let first = generate_instantiations(stream).unwrap();
    let second = generate_instantiations(stream).unwrap();
    assert_eq!(first, second);
}

#[test]
fn wrapped_record_flows_through_instantiations() {
    let stream = "real foo(matrix,\n real)\n";
    let out = generate_instantiations(stream).unwrap();
    assert_eq!(instantiation_lines(&out).len(), 4);
}

#[test]
fn malformed_stream_aborts_instantiations() {
    assert!(generate_instantiations("real foo(real,\n").is_err());
}

// ── Test-synthesis scenarios ──

#[test]
fn test_generation_is_deterministic() {
    let stream = "matrix foo(matrix)\nreal bar(vector)\nmatrix foo(matrix, real)\n";
    let first = generate_tests(stream, &[], "", 3).unwrap();
    let second = generate_tests(stream, &[], "", 3).unwrap();
    assert_eq!(first, second);
}

#[test]
fn overload_ordinals_are_dense() {
    let stream = "matrix foo(matrix)\nmatrix foo(matrix, real)\nmatrix foo(matrix, int)\n";
    let files = generate_tests(stream, &[], "", 1).unwrap();
    let content = &files[0];
    for n in 0..3 {
        assert!(
            content.contains(&format!("TEST(ExpressionTestPrim, foo{n})")),
            "missing ordinal {n}"
        );
    }
    assert!(!content.contains("TEST(ExpressionTestPrim, foo3)"));
}

#[test]
fn exceptions_suppress_tests() {
    let stream = "matrix foo(matrix)\nmatrix bar(matrix)\n";
    let files = generate_tests(stream, &[], "matrix foo(matrix)\n", 1).unwrap();
    assert!(!files[0].contains("foo0"));
    assert!(files[0].contains("bar0"));
}

#[test]
fn negative_control_emits_count_assertion() {
    // The designed negative-control behavior: the test body is generated
    // with the evaluation-count assertion; it fails at execution time if
    // the function double-evaluates.
    let stream = "matrix unrelated(matrix)\n";
    let files = generate_tests(stream, &["bad_multiple_evaluations".to_string()], "", 1).unwrap();
    let content = &files[0];
    assert!(content.contains("TEST(ExpressionTestPrim, bad_multiple_evaluations0)"));
    assert!(content.contains("EXPECT_LE(counter0, 1);"));
    assert!(!content.contains("unrelated"));
}

#[test]
fn unresolved_filter_fails_before_producing_output() {
    let stream = "matrix foo(matrix)\n";
    let err = generate_tests(stream, &["no_such_function".to_string()], "", 1).unwrap_err();
    assert!(matches!(
        err,
        siggen::diag::GenError::UnresolvedFunctionFilter { .. }
    ));
}

#[test]
fn every_file_carries_the_helper_include() {
    let stream = "matrix foo(matrix)\nmatrix bar(matrix)\n";
    let files = generate_tests(stream, &[], "", 4).unwrap();
    assert_eq!(files.len(), 4);
    for file in &files {
        assert!(file.starts_with("#include <test/expressions/expression_test_helpers.hpp>\n\n"));
    }
}

#[test]
fn test_counts_reflect_modes() {
    // Two plain signatures (3 modes each) + one rng signature (Prim only).
    let stream = "matrix foo(matrix)\nreal bar(vector, real)\nmatrix wishart_rng(real, matrix)\n";
    let files = generate_tests(stream, &[], "", 1).unwrap();
    assert_eq!(files[0].matches("TEST(").count(), 7);
    assert_eq!(files[0].matches("TEST(ExpressionTestRev").count(), 2);
    assert_eq!(files[0].matches("TEST(ExpressionTestFwd").count(), 2);
}

#[test]
fn wrapped_functor_record_flows_through_testgen() {
    let stream =
        "vector map((vector, vector,\n data real[], data int[]) => vector, vector, real)\n";
    let files = generate_tests(stream, &[], "", 1).unwrap();
    assert!(files[0].contains("TEST(ExpressionTestPrim, map0)"));
    assert!(files[0].contains("{return a;};"));
}
