// testgen.rs — Expression-equivalence test synthesis
//
// For every retained signature, emits one test per numeric mode proving
// that an expression-wrapped call produces results (and, in reverse mode,
// derivatives) identical to a dense-matrix call, while evaluating each
// matrix-like argument at most once. Bodies are assembled as a record of
// named slots and rendered through one templating step, so argument-policy
// special cases stay out of the concatenation sites.
//
// Preconditions: records come from `reader::read_records`; the exceptions
//   set was loaded with the same reader.
// Postconditions: ordinals per function name are dense, assigned in input
//   order; every body follows the fixed template.
// Failure modes: malformed records and unknown type tokens are fatal;
//   filter names never seen in the stream are fatal, reported once.
// Side effects: none (pure string assembly).

use std::collections::{BTreeSet, HashSet};

use crate::ast::{Signature, TypeToken};
use crate::diag::GenError;
use crate::pipeline::GeneratorRun;
use crate::resolve;
use crate::types::NumericMode;

/// Synthetic signatures injected when a function filter is given. Each one
/// validates that the generated tests actually detect a class of failure:
/// no expression support, double evaluation, wrong values, wrong
/// derivatives.
pub const NEGATIVE_CONTROLS: [&str; 4] = [
    "matrix bad_no_expressions(matrix)\n",
    "matrix bad_multiple_evaluations(matrix)\n",
    "real bad_wrong_value(matrix)\n",
    "real bad_wrong_derivatives(vector)\n",
];

/// One rendered test case.
#[derive(Debug, Clone)]
pub struct GeneratedTestCase {
    pub mode_label: &'static str,
    pub function_name: String,
    pub ordinal: u32,
    pub body: String,
}

// ── Synthesis ──

/// Generate test cases for every retained signature in the stream.
///
/// Retention: at least one matrix-like argument, and (when no filter is
/// active) not listed in the exceptions set. With a filter, the four
/// negative controls are appended to the stream and the exceptions set is
/// bypassed.
pub fn synthesize(
    records: &[String],
    filter: &[String],
    ignored: &HashSet<String>,
    run: &mut GeneratorRun,
) -> Result<Vec<GeneratedTestCase>, GenError> {
    let mut remaining: BTreeSet<&str> = filter.iter().map(|s| s.as_str()).collect();

    let mut all_records: Vec<String> = records.to_vec();
    if !filter.is_empty() {
        all_records.extend(NEGATIVE_CONTROLS.iter().map(|s| s.to_string()));
    }

    let mut tests = Vec::new();
    for record in &all_records {
        let sig = resolve::parse_record(record)?;
        if ignored.contains(record) && filter.is_empty() {
            continue;
        }
        if !sig.args.iter().any(|t| t.is_matrix_like()) {
            continue;
        }
        remaining.remove(sig.name.as_str());
        if !filter.is_empty() && !filter.iter().any(|f| *f == sig.name) {
            continue;
        }

        let ordinal = run.next_ordinal(&sig.name);

        let is_rng = sig.name.ends_with("_rng");
        let mut args = sig.args.clone();
        if is_rng {
            args.push(TypeToken::Rng);
        }

        for mode in NumericMode::TEST_MODES {
            // A generator handle's state is not differentiable.
            if is_rng && mode != NumericMode::Prim {
                continue;
            }
            tests.push(build_test(&sig, &args, ordinal, mode));
        }
    }

    if !remaining.is_empty() {
        return Err(GenError::UnresolvedFunctionFilter {
            names: remaining.into_iter().map(|s| s.to_string()).collect(),
        });
    }
    Ok(tests)
}

// ── Body assembly ──

/// Named slots of one test body; rendered in a single templating step.
#[derive(Debug)]
struct TestBody {
    overload: &'static str,
    function_name: String,
    signature_number: u32,
    dense_declarations: String,
    dense_argument_list: String,
    expression_declarations: String,
    expression_argument_list: String,
    checks: String,
}

impl TestBody {
    fn render(&self) -> String {
        format!(
            "\nTEST(ExpressionTest{overload}, {name}{number}) {{\n{dense_decls}\n  auto res_mat = stan::math::{name}({dense_args});\n\n{expr_decls}\n  auto res_expr = stan::math::{name}({expr_args});\n\n  EXPECT_STAN_EQ(res_expr, res_mat);\n\n{checks}\n}}\n",
            overload = self.overload,
            name = self.function_name,
            number = self.signature_number,
            dense_decls = self.dense_declarations,
            dense_args = self.dense_argument_list,
            expr_decls = self.expression_declarations,
            expr_args = self.expression_argument_list,
            checks = self.checks,
        )
    }
}

fn build_test(
    sig: &Signature,
    args: &[TypeToken],
    ordinal: u32,
    mode: NumericMode,
) -> GeneratedTestCase {
    let scalar = mode.scalar();
    let name = &sig.name;

    let mut dense_declarations = String::new();
    for (n, arg) in args.iter().enumerate() {
        dense_declarations.push_str(&make_arg_code(*arg, scalar, &format!("arg_mat{n}"), name));
        dense_declarations.push_str(";\n");
    }
    let dense_argument_list = (0..args.len())
        .map(|n| format!("arg_mat{n}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut expression_declarations = String::new();
    for (n, arg) in args.iter().enumerate() {
        expression_declarations.push_str(&make_arg_code(
            *arg,
            scalar,
            &format!("arg_expr{n}"),
            name,
        ));
        expression_declarations.push_str(";\n");
        if arg.is_matrix_like() {
            expression_declarations.push_str(&format!("  int counter{n} = 0;\n"));
            expression_declarations.push_str(&format!(
                "  stan::test::counterOp<{scalar}> counter_op{n}(&counter{n});\n"
            ));
        }
    }
    let expression_argument_list = args
        .iter()
        .enumerate()
        .map(|(n, arg)| {
            if arg.is_matrix_like() {
                format!("arg_expr{n}.unaryExpr(counter_op{n})")
            } else {
                format!("arg_expr{n}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    let mut checks = String::new();
    for (n, arg) in args.iter().enumerate() {
        if arg.is_matrix_like() {
            // rank evaluates its whole input and additionally indexes one
            // element, incrementing the counter twice.
            let bound = if name == "rank" { 2 } else { 1 };
            checks.push_str(&format!("  EXPECT_LE(counter{n}, {bound});\n"));
        }
    }
    if mode == NumericMode::Rev && sig.return_type.is_differentiable_return() {
        checks.push_str(
            "  (stan::test::recursive_sum(res_mat) + stan::test::recursive_sum(res_expr)).grad();\n",
        );
        for (n, arg) in args.iter().enumerate() {
            // functors don't have adjoints to check
            if *arg == TypeToken::Functor {
                continue;
            }
            checks.push_str(&format!("  EXPECT_STAN_ADJ_EQ(arg_expr{n},arg_mat{n});\n"));
        }
    }

    let body = TestBody {
        overload: mode.label(),
        function_name: name.clone(),
        signature_number: ordinal,
        dense_declarations,
        dense_argument_list,
        expression_declarations,
        expression_argument_list,
        checks,
    }
    .render();

    GeneratedTestCase {
        mode_label: mode.label(),
        function_name: name.clone(),
        ordinal,
        body,
    }
}

/// Declaration-and-initialization code for one argument.
///
/// The default representative value works for most functions; two
/// designated functions need values shifted out of the default range, and
/// the functor argument is always the fixed first-parameter identity
/// closure regardless of mode.
fn make_arg_code(arg: TypeToken, scalar: &str, var_name: &str, function_name: &str) -> String {
    let arg_type = crate::types::cpp_type(arg, scalar);
    if arg == TypeToken::Functor {
        format!(
            "  {arg_type} {var_name} = [](const auto& a, const auto&, const auto&, const auto&){{return a;}}"
        )
    } else if function_name == "acosh" {
        format!(
            "  {arg_type} {var_name} = stan::math::as_array_or_scalar(stan::test::make_arg<{arg_type}>())+1"
        )
    } else if function_name == "log1m_exp" {
        format!(
            "  {arg_type} {var_name} = stan::math::as_array_or_scalar(stan::test::make_arg<{arg_type}>())-1"
        )
    } else {
        format!("  {arg_type} {var_name} = stan::test::make_arg<{arg_type}>()")
    }
}

// ── Tests ──
