use clap::Parser;
use std::path::PathBuf;
use std::process::Command;

#[derive(Debug, Clone, clap::ValueEnum)]
enum EmitStage {
    Tests,
    Instantiations,
    Signatures,
    BuildInfo,
}

#[derive(Parser, Debug)]
#[command(
    name = "siggen",
    version,
    about = "Generates C++ instantiation and expression-equivalence test sources from math function signatures"
)]
struct Cli {
    /// Names of the functions to generate tests for. Default: all.
    functions: Vec<String>,

    /// Read signature records from this file instead of running the front-end
    #[arg(long)]
    sig_file: Option<PathBuf>,

    /// Front-end command whose stdout is the signature stream
    #[arg(long, default_value = "stanc --dump-stan-math-signatures")]
    sig_cmd: String,

    /// Exceptions list: signatures the test synthesizer must skip
    #[arg(
        long,
        default_value = "./lib/stan_math/test/expressions/stan_math_sigs_exceptions.expected"
    )]
    exceptions: PathBuf,

    /// Number of files to split the generated tests into
    #[arg(short = 'j', long = "jobs", default_value_t = 1)]
    jobs: usize,

    /// Output directory for generated test files
    #[arg(long, default_value = "./src/test/expressions")]
    out_dir: PathBuf,

    /// Output stage
    #[arg(long, value_enum, default_value_t = EmitStage::Tests)]
    emit: EmitStage,

    /// Output path for --emit instantiations ("-" for stdout)
    #[arg(short, long, default_value = "instantiations.cpp")]
    output: PathBuf,

    /// Print generator phases and counts
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        eprintln!("siggen: emit    = {:?}", cli.emit);
        eprintln!("siggen: jobs    = {}", cli.jobs);
        eprintln!("siggen: out_dir = {}", cli.out_dir.display());
    }
    if cli.jobs == 0 {
        eprintln!("siggen: error: --jobs must be at least 1");
        std::process::exit(2);
    }

    // ── Obtain the signature stream ──
    let stream = match &cli.sig_file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("siggen: error: {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => match run_front_end(&cli.sig_cmd) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("siggen: error: {}", e);
                std::process::exit(2);
            }
        },
    };

    if cli.verbose {
        eprintln!("siggen: {} bytes of signature stream", stream.len());
    }

    match cli.emit {
        EmitStage::Signatures => emit_signatures(&stream),
        EmitStage::BuildInfo => emit_build_info(&cli, &stream),
        EmitStage::Instantiations => emit_instantiations(&cli, &stream),
        EmitStage::Tests => emit_tests(&cli, &stream),
    }
}

/// Run the external signature front-end and capture its stdout.
fn run_front_end(command: &str) -> Result<String, siggen::diag::GenError> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or_else(|| siggen::diag::GenError::FrontEnd {
        command: command.to_string(),
        detail: "empty command".to_string(),
    })?;
    let output = Command::new(program).args(parts).output().map_err(|e| {
        siggen::diag::GenError::FrontEnd {
            command: command.to_string(),
            detail: e.to_string(),
        }
    })?;
    if !output.status.success() {
        return Err(siggen::diag::GenError::FrontEnd {
            command: command.to_string(),
            detail: format!("exit status {}", output.status),
        });
    }
    String::from_utf8(output.stdout).map_err(|_| siggen::diag::GenError::FrontEnd {
        command: command.to_string(),
        detail: "non-UTF8 output".to_string(),
    })
}

/// Dump the parsed signature model as JSON (inspection stage).
fn emit_signatures(stream: &str) {
    let records = match siggen::pipeline::records_from_stream(stream) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("siggen: error: {}", e);
            std::process::exit(1);
        }
    };
    let mut signatures = Vec::with_capacity(records.len());
    for record in &records {
        match siggen::resolve::parse_record(record) {
            Ok(sig) => signatures.push(sig),
            Err(e) => {
                eprintln!("siggen: error: {}", e);
                std::process::exit(1);
            }
        }
    }
    let json = serde_json::to_string_pretty(&signatures).expect("signature model serializes");
    println!("{json}");
}

fn emit_build_info(cli: &Cli, stream: &str) {
    let exceptions_text = match std::fs::read_to_string(&cli.exceptions) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("siggen: error: {}: {}", cli.exceptions.display(), e);
            std::process::exit(2);
        }
    };
    let provenance = siggen::pipeline::compute_provenance(stream, &exceptions_text);
    print!("{}", provenance.to_json());
}

fn emit_instantiations(cli: &Cli, stream: &str) {
    let declarations = match siggen::pipeline::generate_instantiations(stream) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("siggen: error: {}", e);
            std::process::exit(1);
        }
    };
    if cli.output.as_os_str() == "-" {
        print!("{declarations}");
        return;
    }
    if let Err(e) = std::fs::write(&cli.output, &declarations) {
        eprintln!("siggen: error: {}: {}", cli.output.display(), e);
        std::process::exit(2);
    }
    if cli.verbose {
        eprintln!("siggen: wrote {}", cli.output.display());
    }
}

fn emit_tests(cli: &Cli, stream: &str) {
    let exceptions_text = match std::fs::read_to_string(&cli.exceptions) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("siggen: error: {}: {}", cli.exceptions.display(), e);
            std::process::exit(2);
        }
    };

    let files = match siggen::pipeline::generate_tests(
        stream,
        &cli.functions,
        &exceptions_text,
        cli.jobs,
    ) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("siggen: error: {}", e);
            std::process::exit(1);
        }
    };

    match siggen::partition::write_files(&files, &cli.out_dir) {
        Ok(paths) => {
            if cli.verbose {
                for path in paths {
                    eprintln!("siggen: wrote {}", path.display());
                }
            }
        }
        Err(e) => {
            eprintln!("siggen: error: {}", e);
            std::process::exit(2);
        }
    }
}
