//! Annotation analysis driver
//!
//! Loads a module and its array-classification results, runs the
//! annotation fixed point, prints the null-terminated findings, and
//! optionally persists the full results for downstream runs.
//!
//! # Usage
//!
//! ```bash
//! null-annotator module.json \
//!     --classification-file iiglue.json \
//!     --dependency libc.results.json \
//!     --output module.results.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use null_annotator::features::length_checks::{self, ArgumentBound, ConstantRanges};
use null_annotator::{
    AnnotatorConfig, ArrayClassification, Module, NullAnnotationEngine, ParamId, Result,
};

#[derive(Parser)]
#[command(name = "null-annotator")]
#[command(about = "Infer NUL-termination annotations for array parameters", long_about = None)]
struct Cli {
    /// Module to analyze (JSON IR)
    module: PathBuf,

    /// Array-classification results file
    #[arg(long = "classification-file")]
    classification_file: PathBuf,

    /// Annotation results for a dependency; repeat to read multiple files
    #[arg(long = "dependency")]
    dependency_files: Vec<PathBuf>,

    /// File to write results to
    #[arg(long = "output")]
    output_file: Option<PathBuf>,

    /// Also report per-argument index bounds for array parameters
    #[arg(long = "length-checks")]
    length_checks: bool,
}

fn run(cli: Cli) -> Result<()> {
    let config = AnnotatorConfig {
        classification_file: cli.classification_file,
        dependency_files: cli.dependency_files,
        output_file: cli.output_file,
    };

    let module = Module::from_json_file(&cli.module)?;
    let classification = ArrayClassification::from_file(&config.classification_file, &module)?;
    let mut engine = NullAnnotationEngine::new(&module, &classification);
    for dependency in &config.dependency_files {
        engine.populate_from_file(dependency)?;
    }
    engine.run();

    for name in classification.functions_with_array_parameters() {
        for &argument in classification.array_parameters_of(name) {
            let param = ParamId::new(name, argument);
            if engine.is_null_terminated(&param) {
                println!(
                    "{name} with argument {argument} should be annotated NULL_TERMINATED ({})",
                    engine.reason_for(&param).unwrap_or("")
                );
            }
        }
    }

    if cli.length_checks {
        let ranges = ConstantRanges::new();
        for name in classification.functions_with_array_parameters() {
            let Some(function) = module.function(name) else {
                continue;
            };
            let bounds = length_checks::analyze_function(function, &classification, &ranges);
            for &argument in classification.array_parameters_of(name) {
                match bounds.bound_for(argument) {
                    Some(ArgumentBound::Bounded(max)) => {
                        println!("{name}: argument {argument} has max index {max}");
                    }
                    Some(ArgumentBound::Unbounded) | None => {
                        println!("{name}: argument {argument} has unknown max index");
                    }
                }
            }
        }
    }

    if let Some(output) = &config.output_file {
        engine.dump_to_file(output)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
