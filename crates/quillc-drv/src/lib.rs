//! The CLI driver (§6.1): owns argument parsing, logging setup, and
//! the two subcommands, `-tree` and `-eval`, that front the rest of
//! the pipeline. Parsing and evaluation are each a single crate call;
//! this crate's job is turning their results into the exit codes and
//! stderr/stdout text §6.1 and §6.5 require.

mod tree;

use std::fmt;
use std::fs;

use quillc_eval::Value;

const USAGE: &str = "\
quillc - the Quill interpreter

USAGE:
    quillc -help
    quillc -tree <source_file>
    quillc -eval <source_file> <function_name> [<arg>...]

COMMANDS:
    -help     print this message and exit
    -tree     parse <source_file> and print its AST in canonical text form
    -eval     parse <source_file>, evaluate <function_name> with the given
              arguments, and print the result";

/// What the command line asked for. Deliberately narrower than a
/// multi-file, multi-target build configuration: Quill's CLI only
/// ever names one source file, one entry function, and a flat list of
/// already-stringly-typed arguments.
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help,
    Tree {
        source_path: String,
    },
    Eval {
        source_path: String,
        function_name: String,
        args: Vec<String>,
    },
}

#[derive(Debug)]
pub enum CliError {
    Usage(String),
    Io { path: String, source: std::io::Error },
    Parse(quillc_par::ParserError),
    TypeCheck(quillc_sem::TypeError),
    Eval(quillc_eval::RuntimeError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io { path, source } => write!(f, "failed to read {path}: {source}"),
            CliError::Parse(e) => write!(f, "{}", e.message),
            CliError::TypeCheck(e) => write!(f, "{}", e.message),
            CliError::Eval(e) => write!(f, "{}", e.message),
        }
    }
}

impl std::error::Error for CliError {}

/// Parses `std::env::args()` (minus the binary name) into a `Config`.
/// No `clap`: the grammar here is a handful of single-dash pseudo-
/// subcommands followed by a variadic, type-heterogeneous tail, which
/// doesn't map onto derive-based subcommand parsing cleanly, and isn't
/// worth a dependency on its own.
pub fn parse_args(args: impl Iterator<Item = String>) -> Result<Config, CliError> {
    let mut verbose = false;
    let mut rest: Vec<String> = Vec::new();
    for arg in args {
        if arg == "-verbose" {
            verbose = true;
        } else {
            rest.push(arg);
        }
    }

    let mut rest = rest.into_iter();
    let command = match rest.next() {
        None => Command::Help,
        Some(a) if a == "-help" => Command::Help,
        Some(a) if a == "-tree" => {
            let source_path = rest.next().ok_or_else(|| {
                CliError::Usage(format!("-tree requires a source file\n\n{USAGE}"))
            })?;
            Command::Tree { source_path }
        }
        Some(a) if a == "-eval" => {
            let source_path = rest.next().ok_or_else(|| {
                CliError::Usage(format!("-eval requires a source file\n\n{USAGE}"))
            })?;
            let function_name = rest.next().ok_or_else(|| {
                CliError::Usage(format!("-eval requires a function name\n\n{USAGE}"))
            })?;
            let args: Vec<String> = rest.collect();
            Command::Eval {
                source_path,
                function_name,
                args,
            }
        }
        Some(other) => {
            return Err(CliError::Usage(format!(
                "unrecognized command '{other}'\n\n{USAGE}"
            )))
        }
    };

    Ok(Config { command, verbose })
}

/// Installs a `tracing-subscriber` filtered by `QUILLC_LOG` (falling
/// back to `info`, or `debug` under `-verbose`), bridged from the
/// plain `log` facade the rest of the pipeline emits through.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("QUILLC_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    let _ = tracing_log::LogTracer::init();
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init();
}

pub fn run(config: Config) -> Result<(), CliError> {
    match config.command {
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
        Command::Tree { source_path } => run_tree(&source_path),
        Command::Eval {
            source_path,
            function_name,
            args,
        } => run_eval(&source_path, &function_name, &args),
    }
}

fn read_source(path: &str) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_string(),
        source,
    })
}

fn run_tree(source_path: &str) -> Result<(), CliError> {
    let source = read_source(source_path)?;
    log::debug!("parsing {source_path} for -tree");
    let ast = quillc_par::parse(&source).map_err(CliError::Parse)?;
    print!("{}", tree::render(&ast));
    Ok(())
}

fn run_eval(source_path: &str, function_name: &str, raw_args: &[String]) -> Result<(), CliError> {
    let source = read_source(source_path)?;
    log::debug!("parsing {source_path} for -eval {function_name}");
    let ast = quillc_par::parse(&source).map_err(CliError::Parse)?;

    log::debug!("type checking {source_path}");
    quillc_sem::check(&ast).map_err(CliError::TypeCheck)?;

    let args: Vec<Value> = raw_args.iter().map(|a| Value::from_cli_arg(a)).collect();
    log::debug!("evaluating {function_name} with {} argument(s)", args.len());
    let result = quillc_eval::evaluate(&ast, function_name, args).map_err(CliError::Eval)?;

    println!("Evaluation returned: {result}.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_defaults_to_help() {
        let config = parse_args(std::iter::empty()).unwrap();
        assert!(matches!(config.command, Command::Help));
    }

    #[test]
    fn help_flag_is_recognized() {
        let config = parse_args(vec!["-help".to_string()].into_iter()).unwrap();
        assert!(matches!(config.command, Command::Help));
    }

    #[test]
    fn tree_requires_a_path() {
        let err = parse_args(vec!["-tree".to_string()].into_iter()).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[test]
    fn eval_collects_trailing_arguments() {
        let config = parse_args(
            vec![
                "-eval".to_string(),
                "prog.ql".to_string(),
                "foo".to_string(),
                "1".to_string(),
                "true".to_string(),
            ]
            .into_iter(),
        )
        .unwrap();
        match config.command {
            Command::Eval {
                source_path,
                function_name,
                args,
            } => {
                assert_eq!(source_path, "prog.ql");
                assert_eq!(function_name, "foo");
                assert_eq!(args, vec!["1".to_string(), "true".to_string()]);
            }
            other => panic!("expected Eval, got {other:?}"),
        }
    }

    #[test]
    fn verbose_flag_is_stripped_from_positional_arguments() {
        let config = parse_args(
            vec![
                "-verbose".to_string(),
                "-tree".to_string(),
                "prog.ql".to_string(),
            ]
            .into_iter(),
        )
        .unwrap();
        assert!(config.verbose);
        assert!(matches!(config.command, Command::Tree { .. }));
    }

    #[test]
    fn unrecognized_command_is_rejected() {
        let err = parse_args(vec!["-bogus".to_string()].into_iter()).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[test]
    fn eval_end_to_end_matches_scenario_2() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prog.ql");
        std::fs::write(&path, "func foo() : number { return 12.4; }").unwrap();
        run_eval(path.to_str().unwrap(), "foo", &[]).unwrap();
    }

    #[test]
    fn eval_surfaces_a_type_error_matching_scenario_8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prog.ql");
        std::fs::write(&path, "func foo() {\nvar x: number = 1;\nx = \"oops\";\n}").unwrap();
        let err = run_eval(path.to_str().unwrap(), "foo", &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type mismatch error on line 3. Expected \"number\" got \"string\"."
        );
    }

    #[test]
    fn tree_end_to_end_renders_a_global_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prog.ql");
        std::fs::write(&path, "func foo() {}").unwrap();
        let ast = quillc_par::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(tree::render(&ast).starts_with("Global\n"));
    }
}
