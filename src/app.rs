//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the table-generation pipeline
//! - prints per-output summaries and alignment warnings
//! - invokes pdflatex when requested

use clap::Parser;

use crate::cli::{Command, CompileArgs, MakeArgs};
use crate::error::AppError;
use crate::io::loader::LoadConfig;
use crate::report::Template;

pub mod pipeline;

/// Entry point for the `eoctab` binary.
pub fn run() -> Result<(), AppError> {
    // We want a bare `eoctab` (or `eoctab -d results`) to behave like
    // `eoctab make ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Make(args) => handle_make(args),
        Command::Compile(args) => handle_compile(args),
    }
}

fn handle_make(args: MakeArgs) -> Result<(), AppError> {
    let config = make_config_from_args(&args)?;
    let run = pipeline::run_make(&config)?;

    for key in &run.dropped_rows {
        eprintln!("warning: row '{key}' is missing from the first data block and was dropped");
    }
    for out in &run.outputs {
        println!(
            "wrote {} ({} rows x {} cols)",
            out.path.display(),
            out.rows,
            out.cols
        );
    }
    Ok(())
}

fn handle_compile(args: CompileArgs) -> Result<(), AppError> {
    crate::compile::run_pdflatex(&args.dir, &args.doc)
}

pub fn make_config_from_args(args: &MakeArgs) -> Result<pipeline::MakeConfig, AppError> {
    let files = if args.files.is_empty() {
        vec!["2d_grid.csv".to_string()]
    } else {
        args.files.clone()
    };

    Ok(pipeline::MakeConfig {
        dir: args.dir.clone(),
        files,
        norms: args.norms.clone(),
        variants: args.variants.clone(),
        load: LoadConfig {
            index_columns: args.index_columns,
            header_rows: args.header_rows,
        },
        template: Template::from_name(&args.template)?,
        headers_override: args.headers.clone(),
        transpose: !args.no_transpose,
        compile: args.compile,
        doc: args.doc.clone(),
    })
}

/// Rewrite argv so `eoctab` defaults to `eoctab make`.
///
/// Rules:
/// - `eoctab`                    -> `eoctab make`
/// - `eoctab -d results ...`     -> `eoctab make -d results ...`
/// - `eoctab --help/--version`   -> unchanged (top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("make".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    let is_subcommand = matches!(arg1.as_str(), "make" | "compile");

    if !is_top_level_help_or_version && !is_subcommand && arg1.starts_with('-') {
        argv.insert(1, "make".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_make() {
        assert_eq!(rewrite_args(args(&["eoctab"])), args(&["eoctab", "make"]));
    }

    #[test]
    fn leading_flag_defaults_to_make() {
        assert_eq!(
            rewrite_args(args(&["eoctab", "-d", "results"])),
            args(&["eoctab", "make", "-d", "results"])
        );
    }

    #[test]
    fn explicit_subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["eoctab", "compile"])),
            args(&["eoctab", "compile"])
        );
        assert_eq!(
            rewrite_args(args(&["eoctab", "--help"])),
            args(&["eoctab", "--help"])
        );
    }

    #[test]
    fn make_config_defaults() {
        let make = MakeArgs::parse_from(["make"]);
        let config = make_config_from_args(&make).unwrap();
        assert_eq!(config.files, vec!["2d_grid.csv".to_string()]);
        assert_eq!(config.norms, vec!["S_L1".to_string(), "S_L2".to_string()]);
        assert_eq!(config.variants, vec!["BC".to_string(), "VG".to_string()]);
        assert_eq!(config.load.index_columns, 3);
        assert_eq!(config.load.header_rows, 2);
        assert_eq!(config.template, Template::Eoc);
        assert!(config.transpose);
        assert!(!config.compile);
    }

    #[test]
    fn unknown_template_is_rejected() {
        let make = MakeArgs::parse_from(["make", "--template", "fancy"]);
        let err = make_config_from_args(&make).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
