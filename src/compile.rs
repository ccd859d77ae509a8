//! Blocking invocation of the LaTeX toolchain.
//!
//! One `pdflatex` run over the document that `\input`s the generated table
//! fragments. The data directory becomes the subprocess working directory so
//! relative `\input` paths resolve; the parent process never changes its own
//! working directory. No retries, no timeout.

use std::path::Path;
use std::process::Command;

use crate::error::AppError;

/// Run `pdflatex` on `doc` inside `dir`. Non-zero exit (or a failed spawn)
/// aborts the run with exit code 5.
pub fn run_pdflatex(dir: &Path, doc: &str) -> Result<(), AppError> {
    let output = Command::new("pdflatex")
        .arg("-interaction=nonstopmode")
        .arg(doc)
        .current_dir(dir)
        .output()
        .map_err(|e| {
            AppError::compiler(format!(
                "Failed to run pdflatex in '{}': {e}",
                dir.display()
            ))
        })?;

    if !output.status.success() {
        // pdflatex logs to stdout; the tail usually carries the actual error.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let log = if stdout.trim().is_empty() { stderr } else { stdout };
        return Err(AppError::compiler(format!(
            "pdflatex failed on '{doc}' ({}):\n{}",
            output.status,
            tail_lines(&log, 20)
        )));
    }

    Ok(())
}

fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}
