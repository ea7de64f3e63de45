use crate::error::{TabularError, TabularResult};
use crate::excel::XlsInspector;
use crate::ExportFormat;
use colored::Colorize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Install the stderr fmt subscriber with the given filter directive
///
/// Only the first call installs a subscriber; later calls keep the existing one.
pub fn init_tracing(filter: &str) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(e) = installed {
        // A global subscriber is already set, so this event goes to it
        tracing::trace!("tracing subscriber already installed: {}", e);
    }
}

/// Read JSON from a file, or from stdin when the path is `-`
fn read_input(input: &Path) -> TabularResult<String> {
    if input == Path::new("-") {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }
    Ok(fs::read_to_string(input)?)
}

fn display_input(input: &Path) -> String {
    if input == Path::new("-") {
        "<stdin>".to_string()
    } else {
        input.display().to_string()
    }
}

fn run_export(
    format: ExportFormat,
    input: &Path,
    output: &Path,
    verbose: bool,
) -> TabularResult<()> {
    let title = match format {
        ExportFormat::Csv => "📄 Tabular - CSV Export",
        ExportFormat::Xls => "📊 Tabular - Excel Export",
    };
    println!("{}", title.bold().green());
    println!("   Input:  {}", display_input(input));
    println!("   Output: {}\n", output.display());

    if verbose {
        println!("{}", "📖 Reading JSON...".cyan());
    }
    let content = read_input(input)?;
    if verbose {
        println!("   {} bytes read\n", content.len());
        println!("{}", format!("💾 Writing .{} file...", format.extension()).cyan());
    }

    format.export(output, &content)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   File: {}\n", output.display());
    Ok(())
}

/// Execute the csv command
pub fn csv(input: PathBuf, output: PathBuf, verbose: bool) -> TabularResult<()> {
    run_export(ExportFormat::Csv, &input, &output, verbose)
}

/// Execute the xls command
pub fn xls(input: PathBuf, output: PathBuf, verbose: bool) -> TabularResult<()> {
    run_export(ExportFormat::Xls, &input, &output, verbose)
}

/// Execute the export command (format from the output extension)
pub fn export(input: PathBuf, output: PathBuf, verbose: bool) -> TabularResult<()> {
    let format = ExportFormat::from_path(&output).ok_or_else(|| {
        TabularError::Format(format!(
            "cannot tell the output format of '{}': use a .csv or .xls extension",
            output.display()
        ))
    })?;
    run_export(format, &input, &output, verbose)
}

/// Execute the inspect command
pub fn inspect(file: PathBuf) -> TabularResult<()> {
    println!("{}", "🔍 Tabular - Inspect".bold().green());
    println!("   File: {}\n", file.display());

    let sheets = XlsInspector::new(&file).inspect()?;
    for sheet in &sheets {
        println!("   📊 Sheet: {}", sheet.name.bright_blue());
        println!("      {} rows, {} columns", sheet.rows, sheet.columns);
        println!("      Header: {}", sheet.header.join(", "));
    }
    println!();

    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
