use clap::{Parser, Subcommand};
use royalbit_tabular::cli;
use royalbit_tabular::error::TabularResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tabular")]
#[command(about = "Convert a JSON array of records to CSV or legacy Excel (.xls).")]
#[command(long_about = "Tabular - JSON records to CSV and Excel

The first object's keys become the header row; every array element becomes
one row. Column order follows the JSON document.

COMMANDS:
  csv      - JSON to CSV (UTF-8 with BOM, CRLF rows)
  xls      - JSON to Excel 97-2003 workbook (.xls)
  export   - Pick csv or xls from the output extension
  inspect  - Show sheets, size and header of an .xls file

EXAMPLES:
  tabular csv records.json report.csv
  tabular xls records.json report.xls
  cat records.json | tabular export - report.xls
  tabular inspect report.xls")]
#[command(version)]
struct Cli {
    /// Log filter (tracing directive, e.g. warn, debug, royalbit_tabular=trace)
    #[arg(long, global = true, env = "TABULAR_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Export a JSON array of objects to CSV.

Columns come from the first object. Later objects are read by column name:
missing fields become empty cells, extra fields are ignored.

OUTPUT:
  UTF-8 with byte-order-mark (EF BB BF), comma separated, CRLF line endings.
  Fields with commas, quotes or line breaks are quoted.

EXAMPLE:
  tabular csv records.json report.csv")]
    /// Export JSON records to CSV
    Csv {
        /// JSON input file (- for stdin)
        input: PathBuf,

        /// Output CSV file path (.csv)
        output: PathBuf,

        /// Show verbose export steps
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Export a JSON array of objects to a legacy Excel workbook.

Writes one sheet: the header row, then one row per object. Every cell is
stored as text. Values are placed in each object's own key order.

EXAMPLE:
  tabular xls records.json report.xls")]
    /// Export JSON records to Excel (.xls)
    Xls {
        /// JSON input file (- for stdin)
        input: PathBuf,

        /// Output Excel file path (.xls)
        output: PathBuf,

        /// Show verbose export steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Export JSON records, format chosen by output extension (.csv or .xls)
    Export {
        /// JSON input file (- for stdin)
        input: PathBuf,

        /// Output file path (.csv or .xls)
        output: PathBuf,

        /// Show verbose export steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the sheets of an .xls file
    Inspect {
        /// Path to Excel file (.xls)
        file: PathBuf,
    },
}

fn main() -> TabularResult<()> {
    let cli = Cli::parse();
    cli::init_tracing(&cli.log_level);

    match cli.command {
        Commands::Csv {
            input,
            output,
            verbose,
        } => cli::csv(input, output, verbose),

        Commands::Xls {
            input,
            output,
            verbose,
        } => cli::xls(input, output, verbose),

        Commands::Export {
            input,
            output,
            verbose,
        } => cli::export(input, output, verbose),

        Commands::Inspect { file } => cli::inspect(file),
    }
}
