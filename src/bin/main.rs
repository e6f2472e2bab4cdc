//! Sheetforge CLI - Generate SQL, models and databases from workbooks
//!
//! Usage:
//!   sheetforge generate --input-dir <dir> [--output <dir>] [--exporters all|sqlite,rust]
//!   sheetforge generate --input <file>[,<file>...] [--package <name>] [--workers <n>]
//!   sheetforge inspect <workbook>
//!
//! Examples:
//!   sheetforge generate --input-dir data --output generated
//!   sheetforge generate --input data/items.csv --exporters sqlite -v
//!   sheetforge inspect data/game

use clap::{ArgGroup, Parser, Subcommand};
use sheetforge::config::Settings;
use sheetforge::export::{ExportOptions, ExporterRegistry};
use sheetforge::generator::{Catalog, Generator, Input};
use sheetforge::logging::{init_logging, LogConfig};
use sheetforge::schema::ColumnRole;
use sheetforge::sql::synthesize;
use sheetforge::workbook::{discover_workbooks, open_workbook};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sheetforge")]
#[command(about = "Sheetforge - Turn spreadsheet schemas into SQL, models and SQLite stores")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate exporter output from workbooks
    #[command(group(ArgGroup::new("source").required(true).args(["input_dir", "input"])))]
    Generate {
        /// Directory scanned for workbooks
        #[arg(short = 'd', long)]
        input_dir: Option<PathBuf>,

        /// Workbook paths, comma separated
        #[arg(short, long, value_delimiter = ',')]
        input: Vec<PathBuf>,

        /// Output root directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Exporters to run: "all" or a comma separated list
        #[arg(short, long)]
        exporters: Option<String>,

        /// Package / module name for generated code
        #[arg(short, long)]
        package: Option<String>,

        /// Worker pool size
        #[arg(short, long)]
        workers: Option<usize>,

        /// Config file (defaults to the standard lookup)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the column model and DDL derived from a workbook
    Inspect {
        /// Workbook directory or CSV file
        workbook: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(LogConfig {
        verbose: cli.verbose,
    });

    match cli.command {
        Commands::Generate {
            input_dir,
            input,
            output,
            exporters,
            package,
            workers,
            config,
        } => cmd_generate(GenerateArgs {
            input_dir,
            input,
            output,
            exporters,
            package,
            workers,
            config,
        }),
        Commands::Inspect { workbook } => cmd_inspect(workbook),
    }
}

struct GenerateArgs {
    input_dir: Option<PathBuf>,
    input: Vec<PathBuf>,
    output: Option<PathBuf>,
    exporters: Option<String>,
    package: Option<String>,
    workers: Option<usize>,
    config: Option<PathBuf>,
}

fn cmd_generate(args: GenerateArgs) -> ExitCode {
    let settings = match &args.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let mut settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Flags override the config file
    if let Some(output) = &args.output {
        settings.output.dir = output.display().to_string();
    }
    if let Some(package) = args.package {
        settings.output.package = package;
    }
    if let Some(workers) = args.workers {
        settings.run.workers = workers;
    }
    if let Err(e) = settings.validate() {
        eprintln!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let registry = ExporterRegistry::with_defaults();
    let selection = args
        .exporters
        .unwrap_or_else(|| settings.run.exporters.join(","));
    let exporters = match registry.resolve(&selection) {
        Ok(names) => names,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let paths = match &args.input_dir {
        Some(dir) => match discover_workbooks(dir) {
            Ok(paths) => paths,
            Err(e) => {
                eprintln!("Error reading input directory: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => args.input,
    };
    if paths.is_empty() {
        eprintln!("No workbooks found");
        return ExitCode::FAILURE;
    }

    let output_dir = match settings.output.resolved_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let catalog = Generator::new(settings.run.workers).run_paths(paths);

    if settings.output.clean && output_dir.exists() {
        if let Err(e) = fs::remove_dir_all(&output_dir) {
            eprintln!("Error cleaning '{}': {}", output_dir.display(), e);
            return ExitCode::FAILURE;
        }
    }

    let options = ExportOptions::new(&output_dir)
        .with_package(&settings.output.package)
        .with_db_name(&settings.output.db_name);

    let mut failed = report_errors(&catalog);
    for name in exporters {
        if let Err(e) = registry.export(name, &catalog.tables, &options) {
            eprintln!("Export error ({}): {}", name, e);
            failed = true;
        }
    }

    println!(
        "Generated {} table(s) into {}",
        catalog.tables.len(),
        output_dir.display()
    );

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn report_errors(catalog: &Catalog) -> bool {
    for error in &catalog.errors {
        eprintln!("Error: {}", error);
    }
    catalog.has_errors()
}

fn cmd_inspect(path: PathBuf) -> ExitCode {
    let workbook = match open_workbook(&path) {
        Ok(wb) => wb,
        Err(e) => {
            eprintln!("Error opening workbook '{}': {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let catalog = Generator::new(1).run(vec![Input::Workbook {
        name: path.display().to_string(),
        workbook,
    }]);

    println!("Workbook: {}", path.display());
    println!();

    for table in &catalog.tables {
        println!("Table {} (sheet \"{}\", {} rows):", table.name, table.sheet_name, table.rows.len());
        for column in &table.columns {
            let role = match &column.role {
                ColumnRole::Scalar => String::new(),
                ColumnRole::ArrayAggregate { len } => format!(" [aggregate of {}]", len),
                ColumnRole::ArrayElement { parent, index } => {
                    format!(" [{}[{}]]", parent, index)
                }
            };
            println!(
                "  - {}: {} ({}) {}{}",
                column.name,
                column.ty,
                column.sql_type(),
                column.tag_string(),
                role
            );
        }
        for relation in &table.relations {
            println!(
                "  ~ {} {} via {} -> {}",
                relation.relation_type,
                relation.target_table,
                relation.foreign_key,
                relation.reference_key
            );
        }
        println!();

        let sql = synthesize(table);
        for statement in sql.ddl() {
            println!("{};", statement);
        }
        println!("{};", sql.insert);
        println!();
    }

    if report_errors(&catalog) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
