//! proshno CLI - Bengali question document conversion tool
//!
//! Parses MCQ and creative-question documents into spreadsheet rows, and
//! renders rows back into documents.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use proshno::render::{self, RenderOptions};
use proshno::store::CsvStore;
use proshno::{FormatType, Proshno, Schema, SchemaKind, Selection, Variant};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Bengali question documents to spreadsheet rows and back
#[derive(Parser)]
#[command(
    name = "proshno",
    version,
    about = "Convert Bengali question documents to spreadsheet rows and back",
    long_about = "proshno - Bengali MCQ and creative-question document parser.\n\n\
                  Parses DOCX, LaTeX and plain-text question banks into CSV, JSON,\n\
                  text or DOCX, and renders CSV rows back into documents.\n\n\
                  Usage:\n  \
                  proshno <file>              Convert to all formats in <file>_output/\n  \
                  proshno <file> <output>     Convert into the given directory\n  \
                  proshno parse <file> -f csv Parse to one format"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input file path (for default conversion)
    #[arg(global = false)]
    input: Option<PathBuf>,

    /// Output directory (for default conversion)
    #[arg(global = false)]
    output: Option<PathBuf>,

    /// Parser preset: mcq, creative or latex (default: by input format)
    #[arg(long, global = true)]
    variant: Option<String>,

    /// Parser variant file (TOML); overrides --variant
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document to CSV, JSON and text (default command)
    Convert {
        /// Input file path
        input: PathBuf,

        /// Output directory (default: <filename>_output)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a document into one output format
    Parse {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout; required for docx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "csv")]
        format: OutputFormat,

        /// Write embedded images here; image columns point at the files
        #[arg(long)]
        images_dir: Option<PathBuf>,

        /// Resolve image keys to <prefix>/<file name>
        #[arg(long)]
        image_prefix: Option<String>,

        /// Write image columns as =IMAGE("..") formulas
        #[arg(long)]
        image_formula: bool,
    },

    /// Render CSV rows into a document (.docx or text)
    Render {
        /// Input CSV file
        input: PathBuf,

        /// Output file (.docx for Word, anything else for text)
        #[arg(short, long)]
        output: PathBuf,

        /// Column layout of the CSV file
        #[arg(long, default_value = "mcq")]
        schema: SchemaArg,

        /// Only rows checked in this column (class-slide, lecture-sheet, quiz-daily, quiz-weekly)
        #[arg(long)]
        select: Option<String>,

        /// Omit answers
        #[arg(long)]
        no_answers: bool,

        /// Write serials with Bengali digits
        #[arg(long)]
        bengali_serials: bool,

        /// Font family for DOCX output
        #[arg(long)]
        font: Option<String>,

        /// Font size in points for DOCX output
        #[arg(long)]
        font_size: Option<usize>,
    },

    /// Show document information and parse statistics
    Info {
        /// Input file path
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Output format for the parse command
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Spreadsheet rows (header + one row per question)
    Csv,
    /// Question records as JSON
    Json,
    /// Question layout as plain text
    Text,
    /// Question layout as a Word document
    Docx,
}

/// Column layout
#[derive(Clone, Copy, ValueEnum)]
enum SchemaArg {
    /// Serial, question, board, four options, answer
    Mcq,
    /// Serial, passage, board, four question/answer pairs
    Creative,
    /// Serial, selection flags, question, topic, board, options, answer, explanation, images
    Extended,
}

impl From<SchemaArg> for SchemaKind {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::Mcq => SchemaKind::Mcq,
            SchemaArg::Creative => SchemaKind::Creative,
            SchemaArg::Extended => SchemaKind::Extended,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let selector = VariantSelector {
        name: cli.variant,
        config: cli.config,
    };

    let Some(command) = cli.command else {
        // Handle default command (proshno <file> [output])
        if let Some(input) = cli.input {
            return run_convert(&input, cli.output.as_deref(), &selector);
        }
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Convert { input, output } => {
            run_convert(&input, output.as_deref(), &selector)?;
        }

        Commands::Parse {
            input,
            output,
            format,
            images_dir,
            image_prefix,
            image_formula,
        } => {
            let pb = create_spinner("Parsing document...");

            let variant = selector.resolve(&input)?;
            let mut builder = Proshno::new()
                .with_variant(variant)
                .with_images(images_dir.is_some() || image_prefix.is_some());
            if let Some(prefix) = image_prefix {
                builder = builder.with_image_prefix(prefix);
            }
            if image_formula {
                builder = builder.with_image_formula();
            }
            let mut bank = builder.parse(&input)?;

            if let Some(dir) = &images_dir {
                pb.set_message("Extracting images...");
                bank.extract_images(dir)?;
            }

            pb.set_message("Writing output...");
            match (format, output.as_deref()) {
                (OutputFormat::Csv, Some(path)) => bank.write_csv(path)?,
                (OutputFormat::Csv, None) => {
                    pb.finish_and_clear();
                    bank.write_csv_to(io::stdout().lock())?;
                }
                (OutputFormat::Json, path) => {
                    let json = bank.to_json()?;
                    pb.finish_and_clear();
                    write_output(path, &json)?;
                }
                (OutputFormat::Text, path) => {
                    let text = bank.to_text();
                    pb.finish_and_clear();
                    write_output(path, &text)?;
                }
                (OutputFormat::Docx, Some(path)) => bank.write_docx(path)?,
                (OutputFormat::Docx, None) => {
                    return Err("DOCX output needs --output <file>".into());
                }
            }
            pb.finish_and_clear();
            info!(questions = bank.questions().len(), "parse finished");

            report_warnings(bank.report());
            if let Some(path) = output {
                println!(
                    "{} Parsed {} questions: {}",
                    "✓".green().bold(),
                    bank.questions().len(),
                    path.display()
                );
            }
        }

        Commands::Render {
            input,
            output,
            schema,
            select,
            no_answers,
            bengali_serials,
            font,
            font_size,
        } => {
            let selection = match select {
                Some(name) => Some(
                    Selection::from_name(&name)
                        .ok_or_else(|| format!("unknown selection column: {}", name))?,
                ),
                None => None,
            };

            let pb = create_spinner("Reading rows...");
            let kind = SchemaKind::from(schema);
            let questions =
                proshno::questions_from_store(&CsvStore::new(&input), &Schema::for_kind(kind), selection)?;

            pb.set_message("Rendering...");
            let mut options = RenderOptions::for_kind(kind);
            if no_answers {
                options = options.without_answers();
            }
            if bengali_serials {
                options = options.with_bengali_serials();
            }
            if let Some(font) = font {
                options = options.with_font(font);
            }
            if let Some(size) = font_size {
                options = options.with_font_size(size);
            }
            render::render_to_file(&questions, &output, &options)?;
            info!(questions = questions.len(), output = %output.display(), "render finished");

            pb.finish_and_clear();
            println!(
                "{} Rendered {} questions: {}",
                "✓".green().bold(),
                questions.len(),
                output.display()
            );
        }

        Commands::Info { input } => {
            let pb = create_spinner("Analyzing document...");

            let variant = selector.resolve(&input)?;
            let source = proshno::read_source(&input, true)?;
            let report = proshno::parse_lines(&source.lines, &variant);

            pb.finish_and_clear();

            println!("{}", "Document Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Format".bold(), source.format);
            println!("{}: {}", "Variant".bold(), variant.name);
            println!("{}: {}", "Lines".bold(), source.line_count());
            println!("{}: {}", "Resources".bold(), source.resources.len());

            let answered = report.questions.iter().filter(|q| !q.answer.is_empty()).count();
            println!("\n{}", "Parse Statistics".cyan().bold());
            println!("{}", "─".repeat(40));
            println!("{}: {}", "Questions".bold(), report.questions.len());
            println!("{}: {}", "With answer".bold(), answered);
            println!("{}: {}", "Orphan lines".bold(), report.orphan_lines);
            println!(
                "{}: {}",
                "Duplicate serials".bold(),
                report.duplicate_serials.len()
            );
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Where the parser variant comes from.
struct VariantSelector {
    name: Option<String>,
    config: Option<PathBuf>,
}

impl VariantSelector {
    /// Config file, then named preset, then a preset matching the input format.
    fn resolve(&self, input: &Path) -> proshno::Result<Variant> {
        let variant = if let Some(path) = &self.config {
            Variant::load(path)?
        } else if let Some(name) = &self.name {
            Variant::by_name(name)?
        } else {
            match proshno::detect_format_from_path(input)? {
                FormatType::Latex => Variant::latex_mcq(),
                _ => Variant::mcq(),
            }
        };
        debug!(variant = %variant.name, input = %input.display(), "selected variant");
        Ok(variant)
    }
}

/// Run the default convert command - writes all formats to an output directory
fn run_convert(
    input: &Path,
    output: Option<&Path>,
    selector: &VariantSelector,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = create_spinner("Parsing document...");

    let output_dir = match output {
        Some(p) => p.to_path_buf(),
        None => {
            let stem = input
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            let parent = input.parent().unwrap_or(Path::new("."));
            parent.join(format!("{}_output", stem))
        }
    };
    fs::create_dir_all(&output_dir)?;

    let variant = selector.resolve(input)?;
    let mut bank = Proshno::new()
        .with_variant(variant)
        .with_images(true)
        .parse(input)?;

    let mut image_count = 0;
    if !bank.resources().is_empty() {
        pb.set_message("Extracting images...");
        image_count = bank.extract_images(output_dir.join("images"))?;
    }

    pb.set_message("Writing CSV...");
    bank.write_csv(output_dir.join("questions.csv"))?;

    pb.set_message("Writing JSON...");
    fs::write(output_dir.join("questions.json"), bank.to_json()?)?;

    pb.set_message("Writing text...");
    fs::write(output_dir.join("questions.txt"), bank.to_text())?;
    info!(output = %output_dir.display(), images = image_count, "conversion finished");

    pb.finish_and_clear();

    println!("{}", "Conversion Complete".green().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Output".bold(), output_dir.display());
    println!("  {} questions.csv", "✓".green());
    println!("  {} questions.json", "✓".green());
    println!("  {} questions.txt", "✓".green());
    if image_count > 0 {
        println!("  {} images/ ({} files)", "✓".green(), image_count);
    }

    let report = bank.report();
    println!("\n{}", "Statistics".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Lines".bold(), report.line_count);
    println!("{}: {}", "Questions".bold(), report.questions.len());
    report_warnings(report);

    Ok(())
}

fn report_warnings(report: &proshno::ParseReport) {
    if !report.duplicate_serials.is_empty() {
        eprintln!(
            "{} Duplicate serials: {}",
            "!".yellow().bold(),
            report.duplicate_serials.join(", ")
        );
    }
    if report.orphan_lines > 0 {
        eprintln!(
            "{} {} lines before the first question were dropped",
            "!".yellow().bold(),
            report.orphan_lines
        );
    }
}

fn print_version() {
    println!("{} {}", "proshno".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Bengali question documents to spreadsheet rows and back");
    println!();
    println!("Inputs: DOCX, LaTeX export, plain text");
    println!("Outputs: CSV, JSON, text, DOCX");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_variant_selector_order() {
        let dir = std::env::temp_dir().join(format!("proshno-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("bank.tex");
        fs::write(&input, "১. প্রশ্ন").unwrap();

        let by_format = VariantSelector { name: None, config: None };
        assert_eq!(by_format.resolve(&input).unwrap().name, "latex");

        let by_name = VariantSelector {
            name: Some("creative".into()),
            config: None,
        };
        assert_eq!(by_name.resolve(&input).unwrap().name, "creative");

        let config = dir.join("variant.toml");
        fs::write(&config, "base = \"mcq\"\nname = \"board-book\"\n").unwrap();
        let by_config = VariantSelector {
            name: Some("creative".into()),
            config: Some(config),
        };
        assert_eq!(by_config.resolve(&input).unwrap().name, "board-book");

        fs::remove_dir_all(&dir).unwrap();
    }
}
