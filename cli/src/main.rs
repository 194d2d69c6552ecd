//! pdfsplice CLI - combine and rearrange pages from several PDF files

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfsplice::{
    detect_format_from_path, ExportOptions, LoadMode, LoadOptions, LopdfSource, Operation,
    Outcome, PageSource, PdfExporter, Session, StructureElement,
};

#[derive(Parser)]
#[command(name = "pdfsplice")]
#[command(version)]
#[command(about = "Combine and rearrange pages from multiple PDF files", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Concatenate PDF files into one
    Merge {
        /// Input PDF files, in output order
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(
            short,
            long,
            value_name = "FILE",
            env = "PDFSPLICE_OUTPUT",
            default_value = "merged.pdf"
        )]
        output: PathBuf,

        /// One element per page instead of one per file
        #[arg(long)]
        flat: bool,

        /// Elements to leave out, by position as listed by `show` (e.g., "2,4-6")
        #[arg(long, value_name = "LIST")]
        exclude: Option<String>,

        /// Document title
        #[arg(long)]
        title: Option<String>,

        /// Write uncompressed streams
        #[arg(long)]
        no_compress: bool,
    },

    /// Run a JSON script of structure operations
    Apply {
        /// Script file (array of operations)
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Export the result to this file
        #[arg(short, long, value_name = "FILE", env = "PDFSPLICE_OUTPUT")]
        output: Option<PathBuf>,

        /// Print the final structure
        #[arg(long)]
        show: bool,
    },

    /// Print the structure built from PDF files
    Show {
        /// Input PDF files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// One element per page instead of one per file
        #[arg(long)]
        flat: bool,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Commands::Info { input } => cmd_info(&input),
        Commands::Merge {
            inputs,
            output,
            flat,
            exclude,
            title,
            no_compress,
        } => {
            let mut options = ExportOptions::new().with_compression(!no_compress);
            if let Some(title) = title {
                options = options.with_title(title);
            }
            cmd_merge(&inputs, &output, load_mode(flat), exclude.as_deref(), options)
        }
        Commands::Apply {
            script,
            output,
            show,
        } => cmd_apply(&script, output.as_deref(), show),
        Commands::Show {
            inputs,
            flat,
            json,
        } => cmd_show(&inputs, load_mode(flat), json),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_mode(flat: bool) -> LoadMode {
    if flat {
        LoadMode::Flat
    } else {
        LoadMode::Grouped
    }
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let format = detect_format_from_path(input)?;
    let source = LopdfSource::load_file(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    if format.header_offset > 0 {
        println!("{}: {} bytes", "Header offset".bold(), format.header_offset);
    }
    println!("{}: {}", "Pages".bold(), source.page_count());

    let sizes: Vec<_> = (0..source.page_count())
        .filter_map(|n| source.page_size(n))
        .collect();
    if let Some(first) = sizes.first() {
        println!(
            "{}: {:.0} x {:.0} pt",
            "Page size".bold(),
            first.width,
            first.height
        );
    }
    let landscape = sizes.iter().filter(|size| size.is_landscape()).count();
    if landscape > 0 {
        println!("{}: {}", "Landscape pages".bold(), landscape);
    }

    Ok(())
}

fn cmd_merge(
    inputs: &[PathBuf],
    output: &Path,
    mode: LoadMode,
    exclude: Option<&str>,
    options: ExportOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = load_with_progress(inputs, mode)?;

    let positions: Vec<_> = session.snapshot().iter().map(StructureElement::id).collect();
    let excluded = match exclude {
        Some(list) => parse_positions(list, positions.len())
            .map_err(|e| format!("Invalid --exclude: {}", e))?,
        None => BTreeSet::new(),
    };
    for position in excluded {
        if let Some(&id) = positions.get(position - 1) {
            session.toggle_exclude(id);
        }
    }

    let summary = PdfExporter::new(&session, options).save(output)?;

    println!(
        "{} {} pages from {} files to {}",
        "Wrote".green(),
        summary.pages,
        summary.sources,
        output.display()
    );

    Ok(())
}

fn cmd_apply(
    script: &Path,
    output: Option<&Path>,
    show: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = fs::read_to_string(script)?;
    let base = script.parent().unwrap_or_else(|| Path::new("."));
    let operations: Vec<Operation> = Operation::parse_script(&json)?
        .into_iter()
        .map(|op| op.relative_to(base))
        .collect();

    let mut session = Session::new();
    for (step, operation) in operations.into_iter().enumerate() {
        let outcome = session
            .apply(operation)
            .map_err(|e| format!("step {}: {}", step + 1, e))?;
        println!("{} {}", format!("[{}]", step + 1).dimmed(), describe(&outcome));
    }

    if show {
        println!();
        print_structure(&session);
    }

    if let Some(path) = output {
        let summary = PdfExporter::new(&session, ExportOptions::default()).save(path)?;
        println!(
            "{} {} pages to {}",
            "Wrote".green(),
            summary.pages,
            path.display()
        );
    }

    Ok(())
}

fn cmd_show(inputs: &[PathBuf], mode: LoadMode, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new();
    session.add_sources(inputs, &LoadOptions::new().with_mode(mode))?;

    if json {
        let sources: Vec<_> = session.sources().collect();
        let value = serde_json::json!({
            "sources": sources,
            "elements": session.snapshot(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_structure(&session);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfsplice".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Combine and rearrange pages from multiple PDF files");
    println!();
    println!("License: MIT");
}

fn load_with_progress(inputs: &[PathBuf], mode: LoadMode) -> pdfsplice::Result<Session> {
    let pb = ProgressBar::new(inputs.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let mut session = Session::new();
    for input in inputs {
        pb.set_message(input.display().to_string());
        if let Err(e) = session.add_source(input, mode) {
            pb.abandon();
            return Err(e);
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(session)
}

fn print_structure(session: &Session) {
    println!("{}", "Structure".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for (position, element) in session.snapshot().iter().enumerate() {
        let first = session.page_label(element.first_page());
        let label = match element.pages().last() {
            Some(last) if element.is_grouped() => {
                format!("{} .. {} ({} pages)", first, session.page_label(last), element.page_count())
            }
            _ => first,
        };
        let line = format!("{:>4}  {:<6} {}", position + 1, element.id(), label);
        if element.is_excluded() {
            println!("{} {}", line.dimmed().strikethrough(), "excluded".yellow());
        } else {
            println!("{}", line);
        }
    }

    println!("{}", "─".repeat(40).dimmed());
    println!(
        "{}: {} of {}",
        "Exported pages".bold(),
        session.structure().exported_page_count(),
        session.structure().page_count()
    );
}

fn describe(outcome: &Outcome) -> String {
    let ids = |elements: &[StructureElement]| {
        elements
            .iter()
            .map(|e| e.id().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    match outcome {
        Outcome::Added(elements) => format!("added {}", ids(elements)),
        Outcome::Moved(true) => "moved".to_string(),
        Outcome::Moved(false) => "move skipped (unknown element)".to_string(),
        Outcome::Expanded(elements) if elements.is_empty() => "nothing to expand".to_string(),
        Outcome::Expanded(elements) => format!("expanded into {}", ids(elements)),
        Outcome::Collapsed(Some(element)) => format!("collapsed into {}", element.id()),
        Outcome::Collapsed(None) => "nothing to collapse".to_string(),
        Outcome::Toggled(Some(true)) => "excluded".to_string(),
        Outcome::Toggled(Some(false)) => "included".to_string(),
        Outcome::Toggled(None) => "toggle skipped (unknown element)".to_string(),
    }
}

/// Parse 1-based positions like "2,4-6", each at most `len`.
fn parse_positions(list: &str, len: usize) -> Result<BTreeSet<usize>, String> {
    let mut positions = BTreeSet::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (parse_position(start)?, parse_position(end)?),
            None => {
                let position = parse_position(part)?;
                (position, position)
            }
        };
        if start > end {
            return Err(format!("range {} is reversed", part));
        }
        if end > len {
            return Err(format!(
                "position {} is out of range (structure has {} elements)",
                end, len
            ));
        }
        positions.extend(start..=end);
    }
    if positions.is_empty() {
        return Err("no positions given".to_string());
    }
    Ok(positions)
}

fn parse_position(text: &str) -> Result<usize, String> {
    match text.trim().parse::<usize>() {
        Ok(0) => Err("positions start at 1".to_string()),
        Ok(position) => Ok(position),
        Err(_) => Err(format!("'{}' is not a position", text.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positions() {
        let positions = parse_positions("2, 4-6,9", 9).unwrap();
        assert_eq!(positions.into_iter().collect::<Vec<_>>(), vec![2, 4, 5, 6, 9]);
    }

    #[test]
    fn test_parse_positions_overlap() {
        let positions = parse_positions("1-3,2", 3).unwrap();
        assert_eq!(positions.len(), 3);
    }

    #[test]
    fn test_parse_positions_errors() {
        assert!(parse_positions("", 5).is_err());
        assert!(parse_positions("0", 5).is_err());
        assert!(parse_positions("5-2", 5).is_err());
        assert!(parse_positions("a", 5).is_err());
        assert!(parse_positions("1-", 5).is_err());
    }

    #[test]
    fn test_parse_positions_bounded_by_structure() {
        assert!(parse_positions("6", 5).is_err());
        let err = parse_positions("1-99999999999", 5).unwrap_err();
        assert!(err.contains("out of range"));
        assert_eq!(parse_positions("5", 5).unwrap().len(), 1);
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(&Outcome::Moved(false)), "move skipped (unknown element)");
        assert_eq!(describe(&Outcome::Toggled(Some(true))), "excluded");
        assert_eq!(describe(&Outcome::Collapsed(None)), "nothing to collapse");
    }

    #[test]
    fn test_cli_parses_merge() {
        let cli = Cli::try_parse_from([
            "pdfsplice", "merge", "a.pdf", "b.pdf", "-o", "out.pdf", "--flat", "--exclude", "1",
        ])
        .unwrap();
        match cli.command {
            Commands::Merge {
                inputs,
                output,
                flat,
                exclude,
                ..
            } => {
                assert_eq!(inputs.len(), 2);
                assert_eq!(output, PathBuf::from("out.pdf"));
                assert!(flat);
                assert_eq!(exclude.as_deref(), Some("1"));
            }
            _ => panic!("expected merge"),
        }
    }
}
