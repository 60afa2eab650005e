//! pdf2docx CLI - convert PDF notes to Word documents

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};

use pdf2docx::convert::convert_batch_with_progress;
use pdf2docx::{
    classify_file, BatchOptions, BatchReport, ClassifierRules, ConvertOptions, Converter, Role,
};

#[derive(Parser)]
#[command(name = "pdf2docx")]
#[command(version)]
#[command(about = "Convert PDF lecture notes and exercise sheets to Word", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Input PDF files
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Write outputs here instead of next to each input
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// JSON file overriding the classification rules
    #[arg(long, value_name = "FILE", env = "PDF2DOCX_RULES")]
    rules: Option<PathBuf>,

    /// Fail a file on its first unreadable page
    #[arg(long)]
    strict: bool,

    /// Convert files in parallel
    #[arg(short, long)]
    parallel: bool,

    /// Do not fall back to raw page text when no text blocks are found
    #[arg(long)]
    no_fallback: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every line of a PDF with its role, without writing output
    Classify {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// JSON file overriding the classification rules
        #[arg(long, value_name = "FILE", env = "PDF2DOCX_RULES")]
        rules: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Classify { input, rules }) => cmd_classify(input, rules.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None if cli.files.is_empty() => {
            println!("{}", "Usage: pdf2docx <FILES>... [OPTIONS]".yellow());
            println!("       pdf2docx --help for more information");
            Ok(())
        }
        None => cmd_convert(&cli),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_rules(path: Option<&Path>) -> Result<ClassifierRules, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(ClassifierRules::from_file(path)?),
        None => Ok(ClassifierRules::default()),
    }
}

fn cmd_convert(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = ConvertOptions::new()
        .with_rules(load_rules(cli.rules.as_deref())?)
        .with_fallback(!cli.no_fallback);
    if cli.strict {
        options = options.strict();
    }
    if let Some(ref dir) = cli.output_dir {
        fs::create_dir_all(dir)?;
        options = options.with_output_dir(dir);
    }

    log::debug!(
        "Converting {} files (parallel: {})",
        cli.files.len(),
        cli.parallel
    );
    let converter = Converter::new(options);
    let batch = BatchOptions::new().with_parallel(cli.parallel);

    let pb = ProgressBar::new(cli.files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report =
        convert_batch_with_progress(&converter, cli.files.as_slice(), &batch, |result| {
            pb.set_message(result.input.display().to_string());
            pb.inc(1);
        });
    pb.finish_and_clear();

    print_report(&report);

    if report.all_succeeded() {
        Ok(())
    } else {
        Err(format!("{} of {} files failed", report.failure_count(), report.results.len()).into())
    }
}

fn print_report(report: &BatchReport) {
    let summary = report.summary();
    for line in summary.lines() {
        if line.starts_with("Successfully") {
            println!("{}", line.green().bold());
        } else if line.starts_with("Failed") {
            println!("{}", line.red().bold());
        } else if line.starts_with("Skipped") {
            println!("{}", line.yellow());
        } else {
            println!("{}", line);
        }
    }

    let status = report.status_line();
    let status = match (report.success_count(), report.failure_count()) {
        (_, 0) => status.green(),
        (0, _) => status.red(),
        _ => status.yellow(),
    };
    println!("\n{}", status.bold());
}

fn role_label(role: Role) -> ColoredString {
    let label = format!("{:<10}", role.as_str());
    match role {
        Role::Heading => label.cyan().bold(),
        Role::Subheading => label.cyan(),
        Role::CodeOrList => label.yellow(),
        Role::Paragraph => label.dimmed(),
    }
}

fn cmd_classify(input: &Path, rules: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let pages = classify_file(input, load_rules(rules)?)?;

    for (index, lines) in pages.iter().enumerate() {
        println!("{}", format!("Page {}", index + 1).cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for line in lines {
            println!("{} {}", role_label(line.role), line.text);
        }
        println!();
    }

    let total: usize = pages.iter().map(Vec::len).sum();
    println!("{}: {}", "Pages".bold(), pages.len());
    println!("{}: {}", "Lines".bold(), total);
    for role in Role::ALL {
        let count = pages
            .iter()
            .flatten()
            .filter(|line| line.role == role)
            .count();
        println!("  {} {}", role_label(role), count);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf2docx".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF to Word conversion tool");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::OsStr;

    #[test]
    fn test_parse_convert_flags() {
        let cli = Cli::try_parse_from([
            "pdf2docx",
            "a.pdf",
            "b.pdf",
            "--output-dir",
            "out",
            "--strict",
            "--parallel",
            "--no-fallback",
        ])
        .unwrap();
        assert_eq!(cli.files.len(), 2);
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert!(cli.strict && cli.parallel && cli.no_fallback);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_classify() {
        let cli = Cli::try_parse_from(["pdf2docx", "classify", "lab.pdf"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Classify { ref input, rules: None }) if input == Path::new("lab.pdf")
        ));
    }

    #[test]
    fn test_rules_env_on_both_entry_points() {
        fn rules_env(command: &clap::Command) -> Option<&OsStr> {
            command
                .get_arguments()
                .find(|arg| arg.get_id() == "rules")
                .and_then(|arg| arg.get_env())
        }

        let root = Cli::command();
        let classify = root.find_subcommand("classify").unwrap();
        let expected = Some(OsStr::new("PDF2DOCX_RULES"));
        assert_eq!(rules_env(&root), expected);
        assert_eq!(rules_env(classify), expected);
    }

    #[test]
    fn test_load_rules_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        fs::write(&path, r#"{"heading_keywords": ["chapter"]}"#).unwrap();

        let rules = load_rules(Some(&path)).unwrap();
        assert_eq!(rules.heading_keywords, vec!["chapter".to_string()]);
        assert_eq!(load_rules(None).unwrap(), ClassifierRules::default());
        assert!(load_rules(Some(&dir.path().join("missing.json"))).is_err());
    }
}
