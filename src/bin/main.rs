use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use walkdir::WalkDir;

use quill::parser::{Diagnostics, Lexer};
use quill::ParserConfig;

#[derive(Parser)]
#[command(name = "quillp")]
#[command(about = "Quill front-end parser")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lexically analyze a .ql file
    Lex {
        /// Input .ql file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show token locations
        #[arg(short, long)]
        locations: bool,
    },

    /// Parse a .ql file and show the AST
    Parse {
        /// Input .ql file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Skip function bodies
        #[arg(long)]
        diet: bool,

        /// Show detailed AST information
        #[arg(short, long)]
        detailed: bool,
    },

    /// List the directives of a .ql file
    Directives {
        /// Input .ql file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Parse every .ql file under a directory and report diagnostics
    Check {
        /// Directory to scan
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Skip function bodies
        #[arg(long)]
        diet: bool,
    },
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();
    let config = ParserConfig::from_env()?;

    match &cli.command {
        Commands::Lex { input, locations } => lex_file(input, *locations),
        Commands::Parse { input, diet, detailed } => {
            let diet = *diet || config.diet;
            parse_file(input, config.with_diet(diet), *detailed)
        }
        Commands::Directives { input } => list_directives(input, config),
        Commands::Check { dir, diet } => {
            let diet = *diet || config.diet;
            check_dir(dir, config.with_diet(diet))
        }
    }
}

fn read_source(input: &Path) -> Result<String> {
    fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

fn lex_file(input: &Path, locations: bool) -> Result<ExitCode> {
    let source = read_source(input)?;
    for token in Lexer::new(&source).tokenize() {
        if locations {
            println!("{:?} {:?} at {}:{}", token.kind, token.lexeme(), token.location.line, token.location.column);
        } else {
            println!("{:?} {:?}", token.kind, token.lexeme());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn parse_file(input: &Path, config: ParserConfig, detailed: bool) -> Result<ExitCode> {
    let source = read_source(input)?;
    let mut diagnostics = Diagnostics::new();
    let unit = quill::parse_unit(&source, &config, &mut diagnostics);

    if detailed {
        println!("{:#?}", unit);
    } else {
        print!("{}", unit);
    }
    print_diagnostics(input, &diagnostics);
    Ok(exit_code(&diagnostics))
}

fn list_directives(input: &Path, config: ParserConfig) -> Result<ExitCode> {
    let source = read_source(input)?;
    let mut diagnostics = Diagnostics::new();
    for directive in quill::parse_directives(&source, &config, &mut diagnostics) {
        match &directive.prefix {
            Some(prefix) => println!("#{} {} as {}", directive.kind.as_str(), directive.value, prefix),
            None => println!("#{} {}", directive.kind.as_str(), directive.value),
        }
    }
    print_diagnostics(input, &diagnostics);
    Ok(exit_code(&diagnostics))
}

fn check_dir(dir: &Path, config: ParserConfig) -> Result<ExitCode> {
    let mut files = 0usize;
    let mut failed = 0usize;
    let mut errors = 0usize;
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", dir.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "ql") {
            continue;
        }
        debug!("checking {}", path.display());
        let source = read_source(path)?;
        let mut diagnostics = Diagnostics::new();
        quill::parse_unit(&source, &config, &mut diagnostics);
        print_diagnostics(path, &diagnostics);
        files += 1;
        if diagnostics.has_errors() {
            failed += 1;
            errors += diagnostics.errors().len();
        }
    }
    info!("checked {} files", files);
    println!("{} files checked, {} with errors, {} errors", files, failed, errors);
    Ok(if failed > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn print_diagnostics(path: &Path, diagnostics: &Diagnostics) {
    for diagnostic in diagnostics.all() {
        eprintln!("{}: {}", path.display(), diagnostic);
    }
}

fn exit_code(diagnostics: &Diagnostics) -> ExitCode {
    if diagnostics.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
