use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use waterloo::Pattern;
use waterloo::render::{write_captures, write_highlighted, write_tokens};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pattern to search for
    #[arg(value_name = "PATTERN")]
    pattern: String,

    /// File to search (standard input if omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Character position to start scanning from
    #[arg(short, long, default_value_t = 0)]
    start: usize,

    /// Print the token stream
    #[arg(short = 'T', long)]
    tokens: bool,

    /// Print the parsed pattern tree
    #[arg(short = 't', long)]
    tree: bool,

    /// Print the capture groups of every match
    #[arg(short, long)]
    groups: bool,

    /// When to colour matches
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether anything matched.
fn run(args: &Args) -> Result<bool> {
    let pattern = Pattern::new(&args.pattern)
        .with_context(|| format!("Failed to compile {:?}", args.pattern))?;

    let subject = match args.file.as_ref() {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut contents = String::new();
            io::stdin()
                .read_to_string(&mut contents)
                .context("Failed to read stdin")?;
            contents
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.tokens {
        write_tokens(&mut out, &pattern)?;
    }
    if args.tree {
        write!(out, "{}", pattern.root())?;
    }

    let matches: Vec<_> = pattern.find_iter_from(&subject, args.start).collect();
    if args.groups {
        for outcome in &matches {
            write_captures(&mut out, &subject, outcome)?;
        }
    }

    let color = match args.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stdout().is_terminal(),
    };
    let spans: Vec<_> = matches.iter().map(|m| m.span).collect();
    write_highlighted(&mut out, &subject, &spans, color)?;
    if !subject.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(!matches.is_empty())
}
