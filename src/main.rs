// Licensed under MIT. See LICENSE for details.

use std::fs;
use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;

use oxidius::{Instructions, Lexer};

const SAMPLE: &str = include_str!("../assets/sample.ox");

#[derive(Parser)]
#[command(name = "oxidius")]
#[command(about = "Tokenize and parse oxidius source, reporting how far parsing got")]
#[command(version)]
struct Cli {
    /// Source file, `-` for stdin. Defaults to a built-in sample program.
    input: Option<String>,

    /// Print the token listing
    #[arg(long)]
    tokens: bool,

    /// Print every instruction rendered back to source
    #[arg(long)]
    ast: bool,
}

fn read_source(input: Option<&str>) -> Result<String> {
    match input {
        None => Ok(SAMPLE.to_string()),
        Some("-") => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read stdin")?;
            Ok(source)
        }
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to open input file: {path}"))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let source = read_source(cli.input.as_deref())?;
    let lexer = Lexer::oxidius().context("Failed to build the lexer")?;
    let mut pos = 0;
    let tokens = lexer
        .lex(&source, &mut pos)
        .context("Failed to tokenize input")?;

    if cli.tokens {
        println!("tokens: {}", tokens.iter().join(" "));
    }

    let mut insts = Instructions::new(&tokens);
    let mut count = 0;
    while let Some(res) = insts.next() {
        let inst = res.with_context(|| format!("Failed to parse instruction {count}"))?;
        let next = insts
            .next_token()
            .map_or_else(|| String::from("<end>"), |t| t.to_string());
        println!(
            "instruction[{}] {}, index={}, next={}",
            count,
            inst.kind(),
            insts.position(),
            next
        );
        if cli.ast {
            println!("    {}", inst);
        }
        count += 1;
    }

    if let Some(token) = insts.next_token() {
        eprintln!(
            "parsing stopped at token {} of {}: no instruction starts at {}",
            insts.position(),
            tokens.len(),
            token
        );
        process::exit(1);
    }

    println!("parsed {} instructions from {} tokens", count, tokens.len());
    Ok(())
}
