use std::io::{IsTerminal, Read};
use std::process;

use clap::{CommandFactory, Parser as ClapParser};

use reqitem::{format_debug, format_json, parse_items_with_options, Item, ParseOptions};

/// reqitem CLI — HTTPie-style request-item parser.
///
/// Each TOKEN has the shape key<separator>value, where the separator is
/// one of `:` (header), `;` (empty header), `==` (query param), `=`
/// (data), `:=` (raw-JSON data), `@` (file upload), `=@` (embed text
/// file), or `:=@` (embed JSON file). The parsed collections are printed
/// in the chosen format.
#[derive(ClapParser)]
#[command(name = "reqitem-cli", version, about, long_about = None)]
struct Cli {
    /// Request-item tokens. Reads whitespace-separated tokens from stdin
    /// when none are given.
    #[arg(value_name = "TOKEN")]
    tokens: Vec<String>,

    /// Treat body data as form fields instead of a JSON object.
    #[arg(long)]
    form: bool,

    /// Open file uploads as streaming handles instead of buffering them.
    #[arg(long)]
    chunked: bool,

    /// Output format.
    #[arg(short, long, default_value = "json", value_enum)]
    format: OutputFormat,

    /// Pretty-print JSON output (ignored for other formats).
    #[arg(short, long)]
    pretty: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable debug output
    Debug,
}

fn main() {
    let cli = Cli::parse();

    // When no tokens are provided and stdin is a terminal (not piped),
    // show help instead of blocking.
    if cli.tokens.is_empty() && std::io::stdin().is_terminal() {
        Cli::command().print_help().ok();
        println!();
        process::exit(0);
    }

    let tokens = match read_tokens(&cli) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading input: {e}");
            process::exit(1);
        }
    };

    let mut items = Vec::with_capacity(tokens.len());
    for token in &tokens {
        match Item::parse(token) {
            Some(item) => items.push(item),
            None => {
                eprintln!("Error: \"{token}\" is not a key<separator>value token");
                process::exit(1);
            }
        }
    }

    let options = ParseOptions {
        as_form: cli.form,
        chunked: cli.chunked,
    };

    let parsed = match parse_items_with_options(items, options) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Parse error: {e}");
            process::exit(2);
        }
    };

    let output = match cli.format {
        OutputFormat::Json => format_json(&parsed, cli.pretty),
        OutputFormat::Debug => format_debug(&parsed),
    };

    print!("{output}");
}

/// Use the TOKEN arguments, or split stdin on whitespace when none given.
fn read_tokens(cli: &Cli) -> Result<Vec<String>, std::io::Error> {
    if !cli.tokens.is_empty() {
        return Ok(cli.tokens.clone());
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf.split_whitespace().map(str::to_string).collect())
}
