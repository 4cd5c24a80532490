use std::{fs, io, path::PathBuf, process};

use clap::Parser;
use pcse::{
    error::Error,
    interpreter::{evaluator::core::Env, lexer::Lexer, parser},
};

/// pcse interprets a CAIE-style exam pseudocode source file, reading INPUT
/// from stdin and writing OUTPUT to stdout.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print the token stream of the file to stderr.
    #[arg(long)]
    print_tokens: bool,

    /// Print the syntax tree of the file to stderr.
    #[arg(long)]
    print_tree: bool,

    /// The pseudocode source file to interpret.
    file: PathBuf,
}

fn main() {
    let args = Args::parse();

    let source = fs::read_to_string(&args.file).unwrap_or_else(|_| {
                     eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                               args.file.display());
                     process::exit(1);
                 });

    if let Err(e) = run(&source, &args) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(source: &str, args: &Args) -> Result<(), Error> {
    let lexer = Lexer::lex(source)?;
    if args.print_tokens {
        for token in &lexer.tokens {
            eprintln!("{token:?}");
        }
    }

    let program = parser::core::Parser::parse(&lexer.tokens)?;
    if args.print_tree {
        eprintln!("{program:#?}");
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();
    let mut env = Env::new(&lexer, &mut input, &mut output);
    env.run(&program)?;
    Ok(())
}
