use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use log::{error, info};

use anthe::evaluator;
use anthe::ir;
use anthe::parser;
use anthe::scope::Scope;

const EX_USAGE: u8 = 64;

#[derive(ClapParser, Debug)]
#[command(author, version, about = "Lexer, parser, evaluator and experimental IR lowerer for Anthe")]
struct Cli {
    /// Script to run. With no path, starts a REPL.
    path: Option<PathBuf>,

    /// Lower the script to IR text instead of evaluating it.
    #[arg(long)]
    compile: bool,
}

fn main() -> ExitCode {
    simple_logger::SimpleLogger::new().init().ok();

    let cli = Cli::parse();

    match cli.path {
        None => {
            if cli.compile {
                error!("--compile requires a script path");
                return ExitCode::from(EX_USAGE);
            }
            repl();
            ExitCode::SUCCESS
        }
        Some(path) => run_file(&path, cli.compile),
    }
}

fn run_file(path: &PathBuf, compile: bool) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            error!("could not read {}: {e}", path.display());
            return ExitCode::from(EX_USAGE);
        }
    };

    let program = parser::parse(&source);
    if !program.is_ok() {
        for err in &program.errors {
            error!("{err}");
        }
        return ExitCode::FAILURE;
    }

    if compile {
        match ir::lower_program(&program) {
            Ok(module) => {
                print!("{module}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{e}");
                ExitCode::FAILURE
            }
        }
    } else {
        let scope = Scope::new();
        match evaluator::eval_program(&program, &scope) {
            Ok(value) => {
                info!("{value}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{e}");
                ExitCode::FAILURE
            }
        }
    }
}

/// Line-at-a-time REPL. No history persistence across lines or sessions;
/// each accepted line is evaluated against the same running `Scope` so
/// `let`/`func` bindings stick around for the rest of the session. The line
/// `exit()` ends the session.
fn repl() {
    let scope = Scope::new();
    let stdin = std::io::stdin();

    loop {
        print!("anthe> ");
        std::io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.read_line(&mut line).unwrap_or(0) == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line == "exit()" {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let program = parser::parse(line);
        if !program.is_ok() {
            for err in &program.errors {
                println!("{err}");
            }
            continue;
        }

        match evaluator::eval_program(&program, &scope) {
            Ok(value) => println!("{value}"),
            Err(e) => println!("{e}"),
        }
    }
}
