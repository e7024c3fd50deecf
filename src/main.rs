use std::{env, process};

use lox::{error, read_source_file, Lox, EX_COMPILE_ERROR, EX_RUNTIME_ERROR, EX_USAGE};

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut lox = Lox::new();

    match args.len() {
        1 => run_repl(&mut lox),
        2 if args[1] == "repl" => run_repl(&mut lox),
        3 => {
            let source = read_source_file(&args[2]);

            match args[1].as_str() {
                "tokenize" => lox.tokenize(&source),
                "parse" => lox.parse(&source),
                "evaluate" => lox.evaluate(&source),
                "run" => lox.run(&source),
                other => {
                    eprintln!("Unknown command: {other}");
                    process::exit(EX_USAGE);
                }
            }

            if error::did_error() {
                process::exit(EX_COMPILE_ERROR);
            }
            if error::did_runtime_error() {
                process::exit(EX_RUNTIME_ERROR);
            }
        }
        _ => {
            eprintln!("Usage: lox [tokenize|parse|evaluate|run] <file>");
            eprintln!("       lox [repl]");
            process::exit(EX_USAGE);
        }
    }
}

fn run_repl(lox: &mut Lox) {
    if let Err(err) = lox.run_prompt() {
        eprintln!("lox: {err}");
        process::exit(1);
    }
}
