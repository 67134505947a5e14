use std::{
    env,
    fs::read_to_string,
    io::{self, Write},
    process::exit,
};

use golite::{
    display_error,
    driver::{lex, parse, Session},
};

fn main() {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => repl(),
        2 => run_file(&args[1]),
        _ => {
            eprintln!("Usage: golite [file]");
            exit(2);
        }
    }
}

fn run_file(file_path: &str) {
    let source = read_to_string(file_path).expect("Failed to read file!");
    let file_name = if file_path.contains('/') {
        file_path.split('/').next_back().unwrap()
    } else {
        file_path
    };

    let mut session = Session::new();
    let mut parser = parse(lex(&source, Some(String::from(file_name))));

    loop {
        match parser.next_stmt() {
            Ok(None) => break,
            Ok(Some(stmt)) => match session.evaluate(&stmt) {
                Ok(Some(value)) => println!("{}", value),
                Ok(None) => {}
                Err(error) => {
                    display_error(&error, &source);
                    exit(1);
                }
            },
            Err(error) => {
                display_error(&error, &source);
                exit(1);
            }
        }
    }
}

/// Line-at-a-time loop: every input line gets a fresh lexer and parser, all
/// feeding one session, so declarations persist across lines. Errors are
/// shown and the session keeps going.
fn repl() {
    let mut session = Session::new();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().expect("Failed to flush stdout!");

        line.clear();
        let read = io::stdin()
            .read_line(&mut line)
            .expect("Failed to read stdin!");
        if read == 0 {
            break;
        }

        let mut parser = parse(lex(&line, None));
        loop {
            match parser.next_stmt() {
                Ok(None) => break,
                Ok(Some(stmt)) => match session.evaluate(&stmt) {
                    Ok(Some(value)) => println!("{}", value),
                    Ok(None) => {}
                    Err(error) => {
                        display_error(&error, &line);
                        break;
                    }
                },
                Err(error) => {
                    display_error(&error, &line);
                    break;
                }
            }
        }
    }
}
