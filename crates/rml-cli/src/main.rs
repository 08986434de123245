use clap::{Parser, Subcommand};
use rml_parser::{Attribute, EventSink, Flow};
use std::path::Path;

#[derive(Parser)]
#[command(name = "rml")]
#[command(about = "RML — streaming markup parser")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check an .rml file for errors without producing output
    Check {
        /// Input .rml file
        path: String,
    },

    /// Parse an .rml file and print its event stream
    Events {
        /// Input .rml file
        path: String,
    },

    /// Print the token stream of an .rml file
    Tokens {
        /// Input .rml file
        path: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Check { path } => cmd_check(&path),
        Command::Events { path } => cmd_events(&path),
        Command::Tokens { path } => cmd_tokens(&path),
    }
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_check(path: &str) {
    let source = read_source(path);

    struct Quiet;
    impl EventSink for Quiet {}

    if let Err(e) = rml_parser::parse(&source, &mut Quiet) {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    }

    eprintln!("OK: {path}");
}

/// Sink that prints one line per event, indented by element depth.
struct EventPrinter {
    depth: usize,
}

impl EventPrinter {
    fn line(&self, text: String) {
        println!("{}{text}", "  ".repeat(self.depth));
    }
}

impl EventSink for EventPrinter {
    fn spec(&mut self, content: &str) -> Flow {
        self.line(format!("spec {content:?}"));
        Flow::Continue
    }

    fn start_tag(&mut self, name: &str, attributes: &[Attribute]) -> Flow {
        let mut text = format!("start {name}");
        for attr in attributes {
            text.push_str(&format!(" {}={:?}", attr.name, attr.value.to_string()));
        }
        self.line(text);
        self.depth += 1;
        Flow::Continue
    }

    fn end_tag(&mut self, name: &str) -> Flow {
        self.depth = self.depth.saturating_sub(1);
        self.line(format!("end {name}"));
        Flow::Continue
    }

    fn data(&mut self, text: &str) -> Flow {
        self.line(format!("data {text:?}"));
        Flow::Continue
    }

    fn paste(&mut self, content: &str, hint: Option<&str>, seal: bool) -> Flow {
        let hint = hint.unwrap_or("-");
        let seal = if seal { " (seal)" } else { "" };
        self.line(format!("paste [{hint}] {content:?}{seal}"));
        Flow::Continue
    }

    fn string(&mut self, text: &str) -> Flow {
        self.line(format!("string {text:?}"));
        Flow::Continue
    }
}

fn cmd_events(path: &str) {
    let source = read_source(path);

    let mut printer = EventPrinter { depth: 0 };
    if let Err(e) = rml_parser::parse(&source, &mut printer) {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    }
}

fn cmd_tokens(path: &str) {
    let source = read_source(path);

    let tokens = match rml_lexer::Scanner::tokenize(&source) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    for token in tokens {
        println!("{} {:?}", token.span.start, token.kind);
    }
}
