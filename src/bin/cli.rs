//! Cellar CLI Client
//!
//! Command-line interface for interacting with a Cellar server.

use std::io::{self, BufRead, Write};

use cellar::client::Client;
use clap::Parser;

/// Cellar CLI
#[derive(Parser, Debug)]
#[command(name = "cellar-cli")]
#[command(about = "CLI for the Cellar table store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7379")]
    server: String,

    /// Command to send (e.g. `LIST TABLES`); starts a prompt when omitted
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn main() {
    let args = Args::parse();

    let mut client = match Client::connect(&args.server) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to connect to {}: {}", args.server, e);
            std::process::exit(1);
        }
    };

    if !args.command.is_empty() {
        let line = args.command.join(" ");
        match client.send(&line) {
            Ok(response) => {
                println!("{}", response);
                if response.starts_with("ERROR:") {
                    std::process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = repl(&mut client) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Read commands from stdin until QUIT or end of input
fn repl(client: &mut Client) -> cellar::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "cellar> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = client.send(line)?;
        writeln!(stdout, "{}", response)?;

        if line == "QUIT" {
            return Ok(());
        }
    }
}
