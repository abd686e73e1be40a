//! LineKV CLI Client
//!
//! Interactive prompt for talking to a LineKV server.

use std::io::{self, BufRead, Write};

use clap::Parser;
use linekv::network::{Client, Reply};

/// LineKV CLI
#[derive(Parser, Debug)]
#[command(name = "linekv-cli")]
#[command(about = "Interactive client for the LineKV key-value store")]
struct Args {
    /// Server host
    #[arg(long, env = "SERVER_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, env = "SERVER_PORT", default_value = "5000")]
    port: u16,
}

fn main() {
    let args = Args::parse();

    println!("LineKV client connecting to {}:{} ...", args.host, args.port);
    let mut client = match Client::connect((args.host.as_str(), args.port)) {
        Ok(client) => client,
        Err(e) => {
            println!("ERROR: cannot connect: {}", e);
            std::process::exit(1);
        }
    };

    // A missing banner is not fatal
    if let Ok(Some(banner)) = client.read_banner() {
        println!("{}", banner);
    }

    println!("Commands: SET <k> <v> | GET <k> | DEL <k> | KEYS | QUIT");
    println!("Ctrl+D to exit.\n");

    if let Err(e) = repl(&mut client) {
        println!("ERROR: {}", e);
        std::process::exit(1);
    }
}

fn repl(client: &mut Client) -> linekv::Result<()> {
    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            println!("\nbye");
            return Ok(());
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        match client.request(line)? {
            Reply::Response(text) => println!("{}", text),
            Reply::Timeout => {
                println!("[timeout] no response from server");
                continue;
            }
            Reply::Closed => {
                println!("Connection closed by server.");
                return Ok(());
            }
        }

        let verb = line.to_uppercase();
        if verb == "QUIT" || verb == "EXIT" {
            return Ok(());
        }
    }
}
