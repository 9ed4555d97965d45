//! Command-line front end for the `mmcheck` verifier.

use clap::Parser;
use log::info;
use mmcheck::{FileResolver, FsResolver, MemResolver, Session};
use simple_logger::SimpleLogger;
use std::process::ExitCode;

/// A standalone Metamath database verifier
#[derive(Debug, clap::Parser)]
#[command(version, about)]
struct Cli {
    /// Database file to load
    #[arg(id("DATABASE"), required_unless_present("text"))]
    db: Option<String>,
    /// Provides raw database content on the command line
    #[arg(long, value_names(&["NAME", "TEXT"]))]
    text: Vec<String>,
    /// Activates debug logs
    #[arg(long)]
    debug: bool,
}

fn run<R: FileResolver>(resolver: R, root: &str) -> ExitCode {
    let mut session = Session::new(resolver);
    let result = session.verify(root, None);
    for warning in session.diagnostics() {
        eprintln!("warning: {warning}");
    }
    match result {
        Ok(()) => {
            info!("{root} verified");
            ExitCode::SUCCESS
        }
        Err(diag) => {
            eprintln!("error: {diag}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.debug {
        SimpleLogger::new().init().unwrap();
    }

    if cli.text.is_empty() {
        let db = cli.db.expect("clap requires DATABASE unless --text is given");
        run(FsResolver, &db)
    } else {
        let mut resolver = MemResolver::new();
        for kv in cli.text.chunks(2) {
            resolver.insert(kv[0].clone(), kv[1].clone().into_bytes());
        }
        let root = cli.db.unwrap_or_else(|| cli.text[0].clone());
        run(resolver, &root)
    }
}
