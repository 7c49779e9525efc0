use anyhow::{Context, Result};
use clap::Parser;
use songgraph::config::Config;
use songgraph::logger::initialize_logger;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

fn main() -> Result<()> {
    let config = Config::parse();
    initialize_logger(config.log_level);

    let mut catalog = config
        .catalog()
        .context("failed to create artist/song indexes")?;
    let file = File::open(&config.command_file).with_context(|| {
        format!(
            "Error reading command file: {}",
            config.command_file.display()
        )
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (n, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", n + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        writeln!(out, "{}", catalog.process_line(&line))?;
    }
    out.flush()?;
    Ok(())
}
