//! Command-line configuration.

use crate::command::Catalog;
use crate::error::TableError;
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// Largest accepted initial capacity; larger tables still grow on demand.
pub const MAX_INITIAL_CAPACITY: u64 = 1 << 24;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(author, version, about = "Builds an artist/song graph from a command file", long_about = None)]
pub struct Config {
    /// Initial slot count of the artist and song indexes (rounded up to a prime).
    #[arg(value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_INITIAL_CAPACITY))]
    pub initial_capacity: usize,

    /// File with one command per line.
    pub command_file: PathBuf,

    /// Log level for this crate; `RUST_LOG` takes precedence.
    #[arg(short, long, default_value_t = LevelFilter::Warn)]
    pub log_level: LevelFilter,
}

impl Config {
    pub fn catalog(&self) -> Result<Catalog, TableError> {
        Catalog::new(self.initial_capacity)
    }
}
