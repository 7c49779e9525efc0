//! Line-oriented command language and the `Catalog` that executes it.
//!
//! ```text
//! insert <artist><SEP><song>
//! remove artist|song <name>
//! print artist|song|graph
//! ```
//!
//! The catalog keeps one name index per node kind and the graph that
//! links them. Output is returned as text; nothing here prints.

use crate::error::{CommandError, TableError};
use crate::graph::{Graph, NodeKey, NodeKind};
use crate::hash_table::HashTable;
use core::str::FromStr;
use log::{debug, info};

pub const SEPARATOR: &str = "<SEP>";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PrintTarget {
    Artists,
    Songs,
    Graph,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    Insert { artist: String, song: String },
    Remove { kind: NodeKind, name: String },
    Print(PrintTarget),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, args) = line.split_once(' ').unwrap_or((line, ""));
        match word {
            "insert" => parse_insert(args),
            "remove" => parse_remove(args),
            "print" => parse_print(args.trim()),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}

fn parse_insert(args: &str) -> Result<Command, CommandError> {
    if args.trim().is_empty() {
        return Err(CommandError::EmptyInsert);
    }
    let (artist, song) = args
        .split_once(SEPARATOR)
        .ok_or(CommandError::InvalidInsertFormat)?;
    if song.contains(SEPARATOR) {
        return Err(CommandError::InvalidInsertFormat);
    }
    let (artist, song) = (artist.trim(), song.trim());
    if artist.is_empty() {
        return Err(CommandError::EmptyName(NodeKind::Artist));
    }
    if song.is_empty() {
        return Err(CommandError::EmptyName(NodeKind::Song));
    }
    Ok(Command::Insert {
        artist: artist.to_string(),
        song: song.to_string(),
    })
}

fn parse_remove(args: &str) -> Result<Command, CommandError> {
    let (kind, name) = args
        .split_once(' ')
        .ok_or(CommandError::InvalidRemoveFormat)?;
    let kind = match kind {
        "artist" => NodeKind::Artist,
        "song" => NodeKind::Song,
        other => return Err(CommandError::InvalidRemoveType(other.to_string())),
    };
    Ok(Command::Remove {
        kind,
        name: name.to_string(),
    })
}

fn parse_print(args: &str) -> Result<Command, CommandError> {
    match args {
        "artist" => Ok(Command::Print(PrintTarget::Artists)),
        "song" => Ok(Command::Print(PrintTarget::Songs)),
        "graph" => Ok(Command::Print(PrintTarget::Graph)),
        other => Err(CommandError::InvalidPrintOption(other.to_string())),
    }
}

/// Name indexes plus the graph they point into.
#[derive(Debug)]
pub struct Catalog {
    artists: HashTable<NodeKey>,
    songs: HashTable<NodeKey>,
    graph: Graph,
}

impl Catalog {
    pub fn new(initial_capacity: usize) -> Result<Self, TableError> {
        Ok(Self {
            artists: HashTable::new(initial_capacity)?,
            songs: HashTable::new(initial_capacity)?,
            graph: Graph::new(),
        })
    }

    pub fn artists(&self) -> &HashTable<NodeKey> {
        &self.artists
    }

    pub fn songs(&self) -> &HashTable<NodeKey> {
        &self.songs
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    fn index(&self, kind: NodeKind) -> &HashTable<NodeKey> {
        match kind {
            NodeKind::Artist => &self.artists,
            NodeKind::Song => &self.songs,
        }
    }

    /// Existing node for `name`, or a new one that is indexed before
    /// returning. A node whose indexing fails is taken out of the graph
    /// again.
    fn node_for(&mut self, kind: NodeKind, name: &str) -> Result<NodeKey, CommandError> {
        if let Some(&key) = self.index(kind).search(name) {
            return Ok(key);
        }
        let key = self.graph.add_node(name, kind)?;
        let index = match kind {
            NodeKind::Artist => &mut self.artists,
            NodeKind::Song => &mut self.songs,
        };
        if let Err(e) = index.insert(name, key) {
            self.graph.remove_node(key);
            return Err(e.into());
        }
        debug!("indexed new {} {:?}", kind, name);
        Ok(key)
    }

    pub fn execute(&mut self, command: &Command) -> Result<String, CommandError> {
        match command {
            Command::Insert { artist, song } => {
                let a = self.node_for(NodeKind::Artist, artist)?;
                let s = self.node_for(NodeKind::Song, song)?;
                self.graph.add_edge(a, s)?;
                info!("linked artist {:?} and song {:?}", artist, song);
                Ok(format!(
                    "Successfully inserted {} and {} into the database",
                    artist, song
                ))
            }
            Command::Remove { kind, name } => {
                let removed = match kind {
                    NodeKind::Artist => self.artists.remove(name),
                    NodeKind::Song => self.songs.remove(name),
                };
                match removed {
                    Some(key) => {
                        self.graph.remove_node(key);
                        info!("removed {} {:?}", kind, name);
                        Ok(format!("{} {} removed", kind, name))
                    }
                    None => Ok(format!("{} {} not found", kind, name)),
                }
            }
            Command::Print(PrintTarget::Artists) => Ok(self.artists.dump("artist").to_string()),
            Command::Print(PrintTarget::Songs) => Ok(self.songs.dump("song").to_string()),
            Command::Print(PrintTarget::Graph) => Ok(self.graph.components().to_string()),
        }
    }

    /// Parses and executes one line. Failures become their message, so a
    /// bad line never stops a batch.
    pub fn process_line(&mut self, line: &str) -> String {
        match line.parse::<Command>().and_then(|cmd| self.execute(&cmd)) {
            Ok(out) => out,
            Err(e) => {
                debug!("command {:?} failed: {}", line, e);
                e.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: well-formed lines parse into their command.
    #[test]
    fn parses_commands() {
        assert_eq!(
            "insert Blind Lemon Jefferson<SEP>Long Lonesome Blues".parse::<Command>(),
            Ok(Command::Insert {
                artist: "Blind Lemon Jefferson".to_string(),
                song: "Long Lonesome Blues".to_string(),
            })
        );
        assert_eq!(
            "remove song Ma Rainey's Black Bottom".parse::<Command>(),
            Ok(Command::Remove {
                kind: NodeKind::Song,
                name: "Ma Rainey's Black Bottom".to_string(),
            })
        );
        assert_eq!("print graph".parse::<Command>(), Ok(Command::Print(PrintTarget::Graph)));
        assert_eq!(
            "  print artist  ".parse::<Command>(),
            Ok(Command::Print(PrintTarget::Artists))
        );
    }

    /// Invariant: malformed lines map to the matching error.
    #[test]
    fn rejects_malformed_lines() {
        let cases: [(&str, CommandError); 10] = [
            ("", CommandError::UnknownCommand(String::new())),
            ("invalid command", CommandError::UnknownCommand("invalid".into())),
            ("insert", CommandError::EmptyInsert),
            ("insert Artist1Song1", CommandError::InvalidInsertFormat),
            ("insert A<SEP>B<SEP>C", CommandError::InvalidInsertFormat),
            ("insert Artist1<SEP>", CommandError::EmptyName(NodeKind::Song)),
            ("insert <SEP>Song1", CommandError::EmptyName(NodeKind::Artist)),
            ("remove artist", CommandError::InvalidRemoveFormat),
            ("remove album X", CommandError::InvalidRemoveType("album".into())),
            ("print everything", CommandError::InvalidPrintOption("everything".into())),
        ];
        for (line, expected) in cases {
            assert_eq!(line.parse::<Command>(), Err(expected), "line {:?}", line);
        }
    }

    /// Invariant: each name maps to one node no matter how often it is inserted.
    #[test]
    fn insert_deduplicates_nodes() {
        let mut c = Catalog::new(10).unwrap();
        c.process_line("insert Artist1<SEP>Song1");
        c.process_line("insert Artist1<SEP>Song2");
        c.process_line("insert Artist2<SEP>Song1");
        c.process_line("insert Artist1<SEP>Song1");
        assert_eq!(c.artists().len(), 2);
        assert_eq!(c.songs().len(), 2);
        assert_eq!(c.graph().node_count(), 4);
        assert_eq!(c.graph().edge_count(), 3);
    }

    /// Invariant: index entries resolve to graph nodes with the same name.
    #[test]
    fn index_points_at_named_nodes() {
        let mut c = Catalog::new(4).unwrap();
        for i in 0..20 {
            c.process_line(&format!("insert Artist{}<SEP>Song{}", i % 7, i));
        }
        for (_, name, &key) in c.artists().entries() {
            let node = c.graph().node(key).expect("indexed node is live");
            assert_eq!(node.name(), name);
            assert_eq!(node.kind(), NodeKind::Artist);
        }
        for (_, name, &key) in c.songs().entries() {
            assert_eq!(c.graph().node(key).map(|n| n.name()), Some(name));
        }
    }

    /// Invariant: removing an artist drops its node and edges but keeps its songs.
    #[test]
    fn remove_artist_drops_edges() {
        let mut c = Catalog::new(10).unwrap();
        c.process_line("insert Artist1<SEP>Song1");
        c.process_line("insert Artist1<SEP>Song2");
        assert_eq!(c.process_line("remove artist Artist1"), "Artist Artist1 removed");
        assert!(c.artists().search("Artist1").is_none());
        assert_eq!(c.graph().edge_count(), 0);
        assert_eq!(c.songs().len(), 2);
        assert_eq!(
            c.process_line("remove artist Artist1"),
            "Artist Artist1 not found"
        );
        assert_eq!(c.process_line("remove song Nope"), "Song Nope not found");
    }

    /// Invariant: print commands render the dump and component stats.
    #[test]
    fn print_outputs() {
        let mut c = Catalog::new(10).unwrap();
        assert_eq!(
            c.process_line("insert Artist1<SEP>Song1"),
            "Successfully inserted Artist1 and Song1 into the database"
        );
        c.process_line("insert Artist2<SEP>Song2");
        let artists = c.process_line("print artist");
        assert!(artists.starts_with("Total artist nodes: 2"));
        assert_eq!(artists.lines().count(), 3);
        assert!(c.process_line("print song").starts_with("Total song nodes: 2"));
        assert_eq!(
            c.process_line("print graph"),
            "Number of connected components: 2\nLargest component size: 2"
        );
    }

    /// Invariant: zero initial capacity is refused up front.
    #[test]
    fn zero_capacity_catalog() {
        assert!(matches!(Catalog::new(0), Err(TableError::InvalidCapacity)));
    }
}
