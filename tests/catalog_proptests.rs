// Catalog property tests.
//
// Property: index/graph consistency under random command streams.
//  - Model: set of live artist names, set of live song names, set of
//    (artist, song) links among live names.
//  - Invariant: index sizes equal the model's name sets; every index entry
//    resolves to a live node with that name; graph edges match the model
//    links exactly and are mirrored on both endpoints.
//  - Operations: insert, remove artist, remove song, print (no state change).
use proptest::prelude::*;
use songgraph::{Catalog, NodeKind};
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
enum Op {
    Insert(usize, usize),
    RemoveArtist(usize),
    RemoveSong(usize),
    Print(u8),
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        4 => (0usize..6, 0usize..8).prop_map(|(a, s)| Op::Insert(a, s)),
        1 => (0usize..6).prop_map(Op::RemoveArtist),
        1 => (0usize..8).prop_map(Op::RemoveSong),
        1 => (0u8..3).prop_map(Op::Print),
    ];
    proptest::collection::vec(op, 1..80)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_catalog_consistency(cap in 1usize..8, ops in arb_ops()) {
        let mut c = Catalog::new(cap).unwrap();
        let mut artists: BTreeSet<String> = BTreeSet::new();
        let mut songs: BTreeSet<String> = BTreeSet::new();
        let mut links: BTreeSet<(String, String)> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(a, s) => {
                    let (a, s) = (format!("artist {}", a), format!("song {}", s));
                    let out = c.process_line(&format!("insert {}<SEP>{}", a, s));
                    prop_assert_eq!(
                        out,
                        format!("Successfully inserted {} and {} into the database", a, s)
                    );
                    artists.insert(a.clone());
                    songs.insert(s.clone());
                    links.insert((a, s));
                }
                Op::RemoveArtist(a) => {
                    let a = format!("artist {}", a);
                    let out = c.process_line(&format!("remove artist {}", a));
                    if artists.remove(&a) {
                        prop_assert_eq!(out, format!("Artist {} removed", a));
                        links.retain(|(la, _)| *la != a);
                    } else {
                        prop_assert_eq!(out, format!("Artist {} not found", a));
                    }
                }
                Op::RemoveSong(s) => {
                    let s = format!("song {}", s);
                    let out = c.process_line(&format!("remove song {}", s));
                    if songs.remove(&s) {
                        prop_assert_eq!(out, format!("Song {} removed", s));
                        links.retain(|(_, ls)| *ls != s);
                    } else {
                        prop_assert_eq!(out, format!("Song {} not found", s));
                    }
                }
                Op::Print(which) => {
                    let target = ["artist", "song", "graph"][which as usize];
                    let out = c.process_line(&format!("print {}", target));
                    let expected_header = match which {
                        0 => format!("Total artist nodes: {}", artists.len()),
                        1 => format!("Total song nodes: {}", songs.len()),
                        _ => "Number of connected components:".to_string(),
                    };
                    prop_assert!(out.starts_with(&expected_header), "{}", out);
                }
            }

            prop_assert_eq!(c.artists().len(), artists.len());
            prop_assert_eq!(c.songs().len(), songs.len());
            prop_assert_eq!(c.graph().node_count(), artists.len() + songs.len());
            prop_assert_eq!(c.graph().edge_count(), links.len());

            for (_, name, &key) in c.artists().entries() {
                let node = c.graph().node(key);
                prop_assert!(node.is_some(), "artist {:?} points at a dead node", name);
                let node = node.unwrap();
                prop_assert_eq!(node.name(), name);
                prop_assert_eq!(node.kind(), NodeKind::Artist);
            }
            for (a, s) in &links {
                let ak = *c.artists().search(a).expect("linked artist indexed");
                let sk = *c.songs().search(s).expect("linked song indexed");
                let an = c.graph().node(ak).expect("live");
                let sn = c.graph().node(sk).expect("live");
                prop_assert!(an.is_linked_to(sk) && sn.is_linked_to(ak));
            }
        }
    }
}
