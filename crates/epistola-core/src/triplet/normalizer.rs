use std::collections::HashSet;

use super::decoder::TripletDecoder;
use super::triple::Triple;

/// Canonical triple strings of one document, unique by exact bytes and kept
/// in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripleSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl TripleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the canonical form was already present.
    pub fn insert(&mut self, triple: &Triple) -> bool {
        let canonical = triple.canonical();
        if self.seen.contains(&canonical) {
            return false;
        }
        self.seen.insert(canonical.clone());
        self.ordered.push(canonical);
        true
    }

    pub fn extend<'a>(&mut self, triples: impl IntoIterator<Item = &'a Triple>) {
        for triple in triples {
            self.insert(triple);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}

/// Decodes every candidate sequence independently and merges the results.
pub fn collect_triples<S: AsRef<str>>(decoder: &TripletDecoder, sequences: &[S]) -> TripleSet {
    let mut set = TripleSet::new();
    for (index, sequence) in sequences.iter().enumerate() {
        let triples = decoder.decode(sequence.as_ref());
        tracing::debug!(sequence = index, decoded = triples.len(), "decoded sequence");
        set.extend(&triples);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEQUENCE: &str = "<s><triplet> Mario <per> Luigi <per> wrote to <triplet> Roma <loc> Italia <loc> country</s>";

    #[test]
    fn test_insert_deduplicates_exact_strings() {
        let mut set = TripleSet::new();
        let triple = Triple::new("Mario", "per", "wrote to", "Luigi", "per");

        assert!(set.insert(&triple));
        assert!(!set.insert(&triple.clone()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_case_and_spacing_are_distinct() {
        let mut set = TripleSet::new();
        set.insert(&Triple::new("Mario", "per", "wrote to", "Luigi", "per"));
        set.insert(&Triple::new("mario", "per", "wrote to", "Luigi", "per"));
        set.insert(&Triple::new("Mario", "per", "wrote  to", "Luigi", "per"));

        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_first_seen_order() {
        let set = collect_triples(
            &TripletDecoder::new(),
            &["<triplet> B <x> C <y> r", "<triplet> A <x> C <y> r", "<triplet> B <x> C <y> r"],
        );
        assert_eq!(
            set.into_vec(),
            vec!["<B; x> <r> <C; y>".to_string(), "<A; x> <r> <C; y>".to_string()]
        );
    }

    #[test]
    fn test_repeated_sequence_keeps_cardinality() {
        let decoder = TripletDecoder::new();
        let once = collect_triples(&decoder, &[SEQUENCE]);
        let twice = collect_triples(&decoder, &[SEQUENCE, SEQUENCE]);

        assert_eq!(once.len(), 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_canonical_strings_parse_back() {
        let set = collect_triples(&TripletDecoder::new(), &[SEQUENCE]);
        let parsed: Vec<Triple> = set.iter().map(|s| s.parse().unwrap()).collect();

        assert_eq!(parsed[0], Triple::new("Mario", "per", "wrote to", "Luigi", "per"));
        assert_eq!(parsed[1], Triple::new("Roma", "loc", "country", "Italia", "loc"));
    }
}
