use serde::{Deserialize, Serialize};

use super::triple::Triple;

/// Markers understood by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Tokens that open a new relation group.
    pub triggers: Vec<String>,
    /// Sequence framing and language tags, removed from the raw text before
    /// tokenization.
    pub framing_markers: Vec<String>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            triggers: vec!["<triplet>".into(), "<relation>".into()],
            framing_markers: vec![
                "<s>".into(),
                "<pad>".into(),
                "</s>".into(),
                "tp_XX".into(),
                "__en__".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No trigger seen yet: every token is discarded.
    Start,
    /// After a trigger: plain tokens are head text.
    Head,
    /// After a head-type tag: plain tokens are tail text.
    Tail,
    /// After a tail-type tag: plain tokens are relation text.
    Relation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Trigger,
    Tag(&'a str),
    Text(&'a str),
}

/// Buffers of one decoding pass.
#[derive(Debug)]
struct Decoding {
    state: State,
    head: String,
    head_type: String,
    relation: String,
    tail: String,
    tail_type: String,
    triples: Vec<Triple>,
}

impl Decoding {
    const fn new() -> Self {
        Self {
            state: State::Start,
            head: String::new(),
            head_type: String::new(),
            relation: String::new(),
            tail: String::new(),
            tail_type: String::new(),
            triples: Vec::new(),
        }
    }

    fn step(&mut self, token: Token<'_>) {
        match (token, self.state) {
            (Token::Trigger, _) => {
                self.flush();
                self.relation.clear();
                self.head.clear();
                self.state = State::Head;
            }
            (Token::Tag(label), State::Head | State::Relation) => {
                self.flush();
                self.tail.clear();
                self.head_type = label.to_string();
                self.state = State::Tail;
            }
            (Token::Tag(label), State::Tail) => {
                self.tail_type = label.to_string();
                self.relation.clear();
                self.state = State::Relation;
            }
            (Token::Text(text), State::Head) => append(&mut self.head, text),
            (Token::Text(text), State::Tail) => append(&mut self.tail, text),
            (Token::Text(text), State::Relation) => append(&mut self.relation, text),
            (_, State::Start) => {}
        }
    }

    /// In-stream flush: a pending relation is enough. The relation is kept,
    /// so a following head-type tag can pair it with a new tail; only a
    /// trigger discards it.
    fn flush(&mut self) {
        if !self.relation.is_empty() {
            self.emit();
        }
    }

    /// End-of-stream flush: every field must be filled.
    fn finish(mut self) -> Vec<Triple> {
        let complete = [
            &self.head,
            &self.relation,
            &self.tail,
            &self.tail_type,
            &self.head_type,
        ]
        .iter()
        .all(|field| !field.is_empty());

        if complete {
            self.emit();
        }
        self.triples
    }

    fn emit(&mut self) {
        self.triples.push(Triple::new(
            self.head.trim(),
            self.head_type.trim(),
            self.relation.trim(),
            self.tail.trim(),
            self.tail_type.trim(),
        ));
    }
}

fn append(buffer: &mut String, text: &str) {
    buffer.push(' ');
    buffer.push_str(text);
}

/// Single-pass decoder turning a generated token sequence into typed triples.
///
/// Malformed or truncated sequences never fail: whatever triples were
/// completed before the sequence ended are returned.
#[derive(Debug, Clone, Default)]
pub struct TripletDecoder {
    config: DecoderConfig,
}

impl TripletDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn decode(&self, sequence: &str) -> Vec<Triple> {
        let cleaned = self.strip_framing(sequence.trim());

        let mut decoding = Decoding::new();
        for raw in cleaned.split_whitespace() {
            decoding.step(self.classify(raw));
        }
        decoding.finish()
    }

    fn strip_framing(&self, sequence: &str) -> String {
        self.config
            .framing_markers
            .iter()
            .fold(sequence.to_string(), |text, marker| text.replace(marker.as_str(), ""))
    }

    fn classify<'a>(&self, raw: &'a str) -> Token<'a> {
        if self.config.triggers.iter().any(|t| t == raw) {
            Token::Trigger
        } else if let Some(label) = raw.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
            Token::Tag(label)
        } else {
            Token::Text(raw)
        }
    }
}
