use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use epistola_core::{collect_triples, TripletDecoder};

pub fn run(path: Option<&Path>) -> Result<()> {
    let input = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let sequences: Vec<&str> = input.lines().filter(|l| !l.trim().is_empty()).collect();
    let triples = collect_triples(&TripletDecoder::new(), &sequences);

    let mut stdout = std::io::stdout().lock();
    for triple in triples.iter() {
        writeln!(stdout, "{triple}")?;
    }
    Ok(())
}
