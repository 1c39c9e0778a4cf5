use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use epistola_core::{render_records, CorrespondentPolicy, TeiExtractor};

pub fn run(paths: &[PathBuf], keep_partial_correspondents: bool) -> Result<()> {
    let policy = if keep_partial_correspondents {
        CorrespondentPolicy::KeepAvailable
    } else {
        CorrespondentPolicy::BothOrNeither
    };
    let extractor = TeiExtractor::new().with_correspondent_policy(policy);

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        let xml = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let record = extractor
            .extract_str(&xml)
            .with_context(|| format!("cannot extract metadata from {}", path.display()))?;
        records.push(record);
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&render_records(&records)?)?;
    writeln!(stdout)?;
    Ok(())
}
