use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::PipelineResult;
use crate::record::DocumentRecord;

/// Pretty JSON with four-space indentation. Non-ASCII text is written as-is.
pub fn render_records<T: Serialize>(records: &[T]) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    Ok(buf)
}

/// Writes the aggregate output of a run in one go.
pub async fn write_records(path: &Path, records: &[DocumentRecord]) -> PipelineResult<()> {
    let rendered = render_records(records)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, rendered).await?;

    tracing::info!(path = %path.display(), records = records.len(), "wrote output");
    Ok(())
}
