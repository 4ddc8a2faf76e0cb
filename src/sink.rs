use crate::error::Result;
use crate::types::ResolvedRecord;
use std::fs::File;
use std::path::Path;

/// CSV sink for resolved records. The file is opened once and the header
/// written eagerly, so a run that resolves nothing still produces a valid
/// header-only file.
pub struct CsvSink {
    writer: csv::Writer<File>,
    path: String,
}

impl CsvSink {
    pub fn create(path: &Path) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        writer.write_record(["id", "name", "link"])?;
        writer.flush()?;

        Ok(Self {
            writer,
            path: path.display().to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn write(&mut self, record: &ResolvedRecord) -> Result<()> {
        self.writer.serialize(record)?;
        Ok(())
    }

    pub fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
