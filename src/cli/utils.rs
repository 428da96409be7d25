use crate::space::{allocation::Allocation, allocator::AddressSpaceAllocator};
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::{fs::File, io::Write, path::Path};

/// Write allocation records as CSV, one row per record, with a header.
/// `released_at` is left empty for live records.
pub fn write_history<W: Write>(records: &[Allocation], out: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(out);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Export the full allocation history of `space` to a CSV file.
pub fn export_history<P: AsRef<Path>>(space: &AddressSpaceAllocator, path: P) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    write_history(space.history(), file)
        .with_context(|| format!("writing history to {:?}", path))?;
    Ok(space.history().len())
}
