//! Deterministic archive creation.
//!
//! Inputs become flat top-level entries named by their base names, in the
//! order given. Every entry carries the same fixed metadata, so the archive
//! bytes depend only on the ordered input names and contents.

use crate::entry::entry_name_for;
use crate::error::ArchiveError;
use crate::staged::StagedFile;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Unix mode recorded for every entry
pub const ENTRY_PERMISSIONS: u32 = 0o644;

/// What a successful `create` wrote
#[derive(Debug, Clone, Serialize)]
pub struct CreateSummary {
    pub output: PathBuf,
    pub entries: Vec<String>,
    pub total_bytes: u64,
    pub sha256: String,
}

/// Argument-vector entry point: `<output-archive> <input-file>...`
pub fn create_from_args<S: AsRef<str>>(args: &[S]) -> Result<CreateSummary, ArchiveError> {
    if args.len() < 2 {
        return Err(ArchiveError::InvalidArguments(format!(
            "expected <output-archive> <input-file>..., got {} argument(s)",
            args.len()
        )));
    }

    let output = Path::new(args[0].as_ref());
    let inputs: Vec<&Path> = args[1..].iter().map(|a| Path::new(a.as_ref())).collect();
    create(output, &inputs)
}

/// Write `inputs` into a fresh archive at `output`.
///
/// The archive is staged beside `output` and only renamed into place after the
/// central directory has been written, so a failed run never leaves a partial
/// archive at `output`.
pub fn create<P: AsRef<Path>>(output: &Path, inputs: &[P]) -> Result<CreateSummary, ArchiveError> {
    if inputs.is_empty() {
        return Err(ArchiveError::InvalidArguments(
            "at least one input file is required".to_string(),
        ));
    }

    let plan = plan_entries(inputs)?;

    let staged = StagedFile::create(output)?;
    let mut zip = ZipWriter::new(staged);
    let mut total_bytes = 0u64;

    for (name, input) in &plan {
        total_bytes += append_input(&mut zip, output, name, input)?;
    }

    let mut staged = zip
        .finish()
        .map_err(|e| ArchiveError::archive(output, e))?;
    let sha256 = staged.sha256()?;
    staged.commit()?;

    info!(
        output = %output.display(),
        entries = plan.len(),
        bytes = total_bytes,
        sha256 = %sha256,
        "archive created"
    );

    Ok(CreateSummary {
        output: output.to_path_buf(),
        entries: plan.into_iter().map(|(name, _)| name).collect(),
        total_bytes,
        sha256,
    })
}

/// Resolve entry names up front so a collision fails before any output exists
fn plan_entries<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<(String, &Path)>, ArchiveError> {
    let mut seen: HashMap<String, &Path> = HashMap::new();
    let mut plan = Vec::with_capacity(inputs.len());

    for input in inputs {
        let input = input.as_ref();
        let name = entry_name_for(input)?;

        if let Some(first) = seen.get(&name) {
            return Err(ArchiveError::DuplicateEntry {
                name,
                first: first.to_path_buf(),
                second: input.to_path_buf(),
            });
        }

        seen.insert(name.clone(), input);
        plan.push((name, input));
    }

    Ok(plan)
}

fn entry_options(size: u64) -> FileOptions<'static, ()> {
    FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(ENTRY_PERMISSIONS)
        .last_modified_time(DateTime::default())
        .large_file(size >= u32::MAX as u64)
}

/// Stream one input into a new entry; returns the number of bytes copied
fn append_input(
    zip: &mut ZipWriter<StagedFile>,
    output: &Path,
    name: &str,
    input: &Path,
) -> Result<u64, ArchiveError> {
    let mut file = File::open(input).map_err(|e| ArchiveError::io(input, e))?;
    let size = file
        .metadata()
        .map_err(|e| ArchiveError::io(input, e))?
        .len();

    zip.start_file(name, entry_options(size))
        .map_err(|e| ArchiveError::archive(output, e))?;

    let copied = io::copy(&mut file, zip).map_err(|e| ArchiveError::io(input, e))?;
    debug!(entry = name, input = %input.display(), bytes = copied, "entry written");

    Ok(copied)
}

#[cfg(test)]
mod tests;
