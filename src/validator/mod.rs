//! Namespace validation for class archives.

mod report;

pub use report::{SUCCESS_MARKER, ValidationReport};

use crate::entry::{class_name_for, matches_any_prefix};
use crate::error::ArchiveError;
use crate::staged::StagedFile;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// Argument-vector entry point: `<output-report> <input-archive> <expected-prefix>...`
pub fn validate_from_args<S: AsRef<str>>(args: &[S]) -> Result<ValidationReport, ArchiveError> {
    if args.len() < 3 {
        return Err(ArchiveError::InvalidArguments(format!(
            "expected <output-report> <input-archive> <expected-prefix>..., got {} argument(s)",
            args.len()
        )));
    }

    let report_path = Path::new(args[0].as_ref());
    let archive = Path::new(args[1].as_ref());
    let prefixes: Vec<String> = args[2..].iter().map(|p| p.as_ref().to_string()).collect();
    validate(report_path, archive, &prefixes)
}

/// Check `archive` against `prefixes` and write the rendered report to `report_path`.
///
/// A rejected archive is still `Ok`; inspect `ValidationReport::passed`. `Err`
/// means the check itself could not run.
pub fn validate(
    report_path: &Path,
    archive: &Path,
    prefixes: &[String],
) -> Result<ValidationReport, ArchiveError> {
    let report = scan(archive, prefixes)?;

    let mut staged = StagedFile::create(report_path)?;
    staged
        .write_all(report.render().as_bytes())
        .map_err(|e| ArchiveError::io(report_path, e))?;
    staged.commit()?;

    if report.passed() {
        info!(
            archive = %archive.display(),
            classes = report.classes_checked,
            "all classes match expected prefixes"
        );
    } else {
        warn!(
            archive = %archive.display(),
            rejected = report.non_matching.len(),
            classes = report.classes_checked,
            "classes outside expected prefixes"
        );
    }

    Ok(report)
}

/// Read-only half of `validate`: enumerate class entries and collect the misfits
pub fn scan(archive: &Path, prefixes: &[String]) -> Result<ValidationReport, ArchiveError> {
    if prefixes.is_empty() {
        return Err(ArchiveError::InvalidArguments(
            "at least one expected prefix is required".to_string(),
        ));
    }

    let file = File::open(archive).map_err(|e| ArchiveError::io(archive, e))?;
    let zip = ZipArchive::new(BufReader::new(file))
        .map_err(|e| ArchiveError::archive(archive, e))?;

    let mut non_matching = BTreeSet::new();
    let mut classes_checked = 0;

    for class_name in zip.file_names().filter_map(class_name_for) {
        classes_checked += 1;
        if !matches_any_prefix(&class_name, prefixes) {
            debug!(class = %class_name, "no matching prefix");
            non_matching.insert(class_name);
        }
    }

    Ok(ValidationReport {
        archive: archive.to_path_buf(),
        prefixes: prefixes.to_vec(),
        non_matching,
        classes_checked,
    })
}
