use crate::error::ArchiveError;
use std::path::Path;

/// File suffix identifying a compiled class entry
pub const CLASS_SUFFIX: &str = ".class";

/// Separator between path components inside an archive
pub const ENTRY_SEPARATOR: char = '/';

/// Separator between namespace segments in a fully-qualified class name
pub const NAMESPACE_SEPARATOR: char = '.';

/// Derive the flat archive entry name for an input file.
///
/// Only the base name survives; every directory component of the input path
/// is discarded. Paths without a usable final component (empty, root, `..`)
/// or with a non-UTF-8 base name are rejected.
pub fn entry_name_for(path: &Path) -> Result<String, ArchiveError> {
    let file_name = path.file_name().ok_or_else(|| {
        ArchiveError::InvalidInput(format!("No file name in path: {}", path.display()))
    })?;

    let name = file_name.to_str().ok_or_else(|| {
        ArchiveError::InvalidInput(format!("Invalid UTF-8 in file name: {:?}", file_name))
    })?;

    if name.is_empty() {
        return Err(ArchiveError::InvalidInput(format!(
            "Empty file name: {}",
            path.display()
        )));
    }

    Ok(name.to_string())
}

/// True for entries carrying a compiled class (directories never qualify)
pub fn is_class_entry(entry_name: &str) -> bool {
    !entry_name.ends_with(ENTRY_SEPARATOR) && entry_name.ends_with(CLASS_SUFFIX)
}

/// Map a class entry to its fully-qualified name.
///
/// `a/b/Foo.class` becomes `a.b.Foo`; nested classes keep their `$` marker
/// (`a/Outer$Inner.class` becomes `a.Outer$Inner`). Returns `None` for
/// anything that is not a class entry.
pub fn class_name_for(entry_name: &str) -> Option<String> {
    if !is_class_entry(entry_name) {
        return None;
    }

    let stem = &entry_name[..entry_name.len() - CLASS_SUFFIX.len()];
    Some(stem.replace(ENTRY_SEPARATOR, &NAMESPACE_SEPARATOR.to_string()))
}

/// Case-sensitive prefix test; stops at the first prefix that matches
pub fn matches_any_prefix<S: AsRef<str>>(class_name: &str, prefixes: &[S]) -> bool {
    prefixes
        .iter()
        .any(|prefix| class_name.starts_with(prefix.as_ref()))
}
