use crate::error::ArchiveError;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Output file that only appears at its target path once committed.
///
/// Bytes go to a temporary file next to the target. `commit` renames it into
/// place; dropping an uncommitted `StagedFile` removes the temporary file and
/// leaves whatever was at the target untouched.
pub struct StagedFile {
    target: PathBuf,
    temp: NamedTempFile,
}

impl StagedFile {
    pub fn create(target: &Path) -> Result<Self, ArchiveError> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let temp = tempfile::Builder::new()
            .prefix(".jarsmith-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| ArchiveError::io(target, e))?;

        Ok(Self {
            target: target.to_path_buf(),
            temp,
        })
    }

    /// SHA-256 over everything written so far, as lowercase hex
    pub fn sha256(&mut self) -> Result<String, ArchiveError> {
        let file: &mut File = self.temp.as_file_mut();
        file.flush().map_err(|e| ArchiveError::io(&self.target, e))?;
        file.seek(SeekFrom::Start(0))
            .map_err(|e| ArchiveError::io(&self.target, e))?;

        let mut hasher = Sha256::new();
        io::copy(file, &mut hasher).map_err(|e| ArchiveError::io(&self.target, e))?;
        Ok(hex::encode(hasher.finalize()))
    }

    /// Move the staged bytes into place at the target path
    pub fn commit(self) -> Result<(), ArchiveError> {
        let Self { target, temp } = self;

        temp.as_file()
            .sync_all()
            .map_err(|e| ArchiveError::io(&target, e))?;

        // Temp files are created owner-only; published artifacts are world-readable
        #[cfg(unix)]
        {
            use std::fs::Permissions;
            use std::os::unix::fs::PermissionsExt;
            temp.as_file()
                .set_permissions(Permissions::from_mode(0o644))
                .map_err(|e| ArchiveError::io(&target, e))?;
        }

        temp.persist(&target)
            .map_err(|e| ArchiveError::io(&target, e.error))?;
        Ok(())
    }
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.temp.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.temp.flush()
    }
}

impl Seek for StagedFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.temp.seek(pos)
    }
}
