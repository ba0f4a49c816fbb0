//! Temporary storage for uploaded recordings
//!
//! Uploads are written under a randomly generated name and handed to the
//! analysis pipeline as a path. The returned [`TempUpload`] guard deletes
//! the file when dropped, so cleanup happens whether analysis succeeded or
//! failed.

use crate::error::AnalysisError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Random characters in an upload file name
const NAME_LEN: usize = 32;

/// Directory that holds in-flight uploads
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Open an upload directory, creating it if needed
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Io` if the directory cannot be created.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Result<Self, AnalysisError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        log::debug!("Upload directory ready: {}", dir.display());
        Ok(Self { dir })
    }

    /// Upload directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write an upload to `<dir>/<32 random alphanumerics>.wav`
    ///
    /// The file is created exclusively, so a name collision never overwrites
    /// another in-flight upload.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Io` if the file cannot be created or written.
    pub fn persist(&self, bytes: &[u8]) -> Result<TempUpload, AnalysisError> {
        let mut file = tempfile::Builder::new()
            .prefix("")
            .suffix(".wav")
            .rand_bytes(NAME_LEN)
            .tempfile_in(&self.dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        log::debug!("Stored {} byte upload at {}", bytes.len(), file.path().display());
        Ok(TempUpload { file: Some(file) })
    }
}

/// An uploaded file that is deleted on drop
#[derive(Debug)]
pub struct TempUpload {
    file: Option<NamedTempFile>,
}

impl TempUpload {
    /// Location of the stored upload
    pub fn path(&self) -> &Path {
        match &self.file {
            Some(file) => file.path(),
            None => Path::new(""),
        }
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };
        let path = file.path().to_path_buf();
        match file.close() {
            Ok(()) => log::info!("Deleted temp file: {}", path.display()),
            Err(err) => log::warn!("Could not delete temp file {}: {}", path.display(), err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_and_cleanup() {
        let scratch = tempfile::tempdir().unwrap();
        let store = UploadStore::new(scratch.path().join("uploads")).unwrap();
        assert!(store.dir().is_dir());

        let path = {
            let upload = store.persist(b"RIFF").unwrap();
            let path = upload.path().to_path_buf();
            assert!(path.exists());
            assert_eq!(path.parent(), Some(store.dir()));
            assert_eq!(fs::read(&path).unwrap(), b"RIFF");

            let name = path.file_name().unwrap().to_str().unwrap();
            assert!(name.ends_with(".wav"));
            assert_eq!(name.len(), NAME_LEN + 4);
            assert!(name[..NAME_LEN].chars().all(|c| c.is_ascii_alphanumeric()));
            path
        };

        assert!(!path.exists());
    }

    #[test]
    fn test_unique_names() {
        let scratch = tempfile::tempdir().unwrap();
        let store = UploadStore::new(scratch.path()).unwrap();
        let a = store.persist(b"a").unwrap();
        let b = store.persist(b"b").unwrap();
        assert_ne!(a.path(), b.path());
        assert_eq!(fs::read(a.path()).unwrap(), b"a");
        assert_eq!(fs::read(b.path()).unwrap(), b"b");
    }

    #[test]
    fn test_existing_file_is_never_overwritten() {
        let scratch = tempfile::tempdir().unwrap();
        let store = UploadStore::new(scratch.path()).unwrap();
        let first = store.persist(b"first").unwrap();

        let uploads: Vec<_> = (0..16).map(|_| store.persist(b"later").unwrap()).collect();
        assert!(uploads.iter().all(|u| u.path() != first.path()));
        assert_eq!(fs::read(first.path()).unwrap(), b"first");
    }

    #[test]
    fn test_already_removed_file_does_not_panic() {
        let scratch = tempfile::tempdir().unwrap();
        let store = UploadStore::new(scratch.path()).unwrap();
        let upload = store.persist(b"x").unwrap();
        fs::remove_file(upload.path()).unwrap();
        drop(upload);
    }
}
