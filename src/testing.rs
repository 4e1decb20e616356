//! Helpers shared by unit tests.

use std::path::{Path, PathBuf};

/// A file under the temp dir that is removed when dropped, even if the test panics
pub struct ScratchFile(PathBuf);

impl ScratchFile {
    pub fn new(name: &str, contents: impl AsRef<[u8]>) -> Self {
        let path = std::env::temp_dir().join(format!("route-replay-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_file_removed_on_panic() {
        let path = std::panic::catch_unwind(|| {
            let file = ScratchFile::new("unwind.txt", "x");
            let path = file.path().to_path_buf();
            assert!(path.exists());
            std::panic::resume_unwind(Box::new(path));
        })
        .unwrap_err()
        .downcast::<PathBuf>()
        .unwrap();

        assert!(!path.exists());
    }
}
