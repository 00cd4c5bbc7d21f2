//! Path helpers

use std::path::{Path, PathBuf};

/// Create `path` and any missing parents.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// `dir/<stem>.<extension>`
pub fn with_extension_in(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    dir.join(format!("{stem}.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ensure_dir_creates_nested_dirs_and_is_idempotent() {
        let tmp = TempDir::new().expect("tmp");
        let nested = tmp.path().join("a").join("b");
        ensure_dir(&nested).expect("create");
        ensure_dir(&nested).expect("create again");
        assert!(nested.is_dir());
    }

    #[test]
    fn with_extension_in_appends_extension() {
        let path = with_extension_in(Path::new("out"), "venn.v2", "png");
        assert_eq!(path, Path::new("out").join("venn.v2.png"));
    }
}
