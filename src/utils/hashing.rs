//! File digests

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const HASH_BLOCK_SIZE: usize = 4096;

/// Lower-case hex SHA-256 of a file, read in fixed-size blocks.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; HASH_BLOCK_SIZE];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::sha256_file;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn sha256_of_known_content() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("abc.txt");
        fs::write(&path, "abc").expect("write");
        assert_eq!(
            sha256_file(&path).expect("hash"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha256_spans_multiple_blocks() {
        let tmp = TempDir::new().expect("tmp");
        let a = tmp.path().join("a.bin");
        let b = tmp.path().join("b.bin");
        let mut content = vec![7u8; 10_000];
        fs::write(&a, &content).expect("write");
        content[9_999] = 8;
        fs::write(&b, &content).expect("write");
        assert_ne!(sha256_file(&a).expect("hash"), sha256_file(&b).expect("hash"));
    }

    #[test]
    fn sha256_missing_file_errors() {
        let tmp = TempDir::new().expect("tmp");
        assert!(sha256_file(&tmp.path().join("missing")).is_err());
    }
}
