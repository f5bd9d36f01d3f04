//! Streaming file digests

use std::fs::File;
use std::io::Read;
use std::path::Path;

use eyre::{Context, Result};

/// Stream `path` through blake3 in `buffer_size` chunks and return the hex
/// digest. Backs both inline verification (via an incremental hasher fed
/// during the write) and the arms-length post-copy re-read; the two paths
/// share this primitive and nothing else.
pub fn hash_file(path: &Path, buffer_size: usize) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = vec![0u8; buffer_size.max(1)];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_independent_of_buffer_size() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("data.bin");
        std::fs::write(&path, vec![0xA5u8; 300_000]).unwrap();

        let small = hash_file(&path, 4096).unwrap();
        let large = hash_file(&path, 1024 * 1024).unwrap();
        assert_eq!(small, large);
    }

    #[test]
    fn matches_one_shot_blake3() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("data.txt");
        std::fs::write(&path, b"ferry").unwrap();

        let streamed = hash_file(&path, 2).unwrap();
        assert_eq!(streamed, blake3::hash(b"ferry").to_hex().to_string());
    }

    #[test]
    fn empty_file_hashes_to_empty_digest() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("empty");
        std::fs::write(&path, b"").unwrap();

        let streamed = hash_file(&path, 1024).unwrap();
        assert_eq!(streamed, blake3::hash(b"").to_hex().to_string());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(hash_file(Path::new("/nonexistent/ferry-hash"), 1024).is_err());
    }
}
