use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use eyre::{bail, eyre, Context, Result};
use filetime::FileTime;

use crate::checksum;
use crate::compare;
use crate::logger::Logger;
use crate::progress::ProgressSink;

use super::stats::CopyOutcome;

/// Suffix of the in-flight sibling a copy streams into before the atomic
/// rename. Strays with this suffix can only be left by abrupt process
/// termination.
pub const TMP_SUFFIX: &str = ".ferry-tmp";

/// Temporary sibling path for `dst`, in the same directory.
pub fn temp_path(dst: &Path) -> PathBuf {
    let mut name = dst
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(TMP_SUFFIX);
    dst.with_file_name(name)
}

/// Transfer one file. Failures are contained here: the temp file is
/// removed, the error is logged with both paths, and `Failed` is returned
/// rather than propagated, so sibling tasks are unaffected.
pub fn copy_file(
    src: &Path,
    src_size: u64,
    dst: &Path,
    buffer_size: usize,
    update: bool,
    verify_inline: bool,
    progress: &dyn ProgressSink,
    logger: &dyn Logger,
) -> CopyOutcome {
    if update {
        if let Ok(src_mtime) = src.metadata().and_then(|meta| meta.modified()) {
            if compare::is_up_to_date(src_size, src_mtime, dst) {
                // Keep the aggregate byte total consistent with a full pass.
                progress.advance(src_size);
                logger.skip(src);
                return CopyOutcome::Skipped;
            }
        }
    }

    match write_file(src, dst, buffer_size, verify_inline, progress) {
        Ok(bytes) => {
            logger.copy_done(src, dst, bytes);
            CopyOutcome::Copied
        }
        Err(err) => {
            let tmp = temp_path(dst);
            if tmp.exists() {
                let _ = fs::remove_file(&tmp);
            }
            logger.error("copy", src, &format!("-> {}: {err:#}", dst.display()));
            CopyOutcome::Failed
        }
    }
}

fn write_file(
    src: &Path,
    dst: &Path,
    buffer_size: usize,
    verify_inline: bool,
    progress: &dyn ProgressSink,
) -> Result<u64> {
    let src_meta = fs::metadata(src).with_context(|| format!("stat {}", src.display()))?;

    let parent = dst
        .parent()
        .ok_or_else(|| eyre!("destination has no parent: {}", dst.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;

    let tmp = temp_path(dst);
    let mut reader = File::open(src).with_context(|| format!("open {}", src.display()))?;
    let mut writer = File::create(&tmp).with_context(|| format!("create {}", tmp.display()))?;

    let mut hasher = verify_inline.then(blake3::Hasher::new);
    let mut buf = vec![0u8; buffer_size.max(1)];
    let mut written: u64 = 0;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n])?;
        if let Some(hasher) = hasher.as_mut() {
            hasher.update(&buf[..n]);
        }
        written += n as u64;
        progress.advance(n as u64);
    }
    drop(writer);

    // Readers only ever observe the prior destination or the complete new
    // file; the rename replaces in a single operation.
    fs::rename(&tmp, dst).with_context(|| format!("rename onto {}", dst.display()))?;

    let mtime = FileTime::from_last_modification_time(&src_meta);
    let atime = FileTime::from_last_access_time(&src_meta);
    filetime::set_file_times(dst, atime, mtime)
        .with_context(|| format!("set times on {}", dst.display()))?;

    if let Some(hasher) = hasher {
        let streamed = hasher.finalize().to_hex().to_string();
        let on_disk = checksum::hash_file(dst, buffer_size)?;
        if streamed != on_disk {
            bail!("verification failed: {}", dst.display());
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::NullLogger;
    use crate::progress::NullProgress;

    #[test]
    fn temp_path_is_a_suffixed_sibling() {
        let tmp = temp_path(Path::new("/dest/dir/file.bin"));
        assert_eq!(tmp, Path::new("/dest/dir/file.bin.ferry-tmp"));
    }

    #[test]
    fn copies_content_and_preserves_mtime() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src.txt");
        let dst = temp.path().join("out/nested/dst.txt");
        std::fs::write(&src, b"payload").unwrap();
        filetime::set_file_mtime(&src, FileTime::from_unix_time(1_600_000_000, 0)).unwrap();

        let outcome = copy_file(
            &src,
            7,
            &dst,
            1024,
            false,
            true,
            &NullProgress,
            &NullLogger,
        );
        assert_eq!(outcome, CopyOutcome::Copied);
        assert_eq!(std::fs::read(&dst).unwrap(), b"payload");

        let dst_mtime = FileTime::from_last_modification_time(&dst.metadata().unwrap());
        assert_eq!(dst_mtime.unix_seconds(), 1_600_000_000);
        assert!(!temp_path(&dst).exists());
    }

    #[test]
    fn replaces_an_existing_destination_atomically() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        std::fs::write(&src, b"new contents").unwrap();
        std::fs::write(&dst, b"old").unwrap();

        let outcome = copy_file(
            &src,
            12,
            &dst,
            1024,
            false,
            false,
            &NullProgress,
            &NullLogger,
        );
        assert_eq!(outcome, CopyOutcome::Copied);
        assert_eq!(std::fs::read(&dst).unwrap(), b"new contents");
    }

    #[test]
    fn missing_source_fails_without_leaving_a_temp_file() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("gone");
        let dst = temp.path().join("dst");

        let outcome = copy_file(
            &src,
            0,
            &dst,
            1024,
            false,
            false,
            &NullProgress,
            &NullLogger,
        );
        assert_eq!(outcome, CopyOutcome::Failed);
        assert!(!dst.exists());
        assert!(!temp_path(&dst).exists());
    }

    #[test]
    fn update_mode_skips_a_current_destination() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        std::fs::write(&src, b"same").unwrap();
        std::fs::write(&dst, b"same").unwrap();
        let mtime = FileTime::from_unix_time(1_700_000_000, 0);
        filetime::set_file_mtime(&src, mtime).unwrap();
        filetime::set_file_mtime(&dst, mtime).unwrap();

        let outcome = copy_file(&src, 4, &dst, 1024, true, false, &NullProgress, &NullLogger);
        assert_eq!(outcome, CopyOutcome::Skipped);
    }
}
