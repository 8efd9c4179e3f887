pub mod archive;

use std::path::{Path, PathBuf};

pub use archive::{archive_digest, archive_file_name, build_archive, ArchiveEntry};

/// 出力先がフォルダ（または拡張子なし）ならその中に既定名で置く
pub fn output_path_for_archive(output: &Path, default_name: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(default_name)
    } else {
        output.to_path_buf()
    }
}

/// ZIPを書き出す（親フォルダは作成する）
pub fn write_archive(path: &Path, bytes: &[u8]) -> crate::error::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;
    Ok(())
}
