//! ZIP出力
//!
//! エントリの更新日時を固定し、同じ入力から同じバイト列が得られるようにする。

use crate::error::Result;
use agency_split_common::ReportLayout;
use chrono::NaiveDateTime;
use sha2::{Digest, Sha256};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// ZIPの1エントリ
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// エントリを順にDeflate圧縮してZIPを作る
pub fn build_archive(entries: &[ArchiveEntry]) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        writer.start_file(entry.name.as_str(), options)?;
        writer.write_all(&entry.bytes)?;
    }
    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// SHA-256（16進）
pub fn archive_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// `<接頭辞>[_<入力名>]_YYYYMMDD_HHMMSS.zip`
pub fn archive_file_name(layout: &ReportLayout, stem: Option<&str>, timestamp: NaiveDateTime) -> String {
    let stamp = timestamp.format("%Y%m%d_%H%M%S");
    match stem.map(str::trim).filter(|s| !s.is_empty()) {
        Some(stem) => format!("{}_{}_{}.zip", layout.output.archive_prefix, stem, stamp),
        None => format!("{}_{}.zip", layout.output.archive_prefix, stamp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Read;

    fn entries() -> Vec<ArchiveEntry> {
        vec![
            ArchiveEntry { name: "Reporte A.xlsx".into(), bytes: b"first".to_vec() },
            ArchiveEntry { name: "Reporte B.xlsx".into(), bytes: b"second".to_vec() },
        ]
    }

    #[test]
    fn test_build_archive_entries() {
        let bytes = build_archive(&entries()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut content = String::new();
        archive.by_name("Reporte B.xlsx").unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "second");
    }

    #[test]
    fn test_build_archive_is_deterministic() {
        let first = build_archive(&entries()).unwrap();
        let second = build_archive(&entries()).unwrap();
        assert_eq!(archive_digest(&first), archive_digest(&second));
        assert_eq!(archive_digest(&first).len(), 64);
    }

    #[test]
    fn test_archive_file_name() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(9, 7, 1)
            .unwrap();
        let layout = ReportLayout::corte2();
        assert_eq!(
            archive_file_name(&layout, None, ts),
            "Reportes_Lima_Corte_2_Segmentados_20240305_090701.zip"
        );
        assert_eq!(
            archive_file_name(&ReportLayout::corte1(), Some("marzo"), ts),
            "Reportes_Lima_Segmentados_marzo_20240305_090701.zip"
        );
    }
}
