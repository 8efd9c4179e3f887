use crate::error::{AgencySplitError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct WorkbookInfo {
    pub path: PathBuf,
    pub file_name: String,
}

impl WorkbookInfo {
    /// 拡張子を除いたファイル名（ZIP名に使う）
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Excelが開いている間に作るロックファイル
const LOCK_PREFIX: &str = "~$";

fn is_workbook(path: &Path) -> bool {
    let is_xlsx = path
        .extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false);
    let is_lock = path
        .file_name()
        .map(|n| n.to_string_lossy().starts_with(LOCK_PREFIX))
        .unwrap_or(false);
    is_xlsx && !is_lock
}

/// フォルダ直下の .xlsx を列挙（ファイル名順）
pub fn scan_folder(folder: &Path) -> Result<Vec<WorkbookInfo>> {
    if !folder.is_dir() {
        return Err(AgencySplitError::FolderNotFound(folder.display().to_string()));
    }

    let mut workbooks: Vec<WorkbookInfo> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_workbook(e.path()))
        .map(|e| WorkbookInfo {
            path: e.path().to_path_buf(),
            file_name: e.file_name().to_string_lossy().to_string(),
        })
        .collect();

    workbooks.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(workbooks)
}

/// 入力パスを処理対象のブック一覧にする（ファイルならそれ1件）
pub fn collect_inputs(input: &Path) -> Result<Vec<WorkbookInfo>> {
    if input.is_file() {
        return Ok(vec![WorkbookInfo {
            path: input.to_path_buf(),
            file_name: input
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
        }]);
    }
    if !input.exists() {
        return Err(AgencySplitError::FileNotFound(input.display().to_string()));
    }

    let workbooks = scan_folder(input)?;
    if workbooks.is_empty() {
        return Err(AgencySplitError::NoWorkbooksFound(input.display().to_string()));
    }
    Ok(workbooks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_is_workbook() {
        assert!(is_workbook(Path::new("reporte.xlsx")));
        assert!(is_workbook(Path::new("REPORTE.XLSX")));
        assert!(!is_workbook(Path::new("~$reporte.xlsx")));
        assert!(!is_workbook(Path::new("reporte.xls")));
        assert!(!is_workbook(Path::new("notas.txt")));
    }

    #[test]
    fn test_scan_folder_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.xlsx"), b"x").unwrap();
        fs::write(dir.path().join("a.xlsx"), b"x").unwrap();
        fs::write(dir.path().join("~$a.xlsx"), b"x").unwrap();
        fs::write(dir.path().join("leeme.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.xlsx"), b"x").unwrap();

        let result = scan_folder(dir.path()).unwrap();
        let names: Vec<&str> = result.iter().map(|w| w.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.xlsx", "b.xlsx"]);
        assert_eq!(result[0].stem(), "a");
    }

    #[test]
    fn test_collect_inputs_single_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("marzo.xlsx");
        fs::write(&file, b"x").unwrap();

        let result = collect_inputs(&file).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].stem(), "marzo");
    }
}
