//! 表データ（ヘッダー確定後のシート）

use crate::text::{normalize_header, standardize_column};
use crate::types::{CellValue, Sheet};

/// 列名と行データ
///
/// すべての行は列数と同じ長さに揃えられている。列名は [`standardize_column`] 済み。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl ParsedTable {
    /// 列名と行から作成（行は列数に合わせて切り詰め・補完）
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let columns: Vec<String> = columns.iter().map(|c| standardize_column(c)).collect();
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// シートから作成
    ///
    /// `header_row` より下の行をデータとし、完全に空の行は捨てる。
    pub fn from_sheet(sheet: &Sheet, header_row: usize, columns: Vec<String>) -> Self {
        let rows = sheet
            .rows
            .iter()
            .skip(header_row + 1)
            .filter(|row| row.iter().any(|c| !c.is_empty()))
            .cloned()
            .collect();
        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn value(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// 列を探す（正規化後の完全一致 → 部分一致）
    pub fn find_column(&self, name: &str) -> Option<usize> {
        let target = normalize_header(name);
        if target.is_empty() {
            return None;
        }
        let normalized: Vec<String> = self.columns.iter().map(|c| normalize_header(c)).collect();
        normalized
            .iter()
            .position(|c| *c == target)
            .or_else(|| normalized.iter().position(|c| c.contains(target.as_str())))
    }

    /// 指定行のみの表を作る
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: indices.iter().filter_map(|&i| self.rows.get(i).cloned()).collect(),
        }
    }

    /// 指定列を除いた表を作る
    pub fn without_columns(&self, names: &[&str]) -> Self {
        let drop: Vec<String> = names.iter().map(|n| standardize_column(n)).collect();
        let keep: Vec<usize> = (0..self.columns.len())
            .filter(|&i| !drop.contains(&self.columns[i]))
            .collect();
        Self {
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }
}
