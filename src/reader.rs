//! xlsx読み込み
//!
//! calamineで読んだセルを共通ライブラリの [`Sheet`] に変換する。
//! 先頭の空行・空列も保持し、行番号がExcel上の位置と一致するようにする。

use crate::error::{AgencySplitError, Result};
use agency_split_common::{CellValue, Sheet, SheetSource};
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use std::io::Cursor;

pub struct XlsxSource {
    workbook: Xlsx<Cursor<Vec<u8>>>,
}

impl XlsxSource {
    /// アップロードされたバイト列から開く
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
            .map_err(|e: calamine::XlsxError| AgencySplitError::WorkbookRead(e.to_string()))?;
        Ok(Self { workbook })
    }

    pub fn open(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Err(AgencySplitError::FileNotFound(path.display().to_string()));
        }
        Self::from_bytes(std::fs::read(path)?)
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Date(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
    }
}

/// calamineの範囲を絶対位置のグリッドに展開
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    // データがA1から始まるとは限らない
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let start_row = start_row as usize;
    let start_col = start_col as usize;

    let mut rows = vec![Vec::new(); start_row];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col];
        cells.extend(row.iter().map(convert_cell));
        rows.push(cells);
    }
    rows
}

impl SheetSource for XlsxSource {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn load_sheet(&mut self, name: &str) -> agency_split_common::Result<Sheet> {
        let range = self
            .workbook
            .worksheet_range(name)
            .map_err(|e| agency_split_common::Error::SheetRead {
                sheet: name.to_string(),
                message: e.to_string(),
            })?;
        Ok(Sheet::new(name, range_to_rows(&range)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_bytes() {
        let result = XlsxSource::from_bytes(b"not a workbook".to_vec());
        assert!(matches!(result, Err(AgencySplitError::WorkbookRead(_))));
    }

    #[test]
    fn test_open_missing_file() {
        let result = XlsxSource::open(std::path::Path::new("/nonexistent/book.xlsx"));
        assert!(matches!(result, Err(AgencySplitError::FileNotFound(_))));
    }

    #[test]
    fn test_convert_cell() {
        assert_eq!(convert_cell(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(convert_cell(&Data::String("A".into())), CellValue::Text("A".into()));
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_range_offset_preserved() {
        let mut range = Range::new((2, 1), (3, 2));
        range.set_value((2, 1), Data::String("AGENCIA".into()));
        range.set_value((3, 2), Data::Float(5.0));

        let rows = range_to_rows(&range);
        assert_eq!(rows.len(), 4);
        assert!(rows[0].is_empty());
        assert_eq!(rows[2][1], CellValue::Text("AGENCIA".into()));
        assert_eq!(rows[3][2], CellValue::Number(5.0));
        assert_eq!(rows[3][0], CellValue::Empty);
    }
}
