//! セル・シート・ワークブックの型定義
//!
//! ファイル形式（xlsx）には依存しない。読み込み側は [`SheetSource`] を実装して
//! シートをこの型に変換する。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// セル値
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excelのシリアル日付
    Date(f64),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 比較用のテキスト表現
    ///
    /// 整数値の数値は小数点なしで表す（`3.0` → `"3"`）。
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) | CellValue::Date(n) => format_number(*n),
            CellValue::Bool(b) => if *b { "TRUE".into() } else { "FALSE".into() },
        }
    }

    /// 整数に変換（数値でなければ `None`）
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().filter(|n| n.is_finite()).map(|n| n.trunc() as i64))
            }
            CellValue::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// 1シート分のセルグリッド（行・列とも0始まりの絶対位置）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { name: name.into(), rows }
    }

    /// 文字列グリッドから作成（空文字は空セル）
    pub fn from_strings(name: impl Into<String>, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|s| if s.is_empty() { CellValue::Empty } else { CellValue::from(*s) })
                    .collect()
            })
            .collect();
        Self::new(name, rows)
    }

    pub fn row(&self, index: usize) -> &[CellValue] {
        self.rows.get(index).map(|r| r.as_slice()).unwrap_or(&[])
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.row(row).get(col).unwrap_or(&EMPTY_CELL)
    }

    /// 最大列数
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }
}

/// シートの供給元
///
/// xlsxリーダーやテスト用のインメモリブックがこれを実装する。
pub trait SheetSource {
    /// ブック内の全シート名（ブック内の順序）
    fn sheet_names(&self) -> Vec<String>;

    /// シートを読み込む
    fn load_sheet(&mut self, name: &str) -> Result<Sheet>;
}

/// インメモリのワークブック
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }
}

impl SheetSource for Workbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn load_sheet(&mut self, name: &str) -> Result<Sheet> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| Error::SheetRead {
                sheet: name.to_string(),
                message: "hoja inexistente".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_text_integral_number() {
        assert_eq!(CellValue::Number(3.0).to_text(), "3");
        assert_eq!(CellValue::Number(0.85).to_text(), "0.85");
        assert_eq!(CellValue::Empty.to_text(), "");
    }

    #[test]
    fn test_to_integer_coercion() {
        assert_eq!(CellValue::Number(3.9).to_integer(), Some(3));
        assert_eq!(CellValue::from(" 12 ").to_integer(), Some(12));
        assert_eq!(CellValue::from("4.0").to_integer(), Some(4));
        assert_eq!(CellValue::from("N/A").to_integer(), None);
        assert_eq!(CellValue::Number(f64::NAN).to_integer(), None);
        assert_eq!(CellValue::Empty.to_integer(), None);
    }

    #[test]
    fn test_blank_text_is_empty() {
        assert!(CellValue::from("   ").is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
    }

    #[test]
    fn test_workbook_load_missing_sheet() {
        let mut workbook = Workbook::new(vec![Sheet::from_strings("BASE", &[&["ASESOR"]])]);
        assert_eq!(workbook.sheet_names(), vec!["BASE".to_string()]);
        assert!(workbook.load_sheet("BASE").is_ok());
        assert!(matches!(workbook.load_sheet("OTRA"), Err(Error::SheetRead { .. })));
    }

    #[test]
    fn test_sheet_cell_out_of_range() {
        let sheet = Sheet::from_strings("S", &[&["A", "B"], &["1"]]);
        assert_eq!(sheet.width(), 2);
        assert_eq!(sheet.cell(1, 1), &CellValue::Empty);
        assert_eq!(sheet.cell(10, 0), &CellValue::Empty);
    }
}
