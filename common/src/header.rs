//! ヘッダー行検出モジュール
//!
//! タイトル行や結合セルのバナーが上にあるとヘッダーが1行目以降にずれるため、
//! 先頭N行を走査して期待列との一致数が最大の行をヘッダーとみなす。
//!
//! 2段ヘッダー（上段: グループ名、下段: 項目名）は (上段, 下段) の組を
//! [`flatten_header`] で1つの列名に平坦化する。

use crate::text::{normalize_header, standardize_column};
use crate::types::{CellValue, Sheet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// ヘッダー検出の設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionOptions {
    /// 走査する最大行数
    pub max_rows_scanned: usize,
    /// ヘッダーとみなす最小一致数
    ///
    /// 大きくするとバナー行の誤検出が減るが、列名が崩れたファイルを取りこぼしやすくなる。
    pub min_match_threshold: usize,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            max_rows_scanned: 100,
            min_match_threshold: 2,
        }
    }
}

/// 検出されたヘッダー行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMatch {
    /// 行番号（0始まり）
    pub row: usize,
    /// 一致した期待列の数
    pub matched: usize,
}

/// 2段ヘッダーのグループ定義（例: PENALIDAD 1 配下の項目）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSection {
    /// 上段のグループ名
    pub label: String,
    /// このグループに属する下段の項目名
    pub fields: Vec<String>,
}

impl HeaderSection {
    pub fn new(label: &str, fields: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    fn contains(&self, inner: &str) -> bool {
        self.fields.iter().any(|f| standardize_column(f) == inner)
    }
}

/// 行の正規化済みセル値
pub fn normalized_row(row: &[CellValue]) -> Vec<String> {
    row.iter()
        .map(|c| normalize_header(&c.to_text()))
        .filter(|s| !s.is_empty())
        .collect()
}

fn count_matches(row_values: &HashSet<String>, expected: &[String]) -> usize {
    expected.iter().filter(|e| row_values.contains(*e)).count()
}

fn normalized_expected<S: AsRef<str>>(expected: &[S]) -> Vec<String> {
    expected
        .iter()
        .map(|e| normalize_header(e.as_ref()))
        .filter(|e| !e.is_empty())
        .collect()
}

/// 1行目にすべての期待列が含まれるか
pub fn validate_headers<S: AsRef<str>>(sheet: &Sheet, expected: &[S]) -> bool {
    let row_values: HashSet<String> = normalized_row(sheet.row(0)).into_iter().collect();
    normalized_expected(expected)
        .iter()
        .all(|e| row_values.contains(e))
}

/// ヘッダー行を検出する
///
/// 先頭 `max_rows_scanned` 行のうち、期待列の一致数が最大の行を返す。
/// 同数の場合は先に現れた行が優先される。最大一致数が `min_match_threshold`
/// 未満なら `None`（閾値0は1として扱う）。
pub fn detect_header_row<S: AsRef<str>>(
    sheet: &Sheet,
    expected: &[S],
    max_rows_scanned: usize,
    min_match_threshold: usize,
) -> Option<HeaderMatch> {
    let expected = normalized_expected(expected);
    let threshold = min_match_threshold.max(1);
    let mut best: Option<HeaderMatch> = None;

    for (row_idx, row) in sheet.rows.iter().take(max_rows_scanned).enumerate() {
        let row_values: HashSet<String> = normalized_row(row).into_iter().collect();
        let matched = count_matches(&row_values, &expected);
        if matched > best.map(|b| b.matched).unwrap_or(0) {
            best = Some(HeaderMatch { row: row_idx, matched });
        }
    }

    best.filter(|b| b.matched >= threshold)
}

/// 行に含まれない期待列（正規化済み）
pub fn missing_columns<S: AsRef<str>>(row: &[CellValue], expected: &[S]) -> Vec<String> {
    let row_values: HashSet<String> = normalized_row(row).into_iter().collect();
    normalized_expected(expected)
        .into_iter()
        .filter(|e| !row_values.contains(e))
        .collect()
}

/// 1段ヘッダーの列名（空セルは `UNNAMED: n`）
pub fn single_level_names(sheet: &Sheet, header_row: usize) -> Vec<String> {
    let width = sheet.width();
    (0..width)
        .map(|col| {
            let name = standardize_column(&sheet.cell(header_row, col).to_text());
            if name.is_empty() {
                format!("UNNAMED: {}", col)
            } else {
                name
            }
        })
        .collect()
}

/// (上段, 下段) を1つの列名にする
///
/// * 上段が空・`UNNAMED*`・下段と同じ → 下段のみ
/// * 下段が既知グループの項目 → `"<上段> - <下段>"`
/// * それ以外 → 下段のみ
pub fn flatten_header(outer: &str, inner: &str, sections: &[HeaderSection]) -> String {
    let outer = standardize_column(outer);
    let inner = standardize_column(inner);

    if outer.is_empty() || outer.starts_with("UNNAMED") || outer == inner {
        return inner;
    }
    if sections.iter().any(|s| s.contains(&inner)) {
        return format!("{} - {}", outer, inner);
    }
    inner
}

/// 2段ヘッダーの列名
///
/// 上段は `inner_row - 1` 行目。結合セルで空になった上段は左から引き継ぐ。
/// 下段が空の列は、その列に上段が書かれていればそれを使い、
/// 引き継いだだけの上段や両方空なら `UNNAMED: n`。
pub fn two_level_names(sheet: &Sheet, inner_row: usize, sections: &[HeaderSection]) -> Vec<String> {
    let width = sheet.width();
    let mut last_outer = String::new();

    (0..width)
        .map(|col| {
            let outer_cell = match inner_row.checked_sub(1) {
                Some(outer_row) => sheet.cell(outer_row, col).to_text(),
                None => String::new(),
            };
            let outer_written = !outer_cell.trim().is_empty();
            if outer_written {
                last_outer = outer_cell;
            }
            let inner = sheet.cell(inner_row, col).to_text();

            let name = if inner.trim().is_empty() {
                if outer_written {
                    standardize_column(&last_outer)
                } else {
                    String::new()
                }
            } else {
                flatten_header(&last_outer, &inner, sections)
            };
            if name.is_empty() {
                format!("UNNAMED: {}", col)
            } else {
                name
            }
        })
        .collect()
}
