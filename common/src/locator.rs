//! シート特定モジュール
//!
//! アップロードごとに揺れるシート名を、候補名リストから探す。
//! 完全一致 → 空白無視の一致 → 部分一致 の順に試し、最初に当たったものを返す。

use crate::text::{normalize_sheet_name, without_spaces};
use serde::Serialize;

/// どの規則で一致したか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchRule {
    Exact,
    SpaceInsensitive,
    Partial,
}

impl std::fmt::Display for MatchRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchRule::Exact => write!(f, "exacta"),
            MatchRule::SpaceInsensitive => write!(f, "sin espacios"),
            MatchRule::Partial => write!(f, "parcial"),
        }
    }
}

/// シート特定結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetMatch {
    /// ブック上の実際のシート名
    pub name: String,
    /// 一致した候補名
    pub candidate: String,
    pub rule: MatchRule,
}

struct Normalized<'a> {
    original: &'a str,
    plain: String,
    compact: String,
}

fn normalize_all<S: AsRef<str>>(names: &[S]) -> Vec<Normalized<'_>> {
    names
        .iter()
        .map(|n| {
            let plain = normalize_sheet_name(n.as_ref());
            let compact = without_spaces(&plain);
            Normalized { original: n.as_ref(), plain, compact }
        })
        .filter(|n| !n.compact.is_empty())
        .collect()
}

/// 候補名に一致するシートを探す
///
/// # Arguments
/// * `sheet_names` - ブック内のシート名
/// * `candidates` - 受け入れる名前（優先順）
///
/// # Returns
/// 一致したシート。どの規則でも見つからなければ `None`
pub fn locate_sheet<S: AsRef<str>, C: AsRef<str>>(
    sheet_names: &[S],
    candidates: &[C],
) -> Option<SheetMatch> {
    let sheets = normalize_all(sheet_names);
    let candidates = normalize_all(candidates);

    let found = |rule: MatchRule, sheet: &Normalized, candidate: &Normalized| SheetMatch {
        name: sheet.original.to_string(),
        candidate: candidate.original.to_string(),
        rule,
    };

    // 1. 完全一致
    for candidate in &candidates {
        if let Some(sheet) = sheets.iter().find(|s| s.plain == candidate.plain) {
            return Some(found(MatchRule::Exact, sheet, candidate));
        }
    }

    // 2. 空白を無視した一致
    for candidate in &candidates {
        if let Some(sheet) = sheets.iter().find(|s| s.compact == candidate.compact) {
            return Some(found(MatchRule::SpaceInsensitive, sheet, candidate));
        }
    }

    // 3. 部分一致（空白あり・なし両方）
    for candidate in &candidates {
        if let Some(sheet) = sheets.iter().find(|s| {
            s.plain.contains(candidate.plain.as_str()) || s.compact.contains(candidate.compact.as_str())
        }) {
            return Some(found(MatchRule::Partial, sheet, candidate));
        }
    }

    None
}
