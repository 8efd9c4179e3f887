//! エージェンシー別分割モジュール
//!
//! 報告シートと明細（BASE）シートをエージェンシーごとに分け、
//! 報告側のALTAS（申告件数）とBASE側の実件数を照合する。
//!
//! ## 処理フロー
//! 1. 報告シートのエージェンシー列を正規化し、出現順に重複除去
//! 2. エイリアスを展開してBASEをASESOR列で絞り込み
//! 3. ALTASと件数を照合（不一致は警告のみで処理は続行）

use crate::alias::AliasConfig;
use crate::run_log::RunLog;
use crate::table::ParsedTable;
use crate::text::normalize_agency;
use serde::{Deserialize, Serialize};

/// 分割に使う列名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentColumns {
    /// 報告シートのエージェンシー列
    pub agency: String,
    /// 報告シートの申告件数列
    pub declared_count: String,
    /// BASEの担当者列
    pub owner: String,
}

impl Default for SegmentColumns {
    fn default() -> Self {
        Self {
            agency: "AGENCIA".into(),
            declared_count: "ALTAS".into(),
            owner: "ASESOR".into(),
        }
    }
}

/// 照合結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Reconciliation {
    /// 申告件数 = BASE件数
    Ok { declared: i64, actual: usize },
    /// 申告件数 ≠ BASE件数
    Mismatch { declared: i64, actual: usize },
    /// 申告件数列またはASESOR列がなく照合できない
    Unverified { actual: usize },
}

impl Reconciliation {
    fn compare(declared: i64, actual: usize) -> Self {
        if usize::try_from(declared).map(|d| d == actual).unwrap_or(false) {
            Reconciliation::Ok { declared, actual }
        } else {
            Reconciliation::Mismatch { declared, actual }
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Reconciliation::Ok { .. })
    }
}

/// エージェンシー1件分の分割結果
#[derive(Debug, Clone, PartialEq)]
pub struct AgencySegment {
    /// 正規化済みキー
    pub key: String,
    /// 報告シート上の元の表記（ファイル名に使う）
    pub display_name: String,
    pub report: ParsedTable,
    pub detail: ParsedTable,
    pub reconciliation: Reconciliation,
}

/// 照合の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SegmentSummary {
    pub ok: usize,
    pub mismatched: usize,
    pub unverified: usize,
    pub files: usize,
}

impl SegmentSummary {
    pub fn from_segments(segments: &[AgencySegment]) -> Self {
        let mut summary = Self {
            files: segments.len(),
            ..Default::default()
        };
        for segment in segments {
            match segment.reconciliation {
                Reconciliation::Ok { .. } => summary.ok += 1,
                Reconciliation::Mismatch { .. } => summary.mismatched += 1,
                Reconciliation::Unverified { .. } => summary.unverified += 1,
            }
        }
        summary
    }
}

fn status_line(name: &str, reconciliation: &Reconciliation) -> String {
    match reconciliation {
        Reconciliation::Ok { declared, actual } => {
            format!("✓ {:<45} │ ALTAS: {:>5} │ BASE: {:>5} │ ✓ OK", name, declared, actual)
        }
        Reconciliation::Mismatch { declared, actual } => {
            format!("⚠ {:<45} │ ALTAS: {:>5} │ BASE: {:>5} │ ⚠ DESCUADRE", name, declared, actual)
        }
        Reconciliation::Unverified { actual } => {
            format!("ℹ {:<45} │ BASE: {:>5} │ No se pudo validar conteo de ALTAS", name, actual)
        }
    }
}

/// 報告シートとBASEをエージェンシーごとに分割する
///
/// # Arguments
/// * `report` - 報告シート（エージェンシーごとの集計行）
/// * `detail` - BASEシート（明細行）
/// * `columns` - 使用する列名
/// * `aliases` - エージェンシーの別名定義
/// * `log` - 処理ログ
///
/// # Returns
/// 出現順のエージェンシー別結果。エージェンシー列がなければ空
pub fn segment(
    report: &ParsedTable,
    detail: &ParsedTable,
    columns: &SegmentColumns,
    aliases: &AliasConfig,
    log: &mut RunLog,
) -> Vec<AgencySegment> {
    let Some(agency_col) = report.find_column(&columns.agency) else {
        log.error(format!(
            "No se encontró la columna '{}' en la hoja de reporte. Columnas: {}",
            columns.agency,
            report.columns().join(", ")
        ));
        return Vec::new();
    };
    let declared_col = report.find_column(&columns.declared_count);
    if declared_col.is_none() {
        log.warn(format!(
            "No se encontró la columna '{}'; no se validarán los conteos",
            columns.declared_count
        ));
    }
    let owner_col = detail.find_column(&columns.owner);
    if owner_col.is_none() {
        log.warn(format!(
            "La hoja BASE no tiene columna '{}'. No se filtrará por agencia en BASE.",
            columns.owner
        ));
    }

    // 行ごとの正規化キー
    let report_keys: Vec<String> = report
        .rows()
        .iter()
        .map(|row| normalize_agency(&row[agency_col].to_text()))
        .collect();
    let owner_keys: Option<Vec<String>> = owner_col.map(|col| {
        detail
            .rows()
            .iter()
            .map(|row| normalize_agency(&row[col].to_text()))
            .collect()
    });

    // 出現順に重複除去
    let mut agencies: Vec<&str> = Vec::new();
    for key in &report_keys {
        if !key.is_empty() && !agencies.contains(&key.as_str()) {
            agencies.push(key);
        }
    }

    log.push("");
    log.banner(format!("📊 PROCESANDO {} AGENCIAS", agencies.len()));

    let mut segments = Vec::with_capacity(agencies.len());
    for key in agencies {
        let report_rows: Vec<usize> = report_keys
            .iter()
            .enumerate()
            .filter(|(_, k)| k.as_str() == key)
            .map(|(i, _)| i)
            .collect();
        let Some(&first_row) = report_rows.first() else {
            continue;
        };
        let display_name = report.rows()[first_row][agency_col].to_text().trim_end().to_string();

        let (detail_rows, owner_filtered) = match &owner_keys {
            Some(owner_keys) => {
                let names = aliases.resolve(key);
                let rows: Vec<usize> = owner_keys
                    .iter()
                    .enumerate()
                    .filter(|(_, owner)| names.contains(owner))
                    .map(|(i, _)| i)
                    .collect();
                (rows, true)
            }
            None => ((0..detail.len()).collect(), false),
        };
        let actual = detail_rows.len();

        let reconciliation = match declared_col {
            Some(col) if owner_filtered => {
                let declared = report.rows()[first_row][col].to_integer().unwrap_or(0);
                Reconciliation::compare(declared, actual)
            }
            _ => Reconciliation::Unverified { actual },
        };
        log.push(status_line(&display_name, &reconciliation));

        segments.push(AgencySegment {
            key: key.to_string(),
            display_name,
            report: report.select_rows(&report_rows),
            detail: detail.select_rows(&detail_rows),
            reconciliation,
        });
    }

    segments
}
