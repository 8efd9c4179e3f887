//! 読み込みパイプライン
//!
//! シート特定 → ヘッダー行検出 → 必須列チェック → 表の構築 を
//! 報告シートとBASEシートに対して行う。失敗はすべて構造エラーとして返す。

use crate::error::{Error, Result};
use crate::header::{
    detect_header_row, missing_columns, normalized_row, single_level_names, two_level_names,
    DetectionOptions, HeaderSection,
};
use crate::layout::{HeaderKind, ReportLayout, SheetSpec};
use crate::locator::{locate_sheet, SheetMatch};
use crate::run_log::RunLog;
use crate::table::ParsedTable;
use crate::types::{Sheet, SheetSource};

/// 読み込んだ2つの表
#[derive(Debug, Clone)]
pub struct LoadedTables {
    pub report: ParsedTable,
    pub detail: ParsedTable,
    pub report_sheet: SheetMatch,
    pub detail_sheet: SheetMatch,
}

/// ヘッダー位置の判定結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLocation {
    /// ヘッダー行（2段の場合は下段）
    pub row: usize,
    /// 検出できず1行目で代用した
    pub fallback: bool,
}

/// 候補名からシートを探し、見つからなければ構造エラー
pub fn find_sheet<S: SheetSource>(source: &S, spec: &SheetSpec, log: &mut RunLog) -> Result<SheetMatch> {
    let available = source.sheet_names();
    match locate_sheet(&available, &spec.candidates) {
        Some(found) => {
            log.ok(format!(
                "Hoja de {} encontrada: '{}' (coincidencia {})",
                spec.role, found.name, found.rule
            ));
            Ok(found)
        }
        None => {
            log.error(format!("No se encontró la hoja de {}", spec.role));
            log.push(format!("  Candidatos: {}", spec.candidates.join(", ")));
            log.push(format!("  Hojas disponibles: {}", available.join(", ")));
            Err(Error::SheetNotFound {
                role: spec.role.clone(),
                candidates: spec.candidates.clone(),
                available,
            })
        }
    }
}

fn header_not_found(sheet: &Sheet, row: usize, missing: Vec<String>, log: &mut RunLog) -> Error {
    let found = normalized_row(sheet.row(row));
    log.error(format!("Cabeceras no encontradas en '{}'", sheet.name));
    log.push(format!("  Fila {}: {}", row + 1, found.join(" | ")));
    log.push(format!("  Faltan: {}", missing.join(", ")));
    Error::HeaderNotFound {
        sheet: sheet.name.clone(),
        found,
        missing,
    }
}

/// ヘッダー行を特定し、必須列を確認する
pub fn locate_header(
    sheet: &Sheet,
    spec: &SheetSpec,
    detection: &DetectionOptions,
    log: &mut RunLog,
) -> Result<HeaderLocation> {
    // 期待列より多い閾値は満たしようがない
    let threshold = detection.min_match_threshold.min(spec.expected_columns.len());
    let location = match detect_header_row(sheet, &spec.expected_columns, detection.max_rows_scanned, threshold) {
        Some(found) => {
            log.ok(format!(
                "Cabecera de '{}' detectada en la fila {} ({} columnas esperadas)",
                sheet.name,
                found.row + 1,
                found.matched
            ));
            HeaderLocation { row: found.row, fallback: false }
        }
        None if spec.fallback_first_row => {
            log.warn(format!(
                "No se detectó la cabecera de '{}'; se usa la primera fila",
                sheet.name
            ));
            HeaderLocation { row: 0, fallback: true }
        }
        None => {
            let missing = missing_columns(sheet.row(0), &spec.expected_columns);
            return Err(header_not_found(sheet, 0, missing, log));
        }
    };

    let missing = missing_columns(sheet.row(location.row), &spec.required_columns);
    if !missing.is_empty() {
        return Err(header_not_found(sheet, location.row, missing, log));
    }
    Ok(location)
}

fn two_level_columns(
    sheet: &Sheet,
    inner_row: usize,
    outer_labels: &[String],
    sections: &[HeaderSection],
    log: &mut RunLog,
) -> Result<Vec<String>> {
    let Some(outer_row) = inner_row.checked_sub(1) else {
        let missing = outer_labels.to_vec();
        return Err(header_not_found(sheet, inner_row, missing, log));
    };
    let missing = missing_columns(sheet.row(outer_row), outer_labels);
    if !missing.is_empty() {
        return Err(header_not_found(sheet, outer_row, missing, log));
    }
    log.ok(format!(
        "Cabecera de dos niveles en filas {}-{}",
        outer_row + 1,
        inner_row + 1
    ));
    Ok(two_level_names(sheet, inner_row, sections))
}

/// レイアウトに従って報告シートとBASEシートを読み込む
///
/// # Arguments
/// * `source` - ブック
/// * `layout` - 入出力レイアウト
/// * `detection` - ヘッダー検出設定
/// * `log` - 処理ログ
pub fn load_tables<S: SheetSource>(
    source: &mut S,
    layout: &ReportLayout,
    detection: &DetectionOptions,
    log: &mut RunLog,
) -> Result<LoadedTables> {
    let report_sheet = find_sheet(&*source, &layout.report, log)?;
    let detail_sheet = find_sheet(&*source, &layout.detail, log)?;

    let sheet = source.load_sheet(&report_sheet.name)?;
    let location = locate_header(&sheet, &layout.report, detection, log)?;
    let columns = match &layout.report_header {
        HeaderKind::Single => single_level_names(&sheet, location.row),
        HeaderKind::TwoLevel { outer_labels, sections } => {
            two_level_columns(&sheet, location.row, outer_labels, sections, log)?
        }
    };
    let report = ParsedTable::from_sheet(&sheet, location.row, columns);
    log.ok(format!("Reporte leído: {} filas", report.len()));

    let sheet = source.load_sheet(&detail_sheet.name)?;
    let location = locate_header(&sheet, &layout.detail, detection, log)?;
    let detail = ParsedTable::from_sheet(&sheet, location.row, single_level_names(&sheet, location.row));
    log.ok(format!("BASE leída: {} filas", detail.len()));

    Ok(LoadedTables {
        report,
        detail,
        report_sheet,
        detail_sheet,
    })
}
