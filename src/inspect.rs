//! ブック診断（分割せずに、どのシート・どの行が使われるかだけを確認する）

use agency_split_common::header::normalized_row;
use agency_split_common::layout::SheetSpec;
use agency_split_common::pipeline::{find_sheet, locate_header};
use agency_split_common::{DetectionOptions, ReportLayout, RunLog, SheetMatch, SheetSource};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SheetReport {
    pub role: String,
    pub sheet: Option<SheetMatch>,
    /// ヘッダー行（1始まり、Excel表示と同じ）
    pub header_row: Option<usize>,
    pub header_values: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub sheets: Vec<String>,
    pub located: Vec<SheetReport>,
    pub log: RunLog,
}

fn inspect_sheet<S: SheetSource>(
    source: &mut S,
    spec: &SheetSpec,
    detection: &DetectionOptions,
    log: &mut RunLog,
) -> SheetReport {
    let mut report = SheetReport {
        role: spec.role.clone(),
        sheet: None,
        header_row: None,
        header_values: Vec::new(),
    };

    let Ok(found) = find_sheet(&*source, spec, log) else {
        return report;
    };
    let loaded = source.load_sheet(&found.name);
    report.sheet = Some(found);

    let sheet = match loaded {
        Ok(sheet) => sheet,
        Err(e) => {
            log.error(e.to_string());
            return report;
        }
    };
    if let Ok(location) = locate_header(&sheet, spec, detection, log) {
        report.header_row = Some(location.row + 1);
        report.header_values = normalized_row(sheet.row(location.row));
    }
    report
}

/// 報告シートとBASEシートの特定結果を調べる
pub fn inspect<S: SheetSource>(source: &mut S, layout: &ReportLayout, detection: &DetectionOptions) -> InspectReport {
    let mut log = RunLog::new();
    let sheets = source.sheet_names();
    let located = vec![
        inspect_sheet(source, &layout.report, detection, &mut log),
        inspect_sheet(source, &layout.detail, detection, &mut log),
    ];
    InspectReport { sheets, located, log }
}
