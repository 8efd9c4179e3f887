//! 分割処理の全体
//!
//! 1つのブック（バイト列）から、エージェンシー別ブックを詰めたZIPと処理ログを作る。
//! 構造エラーでもパニックやエラー返却はせず、ログに理由を残して `archive: None` を返す。
//! エージェンシーが0件なら空のZIPを返す。

use crate::error::Result;
use crate::export::{build_archive, ArchiveEntry};
use crate::reader::XlsxSource;
use agency_split_common::run_log::RULE;
use agency_split_common::{
    archive_entry_names, generate_agency_workbook, load_tables, segment, AgencySegment, AliasConfig,
    DetectionOptions, ReportLayout, RunLog, SegmentSummary, SheetSource,
};

/// 分割の設定
#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub layout: ReportLayout,
    pub detection: DetectionOptions,
    pub aliases: AliasConfig,
}

impl SplitOptions {
    pub fn new(layout: ReportLayout) -> Self {
        Self {
            layout,
            detection: DetectionOptions::default(),
            aliases: AliasConfig::default(),
        }
    }
}

/// 分割結果
#[derive(Debug, Clone, Default)]
pub struct SplitOutcome {
    /// ZIPのバイト列（構造エラー時は `None`）
    pub archive: Option<Vec<u8>>,
    /// ZIP内のファイル名
    pub entries: Vec<String>,
    pub log: RunLog,
    pub summary: SegmentSummary,
}

impl SplitOutcome {
    pub fn is_success(&self) -> bool {
        self.archive.is_some()
    }
}

/// xlsxのバイト列を分割する
pub fn split_workbook(bytes: Vec<u8>, options: &SplitOptions) -> SplitOutcome {
    let mut log = RunLog::new();
    log.push("--- INICIO DEL PROCESO ---");

    match XlsxSource::from_bytes(bytes) {
        Ok(mut source) => run(&mut source, options, log),
        Err(e) => {
            log.error(format!("No se pudo leer el archivo: {}", e));
            finish(SplitOutcome { log, ..Default::default() })
        }
    }
}

/// 任意のシート供給元を分割する
pub fn split_source<S: SheetSource>(source: &mut S, options: &SplitOptions) -> SplitOutcome {
    let mut log = RunLog::new();
    log.push("--- INICIO DEL PROCESO ---");
    run(source, options, log)
}

fn run<S: SheetSource>(source: &mut S, options: &SplitOptions, mut log: RunLog) -> SplitOutcome {
    let layout = &options.layout;
    log.banner(&layout.title);

    let tables = match load_tables(source, layout, &options.detection, &mut log) {
        Ok(tables) => tables,
        Err(e) => {
            log.error(format!("Proceso detenido: {}", e));
            return finish(SplitOutcome { log, ..Default::default() });
        }
    };

    let segments = segment(&tables.report, &tables.detail, &layout.columns, &options.aliases, &mut log);
    if segments.is_empty() {
        log.warn("No se encontraron agencias para procesar; la ZIP queda vacía");
    }

    let entries = archive_entry_names(&segments, &layout.output.file_prefix, &mut log);
    let summary = SegmentSummary::from_segments(&segments);

    match package(&segments, &entries, layout, &mut log) {
        Ok(archive) => {
            log.push("");
            log.banner("📋 RESUMEN DEL PROCESO");
            log.push(format!("✓ Agencias procesadas exitosamente: {}", summary.ok));
            if summary.mismatched > 0 {
                log.push(format!("⚠ Agencias con descuadre: {}", summary.mismatched));
            }
            if summary.unverified > 0 {
                log.push(format!("ℹ Agencias sin validar: {}", summary.unverified));
            }
            log.push(format!("📁 Total de archivos generados: {}", summary.files));
            log.push(RULE);
            finish(SplitOutcome {
                archive: Some(archive),
                entries,
                log,
                summary,
            })
        }
        Err(e) => {
            log.error(format!("Proceso detenido: {}", e));
            finish(SplitOutcome { log, summary, ..Default::default() })
        }
    }
}

/// エージェンシー別ブックを生成してZIPにまとめる
fn package(
    segments: &[AgencySegment],
    entries: &[String],
    layout: &ReportLayout,
    log: &mut RunLog,
) -> Result<Vec<u8>> {
    let mut files = Vec::with_capacity(segments.len());
    for (segment, name) in segments.iter().zip(entries) {
        let workbook = generate_agency_workbook(segment, &layout.output)?;
        for issue in &workbook.cosmetic_issues {
            log.info(format!("Formato omitido en '{}': {}", name, issue));
        }
        files.push(ArchiveEntry {
            name: name.clone(),
            bytes: workbook.bytes,
        });
    }
    build_archive(&files)
}

fn finish(mut outcome: SplitOutcome) -> SplitOutcome {
    outcome.log.push("--- FIN DEL PROCESO ---");
    outcome
}
