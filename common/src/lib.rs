//! Agency Split Common Library
//!
//! ブックの読み込み結果からエージェンシー別の表を作るまでの共通処理。
//! I/Oに依存しない部分（正規化・シート特定・ヘッダー検出・分割）をここに置く。

pub mod types;
pub mod text;
pub mod locator;
pub mod header;
pub mod table;
pub mod alias;
pub mod run_log;
pub mod layout;
pub mod segment;
pub mod pipeline;
pub mod error;
pub mod export;

pub use types::{CellValue, Sheet, SheetSource, Workbook};
pub use text::{normalize_agency, normalize_header, normalize_sheet_name, standardize_column};
pub use locator::{locate_sheet, MatchRule, SheetMatch};
pub use header::{detect_header_row, flatten_header, validate_headers, DetectionOptions, HeaderMatch, HeaderSection};
pub use table::ParsedTable;
pub use alias::AliasConfig;
pub use run_log::RunLog;
pub use layout::{HeaderKind, OutputLayout, ReportLayout, SheetSpec};
pub use segment::{segment, AgencySegment, Reconciliation, SegmentColumns, SegmentSummary};
pub use pipeline::{load_tables, LoadedTables};
pub use error::{CosmeticIssue, Error, Result};
pub use export::archive_entry_names;
#[cfg(feature = "excel")]
pub use export::excel_core::{generate_agency_workbook, AgencyWorkbook};
