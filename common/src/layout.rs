//! レポートレイアウト定義
//!
//! 入力ブックの形式（シート名候補・ヘッダー構造・列名）と、
//! 出力ブックの書式をまとめたもの。CORTE 1 / CORTE 2 をプリセットとして持つ。

use crate::error::Result;
use crate::header::HeaderSection;
use crate::segment::SegmentColumns;
use crate::table::ParsedTable;
use serde::{Deserialize, Serialize};

/// 入力シートの定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSpec {
    /// ログ表示用の役割名（"reporte" / "BASE"）
    pub role: String,
    /// 受け入れるシート名（優先順）
    pub candidates: Vec<String>,
    /// ヘッダー行検出に使う列名
    pub expected_columns: Vec<String>,
    /// ヘッダー行に必須の列名
    #[serde(default)]
    pub required_columns: Vec<String>,
    /// 検出に失敗したら1行目をヘッダーとして続行する
    #[serde(default)]
    pub fallback_first_row: bool,
}

/// ヘッダー構造
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeaderKind {
    Single,
    TwoLevel {
        /// 上段に必須のグループ名
        outer_labels: Vec<String>,
        sections: Vec<HeaderSection>,
    },
}

/// 列の数値書式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFormat {
    pub columns: Vec<String>,
    pub num_format: String,
    pub width: f64,
}

/// ヘッダーの色分け（グループ名 → 背景色）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionColor {
    pub label: String,
    pub background: u32,
}

/// 出力ブックの定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputLayout {
    /// エージェンシー別ファイル名の接頭辞
    pub file_prefix: String,
    /// ZIPファイル名の接頭辞
    pub archive_prefix: String,
    pub report_sheet_name: String,
    pub detail_sheet_name: String,
    /// 出力前に除く内部用の列
    ///
    /// プリセットでは空。JSONのユーザーレイアウトで指定する。
    #[serde(default)]
    pub drop_columns: Vec<String>,
    #[serde(default)]
    pub column_formats: Vec<ColumnFormat>,
    /// 既定のヘッダー背景色（`None` なら太字のみ）
    #[serde(default)]
    pub header_background: Option<u32>,
    #[serde(default)]
    pub section_colors: Vec<SectionColor>,
}

/// レポートレイアウト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLayout {
    pub name: String,
    /// ログ見出し
    pub title: String,
    pub report: SheetSpec,
    pub report_header: HeaderKind,
    pub detail: SheetSpec,
    pub columns: SegmentColumns,
    pub output: OutputLayout,
}

const REPORT_COLUMNS: &[&str] = &["RUC", "AGENCIA", "META", "GRUPO", "ALTAS"];

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn detail_spec(required: &[&str], fallback_first_row: bool) -> SheetSpec {
    SheetSpec {
        role: "BASE".into(),
        candidates: strings(&["BASE", "Base de datos", "DETALLE"]),
        expected_columns: strings(&["ASESOR", "COD_PEDIDO"]),
        required_columns: strings(required),
        fallback_first_row,
    }
}

impl ReportLayout {
    /// 組み込みプリセットを取得
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "corte1" | "1" | "simple" => Some(Self::corte1()),
            "corte2" | "2" => Some(Self::corte2()),
            _ => None,
        }
    }

    /// JSONファイルからユーザーレイアウトを読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let layout: Self = serde_json::from_str(json)?;
        Ok(layout)
    }

    pub fn preset_names() -> &'static [&'static str] {
        &["corte1", "corte2"]
    }

    /// CORTE 1: 1段ヘッダーの簡易形式
    pub fn corte1() -> Self {
        Self {
            name: "corte1".into(),
            title: "PROCESO LIMA CORTE 1".into(),
            report: SheetSpec {
                role: "reporte".into(),
                candidates: strings(&["Reporte CORTE 1", "Reporte Agencia", "CORTE 1", "Reporte"]),
                expected_columns: strings(REPORT_COLUMNS),
                required_columns: strings(&["AGENCIA"]),
                fallback_first_row: true,
            },
            report_header: HeaderKind::Single,
            detail: detail_spec(&[], true),
            columns: SegmentColumns::default(),
            output: OutputLayout {
                file_prefix: "Reporte ".into(),
                archive_prefix: "Reportes_Lima_Segmentados".into(),
                report_sheet_name: "Reporte Agencia".into(),
                detail_sheet_name: "BASE".into(),
                drop_columns: Vec::new(),
                column_formats: vec![
                    ColumnFormat {
                        columns: strings(&["CUMPLIMIENTO ALTAS %"]),
                        num_format: "0.00%".into(),
                        width: 18.0,
                    },
                    ColumnFormat {
                        columns: strings(&["TOTAL A PAGAR"]),
                        num_format: "#,##0.00".into(),
                        width: 18.0,
                    },
                ],
                header_background: None,
                section_colors: Vec::new(),
            },
        }
    }

    /// CORTE 2: PENALIDAD 1 / CLAWBACK 1 を上段に持つ2段ヘッダー形式
    pub fn corte2() -> Self {
        Self {
            name: "corte2".into(),
            title: "PROCESO LIMA CORTE 2".into(),
            report: SheetSpec {
                role: "reporte".into(),
                candidates: strings(&["Reporte CORTE 2", "CORTE 2"]),
                expected_columns: strings(REPORT_COLUMNS),
                required_columns: strings(REPORT_COLUMNS),
                fallback_first_row: false,
            },
            report_header: HeaderKind::TwoLevel {
                outer_labels: strings(&["PENALIDAD 1", "CLAWBACK 1"]),
                sections: vec![
                    HeaderSection::new("PENALIDAD 1", &["CHURN 4.5%", "UMBRAL", "ALTAS PENALIZADAS", "PENALIDAD 1"]),
                    HeaderSection::new(
                        "CLAWBACK 1",
                        &["UMBRAL 1", "CUMPLIMIENTO CORTE 2 %", "MULTIPLICADOR CORTE 2", "CLAWBACK 1"],
                    ),
                ],
            },
            detail: detail_spec(&["ASESOR", "COD_PEDIDO"], false),
            columns: SegmentColumns::default(),
            output: OutputLayout {
                file_prefix: "Reporte Corte 2 ".into(),
                archive_prefix: "Reportes_Lima_Corte_2_Segmentados".into(),
                report_sheet_name: "Reporte CORTE 2".into(),
                detail_sheet_name: "BASE".into(),
                drop_columns: Vec::new(),
                column_formats: vec![
                    ColumnFormat {
                        columns: strings(&["CUMPLIMIENTO ALTAS %", "CLAWBACK 1 - CUMPLIMIENTO CORTE 2 %"]),
                        num_format: "0.00%".into(),
                        width: 20.0,
                    },
                    ColumnFormat {
                        columns: strings(&["TOTAL A PAGAR CORTE 2", "PENALIDAD 1", "CLAWBACK 1"]),
                        num_format: "#,##0.00".into(),
                        width: 18.0,
                    },
                ],
                header_background: Some(0xFFC000),
                section_colors: vec![
                    SectionColor { label: "PENALIDAD 1".into(), background: 0x0070C0 },
                    SectionColor { label: "CLAWBACK 1".into(), background: 0x002060 },
                ],
            },
        }
    }
}

impl OutputLayout {
    /// `drop_columns` を除いた出力用の表
    pub fn prepare_table(&self, table: &ParsedTable) -> ParsedTable {
        if self.drop_columns.is_empty() {
            return table.clone();
        }
        let drop: Vec<&str> = self.drop_columns.iter().map(|c| c.as_str()).collect();
        table.without_columns(&drop)
    }

    /// 列名に対応するグループ色
    pub fn section_color(&self, column: &str) -> Option<u32> {
        self.section_colors
            .iter()
            .find(|s| column == s.label || column.starts_with(&format!("{} -", s.label)))
            .map(|s| s.background)
    }

    /// 列名に対応する数値書式
    pub fn column_format(&self, column: &str) -> Option<&ColumnFormat> {
        self.column_formats
            .iter()
            .find(|f| f.columns.iter().any(|c| c == column))
    }
}
