//! Excel生成（共通ライブラリ）
//!
//! エージェンシー1件分の報告行とBASE行を、レイアウト定義に従って2シートのブックにする。
//! 列幅の設定失敗は [`CosmeticIssue`] として返し、データの書き込み失敗だけをエラーにする。

use crate::error::{CosmeticIssue, Error, Result};
use crate::layout::OutputLayout;
use crate::segment::AgencySegment;
use crate::table::ParsedTable;
use crate::types::CellValue;
use rust_xlsxwriter::*;

/// Excelの列幅の上限（文字数）
const MAX_COLUMN_WIDTH: f64 = 255.0;

/// 生成したブック
#[derive(Debug, Clone)]
pub struct AgencyWorkbook {
    pub bytes: Vec<u8>,
    pub cosmetic_issues: Vec<CosmeticIssue>,
}

/// 出力を再現可能にするための固定作成日時
fn fixed_creation_date() -> Result<ExcelDateTime> {
    ExcelDateTime::from_ymd(2000, 1, 1).map_err(|e| Error::Excel(format!("日時設定エラー: {}", e)))
}

fn header_format(background: Option<u32>, white_text: bool) -> Format {
    let mut format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin);
    if let Some(color) = background {
        format = format.set_background_color(Color::RGB(color));
    }
    if white_text {
        format = format.set_font_color(Color::White);
    }
    format
}

fn row_num(index: usize) -> Result<RowNum> {
    RowNum::try_from(index).map_err(|_| Error::Excel(format!("行番号が範囲外です: {}", index)))
}

fn col_num(index: usize) -> Result<ColNum> {
    ColNum::try_from(index).map_err(|_| Error::Excel(format!("列番号が範囲外です: {}", index)))
}

/// 表を1シートに書き込む
///
/// `styled` が真なら列ごとの数値書式とグループ色を適用する（報告シートのみ）。
fn write_table(
    worksheet: &mut Worksheet,
    sheet_name: &str,
    table: &ParsedTable,
    output: &OutputLayout,
    styled: bool,
    issues: &mut Vec<CosmeticIssue>,
) -> Result<()> {
    worksheet
        .set_name(sheet_name)
        .map_err(|e| Error::Excel(format!("シート名設定エラー: {}", e)))?;

    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    let mut column_formats: Vec<Option<Format>> = Vec::with_capacity(table.columns().len());

    // ヘッダー行
    for (idx, name) in table.columns().iter().enumerate() {
        let col = col_num(idx)?;
        let format = match (styled, output.section_color(name)) {
            (true, Some(color)) => header_format(Some(color), true),
            (true, None) => header_format(output.header_background, false),
            (false, _) => header_format(None, false),
        };
        worksheet
            .write_string_with_format(0, col, name, &format)
            .map_err(|e| Error::Excel(format!("ヘッダー書き込みエラー: {}", e)))?;

        let numeric = if styled { output.column_format(name) } else { None };
        if let Some(spec) = numeric {
            let applied = if (0.0..=MAX_COLUMN_WIDTH).contains(&spec.width) {
                worksheet.set_column_width(col, spec.width).map(|_| ()).map_err(|e| e.to_string())
            } else {
                Err(format!("0〜{}の範囲外です ({})", MAX_COLUMN_WIDTH, spec.width))
            };
            if let Err(message) = applied {
                issues.push(CosmeticIssue {
                    sheet: sheet_name.to_string(),
                    column: name.clone(),
                    message: format!("列幅設定エラー: {}", message),
                });
            }
        }
        column_formats.push(numeric.map(|spec| Format::new().set_num_format(&spec.num_format)));
    }

    // データ行
    for (r, values) in table.rows().iter().enumerate() {
        let row = row_num(r + 1)?;
        for (c, value) in values.iter().enumerate() {
            let col = col_num(c)?;
            let written = match value {
                CellValue::Empty => continue,
                CellValue::Text(s) => worksheet.write_string(row, col, s),
                CellValue::Number(n) if !n.is_finite() => continue,
                CellValue::Number(n) => match column_formats.get(c).and_then(|f| f.as_ref()) {
                    Some(format) => worksheet.write_number_with_format(row, col, *n, format),
                    None => worksheet.write_number(row, col, *n),
                },
                CellValue::Bool(b) => worksheet.write_boolean(row, col, *b),
                CellValue::Date(n) => worksheet.write_number_with_format(row, col, *n, &date_format),
            };
            written.map_err(|e| Error::Excel(format!("セル書き込みエラー: {}", e)))?;
        }
    }

    Ok(())
}

/// エージェンシー別ブックをバッファに生成
///
/// # Arguments
/// * `segment` - 分割結果
/// * `output` - 出力レイアウト（シート名・書式）
pub fn generate_agency_workbook(segment: &AgencySegment, output: &OutputLayout) -> Result<AgencyWorkbook> {
    let report = output.prepare_table(&segment.report);
    let detail = output.prepare_table(&segment.detail);

    let mut workbook = Workbook::new();
    let properties = DocProperties::new().set_creation_datetime(&fixed_creation_date()?);
    workbook.set_properties(&properties);

    let mut issues = Vec::new();
    write_table(workbook.add_worksheet(), &output.report_sheet_name, &report, output, true, &mut issues)?;
    write_table(workbook.add_worksheet(), &output.detail_sheet_name, &detail, output, false, &mut issues)?;

    let bytes = workbook
        .save_to_buffer()
        .map_err(|e| Error::Excel(format!("Excel保存エラー: {}", e)))?;

    Ok(AgencyWorkbook {
        bytes,
        cosmetic_issues: issues,
    })
}
