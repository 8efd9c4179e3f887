//! エクスポートモジュール

#[cfg(feature = "excel")]
pub mod excel_core;

use crate::run_log::RunLog;
use crate::segment::AgencySegment;
use crate::text::clean_file_name;

const FALLBACK_NAME: &str = "SIN NOMBRE";

/// ZIP内のファイル名をエージェンシーごとに決める
///
/// 表示名から英数字・空白・アンダースコアのみを残す。整形後に同名になった場合は
/// 上書きせず ` (2)`, ` (3)` … を付け、ログに警告を残す。
pub fn archive_entry_names(segments: &[AgencySegment], prefix: &str, log: &mut RunLog) -> Vec<String> {
    let mut used: Vec<String> = Vec::with_capacity(segments.len());
    let mut names = Vec::with_capacity(segments.len());

    for segment in segments {
        let mut cleaned = clean_file_name(&segment.display_name);
        if cleaned.trim().is_empty() {
            cleaned = FALLBACK_NAME.to_string();
        }
        let base = format!("{}{}", prefix, cleaned);

        let mut name = format!("{}.xlsx", base);
        let mut counter = 2;
        while used.contains(&name.to_uppercase()) {
            name = format!("{} ({}).xlsx", base, counter);
            counter += 1;
        }
        if counter > 2 {
            log.warn(format!(
                "Nombre de archivo repetido para '{}'; se guardó como '{}'",
                segment.display_name, name
            ));
        }

        used.push(name.to_uppercase());
        names.push(name);
    }

    names
}
