//! テキスト正規化モジュール
//!
//! シート名・列名・エージェンシー名の表記ゆれ（大文字小文字、空白、
//! ノーブレークスペース、全角記号、アクセント記号）を比較前に吸収する。
//!
//! 正規化結果が同じ文字列は、以降のすべての照合で同一として扱う。

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// 見た目が似た記号をASCIIに寄せる
fn fold_lookalikes(c: char) -> char {
    match c {
        '\u{00A0}' => ' ',
        '\u{FF05}' => '%',
        '\u{2013}' | '\u{2014}' => '-',
        '\u{FF0C}' => ',',
        '\r' | '\n' | '\t' => ' ',
        other => other,
    }
}

/// 連続する空白を1つにまとめ、前後を除去
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 記号を除去（`keep_percent` が真なら `%` は残す）
fn strip_punctuation(text: &str, keep_percent: bool) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_' || (keep_percent && *c == '%'))
        .collect()
}

/// 列名比較用の正規化
///
/// ```
/// use agency_split_common::text::normalize_header;
/// assert_eq!(normalize_header("  Cumplimiento\u{00A0}Altas ％ "), "CUMPLIMIENTO ALTAS %");
/// ```
pub fn normalize_header(text: &str) -> String {
    let folded: String = text.chars().map(fold_lookalikes).collect();
    let upper = folded.to_uppercase();
    collapse_whitespace(&strip_punctuation(&upper, true))
}

/// シート名比較用の正規化（アクセント除去あり、`%` も除去）
pub fn normalize_sheet_name(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(fold_lookalikes)
        .collect::<String>()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    let upper = folded.to_uppercase();
    collapse_whitespace(&strip_punctuation(&upper, false))
}

/// 保存用の列名（大文字化・空白整理のみ、記号は保持）
pub fn standardize_column(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| match c {
            '\u{00A0}' | '\r' | '\n' | '\t' => ' ',
            other => other,
        })
        .collect();
    collapse_whitespace(&folded).to_uppercase()
}

/// エージェンシー名・ASESOR名の比較キー
pub fn normalize_agency(text: &str) -> String {
    standardize_column(text)
}

/// 空白をすべて取り除いた比較キー
pub fn without_spaces(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// 出力ファイル名用に英数字・空白・アンダースコアのみ残す
pub fn clean_file_name(display: &str) -> String {
    display
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_')
        .collect::<String>()
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_spacing_and_case_variants_match() {
        let variants = ["Total a Pagar", "TOTAL\u{00A0}A PAGAR", "total a pagar   ", "  TOTAL  A\tPAGAR"];
        for v in variants {
            assert_eq!(normalize_header(v), "TOTAL A PAGAR", "variant: {:?}", v);
        }
    }

    #[test]
    fn test_header_keeps_percent_and_underscore() {
        assert_eq!(normalize_header("Cumplimiento Corte 2 ％"), "CUMPLIMIENTO CORTE 2 %");
        assert_eq!(normalize_header("cod_pedido"), "COD_PEDIDO");
        assert_eq!(normalize_header("CHURN 4.5%"), "CHURN 45%");
    }

    #[test]
    fn test_header_folds_dashes_then_strips() {
        assert_eq!(normalize_header("PENALIDAD 1 – UMBRAL"), "PENALIDAD 1 UMBRAL");
        assert_eq!(normalize_header("EXPORTEL S.A.C."), "EXPORTEL SAC");
    }

    #[test]
    fn test_sheet_name_strips_diacritics() {
        assert_eq!(normalize_sheet_name("Basé"), "BASE");
        assert_eq!(normalize_sheet_name("Reporte   Córte 2"), "REPORTE CORTE 2");
        assert_eq!(normalize_sheet_name("Avance 100%"), "AVANCE 100");
    }

    #[test]
    fn test_header_does_not_strip_diacritics() {
        assert_eq!(normalize_header("Comisión"), "COMISIÓN");
    }

    #[test]
    fn test_standardize_column() {
        assert_eq!(standardize_column(" Cumplimiento\nCorte 2 % "), "CUMPLIMIENTO CORTE 2 %");
        assert_eq!(standardize_column("cod_pedido"), "COD_PEDIDO");
    }

    #[test]
    fn test_normalize_agency() {
        assert_eq!(normalize_agency("  Exportel  S.A.C. "), "EXPORTEL S.A.C.");
        assert_eq!(normalize_agency(""), "");
    }

    #[test]
    fn test_clean_file_name() {
        assert_eq!(clean_file_name("EXPORTEL S.A.C. "), "EXPORTEL SAC");
        assert_eq!(clean_file_name("Agencia/Norte_1"), "AgenciaNorte_1");
        assert_eq!(clean_file_name("Señal & Cía"), "Señal  Cía");
    }
}
