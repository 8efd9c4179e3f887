//! エラー型定義
//!
//! 構造エラー（シート欠落・ヘッダー未検出）はここで表現し、実行全体を中断させる。
//! 書式設定の失敗は [`CosmeticIssue`] として別扱いにし、データの正しさには影響させない。

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error(
        "No se encontró la hoja de {role}. Candidatos: [{}]. Hojas disponibles: [{}]",
        .candidates.join(", "),
        .available.join(", ")
    )]
    SheetNotFound {
        role: String,
        candidates: Vec<String>,
        available: Vec<String>,
    },

    #[error("No se pudo leer la hoja '{sheet}': {message}")]
    SheetRead { sheet: String, message: String },

    #[error(
        "Cabeceras no encontradas en '{sheet}'. Faltan: [{}]. Fila encontrada: [{}]",
        .missing.join(", "),
        .found.join(", ")
    )]
    HeaderNotFound {
        sheet: String,
        found: Vec<String>,
        missing: Vec<String>,
    },

    #[error("Excel error: {0}")]
    Excel(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

/// 見た目だけの書式設定で起きた問題（致命的ではない）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CosmeticIssue {
    pub sheet: String,
    pub column: String,
    pub message: String,
}

impl std::fmt::Display for CosmeticIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}: {}", self.sheet, self.column, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_display_sheet_not_found() {
        let error = Error::SheetNotFound {
            role: "reporte".to_string(),
            candidates: vec!["Reporte CORTE 2".to_string(), "REPORTE".to_string()],
            available: vec!["Hoja1".to_string(), "BASE".to_string()],
        };
        let display = format!("{}", error);
        assert!(display.contains("Reporte CORTE 2, REPORTE"));
        assert!(display.contains("Hoja1, BASE"));
    }

    #[test]
    fn test_error_display_header_not_found() {
        let error = Error::HeaderNotFound {
            sheet: "BASE".to_string(),
            found: vec!["ASESOR".to_string(), "FECHA".to_string()],
            missing: vec!["COD_PEDIDO".to_string()],
        };
        let display = format!("{}", error);
        assert!(display.contains("Faltan: [COD_PEDIDO]"));
        assert!(display.contains("ASESOR, FECHA"));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_cosmetic_issue_display() {
        let issue = CosmeticIssue {
            sheet: "BASE".to_string(),
            column: "TOTAL A PAGAR".to_string(),
            message: "列幅設定エラー".to_string(),
        };
        assert_eq!(issue.to_string(), "BASE / TOTAL A PAGAR: 列幅設定エラー");
    }
}
