//! 処理ログ
//!
//! 検出・検証・照合の各ステップを人が読める行として順番に記録する。
//! 利用者にとって唯一の監査証跡なので、呼び出し側へそのまま返す。

use serde::Serialize;

pub const RULE: &str = "================================================================================";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunLog {
    lines: Vec<String>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// 成功 (`✓`)
    pub fn ok(&mut self, message: impl AsRef<str>) {
        self.push(format!("✓ {}", message.as_ref()));
    }

    /// 警告 (`⚠`)
    pub fn warn(&mut self, message: impl AsRef<str>) {
        self.push(format!("⚠ {}", message.as_ref()));
    }

    /// エラー (`✗`)
    pub fn error(&mut self, message: impl AsRef<str>) {
        self.push(format!("✗ {}", message.as_ref()));
    }

    /// 情報 (`ℹ`)
    pub fn info(&mut self, message: impl AsRef<str>) {
        self.push(format!("ℹ {}", message.as_ref()));
    }

    /// 区切り付きの見出し
    pub fn banner(&mut self, title: impl AsRef<str>) {
        self.push(RULE);
        self.push(title.as_ref());
        self.push(RULE);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contains(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l == line)
    }

    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}
