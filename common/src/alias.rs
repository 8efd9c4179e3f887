//! エイリアス変換モジュール
//!
//! 1つのエージェンシーがBASE側で旧名称など複数の表記で登録されている場合に、
//! それらをまとめて同じエージェンシーとして扱う。

use crate::error::Result;
use crate::text::normalize_agency;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// エイリアス定義
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasConfig {
    /// 正式名 → BASE側で使われる名称のリスト
    #[serde(default)]
    pub agencies: BTreeMap<String, Vec<String>>,
}

impl AliasConfig {
    /// 組み込みプリセットを取得
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "lima" => Some(Self::lima_preset()),
            "none" | "ninguno" => Some(Self::default()),
            _ => None,
        }
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Lima用プリセット
    fn lima_preset() -> Self {
        let mut config = Self::default();
        config.insert("EXPORTEL S.A.C.", &["EXPORTEL S.A.C.", "EXPORTEL PROVINCIA"]);
        config
    }

    pub fn insert(&mut self, agency: &str, aliases: &[&str]) {
        self.agencies
            .insert(agency.to_string(), aliases.iter().map(|a| a.to_string()).collect());
    }

    /// エージェンシーの照合名セットを解決する
    ///
    /// 正規化済みキーで検索し、エイリアスがあればそれらと自身を、なければ自身のみを返す。
    /// 戻り値はすべて [`normalize_agency`] 済みで重複なし。
    pub fn resolve(&self, agency: &str) -> Vec<String> {
        let key = normalize_agency(agency);
        let mut names = vec![key.clone()];

        let configured = self
            .agencies
            .iter()
            .filter(|(canonical, _)| normalize_agency(canonical) == key)
            .flat_map(|(_, aliases)| aliases.iter());
        for alias in configured {
            let alias = normalize_agency(alias);
            if !alias.is_empty() && !names.contains(&alias) {
                names.push(alias);
            }
        }
        names
    }

    /// 設定をマージ（後から追加した設定が優先）
    pub fn merge(&mut self, other: &AliasConfig) {
        self.agencies.extend(other.agencies.clone());
    }

    pub fn is_empty(&self) -> bool {
        self.agencies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lima_preset() {
        let config = AliasConfig::from_preset("Lima").unwrap();
        assert_eq!(
            config.resolve("exportel s.a.c."),
            vec!["EXPORTEL S.A.C.".to_string(), "EXPORTEL PROVINCIA".to_string()]
        );
    }

    #[test]
    fn test_unknown_preset() {
        assert!(AliasConfig::from_preset("arequipa").is_none());
    }

    #[test]
    fn test_resolve_without_alias_is_singleton() {
        let config = AliasConfig::from_preset("lima").unwrap();
        assert_eq!(config.resolve(" Agencia Norte "), vec!["AGENCIA NORTE".to_string()]);
    }

    #[test]
    fn test_resolve_always_includes_self() {
        let mut config = AliasConfig::default();
        config.insert("NORTE", &["NORTE ANTIGUO"]);
        assert_eq!(config.resolve("Norte"), vec!["NORTE".to_string(), "NORTE ANTIGUO".to_string()]);
    }

    #[test]
    fn test_from_json_and_merge() {
        let mut config = AliasConfig::from_preset("lima").unwrap();
        let custom = AliasConfig::from_json(r#"{"agencies": {"SUR": ["SUR 2", "sur provincia"]}}"#).unwrap();
        config.merge(&custom);
        assert_eq!(config.agencies.len(), 2);
        assert_eq!(config.resolve("sur").len(), 3);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(AliasConfig::from_json("{ invalid").is_err());
    }
}
