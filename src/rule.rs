use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use derivative::Derivative;
use serde::{Deserialize, Serialize};

/// Ruleset knobs that change yaku or scoring.
///
/// Missing fields in a rule file take their default values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default)]
pub struct Rule {
    /// Tanyao is valid on an open hand.
    #[derivative(Default(value = "true"))]
    pub kuitan: bool,
    /// 13 han or more without a yakuman scores as yakuman instead of sanbaiman.
    #[derivative(Default(value = "true"))]
    pub kazoe_yakuman: bool,
    /// 4 han 30 fu and 3 han 60 fu round up to mangan.
    pub kiriage_mangan: bool,

    pub is_kokushi_musou_13machi_double: bool,
    pub is_suuankou_tanki_double: bool,
    pub is_junsei_chuurenpoutou_double: bool,
    pub is_daisuushii_double: bool,
}

impl Rule {
    #[must_use]
    pub fn tenhou() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mjsoul() -> Self {
        Self {
            is_kokushi_musou_13machi_double: true,
            is_suuankou_tanki_double: true,
            is_junsei_chuurenpoutou_double: true,
            is_daisuushii_double: true,
            ..Self::default()
        }
    }

    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("failed to parse rule")
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read rule file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn presets_and_json() {
        let rule = Rule::default();
        assert!(rule.kuitan);
        assert!(rule.kazoe_yakuman);
        assert!(!rule.kiriage_mangan);
        assert_eq!(rule, Rule::tenhou());
        assert!(Rule::mjsoul().is_daisuushii_double);

        let rule = Rule::from_json(r#"{"kuitan": false, "kiriage_mangan": true}"#).unwrap();
        assert!(!rule.kuitan);
        assert!(rule.kiriage_mangan);
        assert!(rule.kazoe_yakuman);

        assert!(Rule::from_json("{").is_err());
        assert!(Rule::from_json(r#"{"kuitan": 1}"#).is_err());
        assert!(Rule::from_path("/nonexistent/rule.json").is_err());
    }

    #[test]
    fn from_file() {
        let path = std::env::temp_dir().join(format!("tenpai-rule-{}.json", std::process::id()));
        fs::write(&path, serde_json::to_string(&Rule::mjsoul()).unwrap()).unwrap();
        let rule = Rule::from_path(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(rule, Rule::mjsoul());
    }
}
