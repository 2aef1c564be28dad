use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{DealError, Result};
use crate::models::DealInputs;
use crate::optimizer::AncillaryFeeCheck;

/// Underwriting assumptions applied when a deal does not state its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_vacancy_rate")]
    pub vacancy_rate: f64,
    #[serde(default = "default_interest_rate")]
    pub interest_rate: f64,
    #[serde(default = "default_amortization")]
    pub amortization: f64,
    #[serde(default = "default_market_cap_rate")]
    pub market_cap_rate: f64,
    #[serde(default = "default_down_payment_pct")]
    pub down_payment_pct: f64,
    #[serde(default = "default_noi_margin")]
    pub noi_margin: f64,
    #[serde(default)]
    pub ancillary_fee_check: AncillaryFeeCheck,
}

fn default_vacancy_rate() -> f64 {
    5.0
}

fn default_interest_rate() -> f64 {
    6.5
}

fn default_amortization() -> f64 {
    25.0
}

fn default_market_cap_rate() -> f64 {
    6.0
}

fn default_down_payment_pct() -> f64 {
    25.0
}

fn default_noi_margin() -> f64 {
    0.55
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vacancy_rate: default_vacancy_rate(),
            interest_rate: default_interest_rate(),
            amortization: default_amortization(),
            market_cap_rate: default_market_cap_rate(),
            down_payment_pct: default_down_payment_pct(),
            noi_margin: default_noi_margin(),
            ancillary_fee_check: AncillaryFeeCheck::default(),
        }
    }
}

pub const KEYS: &[&str] = &[
    "vacancy_rate",
    "interest_rate",
    "amortization",
    "market_cap_rate",
    "down_payment_pct",
    "noi_margin",
    "ancillary_fee_check",
];

impl Settings {
    /// Blank deal seeded with these assumptions.
    pub fn base_inputs(&self) -> DealInputs {
        DealInputs {
            vacancy_rate: self.vacancy_rate,
            interest_rate: self.interest_rate,
            amortization: self.amortization,
            market_cap_rate: self.market_cap_rate,
            ..Default::default()
        }
    }

    pub fn get(&self, key: &str) -> Result<String> {
        Ok(match key {
            "vacancy_rate" => self.vacancy_rate.to_string(),
            "interest_rate" => self.interest_rate.to_string(),
            "amortization" => self.amortization.to_string(),
            "market_cap_rate" => self.market_cap_rate.to_string(),
            "down_payment_pct" => self.down_payment_pct.to_string(),
            "noi_margin" => self.noi_margin.to_string(),
            "ancillary_fee_check" => self.ancillary_fee_check.key().to_string(),
            _ => return Err(DealError::UnknownSetting(key.to_string())),
        })
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || DealError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
        };
        if key == "ancillary_fee_check" {
            self.ancillary_fee_check = AncillaryFeeCheck::from_key(value).ok_or_else(invalid)?;
            return Ok(());
        }
        let slot = match key {
            "vacancy_rate" => &mut self.vacancy_rate,
            "interest_rate" => &mut self.interest_rate,
            "amortization" => &mut self.amortization,
            "market_cap_rate" => &mut self.market_cap_rate,
            "down_payment_pct" => &mut self.down_payment_pct,
            "noi_margin" => &mut self.noi_margin,
            _ => return Err(DealError::UnknownSetting(key.to_string())),
        };
        let parsed: f64 = value.trim().parse().map_err(|_| invalid())?;
        if !parsed.is_finite() || parsed < 0.0 {
            return Err(invalid());
        }
        *slot = parsed;
        Ok(())
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("dealsheet")
}

/// `DEALSHEET_CONFIG` overrides the settings file location.
pub fn settings_path() -> PathBuf {
    std::env::var_os("DEALSHEET_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| config_dir().join("settings.json"))
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(&path).unwrap_or_default();
    serde_json::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), "ignoring unreadable settings: {e}");
        Settings::default()
    })
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let path = settings_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| DealError::Settings(e.to_string()))?;
    std::fs::write(&path, format!("{json}\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.vacancy_rate, 5.0);
        assert_eq!(s.interest_rate, 6.5);
        assert_eq!(s.amortization, 25.0);
        assert_eq!(s.market_cap_rate, 6.0);
        assert_eq!(s.down_payment_pct, 25.0);
        assert_eq!(s.noi_margin, 0.55);
        assert_eq!(s.ancillary_fee_check, AncillaryFeeCheck::Combined);
    }

    #[test]
    fn test_partial_json_merges_with_defaults() {
        let json = r#"{"interest_rate": 7.25, "ancillary_fee_check": "per_candidate"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.interest_rate, 7.25);
        assert_eq!(s.amortization, 25.0);
        assert_eq!(s.ancillary_fee_check, AncillaryFeeCheck::PerCandidate);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        std::env::set_var("DEALSHEET_CONFIG", &path);
        assert_eq!(settings_path(), path);
        assert_eq!(load_settings(), Settings::default());

        let mut settings = Settings::default();
        settings.market_cap_rate = 5.5;
        settings.ancillary_fee_check = AncillaryFeeCheck::PerCandidate;
        save_settings(&settings).unwrap();
        assert!(path.exists());
        assert_eq!(load_settings(), settings);

        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings(), Settings::default());
        std::env::remove_var("DEALSHEET_CONFIG");
    }

    #[test]
    fn test_set_and_get() {
        let mut s = Settings::default();
        s.set("vacancy_rate", "7").unwrap();
        assert_eq!(s.get("vacancy_rate").unwrap(), "7");
        s.set("ancillary_fee_check", "per_candidate").unwrap();
        assert_eq!(s.get("ancillary_fee_check").unwrap(), "per_candidate");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut s = Settings::default();
        assert!(matches!(s.set("nope", "1"), Err(DealError::UnknownSetting(_))));
        assert!(matches!(s.set("interest_rate", "abc"), Err(DealError::InvalidSetting { .. })));
        assert!(matches!(s.set("interest_rate", "-1"), Err(DealError::InvalidSetting { .. })));
        assert!(matches!(s.set("ancillary_fee_check", "sometimes"), Err(DealError::InvalidSetting { .. })));
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_every_key_is_gettable() {
        let s = Settings::default();
        for key in KEYS {
            assert!(s.get(key).is_ok(), "{key}");
        }
    }

    #[test]
    fn test_base_inputs_carry_assumptions() {
        let mut s = Settings::default();
        s.interest_rate = 7.0;
        let inputs = s.base_inputs();
        assert_eq!(inputs.interest_rate, 7.0);
        assert_eq!(inputs.purchase_price, 0.0);
    }
}
