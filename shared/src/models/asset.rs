//! Asset registry models (tricycles, coolers, batteries)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who the asset is lent to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetScope {
    Client,
    Company,
}

impl AssetScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetScope::Client => "CLIENT",
            AssetScope::Company => "COMPANY",
        }
    }
}

impl std::str::FromStr for AssetScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CLIENT" => Ok(AssetScope::Client),
            "COMPANY" => Ok(AssetScope::Company),
            other => Err(format!("Unknown asset scope: {}", other)),
        }
    }
}

/// Checkout state of an asset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Disponible,
    EnUso,
    Mantenimiento,
    Baja,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Disponible => "disponible",
            AssetStatus::EnUso => "en_uso",
            AssetStatus::Mantenimiento => "mantenimiento",
            AssetStatus::Baja => "baja",
        }
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition an asset comes back in at settlement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum AssetCondition {
    #[default]
    #[serde(rename = "bueno")]
    Bueno,
    #[serde(rename = "dañado", alias = "danado")]
    Danado,
    #[serde(rename = "mantenimiento")]
    Mantenimiento,
}

impl AssetCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCondition::Bueno => "bueno",
            AssetCondition::Danado => "dañado",
            AssetCondition::Mantenimiento => "mantenimiento",
        }
    }

    /// Registry status the asset takes once the load is closed
    pub fn resulting_status(&self) -> AssetStatus {
        match self {
            AssetCondition::Bueno => AssetStatus::Disponible,
            AssetCondition::Mantenimiento => AssetStatus::Mantenimiento,
            AssetCondition::Danado => AssetStatus::Baja,
        }
    }
}

/// A physical asset that can be checked out with a daily load
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub scope: AssetScope,
    pub status: AssetStatus,
}

impl Asset {
    pub fn is_available(&self) -> bool {
        self.status == AssetStatus::Disponible
    }
}

/// Assets that may be checked out, optionally restricted to one scope
pub fn filter_available_assets(assets: Vec<Asset>, scope: Option<AssetScope>) -> Vec<Asset> {
    assets
        .into_iter()
        .filter(|a| a.is_available() && scope.map_or(true, |s| a.scope == s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(code: &str, scope: AssetScope, status: AssetStatus) -> Asset {
        Asset {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: format!("Triciclo {}", code),
            asset_type: "triciclo".to_string(),
            scope,
            status,
        }
    }

    #[test]
    fn test_condition_wire_names() {
        let damaged: AssetCondition = serde_json::from_str("\"dañado\"").unwrap();
        assert_eq!(damaged, AssetCondition::Danado);
        let ascii: AssetCondition = serde_json::from_str("\"danado\"").unwrap();
        assert_eq!(ascii, AssetCondition::Danado);
        assert_eq!(serde_json::to_string(&AssetCondition::Danado).unwrap(), "\"dañado\"");
        assert_eq!(AssetCondition::default(), AssetCondition::Bueno);
    }

    #[test]
    fn test_resulting_status() {
        assert_eq!(AssetCondition::Bueno.resulting_status(), AssetStatus::Disponible);
        assert_eq!(
            AssetCondition::Mantenimiento.resulting_status(),
            AssetStatus::Mantenimiento
        );
        assert_eq!(AssetCondition::Danado.resulting_status(), AssetStatus::Baja);
    }

    #[test]
    fn test_scope_parsing() {
        assert_eq!("client".parse::<AssetScope>().unwrap(), AssetScope::Client);
        assert_eq!("COMPANY".parse::<AssetScope>().unwrap(), AssetScope::Company);
        assert!("warehouse".parse::<AssetScope>().is_err());
        assert_eq!(serde_json::to_string(&AssetScope::Client).unwrap(), "\"CLIENT\"");
    }

    #[test]
    fn test_filter_available_assets() {
        let assets = vec![
            asset("T-01", AssetScope::Client, AssetStatus::Disponible),
            asset("T-02", AssetScope::Client, AssetStatus::EnUso),
            asset("C-01", AssetScope::Company, AssetStatus::Disponible),
            asset("C-02", AssetScope::Company, AssetStatus::Baja),
        ];

        let all = filter_available_assets(assets.clone(), None);
        assert_eq!(all.len(), 2);

        let client = filter_available_assets(assets, Some(AssetScope::Client));
        assert_eq!(client.len(), 1);
        assert_eq!(client[0].code, "T-01");
    }
}
