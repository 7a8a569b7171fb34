use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, NoneAsEmptyString};

use crate::error::ValidationError;
use crate::params::{KimariteSortField, SortOrder};
use crate::types::{check_page, FromJson, Match};

/// Usage count of one winning technique.
#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kimarite {
    pub kimarite: String,
    pub count: u32,
    /// `YYYYMM-day` of the most recent bout won with this technique.
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub last_usage: Option<String>,
}

/// `kimarite` listing. The wrapper echoes the query it was produced for.
#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KimariteStats {
    pub limit: Option<u32>,
    pub skip: Option<u32>,
    pub sort_field: Option<KimariteSortField>,
    pub sort_order: Option<SortOrder>,
    #[serde(default)]
    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub records: Vec<Kimarite>,
}

impl KimariteStats {
    pub fn get(&self, name: &str) -> Option<&Kimarite> {
        self.records.iter().find(|k| k.kimarite == name)
    }
}

impl FromJson for KimariteStats {
    fn validate(&self) -> Result<(), ValidationError> {
        check_page("KimariteStats", self.limit, self.records.len())
    }
}

/// Bouts won with one technique, from `kimarite/{name}`.
#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KimariteMatches {
    pub limit: Option<u32>,
    pub skip: Option<u32>,
    pub total: u32,
    #[serde(default)]
    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub records: Vec<Match>,
}

impl FromJson for KimariteMatches {
    fn validate(&self) -> Result<(), ValidationError> {
        check_page("KimariteMatches", self.limit, self.records.len())?;
        self.records.iter().try_for_each(|m| m.validate())
    }
}
