use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, DisplayFromStr, NoneAsEmptyString, PickFirst};

use crate::error::ValidationError;
use crate::params::Division;
use crate::types::{check_page, FromJson, Measurement, Rank, Shikona};

/// A rikishi profile from `rikishi/{id}` or the `rikishis` listing.
#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rikishi {
    #[serde(alias = "rikishiId")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub id: u32,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub sumodb_id: Option<u32>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub nsk_id: Option<u32>,
    pub shikona_en: String,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub shikona_jp: Option<String>,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub current_rank: Option<String>,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub heya: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub shusshin: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    /// Basho id of the first tournament, `YYYYMM`.
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub debut: Option<String>,
    /// Retirement date; absent for active rikishi.
    pub intai: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub measurement_history: Option<Vec<Measurement>>,
    pub rank_history: Option<Vec<Rank>>,
    pub shikona_history: Option<Vec<Shikona>>,
}

impl Rikishi {
    pub fn is_retired(&self) -> bool {
        self.intai.is_some()
    }
}

impl FromJson for Rikishi {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.id == 0 {
            return Err(ValidationError::new("Rikishi", "id", "must be positive"));
        }
        for (field, value) in [("height", self.height), ("weight", self.weight)] {
            if let Some(value) = value.filter(|v| *v <= 0.0) {
                return Err(ValidationError::new(
                    "Rikishi",
                    field,
                    format!("{value} must be positive"),
                ));
            }
        }
        if let Some(history) = &self.measurement_history {
            history.validate()?;
        }
        Ok(())
    }
}

/// Paged `rikishis` listing.
#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RikishiList {
    pub limit: Option<u32>,
    pub skip: Option<u32>,
    pub total: u32,
    #[serde(default)]
    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub records: Vec<Rikishi>,
}

impl FromJson for RikishiList {
    fn validate(&self) -> Result<(), ValidationError> {
        check_page("RikishiList", self.limit, self.records.len())?;
        self.records.iter().try_for_each(|r| r.validate())
    }
}

/// Special prize counts over a career.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sansho {
    #[serde(rename = "Gino-sho", default)]
    pub gino_sho: u32,
    #[serde(rename = "Kanto-sho", default)]
    pub kanto_sho: u32,
    #[serde(rename = "Shukun-sho", default)]
    pub shukun_sho: u32,
}

impl Sansho {
    pub fn total(&self) -> u32 {
        self.gino_sho
            .saturating_add(self.kanto_sho)
            .saturating_add(self.shukun_sho)
    }
}

/// Career totals from `rikishi/{id}/stats`. Divisions the rikishi never
/// competed in are absent from the per-division maps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RikishiStats {
    pub basho: u32,
    pub total_matches: u32,
    pub total_wins: u32,
    pub total_losses: u32,
    pub total_absences: u32,
    pub yusho: u32,
    #[serde(default)]
    pub sansho: Sansho,
    #[serde(default)]
    pub basho_by_division: BTreeMap<Division, u32>,
    #[serde(default)]
    pub total_by_division: BTreeMap<Division, u32>,
    #[serde(default)]
    pub wins_by_division: BTreeMap<Division, u32>,
    #[serde(default)]
    pub loss_by_division: BTreeMap<Division, u32>,
    #[serde(default)]
    pub absence_by_division: BTreeMap<Division, u32>,
    #[serde(default)]
    pub yusho_by_division: BTreeMap<Division, u32>,
}

impl FromJson for RikishiStats {}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn minimal_profile() {
        let rikishi = Rikishi::from_json(json!({ "id": 1511, "shikonaEn": "Terunofuji" })).unwrap();
        assert_eq!(rikishi.id, 1511);
        assert_eq!(rikishi.shikona_en, "Terunofuji");
        assert_eq!(rikishi.heya, None);
        assert_eq!(rikishi.measurement_history, None);
        assert!(!rikishi.is_retired());
    }

    #[test]
    fn rikishi_id_alias_and_coercion() {
        let rikishi =
            Rikishi::from_json(json!({ "rikishiId": "1511", "shikonaEn": "Terunofuji" })).unwrap();
        assert_eq!(rikishi.id, 1511);
    }

    #[test]
    fn full_profile() {
        let raw = json!({
            "id": 45,
            "sumodbId": 11927,
            "nskId": 3321,
            "shikonaEn": "Terunofuji",
            "shikonaJp": "照ノ富士",
            "currentRank": "Yokozuna 1 East",
            "heya": "Isegahama",
            "birthDate": "1991-11-29T00:00:00Z",
            "shusshin": "Mongolia, Ulaanbaatar",
            "height": 192,
            "weight": 176.5,
            "debut": "201105",
            "intai": "2025-01-17T00:00:00Z",
            "updatedAt": "2025-01-20T10:00:00Z",
            "measurementHistory": [
                { "id": "202501-45", "bashoId": "202501", "rikishiId": 45, "height": 192, "weight": 176.5 }
            ]
        });
        let rikishi = Rikishi::from_json(raw).unwrap();
        assert_eq!(rikishi.nsk_id, Some(3321));
        assert_eq!(rikishi.height, Some(192.0));
        assert!(rikishi.is_retired());
        assert_eq!(rikishi.measurement_history.unwrap()[0].basho_id.as_str(), "202501");
    }

    #[test]
    fn rejects_non_positive_values() {
        let err = Rikishi::from_json(json!({ "id": 0, "shikonaEn": "x" })).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("id"));

        let err = Rikishi::from_json(json!({ "id": 1, "shikonaEn": "x", "weight": -1 })).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("weight"));
    }

    #[test]
    fn missing_shikona_is_named() {
        let err = Rikishi::from_json(json!({ "id": 1 })).unwrap_err();
        assert_eq!(err.model, "Rikishi");
        assert_eq!(err.field.as_deref(), Some("shikonaEn"));
    }

    #[test]
    fn stats_with_partial_divisions() {
        let raw = json!({
            "absenceByDivision": { "Juryo": 0, "Makuuchi": 46 },
            "basho": 57,
            "bashoByDivision": { "Juryo": 4, "Makuuchi": 46, "Makushita": 7 },
            "lossByDivision": { "Makuuchi": 200 },
            "sansho": { "Gino-sho": 3, "Kanto-sho": 3, "Shukun-sho": 3 },
            "totalAbsences": 46,
            "totalByDivision": { "Makuuchi": 690 },
            "totalLosses": 244,
            "totalMatches": 736,
            "totalWins": 446,
            "winsByDivision": { "Makuuchi": 444 },
            "yusho": 12,
            "yushoByDivision": { "Makuuchi": 10, "Juryo": 1, "Makushita": 1 }
        });
        let stats = RikishiStats::from_json(raw).unwrap();
        assert_eq!(stats.basho_by_division[&Division::Makushita], 7);
        assert!(!stats.wins_by_division.contains_key(&Division::Jonokuchi));
        assert_eq!(stats.sansho.total(), 9);
    }

    #[test]
    fn sansho_total_saturates() {
        let sansho = Sansho {
            gino_sho: u32::MAX,
            kanto_sho: 1,
            shukun_sho: 1,
        };
        assert_eq!(sansho.total(), u32::MAX);
    }

    #[test]
    fn list_respects_limit() {
        let raw = json!({
            "limit": 1,
            "skip": 0,
            "total": 2,
            "records": [
                { "id": 1, "shikonaEn": "A" },
                { "id": 2, "shikonaEn": "B" }
            ]
        });
        let err = RikishiList::from_json(raw).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("records"));
    }
}
