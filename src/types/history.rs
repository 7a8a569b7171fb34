use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, DisplayFromStr, NoneAsEmptyString, PickFirst};

use crate::error::ValidationError;
use crate::params::BashoId;
use crate::types::FromJson;

/// A per-basho record returned by the measurements, ranks and shikonas
/// endpoints.
pub trait HistoryRecord {
    fn basho_id(&self) -> &BashoId;
    fn rikishi_id(&self) -> u32;
}

#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: Option<String>,
    pub basho_id: BashoId,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub rikishi_id: u32,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

impl FromJson for Measurement {
    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [("height", self.height), ("weight", self.weight)] {
            if let Some(value) = value.filter(|v| *v <= 0.0) {
                return Err(ValidationError::new(
                    "Measurement",
                    field,
                    format!("{value} must be positive"),
                ));
            }
        }
        Ok(())
    }
}

#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rank {
    pub id: Option<String>,
    pub basho_id: BashoId,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub rikishi_id: u32,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub rank_value: Option<u32>,
    pub rank: String,
}

impl FromJson for Rank {}

#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shikona {
    pub id: Option<String>,
    pub basho_id: BashoId,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub rikishi_id: u32,
    pub shikona_en: String,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub shikona_jp: Option<String>,
}

impl FromJson for Shikona {}

macro_rules! history_record {
    ($($model:ty),*) => {
        $(
            impl HistoryRecord for $model {
                fn basho_id(&self) -> &BashoId {
                    &self.basho_id
                }

                fn rikishi_id(&self) -> u32 {
                    self.rikishi_id
                }
            }
        )*
    };
}

history_record!(Measurement, Rank, Shikona);

pub type MeasurementsResponse = Vec<Measurement>;
pub type RanksResponse = Vec<Rank>;
pub type ShikonasResponse = Vec<Shikona>;

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn measurements_decode_as_a_list() {
        let raw = json!([
            { "id": "202401-1511", "bashoId": "202401", "rikishiId": 1511, "height": 192.0, "weight": 175.0 },
            { "bashoId": "202311", "rikishiId": "1511", "height": 192.0 }
        ]);
        let measurements = MeasurementsResponse::from_json(raw).unwrap();
        assert_eq!(measurements.len(), 2);
        assert_eq!(measurements[1].weight, None);
        assert_eq!(measurements[1].rikishi_id(), 1511);
    }

    #[test]
    fn measurements_must_be_positive() {
        let raw = json!([{ "bashoId": "202401", "rikishiId": 1, "height": 0 }]);
        let err = MeasurementsResponse::from_json(raw).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("height"));
    }

    #[test]
    fn bad_basho_id_is_reported_with_index() {
        let raw = json!([
            { "bashoId": "202401", "rikishiId": 1, "rank": "Yokozuna 1 East" },
            { "bashoId": "2024", "rikishiId": 1, "rank": "Ozeki 1 East" }
        ]);
        let err = RanksResponse::from_json(raw).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("[1].bashoId"));
    }

    #[test]
    fn shikona_without_japanese_name() {
        let raw = json!([{ "bashoId": "201507", "rikishiId": 45, "shikonaEn": "Terunofuji", "shikonaJp": "" }]);
        let shikonas = ShikonasResponse::from_json(raw).unwrap();
        assert_eq!(shikonas[0].shikona_jp, None);
        assert_eq!(shikonas[0].basho_id().as_str(), "201507");
    }
}
