//! Response models.
//!
//! Every model is an immutable serde value type. [`FromJson::from_json`] is
//! the single entry point used by the client: it deserializes, records the
//! path of any offending field, and then runs the model's own invariants.

use std::any::type_name;
use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ValidationError;

mod banzuke;
mod basho;
mod history;
mod kimarite;
mod matches;
mod rank;
mod rikishi;

pub use banzuke::{Banzuke, BanzukeEntry, BoutRecord, BoutResult, Side};
pub use basho::{Basho, Prize, Torikumi};
pub use history::{
    HistoryRecord, Measurement, MeasurementsResponse, Rank, RanksResponse, Shikona,
    ShikonasResponse,
};
pub use kimarite::{Kimarite, KimariteMatches, KimariteStats};
pub use matches::{Match, OpponentMatches, RikishiMatches, Winner};
pub use rank::{RankName, RankTitle, UnknownRank};
pub use rikishi::{Rikishi, RikishiList, RikishiStats, Sansho};

pub trait FromJson: DeserializeOwned {
    /// Invariants that the schema alone cannot express.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn from_json(value: Value) -> Result<Self, ValidationError> {
        let model = model_name::<Self>();

        let mut unknown = Vec::new();
        let mut record = |path: serde_ignored::Path<'_>| unknown.push(path.to_string());
        let deserializer = serde_ignored::Deserializer::new(value, &mut record);
        let parsed: Self = serde_path_to_error::deserialize(deserializer)
            .map_err(|e| ValidationError::from_path_error(model.clone(), e))?;

        for field in unknown {
            tracing::debug!(%model, %field, "ignoring unknown field");
        }

        parsed.validate()?;
        Ok(parsed)
    }
}

impl<T: FromJson> FromJson for Vec<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        self.iter().try_for_each(|item| item.validate())
    }
}

/// Type name without module paths, e.g. `Rikishi` or `Vec<Rank>`.
pub(crate) fn model_name<T: ?Sized>() -> Cow<'static, str> {
    let full = type_name::<T>();
    let short = |path: &'static str| path.rsplit("::").next().unwrap_or(path);
    if !full.contains('<') {
        return Cow::Borrowed(short(full));
    }

    let is_delimiter = |c: char| matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';');
    let mut name = String::with_capacity(full.len());
    for piece in full.split_inclusive(is_delimiter) {
        let (path, delimiter) = match piece.char_indices().last() {
            Some((i, c)) if is_delimiter(c) => piece.split_at(i),
            _ => (piece, ""),
        };
        name.push_str(short(path));
        name.push_str(delimiter);
    }
    Cow::Owned(name)
}

/// `limit > 0` when present and at most `limit` records.
pub(crate) fn check_page(
    model: &'static str,
    limit: Option<u32>,
    len: usize,
) -> Result<(), ValidationError> {
    match limit {
        Some(0) => Err(ValidationError::new(model, "limit", "must be positive")),
        Some(limit) if len > limit as usize => Err(ValidationError::new(
            model,
            "records",
            format!("{len} records exceed limit {limit}"),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod test {
    use std::fmt::Debug;

    use serde::Serialize;
    use serde_json::json;

    use super::*;

    fn round_trip<M: FromJson + Serialize + PartialEq + Debug>(raw: Value) {
        let decoded = M::from_json(raw).unwrap();
        let again = M::from_json(serde_json::to_value(&decoded).unwrap()).unwrap();
        assert_eq!(decoded, again);
    }

    fn bout(basho: &str, day: u8) -> Value {
        json!({
            "id": format!("{basho}-{day}-1-1-2"),
            "bashoId": basho,
            "division": "Makuuchi",
            "day": day,
            "matchNo": 1,
            "eastId": 1,
            "eastShikona": "Hoshoryu",
            "eastRank": "Yokozuna 1 East",
            "westId": 2,
            "westShikona": "Onosato",
            "westRank": "Ozeki 1 West",
            "kimarite": "uwatenage",
            "winnerId": 2,
            "winnerEn": "Onosato",
            "winnerJp": "大の里"
        })
    }

    #[test]
    fn models_survive_reserialization() {
        round_trip::<Rikishi>(json!({
            "id": 8850,
            "sumodbId": 12451,
            "nskId": 4227,
            "shikonaEn": "Onosato",
            "shikonaJp": "大の里",
            "currentRank": "Ozeki 1 West",
            "heya": "Nishonoseki",
            "birthDate": "2000-06-07T00:00:00Z",
            "shusshin": "Ishikawa",
            "height": 192,
            "weight": 183.5,
            "debut": "202305",
            "updatedAt": "2025-01-20T10:00:00Z",
            "rankHistory": [{ "bashoId": "202501", "rikishiId": 8850, "rankValue": 201, "rank": "Ozeki 1 West" }]
        }));

        round_trip::<RikishiList>(json!({
            "limit": 2,
            "skip": 0,
            "total": 2,
            "records": [
                { "id": 1, "shikonaEn": "A", "heya": "" },
                { "id": 2, "shikonaEn": "B", "intai": "2024-03-25T00:00:00Z" }
            ]
        }));

        round_trip::<RikishiStats>(json!({
            "basho": 10,
            "totalMatches": 150,
            "totalWins": 100,
            "totalLosses": 50,
            "totalAbsences": 0,
            "yusho": 2,
            "sansho": { "Gino-sho": 1, "Kanto-sho": 2 },
            "bashoByDivision": { "Makuuchi": 8, "Juryo": 2 },
            "winsByDivision": { "Makuuchi": 80 }
        }));

        round_trip::<Basho>(json!({
            "date": "202501",
            "location": "Tokyo, Ryogoku Kokugikan",
            "startDate": "2025-01-12T00:00:00Z",
            "endDate": "2025-01-26T00:00:00Z",
            "yusho": [{ "type": "Makuuchi", "rikishiId": "19", "shikonaEn": "Hoshoryu" }],
            "specialPrizes": null
        }));

        round_trip::<Torikumi>(json!({
            "bashoId": "202501",
            "division": "Makuuchi",
            "day": 15,
            "torikumi": [bout("202501", 15)]
        }));

        round_trip::<Banzuke>(json!({
            "bashoId": "202501",
            "division": "Makuuchi",
            "east": [{
                "side": "East",
                "rikishiID": 1,
                "shikonaEn": "Hoshoryu",
                "rankValue": 101,
                "rank": "Yokozuna 1 East",
                "record": [
                    { "result": "loss", "opponentID": 2, "opponentShikonaEn": "Onosato", "kimarite": "uwatenage" },
                    { "result": "", "opponentID": 0, "opponentShikonaEn": "", "kimarite": "" }
                ],
                "wins": 0,
                "losses": 1,
                "absences": 0
            }],
            "west": [{ "side": "West", "rikishiID": 2, "shikonaEn": "Onosato", "rankValue": 201, "rank": "Ozeki 1 West" }]
        }));

        round_trip::<KimariteStats>(json!({
            "limit": 2,
            "sortField": "count",
            "sortOrder": "desc",
            "records": [
                { "kimarite": "yorikiri", "count": 28143, "lastUsage": "202501-15" },
                { "kimarite": "hatakikomi", "count": 9018, "lastUsage": "" }
            ]
        }));

        round_trip::<KimariteMatches>(json!({
            "limit": 1,
            "skip": 0,
            "total": 1,
            "records": [bout("202501", 3)]
        }));

        round_trip::<Vec<Measurement>>(json!([
            { "id": "202501-8850", "bashoId": "202501", "rikishiId": 8850, "height": 192, "weight": 183.5 }
        ]));
    }

    #[test]
    fn model_names_drop_module_paths() {
        assert_eq!(model_name::<Rikishi>(), "Rikishi");
        assert_eq!(model_name::<Vec<Measurement>>(), "Vec<Measurement>");
        assert_eq!(
            model_name::<std::collections::BTreeMap<String, Vec<Rank>>>(),
            "BTreeMap<String, Vec<Rank>>"
        );
    }

    #[test]
    fn page_checks() {
        assert!(check_page("X", None, 5).is_ok());
        assert!(check_page("X", Some(5), 5).is_ok());
        let err = check_page("X", Some(2), 3).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("records"));
        let err = check_page("X", Some(0), 0).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("limit"));
    }
}
