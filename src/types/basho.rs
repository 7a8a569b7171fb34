use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, DisplayFromStr, NoneAsEmptyString, PickFirst};

use crate::error::ValidationError;
use crate::params::{BashoId, Division, FIRST_DAY, LAST_DAY};
use crate::types::{FromJson, Match};

/// A yusho or special prize winner. `kind` is the division name for yusho
/// and the prize name (`Shukun-sho`, ...) for special prizes.
#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prize {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub rikishi_id: u32,
    pub shikona_en: String,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub shikona_jp: Option<String>,
}

/// Tournament summary from `basho/{id}`.
#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basho {
    #[serde(rename = "date")]
    pub id: BashoId,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub location: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub yusho: Vec<Prize>,
    #[serde(default)]
    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub special_prizes: Vec<Prize>,
}

impl Basho {
    pub fn yusho_winner(&self, division: Division) -> Option<&Prize> {
        self.yusho.iter().find(|p| p.kind == division.as_str())
    }
}

impl FromJson for Basho {
    fn validate(&self) -> Result<(), ValidationError> {
        check_dates("Basho", self.start_date, self.end_date)
    }
}

/// The bout card for one division on one day.
#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Torikumi {
    pub basho_id: BashoId,
    pub division: Division,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub day: u8,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub location: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub yusho: Vec<Prize>,
    #[serde(default)]
    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub special_prizes: Vec<Prize>,
    #[serde(rename = "torikumi", default)]
    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub matches: Vec<Match>,
}

impl FromJson for Torikumi {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(FIRST_DAY..=LAST_DAY).contains(&self.day) {
            return Err(ValidationError::new(
                "Torikumi",
                "day",
                format!("{} is outside {FIRST_DAY}..={LAST_DAY}", self.day),
            ));
        }
        check_dates("Torikumi", self.start_date, self.end_date)?;
        self.matches.iter().try_for_each(|m| m.validate())
    }
}

fn check_dates(
    model: &'static str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(ValidationError::new(
            model,
            "endDate",
            format!("{end} is before start date {start}"),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn prizes() -> serde_json::Value {
        json!([
            { "type": "Makuuchi", "rikishiId": 19, "shikonaEn": "Kirishima", "shikonaJp": "霧島　鐵力" },
            { "type": "Juryo", "rikishiId": "26", "shikonaEn": "Gonoyama" }
        ])
    }

    #[test]
    fn basho_with_prizes() {
        let raw = json!({
            "date": "202305",
            "location": "Tokyo, Ryogoku Kokugikan",
            "startDate": "2023-05-14T00:00:00Z",
            "endDate": "2023-05-28T00:00:00Z",
            "yusho": prizes(),
            "specialPrizes": [
                { "type": "Shukun-sho", "rikishiId": 12, "shikonaEn": "Meisei", "shikonaJp": "明生　力" }
            ]
        });
        let basho = Basho::from_json(raw).unwrap();
        assert_eq!(basho.id.as_str(), "202305");
        assert_eq!(basho.yusho_winner(Division::Juryo).unwrap().rikishi_id, 26);
        assert_eq!(basho.special_prizes[0].kind, "Shukun-sho");
    }

    #[test]
    fn basho_without_details() {
        let basho = Basho::from_json(json!({ "date": "202411", "yusho": null })).unwrap();
        assert!(basho.yusho.is_empty());
        assert_eq!(basho.start_date, None);
    }

    #[test]
    fn basho_dates_are_ordered() {
        let raw = json!({
            "date": "202305",
            "startDate": "2023-05-28T00:00:00Z",
            "endDate": "2023-05-14T00:00:00Z"
        });
        let err = Basho::from_json(raw).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("endDate"));
    }

    #[test]
    fn basho_id_must_be_well_formed() {
        let err = Basho::from_json(json!({ "date": "202313" })).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("date"));
    }

    #[test]
    fn torikumi_with_matches() {
        let raw = json!({
            "bashoId": "202305",
            "division": "Makuuchi",
            "day": 1,
            "location": "Tokyo, Ryogoku Kokugikan",
            "torikumi": [{
                "id": "202305-1-1-23-30",
                "bashoId": "202305",
                "division": "Makuuchi",
                "day": 1,
                "matchNo": 1,
                "eastId": 23,
                "eastShikona": "Hokuseiho",
                "eastRank": "Maegashira 17 East",
                "westId": 30,
                "westShikona": "Tsurugisho",
                "westRank": "Maegashira 16 West",
                "kimarite": "yorikiri",
                "winnerId": 23,
                "winnerEn": "Hokuseiho",
                "winnerJp": "北青鵬　治"
            }]
        });
        let torikumi = Torikumi::from_json(raw).unwrap();
        assert_eq!(torikumi.matches.len(), 1);
        assert_eq!(torikumi.matches[0].winner(), crate::types::Winner::East(23));
    }

    #[test]
    fn torikumi_day_is_bounded() {
        let raw = json!({ "bashoId": "202305", "division": "Juryo", "day": 0, "torikumi": [] });
        let err = Torikumi::from_json(raw).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("day"));
    }
}
