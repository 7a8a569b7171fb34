use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, DisplayFromStr, NoneAsEmptyString, PickFirst};

use crate::error::ValidationError;
use crate::params::{BashoId, Division};
use crate::types::{FromJson, RankTitle};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    East,
    West,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::East => "East",
            Side::West => "West",
        }
    }
}

/// The ranking sheet of one division for one basho.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banzuke {
    pub basho_id: BashoId,
    pub division: Division,
    #[serde(default)]
    pub east: Vec<BanzukeEntry>,
    #[serde(default)]
    pub west: Vec<BanzukeEntry>,
}

impl Banzuke {
    /// All entries in rank order, east before west at equal rank.
    pub fn entries(&self) -> impl Iterator<Item = &BanzukeEntry> {
        let mut entries: Vec<&BanzukeEntry> = self.east.iter().chain(self.west.iter()).collect();
        entries.sort_by_key(|e| (e.rank_value.unwrap_or(u32::MAX), e.side == Side::West));
        entries.into_iter()
    }

    pub fn find(&self, rikishi_id: u32) -> Option<&BanzukeEntry> {
        self.east
            .iter()
            .chain(self.west.iter())
            .find(|e| e.rikishi_id == rikishi_id)
    }
}

impl FromJson for Banzuke {
    fn validate(&self) -> Result<(), ValidationError> {
        for (field, entries) in [("east", &self.east), ("west", &self.west)] {
            for (i, entry) in entries.iter().enumerate() {
                entry.rank.parse::<RankTitle>().map_err(|e| {
                    ValidationError::new("Banzuke", format!("{field}.{i}.rank"), e.to_string())
                })?;
            }

            let ranked: Vec<u32> = entries.iter().filter_map(|e| e.rank_value).collect();
            if let Some(i) = ranked.windows(2).position(|w| w[0] > w[1]) {
                return Err(ValidationError::new(
                    "Banzuke",
                    field,
                    format!(
                        "entries out of rank order: {} listed before {}",
                        ranked[i],
                        ranked[i + 1]
                    ),
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
pub struct BanzukeEntry {
    pub side: Side,
    #[serde(rename = "rikishiID")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub rikishi_id: u32,
    pub shikona_en: String,
    pub shikona_jp: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub rank_value: Option<u32>,
    pub rank: String,
    pub heya: Option<String>,
    #[serde(default)]
    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub record: Vec<BoutRecord>,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub absences: Option<u32>,
}

impl BanzukeEntry {
    pub fn title(&self) -> Option<RankTitle> {
        self.rank.parse().ok()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoutResult {
    #[serde(rename = "win")]
    Win,
    #[serde(rename = "loss")]
    Loss,
    #[serde(rename = "absent")]
    Absent,
    #[serde(rename = "fusen win")]
    FusenWin,
    #[serde(rename = "fusen loss")]
    FusenLoss,
    /// Day not yet fought.
    #[serde(rename = "")]
    Pending,
}

/// One day of a rikishi's tournament record on the banzuke.
#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoutRecord {
    pub result: BoutResult,
    #[serde(rename = "opponentID")]
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub opponent_id: Option<u32>,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub opponent_shikona_en: Option<String>,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub opponent_shikona_jp: Option<String>,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub kimarite: Option<String>,
}
