use std::fmt;
use std::str::FromStr;

use crate::params::Division;
use crate::types::Side;

/// Rank titles in banzuke order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RankName {
    Yokozuna,
    Ozeki,
    Sekiwake,
    Komusubi,
    Maegashira,
    Juryo,
    Makushita,
    Sandanme,
    Jonidan,
    Jonokuchi,
    MaeZumo,
}

const NAMES: [(RankName, &str, &str); 11] = [
    (RankName::Yokozuna, "Yokozuna", "Y"),
    (RankName::Ozeki, "Ozeki", "O"),
    (RankName::Sekiwake, "Sekiwake", "S"),
    (RankName::Komusubi, "Komusubi", "K"),
    (RankName::Maegashira, "Maegashira", "M"),
    (RankName::Juryo, "Juryo", "J"),
    (RankName::Makushita, "Makushita", "Ms"),
    (RankName::Sandanme, "Sandanme", "Sd"),
    (RankName::Jonidan, "Jonidan", "Jd"),
    (RankName::Jonokuchi, "Jonokuchi", "Jk"),
    (RankName::MaeZumo, "Mae-zumo", "Mz"),
];

impl RankName {
    pub fn as_str(self) -> &'static str {
        NAMES
            .iter()
            .find(|(name, _, _)| *name == self)
            .map_or("", |(_, long, _)| long)
    }

    pub fn division(self) -> Option<Division> {
        match self {
            RankName::Yokozuna
            | RankName::Ozeki
            | RankName::Sekiwake
            | RankName::Komusubi
            | RankName::Maegashira => Some(Division::Makuuchi),
            RankName::Juryo => Some(Division::Juryo),
            RankName::Makushita => Some(Division::Makushita),
            RankName::Sandanme => Some(Division::Sandanme),
            RankName::Jonidan => Some(Division::Jonidan),
            RankName::Jonokuchi => Some(Division::Jonokuchi),
            RankName::MaeZumo => None,
        }
    }

    fn from_long(word: &str) -> Option<Self> {
        NAMES
            .iter()
            .find(|(_, long, _)| long.eq_ignore_ascii_case(word))
            .map(|(name, _, _)| *name)
    }

    fn from_short(abbrev: &str) -> Option<Self> {
        NAMES
            .iter()
            .find(|(_, _, short)| *short == abbrev)
            .map(|(name, _, _)| *name)
    }
}

impl fmt::Display for RankName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed rank string such as `"Maegashira 3 East"` or `"M3e"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankTitle {
    pub name: RankName,
    pub number: Option<u16>,
    pub side: Option<Side>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized rank {0:?}")]
pub struct UnknownRank(String);

impl FromStr for RankTitle {
    type Err = UnknownRank;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let unknown = || UnknownRank(s.to_owned());
        let words: Vec<&str> = s.split_whitespace().collect();

        match words.as_slice() {
            [] => Err(unknown()),
            [single] => parse_single(single).ok_or_else(unknown),
            [name, rest @ ..] => {
                let name = RankName::from_long(name).ok_or_else(unknown)?;
                let (number, side) = match rest {
                    [number, side] => (
                        Some(number.parse().map_err(|_| unknown())?),
                        Some(parse_side(side).ok_or_else(unknown)?),
                    ),
                    [one] => match one.parse() {
                        Ok(number) => (Some(number), None),
                        Err(_) => (None, Some(parse_side(one).ok_or_else(unknown)?)),
                    },
                    _ => return Err(unknown()),
                };
                Ok(Self { name, number, side })
            }
        }
    }
}

/// `"Ozeki"` or the compact `"Ms12w"` form.
fn parse_single(word: &str) -> Option<RankTitle> {
    if let Some(name) = RankName::from_long(word) {
        return Some(RankTitle {
            name,
            number: None,
            side: None,
        });
    }

    let letters = word.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(word.len());
    let name = RankName::from_short(&word[..letters])?;
    let rest = &word[letters..];
    let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let number = match &rest[..digits] {
        "" => None,
        n => Some(n.parse().ok()?),
    };
    let side = match &rest[digits..] {
        "" => None,
        side => Some(parse_side(side)?),
    };
    Some(RankTitle { name, number, side })
}

fn parse_side(raw: &str) -> Option<Side> {
    match raw.to_ascii_lowercase().as_str() {
        "e" | "east" => Some(Side::East),
        "w" | "west" => Some(Side::West),
        _ => None,
    }
}
