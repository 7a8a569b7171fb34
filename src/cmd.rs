use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use sumo_api::types::{
    Banzuke, Basho, HistoryRecord, KimariteMatches, KimariteStats, Match, Measurement,
    OpponentMatches, Rank, Rikishi, RikishiList, RikishiMatches, RikishiStats, Shikona, Torikumi,
    Winner,
};
use sumo_api::{
    ClientConfig, Division, HistoryQuery, KimariteMatchesQuery, KimariteQuery, KimariteSortField,
    RikishiQuery, SortOrder, SumoClient,
};

const NOT_FOUND_EXIT: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "sumo", version, about = "Query the Sumo API")]
pub struct Cli {
    /// API root, overrides SUMO_API_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds, overrides SUMO_API_TIMEOUT_SECS
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Disable HTTP/2
    #[arg(long, global = true)]
    http1: bool,

    /// Print a plain table instead of JSON
    #[arg(long, global = true)]
    table: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Rikishi profile
    Rikishi { id: u32 },
    /// Career statistics of a rikishi
    Stats { id: u32 },
    /// Search rikishi
    Rikishis(RikishisArgs),
    /// Bouts of a rikishi, or head-to-head with --opponent
    Matches {
        id: u32,
        #[arg(long)]
        opponent: Option<u32>,
        #[arg(long)]
        basho_id: Option<String>,
    },
    /// Tournament summary
    Basho { basho_id: String },
    /// Ranking sheet of a division
    Banzuke {
        basho_id: String,
        division: Division,
    },
    /// Bout card of one day
    Torikumi {
        basho_id: String,
        division: Division,
        day: u8,
    },
    /// Winning technique statistics
    Kimarite {
        #[arg(long)]
        sort_field: Option<KimariteSortField>,
        #[arg(long)]
        sort_order: Option<SortOrder>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        skip: Option<u32>,
    },
    /// Bouts won with one technique
    KimariteMatches {
        name: String,
        #[arg(long)]
        sort_order: Option<SortOrder>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        skip: Option<u32>,
    },
    Measurements(HistoryArgs),
    Ranks(HistoryArgs),
    Shikonas(HistoryArgs),
}

#[derive(Args, Debug)]
pub struct RikishisArgs {
    #[arg(long)]
    shikona: Option<String>,
    #[arg(long)]
    heya: Option<String>,
    #[arg(long)]
    sumodb_id: Option<u32>,
    #[arg(long)]
    nsk_id: Option<u32>,
    /// Include retired rikishi
    #[arg(long)]
    retired: bool,
    #[arg(long)]
    measurements: bool,
    #[arg(long)]
    ranks: bool,
    #[arg(long)]
    shikonas: bool,
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    skip: Option<u32>,
}

impl From<RikishisArgs> for RikishiQuery {
    fn from(args: RikishisArgs) -> Self {
        let flag = |set: bool| set.then_some(true);
        RikishiQuery {
            shikona_en: args.shikona,
            heya: args.heya,
            sumodb_id: args.sumodb_id,
            nsk_id: args.nsk_id,
            intai: flag(args.retired),
            measurements: flag(args.measurements),
            ranks: flag(args.ranks),
            shikonas: flag(args.shikonas),
            limit: args.limit,
            skip: args.skip,
        }
    }
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[arg(long)]
    basho_id: Option<String>,
    #[arg(long)]
    rikishi_id: Option<u32>,
    #[arg(long, default_value = "desc")]
    sort_order: SortOrder,
}

impl From<HistoryArgs> for HistoryQuery {
    fn from(args: HistoryArgs) -> Self {
        HistoryQuery {
            basho_id: args.basho_id,
            rikishi_id: args.rikishi_id,
            sort_order: args.sort_order,
        }
    }
}

impl Cli {
    fn config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = ClientConfig::from_env()?;
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url)?;
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs))?;
        }
        if self.http1 {
            config = config.with_http2(false);
        }
        Ok(config)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let client = SumoClient::with_config(&self.config()?)?;
        let output = self.cmd.run(&client, self.table).await;
        client.close();
        println!("{}", output?);
        Ok(())
    }
}

impl Cmd {
    pub async fn run(self, client: &SumoClient, table: bool) -> anyhow::Result<String> {
        match self {
            Cmd::Rikishi { id } => render(&client.get_rikishi(id).await?, table),
            Cmd::Stats { id } => render(&client.get_rikishi_stats(id).await?, table),
            Cmd::Rikishis(args) => render(&client.get_rikishis(&args.into()).await?, table),
            Cmd::Matches {
                id,
                opponent: Some(opponent),
                basho_id,
            } => render(
                &client
                    .get_rikishi_opponent_matches(id, opponent, basho_id.as_deref())
                    .await?,
                table,
            ),
            Cmd::Matches {
                id,
                opponent: None,
                basho_id,
            } => render(
                &client.get_rikishi_matches(id, basho_id.as_deref()).await?,
                table,
            ),
            Cmd::Basho { basho_id } => render(&client.get_basho(&basho_id).await?, table),
            Cmd::Banzuke { basho_id, division } => {
                render(&client.get_banzuke(&basho_id, division).await?, table)
            }
            Cmd::Torikumi {
                basho_id,
                division,
                day,
            } => render(&client.get_torikumi(&basho_id, division, day).await?, table),
            Cmd::Kimarite {
                sort_field,
                sort_order,
                limit,
                skip,
            } => {
                let query = KimariteQuery {
                    sort_field,
                    sort_order,
                    limit,
                    skip,
                };
                render(&client.get_kimarite(&query).await?, table)
            }
            Cmd::KimariteMatches {
                name,
                sort_order,
                limit,
                skip,
            } => {
                let query = KimariteMatchesQuery {
                    sort_order,
                    limit,
                    skip,
                };
                render(&client.get_kimarite_matches(&name, &query).await?, table)
            }
            Cmd::Measurements(args) => {
                render(&client.get_measurements(&args.into()).await?, table)
            }
            Cmd::Ranks(args) => render(&client.get_ranks(&args.into()).await?, table),
            Cmd::Shikonas(args) => render(&client.get_shikonas(&args.into()).await?, table),
        }
    }
}

/// 3 when the resource does not exist, 1 for any other failure. Usage
/// errors exit with 2 from clap.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<sumo_api::Error>() {
        Some(e) if e.is_not_found() => NOT_FOUND_EXIT,
        _ => 1,
    }
}

fn render<T: Serialize + Table>(value: &T, table: bool) -> anyhow::Result<String> {
    if table {
        let mut lines = vec![value.header().to_owned()];
        lines.extend(value.rows());
        Ok(lines.join("\n"))
    } else {
        Ok(serde_json::to_string_pretty(value)?)
    }
}

trait Table {
    fn header(&self) -> &'static str;
    fn rows(&self) -> Vec<String>;
}

fn or_dash(value: Option<impl ToString>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

impl Table for Rikishi {
    fn header(&self) -> &'static str {
        "Id | Shikona | Rank | Heya"
    }
    fn rows(&self) -> Vec<String> {
        vec![format!(
            " {} | {} | {} | {}",
            self.id,
            self.shikona_en,
            or_dash(self.current_rank.as_deref()),
            or_dash(self.heya.as_deref())
        )]
    }
}

impl Table for RikishiList {
    fn header(&self) -> &'static str {
        "Id | Shikona | Rank | Heya"
    }
    fn rows(&self) -> Vec<String> {
        self.records.iter().flat_map(|r| r.rows()).collect()
    }
}

impl Table for RikishiStats {
    fn header(&self) -> &'static str {
        "Basho | Wins | Losses | Absences | Yusho"
    }
    fn rows(&self) -> Vec<String> {
        vec![format!(
            " {} | {} | {} | {} | {}",
            self.basho, self.total_wins, self.total_losses, self.total_absences, self.yusho
        )]
    }
}

fn match_row(bout: &Match) -> String {
    let winner = match bout.winner() {
        Winner::East(_) => bout.east_shikona.as_str(),
        Winner::West(_) => bout.west_shikona.as_str(),
        Winner::Pending => "-",
    };
    format!(
        " {} | {} | {} | {} | {} | {}",
        bout.basho_id,
        bout.day,
        bout.east_shikona,
        bout.west_shikona,
        or_dash(bout.kimarite.as_deref()),
        winner
    )
}

const MATCH_HEADER: &str = "Basho | Day | East | West | Kimarite | Winner";

impl Table for RikishiMatches {
    fn header(&self) -> &'static str {
        MATCH_HEADER
    }
    fn rows(&self) -> Vec<String> {
        self.records.iter().map(match_row).collect()
    }
}

impl Table for OpponentMatches {
    fn header(&self) -> &'static str {
        MATCH_HEADER
    }
    fn rows(&self) -> Vec<String> {
        self.matches.iter().map(match_row).collect()
    }
}

impl Table for KimariteMatches {
    fn header(&self) -> &'static str {
        MATCH_HEADER
    }
    fn rows(&self) -> Vec<String> {
        self.records.iter().map(match_row).collect()
    }
}

impl Table for Torikumi {
    fn header(&self) -> &'static str {
        MATCH_HEADER
    }
    fn rows(&self) -> Vec<String> {
        self.matches.iter().map(match_row).collect()
    }
}

impl Table for Basho {
    fn header(&self) -> &'static str {
        "Prize | Shikona"
    }
    fn rows(&self) -> Vec<String> {
        self.yusho
            .iter()
            .chain(&self.special_prizes)
            .map(|p| format!(" {} | {}", p.kind, p.shikona_en))
            .collect()
    }
}

impl Table for Banzuke {
    fn header(&self) -> &'static str {
        "Rank | Shikona | W-L-A"
    }
    fn rows(&self) -> Vec<String> {
        self.entries()
            .map(|e| {
                format!(
                    " {} | {} | {}-{}-{}",
                    e.rank,
                    e.shikona_en,
                    e.wins.unwrap_or_default(),
                    e.losses.unwrap_or_default(),
                    e.absences.unwrap_or_default()
                )
            })
            .collect()
    }
}

impl Table for KimariteStats {
    fn header(&self) -> &'static str {
        "Count | Kimarite | Last used"
    }
    fn rows(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|k| format!(" {} | {} | {}", k.count, k.kimarite, or_dash(k.last_usage.as_deref())))
            .collect()
    }
}

trait HistoryRow: HistoryRecord {
    const HEADER: &'static str;
    fn value(&self) -> String;
}

impl HistoryRow for Measurement {
    const HEADER: &'static str = "Basho | Rikishi | Height | Weight";
    fn value(&self) -> String {
        format!("{} | {}", or_dash(self.height), or_dash(self.weight))
    }
}

impl HistoryRow for Rank {
    const HEADER: &'static str = "Basho | Rikishi | Rank";
    fn value(&self) -> String {
        self.rank.clone()
    }
}

impl HistoryRow for Shikona {
    const HEADER: &'static str = "Basho | Rikishi | Shikona";
    fn value(&self) -> String {
        self.shikona_en.clone()
    }
}

impl<T: HistoryRow> Table for Vec<T> {
    fn header(&self) -> &'static str {
        T::HEADER
    }
    fn rows(&self) -> Vec<String> {
        self.iter()
            .map(|r| format!(" {} | {} | {}", r.basho_id(), r.rikishi_id(), r.value()))
            .collect()
    }
}
