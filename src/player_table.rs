use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::{info, warn};

pub const DEFAULT_AGE: u32 = 25;
pub const DEFAULT_OVR: f64 = 75.0;
pub const MIN_AGE: u32 = 16;
pub const MAX_AGE: u32 = 45;

// Standardized ratings live roughly in [-3, 3]; anything confined to this band
// is treated as a z-score column.
const STANDARDIZED_OVR_BOUND: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Skill {
    Pace,
    Shooting,
    Passing,
    Dribbling,
    Physical,
    Aerial,
    Mental,
}

impl Skill {
    pub const ALL: [Skill; 7] = [
        Skill::Pace,
        Skill::Shooting,
        Skill::Passing,
        Skill::Dribbling,
        Skill::Physical,
        Skill::Aerial,
        Skill::Mental,
    ];

    /// Column header used by the forwards CSV.
    pub fn header(self) -> &'static str {
        match self {
            Skill::Pace => "PACE",
            Skill::Shooting => "SHOOTING",
            Skill::Passing => "PASSING",
            Skill::Dribbling => "DRIBBLING",
            Skill::Physical => "PHYSICAL",
            Skill::Aerial => "AERIAL",
            Skill::Mental => "MENTAL",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Skill::Pace => "Pace",
            Skill::Shooting => "Shooting",
            Skill::Passing => "Passing",
            Skill::Dribbling => "Dribbling",
            Skill::Physical => "Physical",
            Skill::Aerial => "Aerial",
            Skill::Mental => "Mental",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub name: String,
    pub age: u32,
    pub nation: String,
    pub league: String,
    pub team: String,
    pub position: String,
    pub market_value: f64,
    pub overall_rating: f64,
    pub pace: Option<f64>,
    pub shooting: Option<f64>,
    pub passing: Option<f64>,
    pub dribbling: Option<f64>,
    pub physical: Option<f64>,
    pub aerial: Option<f64>,
    pub mental: Option<f64>,
    pub play_style: Option<String>,
}

impl Player {
    pub fn skill(&self, skill: Skill) -> Option<f64> {
        match skill {
            Skill::Pace => self.pace,
            Skill::Shooting => self.shooting,
            Skill::Passing => self.passing,
            Skill::Dribbling => self.dribbling,
            Skill::Physical => self.physical,
            Skill::Aerial => self.aerial,
            Skill::Mental => self.mental,
        }
    }

    pub fn nation_matches(&self, codes: &[&str]) -> bool {
        let nation = self.nation.to_lowercase();
        codes.iter().any(|code| nation.contains(code))
    }

    pub fn position_matches(&self, codes: &[&str]) -> bool {
        let position = self.position.to_uppercase();
        codes.iter().any(|code| position.contains(code))
    }

    pub fn league_matches(&self, league: &str) -> bool {
        self.league.to_lowercase().contains(&league.to_lowercase())
    }
}

/// Read-only table of forwards. Rows keep their load order.
#[derive(Debug, Clone, Default)]
pub struct PlayerTable {
    players: Vec<Player>,
    skill_columns: HashSet<Skill>,
}

impl PlayerTable {
    /// Wraps rows that are already cleaned and on the absolute OVR scale.
    pub fn new(players: Vec<Player>, skill_columns: impl IntoIterator<Item = Skill>) -> Self {
        Self {
            players,
            skill_columns: skill_columns.into_iter().collect(),
        }
    }

    pub fn load_csv(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open player csv: {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("failed to load {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers().context("read csv header")?.clone();
        let columns = ColumnIndex::from_headers(&headers)?;

        let mut raw_rows = Vec::new();
        let mut total = 0usize;
        for (row_idx, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("read csv row {}", row_idx + 1))?;
            total += 1;
            if let Some(row) = columns.parse_row(&record) {
                raw_rows.push(row);
            }
        }

        let mut ratings: Vec<f64> = raw_rows.iter().map(|r| r.overall_rating).collect();
        if normalize_ratings(&mut ratings) {
            info!("converting standardized ratings to the 50-95 scale");
        }
        for (row, rating) in raw_rows.iter_mut().zip(ratings) {
            row.overall_rating = rating;
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut players = Vec::with_capacity(raw_rows.len());
        for row in raw_rows {
            if row.age < f64::from(MIN_AGE) || row.age > f64::from(MAX_AGE) {
                continue;
            }
            if row.market_value < 0.0 {
                continue;
            }
            if !seen.insert(row.player.name.clone()) {
                warn!("dropping duplicate player row: {}", row.player.name);
                continue;
            }
            let mut player = row.player;
            player.age = row.age as u32;
            player.market_value = row.market_value;
            player.overall_rating = row.overall_rating;
            players.push(player);
        }

        info!(
            "loaded {} players ({} rows dropped during validation)",
            players.len(),
            total - players.len()
        );

        Ok(Self {
            players,
            skill_columns: columns.skills.keys().copied().collect(),
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Whether the source data carried this skill column at all.
    pub fn has_skill(&self, skill: Skill) -> bool {
        self.skill_columns.contains(&skill)
    }
}

/// Remaps standardized ratings onto the absolute scale in place.
///
/// A column whose values all sit within [-5, 5] is taken to be standardized and
/// mapped with `((score + 3) / 6) * 45 + 50`, so -3 lands on 50 and +3 on 95.
/// Returns whether the remap happened.
pub fn normalize_ratings(ratings: &mut [f64]) -> bool {
    if ratings.is_empty() {
        return false;
    }
    let max = ratings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = ratings.iter().copied().fold(f64::INFINITY, f64::min);
    if max > STANDARDIZED_OVR_BOUND || min < -STANDARDIZED_OVR_BOUND {
        return false;
    }
    for rating in ratings.iter_mut() {
        *rating = ((*rating + 3.0) / 6.0) * 45.0 + 50.0;
    }
    true
}

struct RawRow {
    player: Player,
    age: f64,
    market_value: f64,
    overall_rating: f64,
}

struct ColumnIndex {
    name: usize,
    age: Option<usize>,
    nation: Option<usize>,
    league: Option<usize>,
    team: Option<usize>,
    position: Option<usize>,
    market_value: Option<usize>,
    overall_rating: Option<usize>,
    play_style: Option<usize>,
    skills: HashMap<Skill, usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let name = find("Name").ok_or_else(|| anyhow!("player csv has no Name column"))?;
        let skills = Skill::ALL
            .iter()
            .filter_map(|skill| find(skill.header()).map(|idx| (*skill, idx)))
            .collect();
        Ok(Self {
            name,
            age: find("Age"),
            nation: find("Nation"),
            league: find("League"),
            team: find("Team"),
            position: find("Position"),
            market_value: find("market_value"),
            overall_rating: find("OVR"),
            play_style: find("play style"),
            skills,
        })
    }

    fn parse_row(&self, record: &csv::StringRecord) -> Option<RawRow> {
        let name = cell(record, Some(self.name))?.to_string();
        let text = |idx: Option<usize>| cell(record, idx).unwrap_or_default().to_string();
        let number = |idx: Option<usize>| cell(record, idx).and_then(parse_number);
        let skill = |skill: Skill| number(self.skills.get(&skill).copied());

        let player = Player {
            name,
            age: DEFAULT_AGE,
            nation: text(self.nation),
            league: text(self.league),
            team: text(self.team),
            position: text(self.position),
            market_value: 0.0,
            overall_rating: DEFAULT_OVR,
            pace: skill(Skill::Pace),
            shooting: skill(Skill::Shooting),
            passing: skill(Skill::Passing),
            dribbling: skill(Skill::Dribbling),
            physical: skill(Skill::Physical),
            aerial: skill(Skill::Aerial),
            mental: skill(Skill::Mental),
            play_style: cell(record, self.play_style).map(str::to_string),
        };

        Some(RawRow {
            player,
            age: number(self.age).unwrap_or(f64::from(DEFAULT_AGE)),
            market_value: number(self.market_value).unwrap_or(0.0),
            overall_rating: number(self.overall_rating).unwrap_or(DEFAULT_OVR),
        })
    }
}

fn cell(record: &csv::StringRecord, idx: Option<usize>) -> Option<&str> {
    let value = record.get(idx?)?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(value)
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
