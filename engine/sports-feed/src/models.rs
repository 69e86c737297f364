use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub type TeamId = i64;
pub type GameId = i64;

/// Team record as published by the teams source and embedded in every game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub conference: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub division: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub city: Option<String>,

    pub name: String,
    pub full_name: String,
    pub abbreviation: String,
}

/// Game record with its own copies of both teams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    /// Kept exactly as the source formats it
    pub date: String,
    pub season: i32,
    pub status: String,
    pub period: i32,
    pub postseason: bool,
    pub home_team_score: i32,
    pub visitor_team_score: i32,
    pub home_team: Team,
    pub visitor_team: Team,
}

impl Game {
    /// Inline the embedded teams into a single-level record.
    pub fn to_flat(&self) -> GameFlat {
        GameFlat {
            id: self.id,
            date: self.date.clone(),
            season: self.season,
            status: self.status.clone(),
            period: self.period,
            postseason: self.postseason,

            home_team_id: self.home_team.id,
            home_team_full_name: self.home_team.full_name.clone(),
            home_team_abbr: self.home_team.abbreviation.clone(),
            home_team_conf: self.home_team.conference.clone(),
            home_team_div: self.home_team.division.clone(),
            home_team_score: self.home_team_score,

            visitor_team_id: self.visitor_team.id,
            visitor_team_full_name: self.visitor_team.full_name.clone(),
            visitor_team_abbr: self.visitor_team.abbreviation.clone(),
            visitor_team_conf: self.visitor_team.conference.clone(),
            visitor_team_div: self.visitor_team.division.clone(),
            visitor_team_score: self.visitor_team_score,
        }
    }
}

/// Denormalized game row, derived from [`Game::to_flat`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFlat {
    pub id: GameId,
    pub date: String,
    pub season: i32,
    pub status: String,
    pub period: i32,
    pub postseason: bool,

    pub home_team_id: TeamId,
    pub home_team_full_name: String,
    pub home_team_abbr: String,
    pub home_team_conf: Option<String>,
    pub home_team_div: Option<String>,
    pub home_team_score: i32,

    pub visitor_team_id: TeamId,
    pub visitor_team_full_name: String,
    pub visitor_team_abbr: String,
    pub visitor_team_conf: Option<String>,
    pub visitor_team_div: Option<String>,
    pub visitor_team_score: i32,
}

/// Validated data ready to be served
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedSnapshot {
    pub teams: Vec<Team>,
    pub games: Vec<Game>,
    pub games_flat: Vec<GameFlat>,
    pub team_by_id: BTreeMap<TeamId, Team>,
}

impl NormalizedSnapshot {
    /// Build the snapshot and its derived views from validated records.
    ///
    /// Duplicate team ids resolve to the last team in `teams`.
    pub fn from_records(teams: Vec<Team>, games: Vec<Game>) -> Self {
        let games_flat = games.iter().map(Game::to_flat).collect();
        let team_by_id = teams.iter().map(|team| (team.id, team.clone())).collect();

        Self { teams, games, games_flat, team_by_id }
    }
}

/// What one source returned during a fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SourcePayload {
    /// Parsed JSON body of a 2xx response
    Body(serde_json::Value),
    /// Transport, status or parse failure
    Failed { error: String },
}

impl SourcePayload {
    pub fn failed(error: impl ToString) -> Self {
        SourcePayload::Failed { error: error.to_string() }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SourcePayload::Failed { .. })
    }
}

/// Unvalidated payloads keyed by source URL, captured during one fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawSnapshot {
    sources: BTreeMap<String, SourcePayload>,
}

impl RawSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, payload: SourcePayload) {
        self.sources.insert(url.into(), payload);
    }

    pub fn get(&self, url: &str) -> Option<&SourcePayload> {
        self.sources.get(url)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Sources whose fetch failed, with the recorded error text
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sources.iter().filter_map(|(url, payload)| match payload {
            SourcePayload::Failed { error } => Some((url.as_str(), error.as_str())),
            SourcePayload::Body(_) => None,
        })
    }

    /// True when there was at least one source and none of them succeeded
    pub fn all_failed(&self) -> bool {
        !self.is_empty() && self.sources.values().all(SourcePayload::is_failed)
    }
}

impl<K: Into<String>> FromIterator<(K, SourcePayload)> for RawSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, SourcePayload)>>(iter: I) -> Self {
        Self { sources: iter.into_iter().map(|(url, payload)| (url.into(), payload)).collect() }
    }
}

// Trims optional text fields; blank strings become `None`.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn team_json(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "conference": "East",
            "division": "Atlantic",
            "city": "Boston",
            "name": "Celtics",
            "full_name": "Boston Celtics",
            "abbreviation": "BOS"
        })
    }

    fn game_json() -> serde_json::Value {
        json!({
            "id": 1001,
            "date": "2024-01-15",
            "season": 2023,
            "status": "Final",
            "period": 4,
            "postseason": false,
            "home_team_score": 110,
            "visitor_team_score": 98,
            "home_team": team_json(2),
            "visitor_team": {
                "id": 14,
                "conference": "West",
                "division": "Pacific",
                "city": "Los Angeles",
                "name": "Lakers",
                "full_name": "Los Angeles Lakers",
                "abbreviation": "LAL"
            }
        })
    }

    #[test]
    fn test_team_blank_optionals_become_none() {
        let team: Team = serde_json::from_value(json!({
            "id": 7,
            "conference": "   ",
            "division": "",
            "city": "  Denver ",
            "name": "Nuggets",
            "full_name": "Denver Nuggets",
            "abbreviation": "DEN"
        }))
        .unwrap();

        assert_eq!(team.conference, None);
        assert_eq!(team.division, None);
        assert_eq!(team.city.as_deref(), Some("Denver"));
    }

    #[test]
    fn test_team_optionals_may_be_missing_or_null() {
        let team: Team = serde_json::from_value(json!({
            "id": 3,
            "conference": null,
            "name": "Nets",
            "full_name": "Brooklyn Nets",
            "abbreviation": "BKN"
        }))
        .unwrap();

        assert_eq!(team.conference, None);
        assert_eq!(team.division, None);
        assert_eq!(team.city, None);
    }

    #[test]
    fn test_team_requires_name_fields() {
        let err = serde_json::from_value::<Team>(json!({
            "id": 3,
            "full_name": "Brooklyn Nets",
            "abbreviation": "BKN"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_team_rejects_wrong_types() {
        let mut value = team_json(1);
        value["id"] = json!("one");
        assert!(serde_json::from_value::<Team>(value).is_err());

        let mut value = team_json(1);
        value["conference"] = json!(5);
        assert!(serde_json::from_value::<Team>(value).is_err());
    }

    #[test]
    fn test_game_round_trip_keeps_required_fields() {
        let original = game_json();
        let game: Game = serde_json::from_value(original.clone()).unwrap();
        let reserialized = serde_json::to_value(&game).unwrap();

        for key in [
            "id",
            "date",
            "season",
            "status",
            "period",
            "postseason",
            "home_team_score",
            "visitor_team_score",
        ] {
            assert_eq!(reserialized[key], original[key], "field {key}");
        }
        assert_eq!(reserialized["home_team"], original["home_team"]);
        assert_eq!(reserialized["visitor_team"], original["visitor_team"]);
    }

    #[test]
    fn test_game_ignores_unknown_fields() {
        let mut value = game_json();
        value["time"] = json!("7:30 pm");
        let game: Game = serde_json::from_value(value).unwrap();
        assert_eq!(game.id, 1001);
    }

    #[test]
    fn test_to_flat_inlines_team_fields() {
        let game: Game = serde_json::from_value(game_json()).unwrap();
        let flat = game.to_flat();

        assert_eq!(flat.id, 1001);
        assert_eq!(flat.home_team_id, 2);
        assert_eq!(flat.home_team_full_name, "Boston Celtics");
        assert_eq!(flat.home_team_abbr, "BOS");
        assert_eq!(flat.home_team_conf.as_deref(), Some("East"));
        assert_eq!(flat.home_team_div.as_deref(), Some("Atlantic"));
        assert_eq!(flat.home_team_score, 110);
        assert_eq!(flat.visitor_team_id, 14);
        assert_eq!(flat.visitor_team_abbr, "LAL");
        assert_eq!(flat.visitor_team_score, 98);
    }

    #[test]
    fn test_to_flat_is_deterministic() {
        let game: Game = serde_json::from_value(game_json()).unwrap();
        let first = serde_json::to_string(&game.to_flat()).unwrap();
        let second = serde_json::to_string(&game.to_flat()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_snapshot_team_index_last_write_wins() {
        let first: Team = serde_json::from_value(team_json(1)).unwrap();
        let mut second = first.clone();
        second.name = "Renamed".to_string();

        let snapshot = NormalizedSnapshot::from_records(vec![first, second.clone()], vec![]);
        assert_eq!(snapshot.teams.len(), 2);
        assert_eq!(snapshot.team_by_id.len(), 1);
        assert_eq!(snapshot.team_by_id[&1], second);
    }

    #[test]
    fn test_snapshot_serializes_team_ids_as_keys() {
        let team: Team = serde_json::from_value(team_json(1)).unwrap();
        let snapshot = NormalizedSnapshot::from_records(vec![team], vec![]);
        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(value["team_by_id"]["1"]["abbreviation"], "BOS");
        assert_eq!(value["games_flat"], json!([]));
    }

    #[test]
    fn test_raw_snapshot_serializes_error_descriptor() {
        let raw: RawSnapshot = [
            ("http://teams", SourcePayload::Body(json!({ "data": [] }))),
            ("http://games", SourcePayload::failed("connection refused")),
        ]
        .into_iter()
        .collect();

        let value = serde_json::to_value(&raw).unwrap();
        assert_eq!(value["http://games"], json!({ "error": "connection refused" }));
        assert_eq!(value["http://teams"], json!({ "data": [] }));
        assert_eq!(raw.failures().count(), 1);
        assert!(!raw.all_failed());
    }
}
