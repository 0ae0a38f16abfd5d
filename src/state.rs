use std::collections::VecDeque;

use serde::Deserialize;

use crate::elapsed::LastSeenClock;

const MAX_LOG_LINES: usize = 200;

/// Lifecycle of a single remote read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Loading,
    Success,
    Error,
}

/// Request/response wrapper for one asynchronous read.
///
/// Invariants: `Success` implies data present and no error message;
/// `Error` implies an error message present while data may be stale from
/// an earlier success.
#[derive(Debug, Clone)]
pub struct RequestState<T> {
    pub data: Option<T>,
    pub phase: RequestPhase,
    pub error: Option<String>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            data: None,
            phase: RequestPhase::Idle,
            error: None,
        }
    }
}

impl<T> RequestState<T> {
    /// Marks the read as in flight, clearing any previous error.
    pub fn begin(&mut self) {
        self.phase = RequestPhase::Loading;
        self.error = None;
    }

    pub fn succeed(&mut self, data: T) {
        self.data = Some(data);
        self.phase = RequestPhase::Success;
        self.error = None;
    }

    /// Records a failed read. Stale data from an earlier success is kept.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.phase = RequestPhase::Error;
        self.error = Some(message.into());
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_loading(&self) -> bool {
        self.phase == RequestPhase::Loading
    }
}

/// Public profile document for one player, as served by
/// `/pub/player/{username}`. Optional fields stay `None` when the API
/// omits them, which is distinct from empty or zero.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerProfile {
    pub player_id: u64,
    #[serde(rename = "@id")]
    pub api_id: String,
    pub url: String,
    pub username: String,
    pub followers: u64,
    /// Reference path whose last segment is the country code.
    pub country: String,
    pub last_online: i64,
    pub joined: i64,
    pub status: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub location: Option<String>,
    pub league: Option<String>,
    #[serde(default)]
    pub streaming_platforms: Vec<String>,
    pub is_streamer: Option<bool>,
    pub verified: Option<bool>,
    pub fide: Option<u32>,
}

/// Country metadata from `/pub/country/{code}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryInfo {
    #[serde(rename = "@id")]
    pub api_id: String,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Roster,
    Profile { username: String },
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetRoster(Vec<String>),
    RosterFailed(String),
    SetProfile {
        username: String,
        profile: PlayerProfile,
    },
    ProfileFailed {
        username: String,
        message: String,
    },
    SetCountry {
        username: String,
        country: CountryInfo,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    FetchRoster,
    FetchProfile { username: String },
}

pub struct AppState {
    pub screen: Screen,
    pub roster: RequestState<Vec<String>>,
    pub selected: usize,
    pub profile: RequestState<PlayerProfile>,
    /// Best-effort enrichment; absent both when the profile has no country
    /// path and when the country fetch failed.
    pub country: Option<CountryInfo>,
    pub last_seen: LastSeenClock,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub console_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Roster,
            roster: RequestState::default(),
            selected: 0,
            profile: RequestState::default(),
            country: None,
            last_seen: LastSeenClock::default(),
            logs: VecDeque::with_capacity(MAX_LOG_LINES),
            help_overlay: false,
            console_overlay: false,
        }
    }

    /// The roster usernames in server rank order; empty until loaded.
    pub fn roster_players(&self) -> &[String] {
        self.roster.data.as_deref().unwrap_or_default()
    }

    pub fn selected_username(&self) -> Option<&str> {
        self.roster_players().get(self.selected).map(String::as_str)
    }

    /// Username of the open profile screen, if any.
    pub fn open_username(&self) -> Option<&str> {
        match &self.screen {
            Screen::Profile { username } => Some(username),
            Screen::Roster => None,
        }
    }

    pub fn select_next(&mut self) {
        let len = self.roster_players().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        let len = self.roster_players().len();
        if len > 0 {
            self.selected = len - 1;
        }
    }

    /// Switches to the profile screen with fresh loader state. The caller
    /// issues the fetch command.
    pub fn open_profile(&mut self, username: String) {
        self.screen = Screen::Profile { username };
        self.profile.reset();
        self.country = None;
        self.last_seen.clear();
    }

    /// Returns to the roster, destroying the profile loaders and releasing
    /// the clock cadence.
    pub fn close_profile(&mut self) {
        self.screen = Screen::Roster;
        self.profile.reset();
        self.country = None;
        self.last_seen.clear();
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        if self.logs.len() >= MAX_LOG_LINES {
            self.logs.pop_front();
        }
        self.logs.push_back(msg.into());
    }
}

/// Applies one provider delta to the state.
///
/// Profile-scoped deltas carry the username they were fetched for; results
/// addressed to a profile that is no longer open are dropped, so a
/// late-resolving read cannot mutate a screen the user already left.
pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetRoster(players) => {
            state.selected = state.selected.min(players.len().saturating_sub(1));
            state.roster.succeed(players);
        }
        Delta::RosterFailed(message) => {
            state.roster.fail(message);
        }
        Delta::SetProfile { username, profile } => {
            if state.open_username() != Some(username.as_str()) {
                return;
            }
            state.last_seen.set_reference(Some(profile.last_online));
            state.profile.succeed(profile);
        }
        Delta::ProfileFailed { username, message } => {
            if state.open_username() != Some(username.as_str()) {
                return;
            }
            state.profile.fail(message);
        }
        Delta::SetCountry { username, country } => {
            if state.open_username() != Some(username.as_str()) {
                return;
            }
            state.country = Some(country);
        }
        Delta::Log(line) => state.push_log(line),
    }
}
