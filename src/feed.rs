use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::player_fetch::{self, country_code_from_path};
use crate::roster_fetch;
use crate::state::{Delta, ProviderCommand};

/// Spawns the provider thread that owns all network I/O. Commands arrive
/// over `cmd_rx`; results and diagnostics go back as deltas on `tx`.
///
/// Each profile fetch runs on its own thread, so concurrent executes for
/// the same view race and the last to resolve wins; stale results are
/// discarded by the liveness guard in `apply_delta`.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::FetchRoster => match roster_fetch::fetch_grandmasters() {
                    Ok(players) => {
                        let _ = tx.send(Delta::SetRoster(players));
                    }
                    Err(err) => {
                        let _ = tx.send(Delta::Log(format!("[WARN] Roster fetch error: {err:#}")));
                        let _ = tx.send(Delta::RosterFailed(format!("{err:#}")));
                    }
                },
                ProviderCommand::FetchProfile { username } => {
                    let tx = tx.clone();
                    thread::spawn(move || fetch_profile_job(&tx, &username));
                }
            }
        }
    });
}

/// Runs the two-step profile sequence. The primary read is fatal for the
/// view on failure; the dependent country read is best-effort and only
/// ever logs — it must not fail the view or clear the profile.
fn fetch_profile_job(tx: &Sender<Delta>, username: &str) {
    let profile = match player_fetch::fetch_player_profile(username) {
        Ok(profile) => profile,
        Err(err) => {
            let _ = tx.send(Delta::Log(format!(
                "[WARN] Profile fetch error for {username}: {err:#}"
            )));
            let _ = tx.send(Delta::ProfileFailed {
                username: username.to_string(),
                message: format!("{err:#}"),
            });
            return;
        }
    };

    let country_path = profile.country.clone();
    let _ = tx.send(Delta::SetProfile {
        username: username.to_string(),
        profile,
    });

    let Some(code) = country_code_from_path(&country_path) else {
        return;
    };
    match player_fetch::fetch_country_info(&code) {
        Ok(country) => {
            let _ = tx.send(Delta::SetCountry {
                username: username.to_string(),
                country,
            });
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!(
                "[WARN] Country lookup failed for {code}: {err:#}"
            )));
        }
    }
}
