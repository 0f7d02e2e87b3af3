//! Party games console client: drives one game against the server from a terminal.

use std::{env, sync::Arc};

use anyhow::{Context, bail};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use party_games_client::{
    config::ClientConfig,
    dao::{
        api::{GameApi, config::ApiConfig, http::HttpGameApi},
        file_store::FileStorage,
        memory_store::MemoryStorage,
        storage::StorageBackend,
    },
    dto::validation::{parse_decimal, validate_decimal},
    games::{
        GameConfig, GameKind,
        bingo::MusicBingo,
        bluff::Bluff,
        deck::{DeckGame, DeckVariant},
        estimates::{Estimates, EstimatesAction},
        taboo::Taboo,
        thirty_seconds::ThirtySeconds,
        year::GuessTheYear,
    },
    services::{
        alert::{AlertFeedback, TerminalBell},
        controller::{Outcome, SessionController, SessionOptions},
        preferences::{PreferenceStore, Theme},
    },
    view::{UiAction, console::ConsoleView},
};

/// Everything a session needs besides the game itself.
struct Wiring {
    api: Arc<dyn GameApi>,
    config: ClientConfig,
    preferences: PreferenceStore,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let Some(name) = env::args().nth(1) else {
        let names: Vec<_> = GameKind::ALL.iter().map(|kind| kind.as_str()).collect();
        bail!("usage: party-console <game>, one of: {}", names.join(", "));
    };
    let kind: GameKind = name.parse()?;

    let config = ClientConfig::load();
    let api_config = ApiConfig::from_env().unwrap_or_else(|err| {
        debug!(error = %err, "falling back to the configured base URL");
        ApiConfig::new(config.base_url.clone())
    });
    info!(game = %kind, base_url = %api_config.base_url, "starting session");
    let api = HttpGameApi::new(api_config).context("building HTTP client")?;

    let wiring = Wiring {
        api: Arc::new(api),
        config,
        preferences: PreferenceStore::new(preference_backend()),
    };

    match kind {
        GameKind::GuessTheYear => play(GuessTheYear, wiring, no_command).await,
        GameKind::ThirtySeconds => play(ThirtySeconds, wiring, no_command).await,
        GameKind::Taboo => play(Taboo, wiring, no_command).await,
        GameKind::Bluff => play(Bluff, wiring, no_command).await,
        GameKind::Estimates => play(Estimates, wiring, guess_command).await,
        GameKind::MusicBingo => play(MusicBingo, wiring, no_command).await,
        GameKind::Hints => play(DeckGame::new(DeckVariant::Hints), wiring, no_command).await,
        GameKind::Pictionary => {
            play(DeckGame::new(DeckVariant::Pictionary), wiring, no_command).await
        }
        GameKind::WhoAmI => play(DeckGame::new(DeckVariant::WhoAmI), wiring, no_command).await,
        GameKind::ThisOrThat => {
            play(DeckGame::new(DeckVariant::ThisOrThat), wiring, no_command).await
        }
    }
}

/// Preferences on disk when a config directory exists, otherwise for this run only.
fn preference_backend() -> Arc<dyn StorageBackend> {
    match FileStorage::default_location() {
        Some(storage) => {
            debug!(path = %storage.path().display(), "using preference file");
            Arc::new(storage)
        }
        None => {
            warn!("no config directory available; preferences will not persist");
            Arc::new(MemoryStorage::new())
        }
    }
}

/// Run one game until stdin closes or the user quits.
///
/// Numbers trigger the matching control, `:thema` and `:tijd` edit preferences,
/// and anything else is offered to the game-specific `command` parser.
async fn play<G: GameConfig>(
    game: G,
    wiring: Wiring,
    command: fn(&str) -> Option<G::Action>,
) -> anyhow::Result<()> {
    let Wiring {
        api,
        config,
        preferences: store,
    } = wiring;
    let view = Arc::new(ConsoleView::<G::Action>::new());
    let mut preferences = store.load_and_apply(view.as_ref());

    // 30 Seconds is played against its own fixed clock.
    let timer_duration =
        (game.kind() != GameKind::ThirtySeconds).then(|| preferences.timer_duration());
    let options = SessionOptions {
        alert: AlertFeedback::silent().with_tones(Arc::new(TerminalBell)),
        timer_duration,
    };
    let controller = SessionController::new(game, api, view.clone(), &config, options);
    if controller.fetch_state().await == Outcome::Unavailable {
        warn!("server did not return a game state; is a game running?");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let line = line.trim();
        match line {
            "" => controller.render(),
            "q" | "stop" => break,
            "r" => {
                controller.fetch_state().await;
            }
            _ => {
                if let Some(rest) = line.strip_prefix(":thema ") {
                    let theme = match rest.trim() {
                        "licht" => Theme::Light,
                        "donker" => Theme::Dark,
                        "systeem" => Theme::System,
                        other => {
                            warn!(theme = other, "unknown theme; use licht, donker or systeem");
                            continue;
                        }
                    };
                    let mut next = preferences.clone();
                    next.theme = theme;
                    if store.save(&next, view.as_ref()).is_ok() {
                        preferences = next;
                    }
                    continue;
                }
                if let Some(rest) = line.strip_prefix(":tijd ") {
                    let mut next = preferences.clone();
                    next.timer_seconds = match rest.trim().parse() {
                        Ok(seconds) => seconds,
                        Err(_) => {
                            warn!(input = rest, "timer needs a whole number of seconds");
                            continue;
                        }
                    };
                    match store.save(&next, view.as_ref()) {
                        Ok(()) => {
                            if timer_duration.is_some() && !controller.timer().is_running() {
                                controller.timer().reset(Some(next.timer_duration()));
                            }
                            preferences = next;
                        }
                        Err(err) => warn!(error = %err, "timer preference rejected"),
                    }
                    continue;
                }

                let action = match line.parse::<usize>() {
                    Ok(number) => view.binding(number),
                    Err(_) => command(line).map(UiAction::Act),
                };
                let Some(action) = action else {
                    warn!(input = line, "no such control");
                    continue;
                };
                // Requests run in the background so the countdown keeps ticking.
                let controller = controller.clone();
                tokio::spawn(async move {
                    let outcome = controller.dispatch(action).await;
                    debug!(?outcome, "control handled");
                });
            }
        }
    }

    info!(session = %controller.id(), "session closed");
    Ok(())
}

fn no_command<A>(_line: &str) -> Option<A> {
    None
}

/// `g <team> <value>` submits an estimate; teams are numbered from 1.
fn guess_command(line: &str) -> Option<EstimatesAction> {
    let mut parts = line.split_whitespace();
    if parts.next()? != "g" {
        return None;
    }
    let team: usize = parts.next()?.parse().ok()?;
    let raw = parts.next()?;
    if let Err(err) = validate_decimal(raw) {
        warn!(error = %err, "estimate rejected");
        return None;
    }
    let value = parse_decimal(raw)?;
    Some(EstimatesAction::Guess {
        team: team.checked_sub(1)?,
        value,
    })
}

/// Log to stderr so the rendered page stays readable on stdout.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn,party_games_client=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
