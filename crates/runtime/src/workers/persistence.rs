//! Persistence worker for match results and sponsor logo cleanup.
//!
//! Consumes [`Topic::Match`](crate::events::Topic::Match) notices:
//! - `SetFinalized` writes a round record
//! - `MatchCompleted` writes the final record
//! - `SponsorRemoved` deletes the sponsor's logo file
//!
//! Every failure is logged and dropped. The worker never feeds back into the
//! controller, so a slow or broken disk cannot stall the match.

use chrono::Local;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

use match_core::{MatchEvent, Sponsor};

use crate::events::{Event, MatchNotice};
use crate::repository::{FileResultRepository, LogoStore, MatchResult, RepositoryError};
use crate::runtime::PersistenceConfig;

/// Commands that can be sent to the persistence worker
pub enum Command {
    /// Shutdown the worker gracefully
    Shutdown,
}

/// Background worker that handles all file output
pub struct PersistenceWorker {
    results: Option<FileResultRepository>,
    logos: LogoStore,
    event_rx: broadcast::Receiver<Event>,
    command_rx: mpsc::Receiver<Command>,
}

impl PersistenceWorker {
    pub fn new(
        config: PersistenceConfig,
        event_rx: broadcast::Receiver<Event>,
        command_rx: mpsc::Receiver<Command>,
    ) -> Self {
        let results = config
            .enable_results
            .then(|| FileResultRepository::new(&config.results_dir));

        Self {
            results,
            logos: LogoStore::new(&config.data_dir),
            event_rx,
            command_rx,
        }
    }

    /// Main worker loop
    pub async fn run(mut self) {
        info!(
            "PersistenceWorker started: results={}, logos={}",
            self.results
                .as_ref()
                .map_or_else(|| "disabled".to_string(), |r| r.base_dir().display().to_string()),
            self.logos.sponsors_dir().display()
        );

        loop {
            tokio::select! {
                // Drain queued notices before honoring a shutdown.
                biased;

                event = self.event_rx.recv() => {
                    match event {
                        Ok(Event::Match(notice)) => self.handle_notice(notice),
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!("PersistenceWorker lagged behind, {} notice(s) skipped", skipped);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            info!("Event bus closed, shutting down PersistenceWorker");
                            break;
                        }
                    }
                }

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(Command::Shutdown) => {
                            info!("Shutdown command received");
                            break;
                        }
                        None => {
                            debug!("Command channel closed");
                            break;
                        }
                    }
                }
            }
        }

        info!("PersistenceWorker stopped");
    }

    fn handle_notice(&self, notice: MatchNotice) {
        match &notice.event {
            MatchEvent::SetFinalized { record } => {
                self.save_result(&notice, Some(record.set_number));
            }
            MatchEvent::MatchCompleted { .. } => self.save_result(&notice, None),
            MatchEvent::SponsorRemoved { sponsor } => self.remove_logo(sponsor),
            _ => {}
        }
    }

    /// Writes a round record (`round = Some(n)`) or the final record.
    fn save_result(&self, notice: &MatchNotice, round: Option<u32>) {
        let Some(results) = &self.results else {
            return;
        };

        let now = Local::now();
        let result = MatchResult::from_state(&notice.snapshot, round.is_none(), now);
        let saved = match round {
            Some(round) => results.save_round(round, &result, now),
            None => results.save_final(&result, now),
        };

        match saved {
            Ok(path) => info!("Match result saved: {}", path.display()),
            Err(e) => error!("Failed to save match result: {}", e),
        }
    }

    fn remove_logo(&self, sponsor: &Sponsor) {
        if sponsor.logo_path.is_empty() {
            return;
        }
        match self.logos.remove(&sponsor.logo_path) {
            Ok(true) => debug!("Deleted logo for sponsor {}", sponsor.id),
            Ok(false) => debug!("Logo for sponsor {} was already gone", sponsor.id),
            Err(RepositoryError::InvalidLogoRef(_)) => {
                debug!("Logo {:?} is not in the sponsors directory, kept", sponsor.logo_path);
            }
            Err(e) => error!("Failed to delete logo {:?}: {}", sponsor.logo_path, e),
        }
    }
}
