//! JSON-lines bridge between display processes and the runtime.
//!
//! Input, one JSON object per line:
//! - match commands in wire form, `{"command": "end-set", "payload": {}}`
//! - `{"command": "request-state"}` to get the current state again
//! - `{"command": "import-logo", "payload": {"sourcePath": "..."}}` to copy a
//!   logo file into the sponsors directory
//!
//! Output, one JSON object per line:
//! - `{"type": "state-update", "payload": <state>}` after every change
//! - `{"type": "play-sound", "payload": "buzzer"}`
//! - `{"type": "logo-imported", "payload": {"sourcePath", "logoPath"}}`
//!
//! Bad input lines are logged and skipped.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use match_core::MatchState;
use runtime::{AudioCue, Event, LogoStore, RuntimeError, RuntimeHandle, Topic, decode_value};

#[derive(Debug, Serialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
enum Outbound<'a> {
    StateUpdate(&'a MatchState),
    PlaySound(AudioCue),
    LogoImported {
        source_path: String,
        /// `None` when the import failed.
        logo_path: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportLogo {
    source_path: PathBuf,
}

pub struct Bridge {
    handle: RuntimeHandle,
    logos: Option<LogoStore>,
}

impl Bridge {
    pub fn new(handle: RuntimeHandle, logos: Option<LogoStore>) -> Self {
        Self { handle, logos }
    }

    /// Pumps `input` into the runtime and runtime events into `output` until
    /// `input` is exhausted or the runtime stops.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut states = self.handle.subscribe(Topic::State);
        let mut audio = self.handle.subscribe(Topic::Audio);
        let mut lines = input.lines();

        let initial = self.handle.query_state().await?;
        write(&mut output, &Outbound::StateUpdate(&initial)).await?;

        loop {
            tokio::select! {
                // Forward everything a command produced before reading the next one.
                biased;

                event = states.recv() => match event {
                    Ok(Event::State(snapshot)) => {
                        write(&mut output, &Outbound::StateUpdate(&snapshot)).await?;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Display bridge skipped {} state update(s)", skipped);
                        let latest = self.handle.query_state().await?;
                        write(&mut output, &Outbound::StateUpdate(&latest)).await?;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },

                event = audio.recv() => match event {
                    Ok(Event::Audio(cue)) => write(&mut output, &Outbound::PlaySound(cue)).await?,
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!("Display bridge dropped {} audio cue(s)", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },

                line = lines.next_line() => {
                    match line.context("failed to read command input")? {
                        Some(line) => self.handle_line(&line, &mut output).await?,
                        None => {
                            info!("Command input closed");
                            break;
                        }
                    }
                }
            }
        }

        output.flush().await?;
        Ok(())
    }

    async fn handle_line<W>(&self, line: &str, output: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring malformed input line: {}", e);
                return Ok(());
            }
        };

        match value.get("command").and_then(Value::as_str) {
            Some("request-state") => {
                let snapshot = self.handle.query_state().await?;
                write(output, &Outbound::StateUpdate(&snapshot)).await
            }
            Some("import-logo") => {
                let payload = value.get("payload").cloned().unwrap_or(Value::Null);
                self.import_logo(payload, output).await
            }
            _ => self.dispatch(value).await,
        }
    }

    /// Applies a match command. Its snapshot arrives through the state topic.
    async fn dispatch(&self, value: Value) -> Result<()> {
        let result = match decode_value(value) {
            Ok(command) => self.handle.execute(command).await.map(|_| ()),
            Err(e) => Err(RuntimeError::from(e)),
        };

        match result {
            Ok(()) => Ok(()),
            Err(RuntimeError::Decode(e)) => {
                warn!("Ignoring command: {}", e);
                Ok(())
            }
            // already logged by the controller
            Err(e) if e.is_recoverable() => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn import_logo<W>(&self, payload: Value, output: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let request: ImportLogo = match serde_json::from_value(payload) {
            Ok(request) => request,
            Err(e) => {
                warn!("Ignoring import-logo: {}", e);
                return Ok(());
            }
        };

        let logo_path = match &self.logos {
            Some(logos) => match logos.import(&request.source_path) {
                Ok(logo_ref) => Some(logo_ref),
                Err(e) => {
                    error!(
                        "Failed to import logo {}: {}",
                        request.source_path.display(),
                        e
                    );
                    None
                }
            },
            None => {
                warn!("Logo import requested but no data directory is configured");
                None
            }
        };

        let reply = Outbound::LogoImported {
            source_path: request.source_path.display().to_string(),
            logo_path,
        };
        write(output, &reply).await
    }
}

async fn write<W>(output: &mut W, message: &Outbound<'_>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    output.write_all(&line).await?;
    output.flush().await?;
    Ok(())
}
