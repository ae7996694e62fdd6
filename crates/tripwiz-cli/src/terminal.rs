//! Terminal implementations of the wizard collaborators.

use std::cell::Cell;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tripwiz_core::Coordinate;
use tripwiz_wizard::{
    ConfirmKind, Confirmation, Confirmer, GeolocationError, GeolocationProvider, Navigator,
    Notifier,
};

/// Line-oriented stdin/stderr front-end.
pub(crate) struct Terminal {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl Terminal {
    pub(crate) fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Prints `prompt` and reads one line. `None` means stdin is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if stdin or stderr cannot be used.
    pub(crate) async fn read_line(&self, prompt: &str) -> anyhow::Result<Option<String>> {
        let mut stderr = tokio::io::stderr();
        stderr.write_all(prompt.as_bytes()).await?;
        stderr.flush().await?;
        let line = self.lines.lock().await.next_line().await?;
        Ok(line.map(|l| l.trim().to_string()))
    }
}

impl Confirmer for Terminal {
    async fn confirm(&self, kind: &ConfirmKind) -> Confirmation {
        eprintln!("\n{}\n{}", kind.title(), kind.text());
        let prompt = format!("[y] {} / [n] {}: ", kind.confirm_label(), kind.decline_label());
        match self.read_line(&prompt).await {
            Ok(Some(answer)) => parse_confirmation(&answer),
            Ok(None) => Confirmation::Declined,
            Err(e) => {
                tracing::warn!(error = %e, "could not read confirmation");
                Confirmation::Declined
            }
        }
    }
}

impl Notifier for Terminal {
    fn success(&self, message: &str) {
        eprintln!("✔ {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("✖ {message}");
    }
}

/// Anything other than an explicit yes declines.
pub(crate) fn parse_confirmation(answer: &str) -> Confirmation {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Confirmation::Confirmed,
        _ => Confirmation::Declined,
    }
}

/// Reports the configured home coordinate as the device position.
pub(crate) struct HomeLocation(pub Option<Coordinate>);

impl GeolocationProvider for HomeLocation {
    async fn current_position(&self) -> Result<Coordinate, GeolocationError> {
        self.0.ok_or(GeolocationError::PositionUnavailable)
    }
}

/// Records that the wizard asked to leave so the command loop can stop.
#[derive(Default)]
pub(crate) struct ExitFlag(Cell<bool>);

impl ExitFlag {
    pub(crate) fn is_set(&self) -> bool {
        self.0.get()
    }
}

impl Navigator for ExitFlag {
    fn leave(&self) {
        self.0.set(true);
    }
}
