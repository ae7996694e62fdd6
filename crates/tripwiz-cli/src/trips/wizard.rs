//! Interactive driver for the trip wizard.

use std::str::FromStr;
use std::time::Duration;

use tripwiz_api::TripApiClient;
use tripwiz_core::{AppConfig, Coordinate, TripField};
use tripwiz_wizard::steps::MarkerState;
use tripwiz_wizard::{Action, StepView, SubmitOutcome, WizardController, WizardError};

use crate::terminal::{ExitFlag, HomeLocation, Terminal};

const HELP: &str = "\
commands:
  set <field> <value>   edit a field (name, description, cover_image, price, duration,
                        start_latitude, start_longitude, end_latitude, end_longitude)
  prefs <id>...         attach preference IDs
  pick <lat> <lng>      place the current step's location
  locate                use the configured home location
  dismiss               hide the location error
  next | back           move between steps
  submit                submit from the review step
  cancel                discard the draft
  show                  redraw the current step
  help                  this text";

/// One line typed at the wizard prompt.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum WizardCommand {
    Set(TripField, String),
    Prefs(Vec<u64>),
    Pick(Coordinate),
    Locate,
    Dismiss,
    Next,
    Back,
    Submit,
    Cancel,
    Show,
    Help,
}

impl FromStr for WizardCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        match verb.to_ascii_lowercase().as_str() {
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err("usage: set <field> <value>".to_string());
                }
                Ok(Self::Set(field.parse()?, value.trim().to_string()))
            }
            "prefs" => rest
                .split_whitespace()
                .map(|id| {
                    id.parse::<u64>()
                        .map_err(|_| format!("'{id}' is not a preference ID"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Prefs),
            "pick" => {
                let mut parts = rest.split_whitespace();
                let (Some(lat), Some(lng), None) = (parts.next(), parts.next(), parts.next())
                else {
                    return Err("usage: pick <lat> <lng>".to_string());
                };
                let lat: f64 = lat.parse().map_err(|_| format!("'{lat}' is not a number"))?;
                let lng: f64 = lng.parse().map_err(|_| format!("'{lng}' is not a number"))?;
                Coordinate::new(lat, lng)
                    .map(Self::Pick)
                    .map_err(|e| e.to_string())
            }
            "locate" => Ok(Self::Locate),
            "dismiss" => Ok(Self::Dismiss),
            "next" | "n" => Ok(Self::Next),
            "back" | "b" => Ok(Self::Back),
            "submit" => Ok(Self::Submit),
            "cancel" => Ok(Self::Cancel),
            "show" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            other => Err(format!("unknown command '{other}'; type `help`")),
        }
    }
}

/// Start the wizard in create mode.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub(crate) async fn run_trips_create(
    client: &TripApiClient,
    config: &AppConfig,
    terminal: &Terminal,
) -> anyhow::Result<()> {
    let wizard = WizardController::create(config.default_location)
        .with_navigation_delay(Duration::from_millis(config.navigation_delay_ms));
    drive(wizard, client, config, terminal).await
}

/// Start the wizard in edit mode for trip `id`.
///
/// # Errors
///
/// Returns an error if the trip cannot be loaded or stdin cannot be read.
pub(crate) async fn run_trips_edit(
    client: &TripApiClient,
    config: &AppConfig,
    terminal: &Terminal,
    id: u64,
) -> anyhow::Result<()> {
    let trip = client
        .get_trip(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load trip. Please try again. ({e})"))?;
    let wizard = WizardController::edit(&trip)
        .with_fallback_location(config.default_location)
        .with_navigation_delay(Duration::from_millis(config.navigation_delay_ms));
    drive(wizard, client, config, terminal).await
}

async fn drive(
    mut wizard: WizardController,
    client: &TripApiClient,
    config: &AppConfig,
    terminal: &Terminal,
) -> anyhow::Result<()> {
    let geolocation = HomeLocation(config.home_location);
    let exit = ExitFlag::default();
    print_view(&wizard.render());
    eprintln!("type `help` for commands");

    while !exit.is_set() {
        let Some(line) = terminal.read_line("wizard> ").await? else {
            tracing::info!("stdin closed; leaving the wizard without saving");
            break;
        };
        if line.is_empty() {
            continue;
        }
        let command = match line.parse::<WizardCommand>() {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        let result = match command {
            WizardCommand::Set(field, value) => wizard.edit_field(field, value),
            WizardCommand::Prefs(ids) => wizard.set_preferences(ids),
            WizardCommand::Pick(at) => wizard.click_map(at),
            WizardCommand::Locate => wizard.locate(&geolocation).await.map(|_| ()),
            WizardCommand::Dismiss => {
                wizard.dismiss_location_error();
                Ok(())
            }
            WizardCommand::Next => wizard.advance(terminal).map(|_| ()),
            WizardCommand::Back => wizard.retreat().map(|_| ()),
            WizardCommand::Submit => wizard
                .submit_final(terminal, client, terminal, &exit)
                .await
                .map(|outcome| match outcome {
                    SubmitOutcome::Submitted(trip) => println!("saved trip #{}", trip.id),
                    SubmitOutcome::Declined => eprintln!("submission cancelled"),
                }),
            WizardCommand::Cancel => wizard.cancel(terminal, &exit).await.map(|_| ()),
            WizardCommand::Show => Ok(()),
            WizardCommand::Help => {
                eprintln!("{HELP}");
                continue;
            }
        };

        match result {
            // Failures here are already shown by the notifier or the redrawn step.
            Ok(())
            | Err(
                WizardError::Validation { .. }
                | WizardError::Geolocation(_)
                | WizardError::Submission(_),
            ) => {}
            Err(WizardError::NotOffered { step, action }) => {
                eprintln!("{action} is not available on {}", step.title());
            }
            Err(WizardError::Finished) => break,
        }
        if !wizard.is_finished() {
            print_view(&wizard.render());
        }
    }

    Ok(())
}

fn print_view(view: &StepView) {
    let progress: Vec<String> = view
        .progress
        .iter()
        .map(|m| {
            let mark = match m.state {
                MarkerState::Completed => "✓",
                MarkerState::Current => "●",
                MarkerState::Upcoming => "○",
            };
            format!("{mark} {}", m.title)
        })
        .collect();

    println!("\n{}", progress.join("  "));
    println!("Step {} of 4: {}", view.step.id(), view.heading);
    println!("{}\n", view.description);

    for row in &view.rows {
        let key = row.field.map(|f| format!(" [{f}]")).unwrap_or_default();
        let value = if row.value.is_empty() { "-" } else { row.value.as_str() };
        println!("  {}{key}: {value}", row.label);
        if let Some(error) = &row.error {
            println!("    ! {error}");
        }
    }

    if let Some(panel) = &view.location {
        println!("\n  Selected {} location (zoom {}):", panel.target, panel.zoom);
        for line in panel.readout.lines() {
            println!("    {line}");
        }
        if let Some(error) = &panel.error {
            println!("  ⚠ {error} (type `dismiss` to hide)");
        }
    }

    let actions: Vec<String> = view
        .actions
        .iter()
        .map(|a| match a {
            Action::Previous => "back".to_string(),
            Action::Next => "next".to_string(),
            Action::Submit => format!("submit ({})", view.submit_label),
            Action::Cancel => "cancel".to_string(),
        })
        .collect();
    println!("\n  actions: {}", actions.join(" | "));
}
