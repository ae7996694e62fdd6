use clap::Subcommand;
use tripwiz_api::TripApiClient;

/// Sub-commands available under `preferences`.
#[derive(Debug, Subcommand)]
pub enum PreferencesCommands {
    /// List available travel preferences
    List,
    /// Assign preferences to the signed-in user
    Assign {
        /// Preference IDs
        #[arg(required = true)]
        ids: Vec<u64>,
    },
}

/// # Errors
///
/// Returns an error if the preferences cannot be fetched.
pub(crate) async fn run_preferences_list(client: &TripApiClient) -> anyhow::Result<()> {
    let prefs = client.list_preferences().await?;
    if prefs.is_empty() {
        println!("no preferences defined");
        return Ok(());
    }
    println!("{:<6}NAME", "ID");
    for pref in &prefs {
        println!("{:<6}{}", pref.id, pref.name);
    }
    Ok(())
}

/// Resolve `ids` against the catalogue and assign them.
///
/// # Errors
///
/// Returns an error if an ID is unknown or the request fails.
pub(crate) async fn run_preferences_assign(
    client: &TripApiClient,
    ids: &[u64],
) -> anyhow::Result<()> {
    let all = client.list_preferences().await?;
    let mut chosen = Vec::with_capacity(ids.len());
    for id in ids {
        let pref = all
            .iter()
            .find(|p| p.id == *id)
            .ok_or_else(|| anyhow::anyhow!("preference {id} not found; see `preferences list`"))?;
        chosen.push(pref.clone());
    }

    let assigned = client.assign_preferences(&chosen).await?;
    let names: Vec<&str> = assigned.iter().map(|p| p.name.as_str()).collect();
    println!("assigned: {}", names.join(", "));
    Ok(())
}
