mod auth;
mod images;
mod preferences;
mod terminal;
mod trips;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tripwiz_api::TripApiClient;
use tripwiz_core::{SortSpec, TripQuery};

use auth::AuthCommands;
use images::ImagesCommands;
use preferences::PreferencesCommands;
use terminal::Terminal;
use trips::TripsCommands;

#[derive(Debug, Parser)]
#[command(name = "tripwiz")]
#[command(about = "Plan, browse, and manage trips from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in, register, or show your profile
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Browse and manage trips
    Trips {
        #[command(subcommand)]
        command: TripsCommands,
    },
    /// Travel preference tags
    Preferences {
        #[command(subcommand)]
        command: PreferencesCommands,
    },
    /// Upload and manage images
    Images {
        #[command(subcommand)]
        command: ImagesCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("tripwiz ready; run `tripwiz --help` for commands");
        return Ok(());
    };

    let config = tripwiz_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, api = %config.api_base_url, "starting");
    let client = TripApiClient::from_config(&config)?;
    let terminal = Terminal::new();

    match command {
        Commands::Auth { command } => match command {
            AuthCommands::Login { email, password } => {
                auth::run_auth_login(&client, &terminal, email, password).await?;
            }
            AuthCommands::Register => auth::run_auth_register(&client, &terminal).await?,
            AuthCommands::Profile { name } => auth::run_auth_profile(&client, name).await?,
        },
        Commands::Trips { command } => match command {
            TripsCommands::List {
                search,
                min_price,
                max_price,
                sort,
            } => {
                let query = trip_query(search, min_price, max_price, sort);
                trips::run_trips_list(&client, &query).await?;
            }
            TripsCommands::Show { id } => trips::run_trips_show(&client, &config, id).await?,
            TripsCommands::Create => trips::run_trips_create(&client, &config, &terminal).await?,
            TripsCommands::Edit { id } => {
                trips::run_trips_edit(&client, &config, &terminal, id).await?;
            }
            TripsCommands::Delete { id } => trips::run_trips_delete(&client, &terminal, id).await?,
        },
        Commands::Preferences { command } => match command {
            PreferencesCommands::List => preferences::run_preferences_list(&client).await?,
            PreferencesCommands::Assign { ids } => {
                preferences::run_preferences_assign(&client, &ids).await?;
            }
        },
        Commands::Images { command } => match command {
            ImagesCommands::UploadCover { path } => {
                images::run_images_upload_cover(&client, &config, &path).await?;
            }
            ImagesCommands::Upload { paths, trip } => {
                images::run_images_upload(&client, &config, &paths, trip).await?;
            }
            ImagesCommands::List { trip } => {
                images::run_images_list(&client, &config, trip).await?;
            }
            ImagesCommands::Delete { id } => {
                images::run_images_delete(&client, &terminal, id).await?;
            }
        },
    }

    Ok(())
}

fn trip_query(
    search: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    sort: SortSpec,
) -> TripQuery {
    TripQuery {
        search: search.unwrap_or_default(),
        min_price,
        max_price,
        sort,
    }
}

#[cfg(test)]
mod tests;
