use tripwiz_api::TripApiClient;
use tripwiz_core::catalog::summary;
use tripwiz_core::images::display_url;
use tripwiz_core::trip::format_idr;
use tripwiz_core::{AppConfig, ImageKind, Trip, TripQuery};
use tripwiz_wizard::{ConfirmKind, Confirmer, Notifier};

use crate::terminal::Terminal;

/// List trips, filtered and sorted on the client.
///
/// # Errors
///
/// Returns an error if the trips cannot be fetched.
pub(crate) async fn run_trips_list(
    client: &TripApiClient,
    query: &TripQuery,
) -> anyhow::Result<()> {
    let trips = client
        .list_trips()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load trips. Please try again. ({e})"))?;
    let shown = query.apply(&trips);

    if shown.is_empty() {
        if query.is_filtered() {
            println!("no trips match your filters; try adjusting the search or price range");
        } else {
            println!("no trips yet; run `trips create` to plan one");
        }
        return Ok(());
    }

    println!(
        "{:<6}{:<34}{:>18}{:>7}  CREATED",
        "ID", "NAME", "PRICE", "DAYS"
    );
    for trip in &shown {
        println!(
            "{:<6}{:<34}{:>18}{:>7}  {}",
            trip.id,
            truncate(&trip.name, 32),
            format_idr(trip.price),
            trip.duration,
            trip.created_at.format("%Y-%m-%d")
        );
    }
    println!("\n{}", summary(shown.len(), trips.len()));

    Ok(())
}

/// Show a trip's details and gallery.
///
/// # Errors
///
/// Returns an error if the trip cannot be fetched.
pub(crate) async fn run_trips_show(
    client: &TripApiClient,
    config: &AppConfig,
    id: u64,
) -> anyhow::Result<()> {
    let trip = client
        .get_trip(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load trip. Please try again. ({e})"))?;
    print_trip(&trip, &config.asset_base_url);

    match client.trip_images(id).await {
        Ok(images) if images.is_empty() => println!("Images:      none"),
        Ok(images) => {
            println!("Images:");
            for image in &images {
                println!(
                    "  #{:<5} {}",
                    image.id,
                    display_url(&config.asset_base_url, &image.url, ImageKind::Gallery)
                );
            }
        }
        Err(e) => tracing::warn!(trip_id = id, error = %e, "could not load trip images"),
    }

    Ok(())
}

/// Delete a trip after the delete-item confirmation.
///
/// # Errors
///
/// Returns an error if the trip cannot be fetched or stdin is unavailable.
pub(crate) async fn run_trips_delete(
    client: &TripApiClient,
    terminal: &Terminal,
    id: u64,
) -> anyhow::Result<()> {
    let trip = client.get_trip(id).await?;
    let kind = ConfirmKind::DeleteItem { name: trip.name };
    if !terminal.confirm(&kind).await.is_confirmed() {
        println!("delete cancelled");
        return Ok(());
    }

    match client.delete_trip(id).await {
        Ok(()) => {
            tracing::info!(trip_id = id, "trip deleted");
            terminal.success("The trip has been deleted successfully.");
        }
        Err(e) => {
            tracing::warn!(trip_id = id, error = %e, "trip delete failed");
            terminal.error("Failed to delete the trip. Please try again.");
        }
    }
    Ok(())
}

fn print_trip(trip: &Trip, asset_base: &str) {
    println!("Trip #{}: {}", trip.id, trip.name);
    println!("Description: {}", trip.description);
    println!("Price:       {}", format_idr(trip.price));
    println!(
        "Duration:    {} {}",
        trip.duration,
        if trip.duration == 1 { "day" } else { "days" }
    );
    println!(
        "Start:       {:.6}, {:.6}",
        trip.start_latitude, trip.start_longitude
    );
    println!(
        "End:         {:.6}, {:.6}",
        trip.end_latitude, trip.end_longitude
    );
    if !trip.cover_image.is_empty() {
        println!(
            "Cover:       {}",
            display_url(asset_base, &trip.cover_image, ImageKind::Cover)
        );
    }
    if let Some(user) = &trip.user {
        println!("Planner:     {} <{}>", user.name, user.email);
    }
    println!("Created:     {}", trip.created_at.format("%Y-%m-%d %H:%M UTC"));
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max - 3).collect::<String>())
    } else {
        text.to_string()
    }
}
