//! Image upload and gallery commands.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use tripwiz_api::TripApiClient;
use tripwiz_core::images::display_url;
use tripwiz_core::{AppConfig, ImageKind, UploadedImage};
use tripwiz_wizard::{ConfirmKind, Confirmer, Notifier};

use crate::terminal::Terminal;

/// Sub-commands available under `images`.
#[derive(Debug, Subcommand)]
pub enum ImagesCommands {
    /// Upload a trip cover image and print its path for `set cover_image`
    UploadCover { path: PathBuf },
    /// Upload gallery images
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Attach the images to this trip
        #[arg(long)]
        trip: Option<u64>,
    },
    /// List a trip's images, or your own uploads
    List {
        #[arg(long)]
        trip: Option<u64>,
    },
    /// Delete an uploaded image
    Delete { id: u64 },
}

/// # Errors
///
/// Returns an error if the file is invalid or the upload fails.
pub(crate) async fn run_images_upload_cover(
    client: &TripApiClient,
    config: &AppConfig,
    path: &Path,
) -> anyhow::Result<()> {
    let image = client.upload_cover(path).await?;
    tracing::info!(image_id = image.id, "cover uploaded");
    println!("{}", image.url);
    eprintln!(
        "preview: {}",
        display_url(&config.asset_base_url, &image.url, ImageKind::Cover)
    );
    Ok(())
}

/// # Errors
///
/// Returns an error if any file is invalid or the upload fails.
pub(crate) async fn run_images_upload(
    client: &TripApiClient,
    config: &AppConfig,
    paths: &[PathBuf],
    trip: Option<u64>,
) -> anyhow::Result<()> {
    let images = client.upload_images(paths, trip).await?;
    print_images(&images, &config.asset_base_url);
    Ok(())
}

/// # Errors
///
/// Returns an error if the images cannot be fetched.
pub(crate) async fn run_images_list(
    client: &TripApiClient,
    config: &AppConfig,
    trip: Option<u64>,
) -> anyhow::Result<()> {
    let images = match trip {
        Some(id) => client.trip_images(id).await?,
        None => client.my_images().await?,
    };
    if images.is_empty() {
        println!("no images found");
        return Ok(());
    }
    print_images(&images, &config.asset_base_url);
    Ok(())
}

/// # Errors
///
/// Returns an error if stdin is unavailable.
pub(crate) async fn run_images_delete(
    client: &TripApiClient,
    terminal: &Terminal,
    id: u64,
) -> anyhow::Result<()> {
    let kind = ConfirmKind::DeleteItem {
        name: format!("image #{id}"),
    };
    if !terminal.confirm(&kind).await.is_confirmed() {
        println!("delete cancelled");
        return Ok(());
    }
    match client.delete_image(id).await {
        Ok(()) => terminal.success("Image deleted successfully."),
        Err(e) => {
            tracing::warn!(image_id = id, error = %e, "image delete failed");
            terminal.error(e.server_message().unwrap_or("Failed to delete image"));
        }
    }
    Ok(())
}

fn print_images(images: &[UploadedImage], asset_base: &str) {
    println!("{:<7}{:<8}{:>10}  URL", "ID", "TRIP", "SIZE");
    for image in images {
        let trip = image
            .trip_id
            .map_or_else(|| "-".to_string(), |t| t.to_string());
        println!(
            "{:<7}{:<8}{:>10}  {}",
            image.id,
            trip,
            format!("{} KB", image.file_size.div_ceil(1024)),
            display_url(asset_base, &image.url, ImageKind::Gallery)
        );
    }
}
