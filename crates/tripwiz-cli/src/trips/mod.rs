//! Trip command handlers for the CLI.
//!
//! `list`, `show`, and `delete` talk to the API directly; `create` and `edit`
//! hand over to the interactive wizard loop in [`wizard`].

mod query;
mod wizard;

use clap::Subcommand;
use tripwiz_core::SortSpec;

pub(crate) use query::{run_trips_delete, run_trips_list, run_trips_show};
pub(crate) use wizard::{run_trips_create, run_trips_edit};

/// Sub-commands available under `trips`.
#[derive(Debug, Subcommand)]
pub enum TripsCommands {
    /// List trips with optional search, price range, and ordering
    List {
        /// Case-insensitive match on name or description
        #[arg(long)]
        search: Option<String>,
        /// Lowest price to include (IDR)
        #[arg(long)]
        min_price: Option<f64>,
        /// Highest price to include (IDR)
        #[arg(long)]
        max_price: Option<f64>,
        /// Ordering, e.g. price-asc or created_at-desc
        #[arg(long, default_value = "created_at-desc")]
        sort: SortSpec,
    },
    /// Show one trip with its images
    Show {
        /// Trip ID
        id: u64,
    },
    /// Create a trip with the step-by-step wizard
    Create,
    /// Edit an existing trip with the wizard
    Edit {
        /// Trip ID
        id: u64,
    },
    /// Delete a trip after confirmation
    Delete {
        /// Trip ID
        id: u64,
    },
}
