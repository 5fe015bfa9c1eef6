//! Sushi CLI commands.

use clap::{Args, Subcommand};

use sushisync_core::filters::{parse_filters, write_filters, FilterPatch, SortBy, TypeFilter};
use sushisync_core::sushi::SushiType;

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List sushi, optionally following filter changes.
    List(ListArgs),
    /// Get sushi by ID.
    Get {
        /// Sushi ID.
        id: String,
    },
    /// Create a new sushi item. Missing fields are prompted for.
    Create(CreateArgs),
    /// Delete sushi by ID after confirmation.
    Delete {
        /// Sushi ID.
        id: String,
        /// Skip the confirmation dialog.
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Filters for `list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive name search.
    #[arg(long)]
    pub search: Option<String>,
    /// Sort field (name or price).
    #[arg(long)]
    pub sort_by: Option<SortBy>,
    /// Type filter (all, Roll or Nigiri).
    #[arg(long = "type")]
    pub sushi_type: Option<TypeFilter>,
    /// Start from a location query string, e.g. "search=tuna&sortBy=price".
    #[arg(long)]
    pub location: Option<String>,
    /// Keep running and read search text from stdin, one line per edit.
    #[arg(long)]
    pub watch: bool,
}

impl ListArgs {
    /// Flags given on the command line, as a patch over the location.
    pub fn patch(&self) -> FilterPatch {
        FilterPatch {
            search: self.search.clone(),
            sort_by: self.sort_by,
            sushi_type: self.sushi_type,
        }
    }

    /// The starting location: `--location` with the flag filters applied.
    ///
    /// Malformed values in `--location` are logged and fall back to
    /// defaults.
    pub fn initial_location(&self) -> String {
        let query = self.location.as_deref().unwrap_or_default();
        let (state, errors) = parse_filters(query);
        for error in &errors {
            tracing::warn!(%error, "ignoring location parameter");
        }
        write_filters(query, &state.merged(&self.patch()))
    }
}

/// Fields for `create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: Option<String>,
    /// Image URL.
    #[arg(long)]
    pub image: Option<String>,
    #[arg(long)]
    pub price: Option<f64>,
    /// Nigiri or Roll.
    #[arg(long = "type")]
    pub sushi_type: Option<SushiType>,
    #[arg(long)]
    pub fish: Option<String>,
    /// Preparation, e.g. Fresh or Smoked.
    #[arg(long)]
    pub fish_type: Option<String>,
    #[arg(long)]
    pub pieces: Option<u32>,
}
