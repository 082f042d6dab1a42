use std::path::PathBuf;

use cinetaste_core::config::BackendKind;
use cinetaste_model::{Category, Rating};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "cinetastectl",
    version,
    about = "Rate movies and series, keep the collection, ask for suggestions"
)]
pub struct Cli {
    /// Directory holding watchedData.json
    #[arg(long, global = true, env = "CINETASTE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Generation backend used for disambiguation and suggestions
    #[arg(long, global = true, value_enum, env = "GENERATION_BACKEND")]
    pub backend: Option<BackendArg>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the collection, newest first within each rating
    List {
        #[arg(long, value_enum)]
        rating: Option<RatingArg>,
    },
    /// Resolve a title against the catalog and file it under a rating
    Add {
        /// Free-text title, optionally with a year, e.g. "Interstellar (2014)"
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
        #[arg(long, short, value_enum)]
        rating: RatingArg,
    },
    /// Remove an item by catalog id
    Remove { id: u64 },
    /// Move an item to another rating
    Rate {
        id: u64,
        #[arg(value_enum)]
        rating: RatingArg,
    },
    /// Fetch missing synopses and posters (all items, or one id)
    Backfill { id: Option<u64> },
    /// Resolve a title and print the record without storing it
    Resolve {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Ask for a recommendation based on the collection
    Suggest {
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
        /// Genre filter (repeatable)
        #[arg(long = "genre")]
        genres: Vec<String>,
        #[arg(long, default_value = "")]
        keywords: String,
        /// Extra titles never to suggest (repeatable)
        #[arg(long = "exclude")]
        exclude: Vec<String>,
    },
    /// Predict how much you would enjoy a title
    Predict {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Show one item with its seed snippet
    Show { id: u64 },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RatingArg {
    Loved,
    Liked,
    Meh,
    Disliked,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Movie,
    Series,
    Anime,
    Show,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BackendArg {
    Gemini,
    Stub,
    Disabled,
}

impl From<RatingArg> for Rating {
    fn from(val: RatingArg) -> Self {
        match val {
            RatingArg::Loved => Rating::Loved,
            RatingArg::Liked => Rating::Liked,
            RatingArg::Meh => Rating::Meh,
            RatingArg::Disliked => Rating::Disliked,
        }
    }
}

impl From<CategoryArg> for Category {
    fn from(val: CategoryArg) -> Self {
        match val {
            CategoryArg::Movie => Category::Movie,
            CategoryArg::Series => Category::Series,
            CategoryArg::Anime => Category::Anime,
            CategoryArg::Show => Category::Show,
        }
    }
}

impl From<BackendArg> for BackendKind {
    fn from(val: BackendArg) -> Self {
        match val {
            BackendArg::Gemini => BackendKind::Gemini,
            BackendArg::Stub => BackendKind::Stub,
            BackendArg::Disabled => BackendKind::Disabled,
        }
    }
}
