//! # Cinetaste Core
//!
//! Resolves free-text titles against an external catalog and keeps the
//! user's rated collection.
//!
//! ## Overview
//!
//! - [`throttle`]: FIFO, one-at-a-time pacing for every catalog request
//! - [`providers`]: typed catalog search/detail operations (TMDB)
//! - [`resolver`]: the search fallback chain, disambiguation and category
//!   derivation
//! - [`collection`]: the rating-partitioned store and its persistence
//! - [`generation`]: pluggable text generation (Gemini, stub, disabled)
//! - [`recommend`]: suggestions and predictions from the taste profile
//! - [`config`] / [`context`]: environment configuration and wiring
//!
//! ## Example
//!
//! ```no_run
//! use cinetaste_core::{config::CoreConfig, context::AppContext};
//! use cinetaste_model::Rating;
//!
//! async fn rate_one() -> Result<(), Box<dyn std::error::Error>> {
//!     let ctx = AppContext::from_config(CoreConfig::from_env()?)?;
//!     ctx.store.initialize().await?;
//!     let item = ctx.store.add("Interstellar (2014)", Rating::Loved).await?;
//!     println!("{} -> {}", item.title(), item.record.category);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]

pub mod collection;
pub mod config;
pub mod context;
pub mod error;
pub mod generation;
pub mod providers;
pub mod recommend;
pub mod resolver;
pub mod throttle;

pub use collection::{CollectionStore, LoadSource};
pub use error::{CollectionError, RecommendError, ResolveError, StorageError};
pub use resolver::TitleResolver;
pub use throttle::{RequestThrottle, ThrottleError};
