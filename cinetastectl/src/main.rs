use anyhow::{Context, Result, bail};
use cinetaste_core::config::CoreConfig;
use cinetaste_core::context::AppContext;
use cinetaste_model::{CatalogId, SuggestionFilters, UpdateOutcome};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::{Cli, Command, render};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads env-backed flags
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = CoreConfig::from_env().context("invalid configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(backend) = cli.backend {
        config.generation.backend = backend.into();
    }

    tracing::debug!(?config, "configuration loaded");

    let ctx = AppContext::from_config(config).context("failed to set up services")?;
    run(&ctx, cli.command).await
}

async fn run(ctx: &AppContext, command: Command) -> Result<()> {
    if let Command::Resolve { title } = &command {
        let record = ctx
            .resolver
            .resolve(&title.join(" "))
            .await
            .context("resolution failed")?;
        print!("{}", render::record(&record));
        return Ok(());
    }

    ctx.store
        .initialize()
        .await
        .context("failed to load the collection")?;

    match command {
        Command::Resolve { .. } => {}
        Command::List { rating } => {
            let state = ctx.store.snapshot().await?;
            print!("{}", render::collection(&state, rating.map(Into::into)));
        }
        Command::Add { title, rating } => {
            let title = title.join(" ");
            let item = ctx
                .store
                .add(&title, rating.into())
                .await
                .with_context(|| format!("could not add \"{title}\""))?;
            println!("added to {}:", item.rating.label());
            print!("{}", render::item_details(&item));
        }
        Command::Remove { id } => match ctx.store.remove(CatalogId(id)).await? {
            Some(item) => println!("removed {}", item.title()),
            None => println!("no item with id {id}"),
        },
        Command::Rate { id, rating } => {
            match ctx.store.set_rating(CatalogId(id), rating.into()).await? {
                UpdateOutcome::Moved { from, to } => {
                    println!("moved {id} from {} to {}", from.label(), to.label())
                }
                UpdateOutcome::Replaced => println!("{id} already rated that way"),
                UpdateOutcome::Missing => bail!("no item with id {id}"),
            }
        }
        Command::Backfill { id: Some(id) } => match ctx.store.backfill(CatalogId(id)).await? {
            Some(item) => print!("{}", render::item_details(&item)),
            None => bail!("no item with id {id}"),
        },
        Command::Backfill { id: None } => {
            let report = ctx.store.backfill_missing().await?;
            print!("{}", render::backfill(&report));
        }
        Command::Suggest {
            category,
            genres,
            keywords,
            exclude,
        } => {
            let state = ctx.store.snapshot().await?;
            let filters = SuggestionFilters {
                category: category.map(Into::into),
                genres,
                keywords,
            };
            let unfiltered = filters.category.is_none()
                && filters.genres.is_empty()
                && filters.keywords.trim().is_empty();

            let result = if unfiltered {
                ctx.recommendations
                    .random_suggestion(&state, &exclude)
                    .await
            } else {
                ctx.recommendations
                    .personalized_suggestion(&state, &filters, &exclude)
                    .await
            };
            let recommendation = result.context("suggestion failed")?;
            print!("{}", render::recommendation(&recommendation));
        }
        Command::Predict { title } => {
            let title = title.join(" ");
            let state = ctx.store.snapshot().await?;
            let prediction = ctx
                .recommendations
                .predict(&title, &state)
                .await
                .context("prediction failed")?;
            print!("{}", render::prediction(&title, &prediction));
        }
        Command::Show { id } => match ctx.store.get(CatalogId(id)).await? {
            Some(item) => print!("{}", render::item_details(&item)),
            None => bail!("no item with id {id}"),
        },
    }

    Ok(())
}
