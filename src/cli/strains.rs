use anyhow::{Context, Result};
use cannabot::bot::{HandlerError, StrainAction, strains::reply};
use cannabot_strain::{StrainCatalog, StrainError, StrainStore, StrainType};
use clap::Args;
use time::OffsetDateTime;

#[derive(Args)]
pub struct StrainsArgs {
    /// search, info, random, effects, medical, surprise, recommend, featured or stats
    action: StrainAction,

    /// Strain name, effect(s) or condition depending on the action
    name: Option<String>,

    #[arg(long)]
    strain_type: Option<StrainType>,

    #[arg(long)]
    limit: Option<usize>,

    /// Comma separated conditions for `recommend`
    #[arg(long)]
    medical: Option<String>,

    /// Comma separated strain names `recommend` skips
    #[arg(long)]
    exclude: Option<String>,

    #[arg(long)]
    max_thc: Option<f64>,

    #[arg(long)]
    min_cbd: Option<f64>,
}

/// Prints the embeds a `/strains` command would answer with.
pub fn run(config: &cannabot::Config, args: StrainsArgs) -> Result<()> {
    let store = StrainStore::load(&config.strains.dataset_path)
        .with_context(|| format!("loading {}", config.strains.dataset_path))?;
    let catalog = StrainCatalog::with_store(store, config.strains.discovery_options());
    let discovery = catalog.discovery()?;

    let command = cannabot::bot::StrainsArgs {
        action: args.action,
        name: args.name,
        strain_type: args.strain_type,
        limit: args.limit,
        medical: args.medical,
        exclude: args.exclude,
        max_thc: args.max_thc,
        min_cbd: args.min_cbd,
    };

    let today = OffsetDateTime::now_utc().date();
    match reply(&discovery, &command, today) {
        Ok(reply) => println!("{}", reply.to_text()),
        Err(HandlerError::Strain(StrainError::NotFound(name))) => {
            println!("'{name}' was not found in the strain database.")
        }
        Err(HandlerError::Strain(StrainError::EmptyPool)) => {
            println!("No strains match these preferences.")
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
