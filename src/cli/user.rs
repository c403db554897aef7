use clap::Subcommand;

#[derive(Subcommand)]
pub enum UserCommand {
    /// Set or clear a user's daily THC limit
    SetLimit {
        /// Discord user id
        id: String,

        /// Limit in mg, omit to fall back to the configured default
        mg: Option<f64>,
    },
    /// Set the timezone used for a user's daily totals
    SetTimezone {
        /// Discord user id
        id: String,

        /// IANA name, e.g. Europe/Paris
        timezone: String,
    },
}

pub async fn run(config: cannabot::Config, command: UserCommand) -> anyhow::Result<()> {
    let pool = cannabot::create_pool(&config.database.url, 1).await?;
    let consumption = cannabot_consumption::Command::new(cannabot_shared::State::single(pool))
        .with_default_daily_limit(config.bot.max_daily_thc_default);

    match command {
        UserCommand::SetLimit { id, mg } => {
            let user = consumption.set_daily_limit(&id, mg).await?;
            match consumption.daily_limit(&user) {
                Some(limit) => tracing::info!(user_id = %user.id, limit, "daily limit updated"),
                None => tracing::info!(user_id = %user.id, "daily limit cleared"),
            }
        }
        UserCommand::SetTimezone { id, timezone } => {
            let user = consumption.set_timezone(&id, &timezone).await?;
            tracing::info!(user_id = %user.id, timezone = %user.timezone, "timezone updated");
        }
    }

    Ok(())
}
