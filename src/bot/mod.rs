//! Slash command layer: parses interaction options into a [`BotCommand`] and
//! answers it with embeds.

mod command;
mod consume;
pub mod embed;
mod help;
pub mod image;
mod stash;
mod stats;
pub mod strains;

pub use command::*;
pub use embed::{Embed, Reply};

use std::sync::Arc;

use cannabot_strain::{StrainCatalog, StrainError};
use time::OffsetDateTime;

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Command(#[from] cannabot_shared::Error),

    #[error(transparent)]
    Strain(#[from] StrainError),
}

impl HandlerError {
    /// Message that can be shown to the user as is.
    fn user_message(&self) -> Option<String> {
        match self {
            HandlerError::Command(err) if err.is_user_facing() => Some(err.to_string()),
            HandlerError::Strain(StrainError::NotReady) => {
                Some("The strain database is still loading, try again in a moment.".to_owned())
            }
            HandlerError::Strain(StrainError::EmptyPool) => Some(
                "No strains match these preferences. Try fewer filters or different effects."
                    .to_owned(),
            ),
            HandlerError::Strain(StrainError::NotFound(name)) => {
                Some(format!("'{name}' was not found in the strain database."))
            }
            _ => None,
        }
    }
}

pub type HandlerResult = Result<Reply, HandlerError>;

#[derive(Clone)]
pub struct Bot {
    catalog: Arc<StrainCatalog>,
    consumption: cannabot_consumption::Command,
}

impl Bot {
    pub fn new(catalog: Arc<StrainCatalog>, consumption: cannabot_consumption::Command) -> Self {
        Self {
            catalog,
            consumption,
        }
    }

    pub fn catalog(&self) -> &Arc<StrainCatalog> {
        &self.catalog
    }

    pub async fn handle(&self, user_id: &str, command: BotCommand) -> Reply {
        self.handle_at(user_id, command, OffsetDateTime::now_utc())
            .await
    }

    /// Runs `command` for `user_id`. Failures become embeds: user mistakes as
    /// a warning, anything else is logged and answered with a generic error.
    pub async fn handle_at(&self, user_id: &str, command: BotCommand, now: OffsetDateTime) -> Reply {
        let name = command.name();
        let result = match command {
            BotCommand::Use(args) => consume::reply(&self.consumption, user_id, args, now).await,
            BotCommand::Strains(args) => self
                .catalog
                .discovery()
                .map_err(HandlerError::from)
                .and_then(|discovery| strains::reply(&discovery, &args, now.date())),
            BotCommand::Stash(args) => stash::reply(&self.consumption, user_id, args, now).await,
            BotCommand::Stats(report) => {
                stats::reply(&self.consumption, user_id, report, now).await
            }
            BotCommand::Help => Ok(help::reply()),
        };

        match result {
            Ok(reply) => reply,
            Err(err) => match err.user_message() {
                Some(message) => Reply::warning(message),
                None => {
                    tracing::error!(command = name, user_id, err = %err, "command failed");
                    Reply::error()
                }
            },
        }
    }
}
