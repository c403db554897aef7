use std::str::FromStr;

use cannabot_shared::{ConsumptionMethod, ProductType};
use cannabot_strain::StrainType;
use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// One `name`/`value` pair of a slash command.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandOption {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("missing option `{0}`")]
    MissingOption(&'static str),

    #[error("invalid value for option `{option}`: {value}")]
    InvalidOption { option: String, value: String },
}

#[derive(EnumString, Display, AsRefStr, VariantArray, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StrainAction {
    Search,
    Info,
    Random,
    Effects,
    Surprise,
    Recommend,
    Featured,
    Medical,
    Stats,
    Help,
}

#[derive(EnumString, Display, AsRefStr, VariantArray, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StashAction {
    Check,
    Add,
    Use,
    Set,
    Low,
    Alert,
    Stats,
    Help,
}

#[derive(EnumString, Display, AsRefStr, VariantArray, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatsReport {
    Dashboard,
    Weekly,
    Monthly,
    Insights,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrainsArgs {
    pub action: StrainAction,
    /// Strain name, effect, comma separated effects or condition, depending
    /// on the action.
    pub name: Option<String>,
    pub strain_type: Option<StrainType>,
    pub limit: Option<usize>,
    pub medical: Option<String>,
    pub exclude: Option<String>,
    pub max_thc: Option<f64>,
    pub min_cbd: Option<f64>,
}

impl StrainsArgs {
    pub fn new(action: StrainAction) -> Self {
        Self {
            action,
            name: None,
            strain_type: None,
            limit: None,
            medical: None,
            exclude: None,
            max_thc: None,
            min_cbd: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UseArgs {
    pub method: ConsumptionMethod,
    pub amount: f64,
    pub strain: Option<String>,
    pub product_type: Option<ProductType>,
    pub thc_percent: Option<f64>,
    pub effect_rating: Option<u8>,
    pub symptom: Option<String>,
    pub notes: Option<String>,
    pub deduct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StashArgs {
    pub action: StashAction,
    pub strain: Option<String>,
    pub amount: Option<f64>,
    pub product_type: ProductType,
    pub thc_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BotCommand {
    Use(UseArgs),
    Strains(StrainsArgs),
    Stash(StashArgs),
    Stats(StatsReport),
    Help,
}

struct Options<'a>(&'a [CommandOption]);

impl Options<'_> {
    fn raw(&self, name: &str) -> Option<&serde_json::Value> {
        self.0
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(name))
            .map(|o| &o.value)
            .filter(|v| !v.is_null())
    }

    fn string(&self, name: &str) -> Option<String> {
        let value = match self.raw(name)? {
            serde_json::Value::String(s) => s.trim().to_owned(),
            other => other.to_string(),
        };

        (!value.is_empty()).then_some(value)
    }

    fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, CommandError> {
        let Some(value) = self.string(name) else {
            return Ok(None);
        };

        value
            .parse::<T>()
            .map(Some)
            .map_err(|_| CommandError::InvalidOption {
                option: name.to_owned(),
                value,
            })
    }

    fn number(&self, name: &str) -> Result<Option<f64>, CommandError> {
        let number = self.parse::<f64>(name)?;
        match number {
            Some(n) if !n.is_finite() => Err(CommandError::InvalidOption {
                option: name.to_owned(),
                value: n.to_string(),
            }),
            _ => Ok(number),
        }
    }

    fn boolean(&self, name: &str) -> Result<Option<bool>, CommandError> {
        match self.raw(name) {
            None => Ok(None),
            Some(serde_json::Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => self.parse::<bool>(name),
        }
    }
}

impl BotCommand {
    pub fn parse(name: &str, options: &[CommandOption]) -> Result<Self, CommandError> {
        let options = Options(options);

        match name.trim().trim_start_matches('/').to_lowercase().as_str() {
            "use" => Ok(BotCommand::Use(UseArgs {
                method: options
                    .parse("method")?
                    .ok_or(CommandError::MissingOption("method"))?,
                amount: options
                    .number("amount")?
                    .ok_or(CommandError::MissingOption("amount"))?,
                strain: options.string("strain"),
                product_type: options.parse("product_type")?,
                thc_percent: options.number("thc")?,
                effect_rating: options.parse("rating")?,
                symptom: options.string("symptom"),
                notes: options.string("notes"),
                deduct: options.boolean("deduct")?.unwrap_or(true),
            })),
            "strains" => Ok(BotCommand::Strains(StrainsArgs {
                action: options.parse("action")?.unwrap_or(StrainAction::Help),
                name: options.string("name"),
                strain_type: options.parse("strain_type")?,
                limit: options.parse("limit")?,
                medical: options.string("medical"),
                exclude: options.string("exclude"),
                max_thc: options.number("max_thc")?,
                min_cbd: options.number("min_cbd")?,
            })),
            "stash" => Ok(BotCommand::Stash(StashArgs {
                action: options.parse("action")?.unwrap_or(StashAction::Check),
                strain: options.string("strain"),
                amount: options.number("amount")?,
                product_type: options.parse("product_type")?.unwrap_or_default(),
                thc_percent: options.number("thc")?,
            })),
            "stats" => Ok(BotCommand::Stats(
                options.parse("report")?.unwrap_or(StatsReport::Dashboard),
            )),
            "help" => Ok(BotCommand::Help),
            other => Err(CommandError::UnknownCommand(other.to_owned())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BotCommand::Use(_) => "use",
            BotCommand::Strains(_) => "strains",
            BotCommand::Stash(_) => "stash",
            BotCommand::Stats(_) => "stats",
            BotCommand::Help => "help",
        }
    }
}
