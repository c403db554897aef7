use cannabot_strain::{Discovery, Preferences, StrainRecord, StrainType};
use strum::VariantArray;
use time::Date;

use super::{
    HandlerResult, StrainAction, StrainsArgs,
    embed::{Embed, Reply, color, truncate},
};

const MAX_LIMIT: usize = 10;

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn type_label(record: &StrainRecord) -> String {
    format!("{} {}", record.strain_type.emoji(), record.strain_type)
}

fn score_lines(scores: Vec<(&str, f64)>, bullet: &str) -> String {
    scores
        .into_iter()
        .map(|(name, score)| format!("{bullet}{}: {score:.0}%", title_case(name)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn description(record: &StrainRecord, max: usize) -> String {
    if record.description.trim().is_empty() {
        "No description available".to_owned()
    } else {
        truncate(record.description.trim(), max)
    }
}

/// Short card used by search, random and featured.
fn card(record: &StrainRecord, title: String, color: u32) -> Embed {
    let mut embed = Embed::new(title, color)
        .description(description(record, 200))
        .field("Type", type_label(record), true)
        .field("THC Level", record.thc_label(), true)
        .field(
            "Top Terpene",
            record.most_common_terpene.as_deref().unwrap_or("Unknown"),
            true,
        );

    let effects = score_lines(record.top_effects(3), "");
    if !effects.is_empty() {
        embed = embed.field("Top Effects", effects, true);
    }

    embed.thumbnail(record.image_url.as_deref())
}

/// Full profile with medical uses and side effects.
pub fn profile(record: &StrainRecord) -> Embed {
    let mut genetics = format!(
        "**Type:** {}\n**THC:** {}",
        type_label(record),
        record.thc_label()
    );
    if let Some(cbd) = record.cbd_percent {
        genetics.push_str(&format!("\n**CBD:** {cbd:.1}%"));
    }
    genetics.push_str(&format!(
        "\n**Terpene:** {}",
        record.most_common_terpene.as_deref().unwrap_or("Unknown")
    ));

    let mut embed = Embed::new(format!("🌱 {} - Complete Profile", record.name), color::PURPLE)
        .description(description(record, 300))
        .field("🧬 Genetics", genetics, true);

    let effects = score_lines(record.top_effects(4), "• ");
    if !effects.is_empty() {
        embed = embed.field("✨ Effects", effects, true);
    }

    let medical = score_lines(StrainRecord::top_scores(&record.medical_scores, 4), "• ");
    if !medical.is_empty() {
        embed = embed.field("🏥 Medical Uses", medical, true);
    }

    let sides = score_lines(StrainRecord::top_scores(&record.side_effect_scores, 3), "• ");
    if !sides.is_empty() {
        embed = embed.field("⚠️ Side Effects", sides, true);
    }

    embed.thumbnail(record.image_url.as_deref())
}

/// One field per strain, the first strain's image as thumbnail.
fn list(
    title: impl AsRef<str>,
    description: &str,
    color: u32,
    records: &[StrainRecord],
    value: impl Fn(&StrainRecord) -> String,
) -> Embed {
    let embed = records.iter().enumerate().fold(
        Embed::new(title, color).description(description),
        |embed, (i, record)| embed.field(format!("{}. {}", i + 1, record.name), value(record), true),
    );

    embed.thumbnail(records.first().and_then(|r| r.image_url.as_deref()))
}

fn not_found(name: &str, total: usize) -> Embed {
    Embed::new("🔍 Strain Not Found", color::ORANGE).description(format!(
        "'{name}' not found in our database of {total} strains. Try a different spelling or use `/strains random` to discover new strains!"
    ))
}

fn overview(discovery: &Discovery) -> Embed {
    Embed::new(
        format!("🌱 Strain Database - {} Strains!", discovery.len()),
        color::GREY,
    )
    .description("Explore the strain database, every search returns randomized results")
    .field(
        "🔍 Available Actions",
        "• `search <name>` - Find a specific strain\n\
         • `info <name>` - Detailed strain profile\n\
         • `random` - Discover a random strain\n\
         • `effects <effect>` - Find strains by effect\n\
         • `medical <condition>` - Strains helping with a condition\n\
         • `surprise` - A selection across strain types\n\
         • `recommend <effects>` - Scored recommendations\n\
         • `featured` - Strain of the day\n\
         • `stats` - Database statistics",
        false,
    )
    .field(
        "💡 Examples",
        "• `/strains search Blue Dream`\n\
         • `/strains effects creative`\n\
         • `/strains recommend relaxed,sleepy strain_type:indica`",
        false,
    )
}

pub fn reply(discovery: &Discovery, args: &StrainsArgs, today: Date) -> HandlerResult {
    let limit = args
        .limit
        .unwrap_or(discovery.options.default_limit)
        .clamp(1, MAX_LIMIT);
    let name = args.name.as_deref().map(str::trim).filter(|n| !n.is_empty());

    let embed = match (args.action, name) {
        (StrainAction::Search, Some(name)) => {
            let results = discovery.search_with(name, limit, &mut rand::rng());
            match results.as_slice() {
                [] => not_found(name, discovery.len()),
                [record] => card(
                    record,
                    format!("🌱 {} - Found in Strain Database!", record.name),
                    color::GREEN,
                )
                .field("💡 Tip", "Use the `/use` command with this strain!", false),
                records => list(
                    format!("🔍 Strains matching '{name}'"),
                    "Randomized selection of the matches",
                    color::GREEN,
                    records,
                    |r| format!("**{}** • THC: {}", r.strain_type, r.thc_label()),
                ),
            }
        }
        (StrainAction::Info, Some(name)) => {
            let record = match discovery.get_by_name(name) {
                Ok(record) => Some(record.clone()),
                Err(_) => discovery.search(name).into_iter().next(),
            };
            match record {
                Some(record) => profile(&record),
                None => Embed::new("❌ Strain Not Found", color::RED).description(format!(
                    "'{name}' not found. Try `/strains search` with a different spelling."
                )),
            }
        }
        (StrainAction::Random, _) => {
            let record = match args.strain_type {
                Some(strain_type) => discovery.by_type(strain_type, 1).into_iter().next(),
                None => Some(discovery.random_one()?),
            };
            match record {
                Some(record) => card(
                    &record,
                    format!("🎲 Random Strain: {}", record.name),
                    color::DEEP_ORANGE,
                )
                .field(
                    "💡 Discovery",
                    "Like this strain? Use `/strains info` to learn more!",
                    false,
                ),
                None => Embed::new("❌ No Strain Found", color::RED)
                    .description("No strain of this type in the database"),
            }
        }
        (StrainAction::Effects, Some(effect)) => {
            let records = discovery.filter_by_effect(effect, limit);
            if records.is_empty() {
                let known = discovery.known_effects();
                Embed::new("🔍 Effect Not Found", color::ORANGE).description(format!(
                    "Try: {}",
                    known.iter().map(|e| title_case(e)).collect::<Vec<_>>().join(", ")
                ))
            } else {
                list(
                    format!("🎯 Best Strains for {} Effects", title_case(effect)),
                    "Randomized selection from the top rated strains",
                    color::DEEP_PURPLE,
                    &records,
                    |r| {
                        format!(
                            "**{}** • {:.0}% {}",
                            r.strain_type,
                            r.effect_score(effect),
                            effect.to_lowercase()
                        )
                    },
                )
                .field(
                    "🔍 Want More?",
                    "Use `/strains info <name>` for detailed strain profiles!",
                    false,
                )
            }
        }
        (StrainAction::Medical, Some(condition)) => {
            let records = discovery.by_medical_use(condition, limit);
            if records.is_empty() {
                Embed::new("🔍 Condition Not Found", color::ORANGE)
                    .description(format!("No strain is tagged for '{condition}'"))
            } else {
                list(
                    format!("🏥 Strains for {}", title_case(condition)),
                    "Randomized selection of the best rated strains",
                    color::CYAN,
                    &records,
                    |r| format!("**{}** • THC: {}", r.strain_type, r.thc_label()),
                )
            }
        }
        (StrainAction::Surprise, _) => {
            let records = match args.strain_type {
                Some(strain_type) => discovery.by_type(strain_type, limit),
                None => discovery.surprise(limit),
            };
            list(
                "🎁 Surprise Strain Discovery!",
                &format!("A diverse selection from {} strains", discovery.len()),
                color::PINK,
                &records,
                |r| format!("**{}** • THC: {}", r.strain_type, r.thc_label()),
            )
            .field(
                "🎲 Feeling Lucky?",
                "Run this command again for more surprises!",
                false,
            )
        }
        (StrainAction::Recommend, _) => {
            let preferences = Preferences {
                desired_effects: split_list(name),
                preferred_type: args.strain_type,
                exclude: split_list(args.exclude.as_deref()),
                medical_conditions: split_list(args.medical.as_deref()),
                max_thc: args.max_thc,
                min_cbd: args.min_cbd,
            };
            let records = discovery.recommend(&preferences, limit)?;
            let description = if preferences.is_unscored() {
                "A diverse selection, add effects or a type for a closer match".to_owned()
            } else {
                "Best matches for your preferences, randomized among the top candidates"
                    .to_owned()
            };

            list(
                "💡 Strain Recommendations",
                &description,
                color::CYAN,
                &records,
                |r| match r.top_effects(1).first() {
                    Some((effect, score)) => {
                        format!("**{}** • {} ({score:.0}%)", r.strain_type, title_case(effect))
                    }
                    None => format!("**{}** • THC: {}", r.strain_type, r.thc_label()),
                },
            )
            .field(
                "🎯 Perfect Match?",
                "Use `/strains info <name>` for detailed profiles!",
                false,
            )
        }
        (StrainAction::Featured, _) => {
            let record = discovery.featured(today)?;
            card(
                &record,
                format!("🌟 Strain of the Day: {}", record.name),
                color::GREEN,
            )
            .footer(format!("Featured on {today}"))
        }
        (StrainAction::Stats, _) => {
            let stats = discovery.stats();
            let by_type = StrainType::VARIANTS
                .iter()
                .map(|t| {
                    let count = stats
                        .by_type
                        .iter()
                        .find(|(st, _)| st == t)
                        .map(|(_, c)| *c)
                        .unwrap_or(0);
                    format!("{} {t}: {count}", t.emoji())
                })
                .collect::<Vec<_>>()
                .join("\n");

            Embed::new("📊 Strain Database Statistics", color::BLUE)
                .field("Total Strains", stats.total.to_string(), true)
                .field("By Type", by_type, true)
                .field(
                    "Coverage",
                    format!(
                        "🖼️ Images: {}\n🧪 THC data: {}",
                        stats.with_image, stats.with_thc
                    ),
                    true,
                )
        }
        _ => overview(discovery),
    };

    Ok(Reply::public(embed))
}
