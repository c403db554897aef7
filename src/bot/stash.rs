use std::collections::HashMap;

use cannabot_shared::ProductType;
use cannabot_stash::AddInput;
use time::{Duration, OffsetDateTime};

use super::{
    HandlerResult, StashAction, StashArgs,
    embed::{Embed, Reply, color},
};

pub async fn reply(
    cmd: &cannabot_consumption::Command,
    user_id: &str,
    args: StashArgs,
    now: OffsetDateTime,
) -> HandlerResult {
    let stash = cmd.stash();
    let product_type = args.product_type;
    let strain = args.strain.as_deref();

    let embed = match args.action {
        StashAction::Check => {
            let items = stash.list(user_id).await?;
            if items.is_empty() {
                Embed::new("📦 Your Stash is Empty", color::BLUE).description(
                    "Add your first item with `/stash add strain:<name> amount:<grams>`",
                )
            } else {
                let low = stash.low_stock(user_id).await?;
                let is_low = |t: ProductType| low.iter().any(|l| l.product_type == t);

                let embed = items.iter().fold(
                    Embed::new("📦 Your Cannabis Inventory", color::BLUE)
                        .description("Current stash status"),
                    |embed, item| {
                        let t = item.product_type.0;
                        let amount = t.format_amount(item.amount);
                        let value = if is_low(t) {
                            format!("⚠️ {amount} (Low!)")
                        } else {
                            format!("✅ {amount} available")
                        };
                        embed.field(item.label(), value, true)
                    },
                );

                let totals = stash
                    .totals(user_id)
                    .await?
                    .into_iter()
                    .map(|(t, total)| format!("{} {t}: {}", t.emoji(), t.format_amount(total)))
                    .collect::<Vec<_>>()
                    .join("\n");

                embed.field("📊 Total", totals, false)
            }
        }
        StashAction::Add => {
            let Some(amount) = args.amount else {
                return Ok(Reply::warning("Tell me how much to add with `amount`"));
            };

            let item = stash
                .add(
                    user_id,
                    AddInput {
                        product_type,
                        strain: args.strain.clone(),
                        amount,
                        thc_percent: args.thc_percent,
                        notes: None,
                    },
                )
                .await?;

            Embed::new("📦 Added to Stash!", color::GREEN)
                .description(format!(
                    "**{}** of **{}** added to your inventory",
                    product_type.format_amount(amount),
                    item.label()
                ))
                .field("Now Holding", product_type.format_amount(item.amount), true)
                .field("💡 Tip", "Use `/use` to consume from your stash", false)
        }
        StashAction::Use => {
            let Some(amount) = args.amount else {
                return Ok(Reply::warning("Tell me how much to take out with `amount`"));
            };

            let removed = stash.remove(user_id, product_type, strain, amount).await?;
            let label = strain.unwrap_or(product_type.as_ref());

            let mut embed = Embed::new("📦 Used from Stash!", color::ORANGE)
                .description(format!(
                    "**{}** of **{label}** deducted from inventory",
                    product_type.format_amount(amount)
                ))
                .field(
                    "Remaining",
                    if removed.emptied {
                        "🫙 All gone, item removed".to_owned()
                    } else {
                        format!("{} left", product_type.format_amount(removed.remaining))
                    },
                    true,
                );

            for low in stash.low_stock(user_id).await? {
                embed = embed.field("⚠️ Low Stock", low.message(), false);
            }

            embed
        }
        StashAction::Set => {
            let Some(amount) = args.amount else {
                return Ok(Reply::warning("Tell me the new amount with `amount`"));
            };

            match stash.set_amount(user_id, product_type, strain, amount).await? {
                Some(item) => Embed::new("📦 Stash Updated", color::BLUE).description(format!(
                    "**{}** now holds **{}**",
                    item.label(),
                    product_type.format_amount(item.amount)
                )),
                None => Embed::new("📦 Stash Updated", color::BLUE)
                    .description("Item removed from your stash"),
            }
        }
        StashAction::Low => {
            let low = stash.low_stock(user_id).await?;
            if low.is_empty() {
                Embed::new("✅ Stock Levels OK", color::GREEN).description(
                    "Nothing is below its alert threshold. Set one with `/stash alert`",
                )
            } else {
                Embed::new("⚠️ Low Stock Alert", color::RED)
                    .description("Running low")
                    .field(
                        "🚨 Urgent",
                        low.iter()
                            .map(|l| {
                                format!(
                                    "• {} {}: {} (alert at {})",
                                    l.product_type.emoji(),
                                    l.product_type,
                                    l.product_type.format_amount(l.total),
                                    l.product_type.format_amount(l.threshold)
                                )
                            })
                            .collect::<Vec<_>>()
                            .join("\n"),
                        false,
                    )
            }
        }
        StashAction::Alert => {
            let Some(threshold) = args.amount else {
                return Ok(Reply::warning("Tell me the alert threshold with `amount`"));
            };

            stash.set_alert(user_id, product_type, threshold).await?;

            Embed::new("🔔 Alert Saved", color::GREEN).description(format!(
                "You will be warned when your {} {product_type} drops to {} or less",
                product_type.emoji(),
                product_type.format_amount(threshold)
            ))
        }
        StashAction::Stats => stats(cmd, user_id, now).await?,
        StashAction::Help => help(),
    };

    Ok(Reply::private(embed))
}

/// Holdings against the last 30 days of use.
async fn stats(
    cmd: &cannabot_consumption::Command,
    user_id: &str,
    now: OffsetDateTime,
) -> cannabot_shared::Result<Embed> {
    let totals = cmd.stash().totals(user_id).await?;
    let entries = cmd
        .entries_between(user_id, now - Duration::days(30), now + Duration::seconds(1))
        .await?;

    let mut used: HashMap<ProductType, f64> = HashMap::new();
    let mut strains: HashMap<&str, usize> = HashMap::new();
    for entry in &entries {
        *used.entry(entry.product_type.0).or_default() += entry.amount;
        if let Some(strain) = entry.strain.as_deref() {
            *strains.entry(strain).or_default() += 1;
        }
    }

    let most_used = strains
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(strain, count)| format!("{strain} ({count} sessions)"))
        .unwrap_or_else(|| "No sessions yet".to_owned());

    let remaining = totals
        .iter()
        .map(|(t, total)| {
            let daily = used.get(t).copied().unwrap_or(0.0) / 30.0;
            let days = if daily > 0.0 {
                format!("~{:.0} days", total / daily)
            } else {
                "no recent use".to_owned()
            };
            format!("{} {t}: {} • {days}", t.emoji(), t.format_amount(*total))
        })
        .collect::<Vec<_>>();

    Ok(Embed::new("📊 Stash Statistics", color::PURPLE)
        .description("Your inventory against the last 30 days")
        .field("Most Used", most_used, true)
        .field("Sessions (30d)", entries.len().to_string(), true)
        .field(
            "Days Remaining",
            if remaining.is_empty() {
                "Your stash is empty".to_owned()
            } else {
                remaining.join("\n")
            },
            false,
        ))
}

fn help() -> Embed {
    Embed::new("📦 Stash Management Help", color::GREY)
        .description("All inventory functions in one command!")
        .field(
            "Available Actions",
            "• `check` - View inventory (default)\n\
             • `add <strain> <amount>` - Add to stash\n\
             • `use <strain> <amount>` - Deduct from stash\n\
             • `set <strain> <amount>` - Correct an amount, 0 removes it\n\
             • `low` - Check low stock alerts\n\
             • `alert <amount>` - Warn when a product type drops to this amount\n\
             • `stats` - View inventory statistics",
            false,
        )
        .field(
            "Options",
            "`product_type`: flower, dab, edible, tincture, cart, capsule, other\n\
             `thc`: THC percentage used when logging sessions",
            false,
        )
}
