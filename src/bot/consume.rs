use cannabot_consumption::LogInput;
use time::OffsetDateTime;

use super::{
    HandlerResult, UseArgs,
    embed::{Embed, Reply, color},
};

pub async fn reply(
    cmd: &cannabot_consumption::Command,
    user_id: &str,
    args: UseArgs,
    now: OffsetDateTime,
) -> HandlerResult {
    let method = args.method;
    let input = LogInput {
        product_type: args.product_type,
        strain: args.strain,
        thc_percent: args.thc_percent,
        notes: args.notes,
        symptom: args.symptom,
        effect_rating: args.effect_rating,
        auto_deduct: args.deduct,
        ..LogInput::new(method, args.amount)
    };

    let logged = cmd.log_at(user_id, input, now).await?;
    let entry = &logged.entry;
    let product_type = entry.product_type.0;

    let mut details = format!(
        "**Method:** {} {}\n**Amount:** {}\n**Strain:** {}",
        method.emoji(),
        method,
        product_type.format_amount(entry.amount),
        entry.strain.as_deref().unwrap_or("Not specified"),
    );
    if let Some(thc) = entry.thc_percent {
        details.push_str(&format!("\n**THC:** {thc}%"));
    }
    details.push_str(&format!("\n**Absorbed THC:** {:.1}mg", entry.absorbed_thc_mg));
    if let Some(rating) = entry.effect_rating {
        details.push_str(&format!("\n**Effect:** {}", "⭐".repeat(rating as usize)));
    }

    let mut embed = Embed::new(
        format!("{} {} Session Logged!", method.emoji(), capitalize(method.as_ref())),
        color::GREEN,
    )
    .description("Successfully recorded your session")
    .field("📊 Session Details", details, true)
    .field(
        "💡 Quick Tip",
        format!(
            "**{}** has {:.1}% bioavailability\nEffects typically start in:\n{}",
            capitalize(method.as_ref()),
            method.bioavailability() * 100.0,
            method.onset()
        ),
        true,
    )
    .field(
        "📅 Today",
        format!("{:.1}mg absorbed THC", logged.daily_total_mg),
        false,
    );

    if !logged.warnings.is_empty() {
        embed = embed.field("⚠️ Warnings", logged.warnings.join("\n"), false);
    }

    Ok(Reply::private(embed))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
