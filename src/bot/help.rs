use super::embed::{Embed, Reply, color};

pub fn reply() -> Reply {
    Reply::private(
        Embed::new("🌿 CannaBot - User Guide", color::GREEN)
            .description("Cannabis tracker with a searchable strain database, in five commands.")
            .field(
                "🌿 `/use` - Log a Session",
                "**Methods:** smoke, vape, dab, edible, tincture, capsule, other\n\
                 **Examples:**\n\
                 • `/use vape 0.3 Blue Dream` - 0.3g vaping session\n\
                 • `/use edible 10` - 10mg edible\n\
                 **Options:** `thc`, `rating` (1-5), `symptom`, `deduct` (default on)\n\
                 Absorbed THC is computed from the method's bioavailability.",
                false,
            )
            .field(
                "🌱 `/strains` - Explore Strains",
                "**Actions:** search, info, random, effects, medical, surprise, recommend, featured, stats\n\
                 • `/strains search Blue Dream`\n\
                 • `/strains effects relaxed`\n\
                 • `/strains recommend creative,happy strain_type:sativa`",
                false,
            )
            .field(
                "📦 `/stash` - Inventory",
                "**Actions:** check, add, use, set, low, alert, stats\n\
                 • `/stash add \"Purple Punch\" 3.5`\n\
                 • `/stash alert amount:2` - warn below 2g of flower",
                false,
            )
            .field(
                "📊 `/stats` - Analytics",
                "**Reports:** dashboard, weekly, monthly, insights\n\
                 Insights need a week of rated sessions.",
                false,
            )
            .field(
                "💡 Tips",
                "• Log sessions right away for accurate daily totals\n\
                 • Rate effects to unlock tolerance insights\n\
                 • Set stash alerts to never run out",
                false,
            )
            .footer("5 Commands • Unlimited Tracking"),
    )
}
