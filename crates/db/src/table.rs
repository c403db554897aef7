use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum User {
    Table,
    Id,
    Timezone,
    MaxDailyThcMg,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum StashItem {
    Table,
    Id,
    UserId,
    ProductType,
    Strain,
    Amount,
    ThcPercent,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum ConsumptionEntry {
    Table,
    Id,
    UserId,
    ProductType,
    Strain,
    Amount,
    ThcPercent,
    Method,
    AbsorbedThcMg,
    Notes,
    Symptom,
    EffectRating,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum StashAlert {
    Table,
    UserId,
    ProductType,
    Threshold,
}
