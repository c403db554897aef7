use cannabot_consumption::{LogInput, ToleranceReport, ToleranceStatus};
use cannabot_shared::{ConsumptionMethod, ProductType};
use cannabot_stash::AddInput;
use temp_dir::TempDir;
use time::{Duration, macros::datetime};

mod helpers;

fn edible(amount: f64) -> LogInput {
    LogInput {
        auto_deduct: false,
        ..LogInput::new(ConsumptionMethod::Edible, amount)
    }
}

#[tokio::test]
async fn log_uses_stash_potency_and_deducts() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = cannabot_consumption::Command::new(state);

    cmd.stash()
        .add(
            "john",
            AddInput {
                product_type: ProductType::Flower,
                strain: Some("Blue Dream".to_owned()),
                amount: 3.5,
                thc_percent: Some(22.0),
                notes: None,
            },
        )
        .await?;

    let logged = cmd
        .log(
            "john",
            LogInput {
                strain: Some("blue dream".to_owned()),
                effect_rating: Some(4),
                ..LogInput::new(ConsumptionMethod::Smoke, 0.5)
            },
        )
        .await?;

    assert_eq!(logged.entry.absorbed_thc_mg, 30.25);
    assert_eq!(logged.entry.thc_percent, Some(22.0));
    assert_eq!(logged.entry.product_type.0, ProductType::Flower);
    assert!(logged.warnings.is_empty(), "{:?}", logged.warnings);

    let items = cmd.stash().list("john").await?;
    assert_eq!(items.len(), 1);
    assert!((items[0].amount - 3.0).abs() < 1e-9);

    Ok(())
}

#[tokio::test]
async fn log_warns_without_blocking() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = cannabot_consumption::Command::new(state);

    let logged = cmd
        .log("john", LogInput::new(ConsumptionMethod::Vape, 0.5))
        .await?;

    assert_eq!(logged.entry.absorbed_thc_mg, 30.0);
    assert!(
        logged
            .warnings
            .iter()
            .any(|w| w.contains("assuming 20%"))
    );
    assert!(
        logged
            .warnings
            .iter()
            .any(|w| w.starts_with("⚠️ Could not deduct from stash"))
    );
    assert_eq!(cmd.recent("john", 10).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn log_rejects_invalid_input() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = cannabot_consumption::Command::new(state);

    let err = cmd.log("john", edible(0.0)).await.unwrap_err();
    assert!(err.is_user_facing());

    let err = cmd
        .log(
            "john",
            LogInput {
                effect_rating: Some(9),
                ..edible(10.0)
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_user_facing());
    assert!(cmd.recent("john", 10).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn daily_limit_warnings() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = cannabot_consumption::Command::new(state);
    let at = datetime!(2024-06-01 12:00 UTC);

    cmd.set_daily_limit("john", Some(100.0)).await?;

    // 500mg edible absorbs 60mg
    let logged = cmd.log_at("john", edible(500.0), at).await?;
    assert!(logged.warnings.is_empty());

    let logged = cmd.log_at("john", edible(200.0), at).await?;
    assert_eq!(logged.daily_total_mg, 84.0);
    assert_eq!(
        logged.warnings,
        vec!["⚠️ Approaching daily limit! Remaining: 16.0mg".to_owned()]
    );

    let logged = cmd.log_at("john", edible(200.0), at).await?;
    assert!(logged.warnings[0].starts_with("⚠️ Daily limit exceeded!"));

    // next day starts over
    let logged = cmd
        .log_at("john", edible(100.0), at + Duration::days(1))
        .await?;
    assert_eq!(logged.daily_total_mg, 12.0);
    assert!(logged.warnings.is_empty());

    Ok(())
}

#[tokio::test]
async fn default_daily_limit_applies_until_overridden() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = cannabot_consumption::Command::new(state).with_default_daily_limit(Some(10.0));
    let at = datetime!(2024-06-01 12:00 UTC);

    let logged = cmd.log_at("john", edible(100.0), at).await?;
    assert!(logged.warnings[0].starts_with("⚠️ Daily limit exceeded!"));

    cmd.set_daily_limit("john", Some(1000.0)).await?;
    let logged = cmd.log_at("john", edible(100.0), at).await?;
    assert!(logged.warnings.is_empty());

    Ok(())
}

#[tokio::test]
async fn user_settings_are_validated() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = cannabot_consumption::Command::new(state);

    assert!(
        cmd.set_daily_limit("john", Some(0.0))
            .await
            .unwrap_err()
            .is_user_facing()
    );
    assert!(
        cmd.set_timezone("john", "Mars/Olympus_Mons")
            .await
            .unwrap_err()
            .is_user_facing()
    );

    let user = cmd.set_timezone("john", "Europe/Paris").await?;
    assert_eq!(user.timezone, "Europe/Paris");

    let user = cmd.set_daily_limit("john", Some(50.0)).await?;
    assert_eq!(user.max_daily_thc_mg, Some(50.0));

    let user = cmd.set_daily_limit("john", None).await?;
    assert_eq!(user.max_daily_thc_mg, None);
    assert_eq!(user.timezone, "Europe/Paris");

    Ok(())
}

#[tokio::test]
async fn daily_total_follows_local_midnight() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = cannabot_consumption::Command::new(state);

    let user = cmd.set_timezone("john", "America/New_York").await?;

    // 23:00 and 01:00 New York time
    cmd.log_at("john", edible(100.0), datetime!(2024-06-02 03:00 UTC))
        .await?;
    cmd.log_at("john", edible(100.0), datetime!(2024-06-02 05:00 UTC))
        .await?;

    assert_eq!(
        cmd.daily_total(&user, datetime!(2024-06-02 05:00 UTC))
            .await?,
        12.0
    );
    assert_eq!(
        cmd.daily_total(&user, datetime!(2024-06-02 03:30 UTC))
            .await?,
        12.0
    );

    Ok(())
}

#[tokio::test]
async fn local_days_stay_aligned_across_dst() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = cannabot_consumption::Command::new(state);

    let user = cmd.set_timezone("john", "America/New_York").await?;

    // 2026-03-08 is 23 hours long in New York: 10:00 EST, then 00:30 EDT the next day
    cmd.log_at("john", edible(100.0), datetime!(2026-03-08 15:00 UTC))
        .await?;
    cmd.log_at("john", edible(100.0), datetime!(2026-03-09 04:30 UTC))
        .await?;

    assert_eq!(
        cmd.daily_total(&user, datetime!(2026-03-08 20:00 UTC))
            .await?,
        12.0
    );
    assert_eq!(
        cmd.daily_total(&user, datetime!(2026-03-09 12:00 UTC))
            .await?,
        12.0
    );

    let days = cmd
        .daily_breakdown("john", 2, datetime!(2026-03-09 12:00 UTC))
        .await?;
    assert_eq!(
        days.iter().map(|d| (d.date, d.sessions)).collect::<Vec<_>>(),
        vec![
            (time::macros::date!(2026 - 03 - 08), 1),
            (time::macros::date!(2026 - 03 - 09), 1),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn summary_and_breakdown() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = cannabot_consumption::Command::new(state);
    let now = datetime!(2024-06-10 12:00 UTC);

    let og = |method, amount, rating| LogInput {
        strain: Some("OG Kush".to_owned()),
        thc_percent: Some(20.0),
        effect_rating: Some(rating),
        auto_deduct: false,
        ..LogInput::new(method, amount)
    };

    cmd.log_at("john", og(ConsumptionMethod::Smoke, 1.0, 4), now)
        .await?;
    cmd.log_at(
        "john",
        og(ConsumptionMethod::Vape, 0.5, 2),
        now - Duration::days(1),
    )
    .await?;
    cmd.log_at("john", edible(10.0), now - Duration::days(5))
        .await?;
    cmd.log_at("john", edible(10.0), now - Duration::days(30))
        .await?;

    let summary = cmd.summary("john", 7, now).await?;
    assert_eq!(summary.sessions, 3);
    assert_eq!(summary.total_absorbed_mg, 86.2);
    assert_eq!(summary.average_effect, Some(3.0));
    assert_eq!(summary.strains, vec![("OG Kush".to_owned(), 2)]);
    assert_eq!(summary.methods.len(), 3);
    assert_eq!(summary.active_days, 3);

    let days = cmd.daily_breakdown("john", 7, now).await?;
    assert_eq!(days.len(), 7);
    assert_eq!(days[0].date, time::macros::date!(2024 - 06 - 04));
    assert_eq!(days[1].absorbed_mg, 1.2);
    assert_eq!(days[6].sessions, 1);
    assert_eq!(days[6].absorbed_mg, 55.0);
    assert_eq!(days[2].sessions, 0);
    assert_eq!(days[2].average_effect, None);

    let trend = cmd.monthly_trend("john", now).await?;
    assert_eq!(trend.current_sessions, 3);
    assert_eq!(trend.previous_sessions, 1);
    assert!(trend.change_pct().is_some_and(|pct| pct > 0.0));

    Ok(())
}

#[tokio::test]
async fn tolerance_needs_a_week_of_data() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = cannabot_consumption::Command::new(state);
    let now = datetime!(2024-06-20 12:00 UTC);

    for day in 0..3 {
        cmd.log_at("john", edible(10.0), now - Duration::days(day))
            .await?;
    }

    assert_eq!(
        cmd.tolerance_trend("john", 14, now).await?,
        ToleranceReport::InsufficientData { active_days: 3 }
    );

    Ok(())
}

#[tokio::test]
async fn tolerance_detects_rising_dose_and_falling_effect() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = cannabot_consumption::Command::new(state);
    let now = datetime!(2024-06-20 12:00 UTC);

    for day in 0..8u8 {
        let input = LogInput {
            thc_percent: Some(20.0),
            effect_rating: Some(5 - day / 2),
            auto_deduct: false,
            ..LogInput::new(ConsumptionMethod::Smoke, 0.2 + 0.1 * day as f64)
        };
        cmd.log_at("john", input, now - Duration::days(7 - day as i64))
            .await?;
    }

    let ToleranceReport::Analyzed {
        analysis,
        recommendations,
    } = cmd.tolerance_trend("john", 14, now).await?
    else {
        panic!("expected an analysis");
    };

    assert_eq!(analysis.status, ToleranceStatus::Increasing);
    assert_eq!(analysis.effectiveness_change, -2.0);
    assert!(analysis.dosage_change_pct > 0.0);
    assert!(
        recommendations
            .iter()
            .any(|r| r.contains("alternating consumption methods"))
    );

    Ok(())
}
