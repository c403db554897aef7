use cannabot_shared::ProductType;
use cannabot_stash::AddInput;
use temp_dir::TempDir;

mod helpers;

fn flower(strain: &str, amount: f64) -> AddInput {
    AddInput {
        product_type: ProductType::Flower,
        strain: Some(strain.to_owned()),
        amount,
        thc_percent: None,
        notes: None,
    }
}

#[tokio::test]
async fn add_merges_into_existing_item() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = cannabot_stash::Command::new(state);

    let first = cmd
        .add(
            "john",
            AddInput {
                thc_percent: Some(21.0),
                ..flower("Blue Dream", 3.5)
            },
        )
        .await?;
    let second = cmd.add("john", flower("blue dream", 1.5)).await?;

    assert_eq!(first.id, second.id);
    assert_eq!(second.amount, 5.0);
    assert_eq!(second.thc_percent, Some(21.0));
    assert_eq!(second.strain, "Blue Dream");

    cmd.add("john", flower("OG Kush", 1.0)).await?;
    cmd.add("jane", flower("Blue Dream", 7.0)).await?;

    let items = cmd.list("john").await?;
    assert_eq!(items.len(), 2);
    assert_eq!(cmd.totals("john").await?, vec![(ProductType::Flower, 6.0)]);

    Ok(())
}

#[tokio::test]
async fn add_rejects_invalid_amounts() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = cannabot_stash::Command::new(state);

    let err = cmd.add("john", flower("Blue Dream", 0.0)).await.unwrap_err();
    assert!(err.is_user_facing());

    let err = cmd.add("john", flower("Blue Dream", -2.0)).await.unwrap_err();
    assert!(err.is_user_facing());
    assert!(cmd.list("john").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn remove_depletes_and_deletes_at_zero() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = cannabot_stash::Command::new(state);

    cmd.add("john", flower("Blue Dream", 1.0)).await?;

    let removed = cmd
        .remove("john", ProductType::Flower, Some("Blue Dream"), 0.3)
        .await?;
    assert!(!removed.emptied);
    assert!((removed.remaining - 0.7).abs() < 1e-9);

    let removed = cmd
        .remove("john", ProductType::Flower, Some("BLUE DREAM"), 0.7)
        .await?;
    assert!(removed.emptied);
    assert_eq!(removed.remaining, 0.0);
    assert!(cmd.list("john").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn remove_fails_without_side_effects() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = cannabot_stash::Command::new(state);

    let err = cmd
        .remove("john", ProductType::Flower, Some("Blue Dream"), 0.5)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "No flower (Blue Dream) found in your stash");

    cmd.add("john", flower("Blue Dream", 1.0)).await?;
    let err = cmd
        .remove("john", ProductType::Flower, Some("Blue Dream"), 2.0)
        .await
        .unwrap_err();
    assert!(err.is_user_facing());
    assert_eq!(
        err.to_string(),
        "Not enough flower in your stash, 1g available"
    );

    let item = cmd
        .find("john", ProductType::Flower, Some("Blue Dream"))
        .await?
        .expect("item still present");
    assert_eq!(item.amount, 1.0);

    Ok(())
}

#[tokio::test]
async fn items_without_strain_are_tracked_separately() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = cannabot_stash::Command::new(state);

    cmd.add(
        "john",
        AddInput {
            product_type: ProductType::Edible,
            strain: None,
            amount: 100.0,
            thc_percent: None,
            notes: Some("gummies".to_owned()),
        },
    )
    .await?;
    cmd.add("john", flower("Blue Dream", 2.0)).await?;

    let removed = cmd.remove("john", ProductType::Edible, None, 10.0).await?;
    assert_eq!(removed.remaining, 90.0);

    let totals = cmd.totals("john").await?;
    assert!(totals.contains(&(ProductType::Edible, 90.0)));
    assert!(totals.contains(&(ProductType::Flower, 2.0)));

    Ok(())
}

#[tokio::test]
async fn set_amount_overwrites() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = cannabot_stash::Command::new(state);

    let item = cmd
        .set_amount("john", ProductType::Cart, Some("Jack Herer"), 1.0)
        .await?
        .expect("created");
    assert_eq!(item.amount, 1.0);

    let item = cmd
        .set_amount("john", ProductType::Cart, Some("Jack Herer"), 0.5)
        .await?
        .expect("updated");
    assert_eq!(item.amount, 0.5);

    let item = cmd
        .set_amount("john", ProductType::Cart, Some("Jack Herer"), 0.0)
        .await?;
    assert!(item.is_none());
    assert!(cmd.list("john").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn low_stock_fires_at_threshold() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = cannabot_stash::Command::new(state);

    cmd.add("john", flower("Blue Dream", 1.0)).await?;
    cmd.add("john", flower("OG Kush", 1.0)).await?;
    assert!(cmd.low_stock("john").await?.is_empty());

    cmd.set_alert("john", ProductType::Flower, 1.5).await?;
    assert!(cmd.low_stock("john").await?.is_empty());

    cmd.set_alert("john", ProductType::Flower, 2.0).await?;
    let low = cmd.low_stock("john").await?;
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].total, 2.0);
    assert_eq!(low[0].message(), "⚠️ Low flower: 2g remaining");

    cmd.set_alert("john", ProductType::Dab, 0.5).await?;
    let low = cmd.low_stock("john").await?;
    assert_eq!(low.len(), 2);
    assert!(low.iter().any(|l| l.product_type == ProductType::Dab && l.total == 0.0));

    assert_eq!(cmd.alerts("john").await?.len(), 2);
    assert!(cmd.set_alert("john", ProductType::Dab, -1.0).await.is_err());

    Ok(())
}
