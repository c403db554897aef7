use cannabot_strain::{DiscoveryOptions, LoadError, StrainCatalog, StrainError, StrainStore};
use temp_dir::TempDir;

mod helpers;

#[test]
fn queries_wait_for_first_install() -> anyhow::Result<()> {
    let catalog = StrainCatalog::new(DiscoveryOptions::default());

    assert!(!catalog.is_ready());
    assert!(matches!(catalog.discovery(), Err(StrainError::NotReady)));

    catalog.install(StrainStore::from_records(helpers::records()));

    assert!(catalog.is_ready());
    assert_eq!(catalog.discovery()?.len(), 10);

    Ok(())
}

#[test]
fn failed_reload_keeps_previous_store() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let catalog = StrainCatalog::with_store(
        StrainStore::from_records(helpers::records()),
        DiscoveryOptions::default(),
    );
    let before = catalog.discovery()?;

    let broken = dir.child("broken.csv");
    std::fs::write(&broken, "name,type,relaxed\nBlue Dream,Hybrid,very\n")?;

    let err = catalog.reload(&broken).unwrap_err();
    assert!(matches!(err, StrainError::Load(_)));
    assert_eq!(catalog.discovery()?.len(), 10);
    assert!(catalog.discovery()?.get_by_name("Harlequin").is_ok());

    let untyped = dir.child("untyped.csv");
    std::fs::write(&untyped, "name,relaxed\nBlue Dream,40%\n")?;

    let err = catalog.reload(&untyped).unwrap_err();
    assert!(matches!(
        err,
        StrainError::Load(LoadError::MissingColumn("type"))
    ));
    assert_eq!(catalog.discovery()?.len(), 10);

    let valid = dir.child("strains.csv");
    std::fs::write(&valid, "name,type,relaxed\nBlue Dream,Hybrid,40%\n")?;

    assert_eq!(catalog.reload(&valid)?, 1);
    assert_eq!(catalog.discovery()?.len(), 1);
    // handles taken before the swap keep reading the old store
    assert_eq!(before.len(), 10);

    Ok(())
}
