use cannabot_strain::{LoadError, StrainStore, StrainType};

const HEADER: &str = "name,type,thc_level,relaxed,sleepy,pain,img_url\n";

fn load(rows: &str) -> Result<StrainStore, LoadError> {
    StrainStore::from_reader(format!("{HEADER}{rows}").as_bytes())
}

#[test]
fn loads_fixture_dataset() -> anyhow::Result<()> {
    let store = StrainStore::load(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/strains.csv"
    ))?;

    assert_eq!(store.len(), 5);

    let blue_dream = store.get_by_name("BLUE DREAM")?;
    assert_eq!(blue_dream.strain_type, StrainType::Hybrid);
    assert_eq!(blue_dream.thc_percent, Some(18.0));
    assert_eq!(blue_dream.most_common_terpene.as_deref(), Some("Myrcene"));
    assert_eq!(blue_dream.effect_score("happy"), 62.0);
    assert_eq!(blue_dream.side_effect_scores.get("dry_mouth"), Some(&33.0));
    assert!(blue_dream.has_medical_use("stress"));
    assert!(blue_dream.description.starts_with("Blue Dream, a sativa"));
    assert!(blue_dream.image_url.is_some());

    let northern_lights = store.get_by_name("northern lights")?;
    assert_eq!(northern_lights.image_url, None);
    assert_eq!(store.get_by_name("Sour Diesel")?.image_url, None);
    assert_eq!(store.get_by_name("og kush")?.strain_type, StrainType::Hybrid);
    assert_eq!(store.get_by_name("Harlequin")?.thc_percent, Some(9.0));

    Ok(())
}

#[test]
fn missing_required_column_is_rejected() {
    let err = StrainStore::from_reader("name,relaxed\nBlue Dream,40%\n".as_bytes()).unwrap_err();

    assert!(matches!(err, LoadError::MissingColumn("type")));
}

#[test]
fn rows_with_bad_cells_are_skipped() -> anyhow::Result<()> {
    let store = load(
        "Blue Dream,Hybrid,18%,40%,2%,10%,nan\n\
         OG Kush,Hybrid,19%,lots,0%,5%,nan\n\
         Tahoe OG,Ruderalis,20%,60%,0%,5%,nan\n",
    )?;

    assert_eq!(store.len(), 1);
    assert!(store.get_by_name("Blue Dream").is_ok());
    assert!(store.get_by_name("OG Kush").is_err());
    assert!(store.get_by_name("Tahoe OG").is_err());

    Ok(())
}

#[test]
fn unparsable_score_is_rejected_when_no_row_survives() {
    let err = load("OG Kush,Hybrid,19%,lots,0%,5%,nan\n").unwrap_err();

    match err {
        LoadError::InvalidValue { row, column, value } => {
            assert_eq!(row, 2);
            assert_eq!(column, "relaxed");
            assert_eq!(value, "lots");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn out_of_range_score_is_rejected() {
    let err = load("Blue Dream,Hybrid,18%,140%,2%,10%,nan\n").unwrap_err();

    assert!(matches!(err, LoadError::InvalidValue { .. }));
}

#[test]
fn unknown_strain_type_is_rejected() {
    let err = load("Blue Dream,Ruderalis,18%,40%,2%,10%,nan\n").unwrap_err();

    assert!(matches!(
        err,
        LoadError::InvalidValue { ref column, .. } if column == "type"
    ));
}

#[test]
fn ragged_rows_are_rejected() {
    let err = load("Blue Dream,Hybrid,18%\n").unwrap_err();

    assert!(matches!(err, LoadError::Csv(_)));
}

#[test]
fn blank_and_duplicate_names_are_skipped() -> anyhow::Result<()> {
    let store = load(
        "Blue Dream,Hybrid,18%,40%,2%,10%,nan\n\
         ,Indica,20%,60%,50%,10%,nan\n\
         blue dream,Indica,25%,90%,90%,90%,nan\n\
         Tahoe OG,Indica,,60%,,,\n",
    )?;

    assert_eq!(store.len(), 2);
    assert_eq!(store.get_by_name("Blue Dream")?.thc_percent, Some(18.0));
    assert_eq!(store.get_by_name("tahoe og")?.thc_percent, None);
    assert_eq!(store.get_by_name("tahoe og")?.effect_score("sleepy"), 0.0);

    Ok(())
}

#[test]
fn medical_list_column_adds_tags() -> anyhow::Result<()> {
    let store = StrainStore::from_reader(
        "Strain,Type,Medical\nACDC,Sativa,\"Pain, Epilepsy\"\n".as_bytes(),
    )?;

    let acdc = store.get_by_name("acdc")?;
    assert!(acdc.has_medical_use("pain"));
    assert!(acdc.has_medical_use("Epilepsy"));

    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    let err = StrainStore::load("/nonexistent/strains.csv").unwrap_err();

    assert!(matches!(err, LoadError::Io(_)));
}
