use clap::Parser;
use quanty_setup::cli::{self, list_choices, Cli, SelectionArgs};
use quanty_setup::database::ParameterDatabase;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn database() -> ParameterDatabase {
    ParameterDatabase::from_file(data_dir().join("parameters.json")).unwrap()
}

fn selection(levels: &[&str]) -> SelectionArgs {
    let level = |i: usize| levels.get(i).map(|s| s.to_string());
    SelectionArgs {
        database: None,
        element: level(0),
        charge: level(1),
        symmetry: level(2),
        experiment: level(3),
        edge: None,
    }
}

#[test]
fn test_list_walks_the_hierarchy() {
    let db = database();
    assert_eq!(list_choices(&db, &selection(&[])).unwrap(), ["Ni", "Ce"]);
    assert_eq!(list_choices(&db, &selection(&["Ni"])).unwrap(), ["2+", "3+"]);
    assert_eq!(
        list_choices(&db, &selection(&["Ni", "2+"])).unwrap(),
        ["Oh", "D4h"]
    );
    assert_eq!(
        list_choices(&db, &selection(&["Ni", "2+", "Oh"])).unwrap(),
        ["XAS", "RIXS"]
    );
    assert_eq!(
        list_choices(&db, &selection(&["Ni", "2+", "Oh", "RIXS"])).unwrap(),
        ["L3-M4,5 (2p3d)"]
    );
    assert!(list_choices(&db, &selection(&["Fe"])).is_err());
}

#[test]
fn test_render_writes_script() {
    let out = tempdir().unwrap();
    let data = data_dir();
    let args = [
        "quanty-setup".to_string(),
        "render".to_string(),
        "--database".to_string(),
        data.join("parameters.json").display().to_string(),
        "--template-dir".to_string(),
        data.join("templates").display().to_string(),
        "--output-dir".to_string(),
        out.path().display().to_string(),
        "--base-name".to_string(),
        "NiO".to_string(),
        "--element".to_string(),
        "Ni".to_string(),
        "--enable".to_string(),
        "3d-Ligands Hybridization".to_string(),
        "--sync".to_string(),
        "--set".to_string(),
        "3d-Ligands Hybridization/Initial/Veg(3d,Ld)=3.0".to_string(),
        "--temperature".to_string(),
        "20".to_string(),
        "--magnetic-field".to_string(),
        "-1".to_string(),
    ];
    cli::run(Cli::try_parse_from(args).unwrap()).unwrap();

    let script = fs::read_to_string(out.path().join("NiO.lua")).unwrap();
    assert!(script.contains("NConfigurations = 2"));
    assert!(script.contains("Veg_3d_Ld_f   = 3.6000"));
    assert!(script.contains("T = 20.0000"));
    assert!(script.contains("Bx_i, By_i, Bz_i = 0.0000, 0.0000, -1.0000"));
    assert!(script.contains("Basename = 'NiO'"));
}

#[test]
fn test_render_reports_bad_edits() {
    let out = tempdir().unwrap();
    let data = data_dir();
    let cli = Cli::try_parse_from([
        "quanty-setup".to_string(),
        "render".to_string(),
        "--database".to_string(),
        data.join("parameters.json").display().to_string(),
        "--template-dir".to_string(),
        data.join("templates").display().to_string(),
        "--output-dir".to_string(),
        out.path().display().to_string(),
        "--set".to_string(),
        "Atomic/Initial/F2(3d,3d)=-1".to_string(),
    ])
    .unwrap();
    let error = cli::run(cli).unwrap_err();
    assert!(error.to_string().contains("F2(3d,3d)"));
    assert!(!out.path().join("untitled.lua").exists());
}

#[test]
fn test_configuration_file() {
    let dir = tempdir().unwrap();
    let data = data_dir();
    let config = serde_json::json!({
        "database_path": data.join("parameters.json"),
        "template_dir": data.join("templates"),
        "output_dir": dir.path().join("scripts"),
        "base_name": "from_config"
    });
    let config_path = dir.path().join("setup.json");
    fs::write(&config_path, config.to_string()).unwrap();

    let cli = Cli::try_parse_from([
        "quanty-setup".to_string(),
        "--config".to_string(),
        config_path.display().to_string(),
        "render".to_string(),
    ])
    .unwrap();
    cli::run(cli).unwrap();
    assert!(dir.path().join("scripts").join("from_config.lua").exists());
}

#[test]
fn test_missing_database() {
    let cli = Cli::try_parse_from([
        "quanty-setup",
        "list",
        "--database",
        "/nonexistent/parameters.json",
    ])
    .unwrap();
    let error = cli::run(cli).unwrap_err();
    assert!(format!("{:#}", error).contains("parameters.json"));
}
