use super::*;
use crate::primitives::BuildMode;

#[test]
fn test_creates_temp_dir_and_writes_file() -> Result<()> {
    let fixture = TempDirFixture::new()?;

    fixture.create_dir("Builds")?;
    fixture.write_file("Assets/Scenes/Main.unity", "scene")?;

    assert!(fixture.file_exists("Assets/Scenes/Main.unity"));
    assert_eq!(fixture.read_file("Assets/Scenes/Main.unity")?, "scene");
    assert!(fixture.path().join("Builds").is_dir());
    Ok(())
}

#[test]
fn test_temp_dir_isolation() -> Result<()> {
    let fixture1 = TempDirFixture::new()?;
    let fixture2 = TempDirFixture::new()?;
    assert_ne!(fixture1.path(), fixture2.path());

    fixture1.write_file("one.txt", "1")?;
    assert!(fixture1.file_exists("one.txt"));
    assert!(!fixture2.file_exists("one.txt"));
    Ok(())
}

#[test]
fn test_cleanup_on_drop() -> Result<()> {
    let path = {
        let fixture = TempDirFixture::new()?;
        fixture.write_file("probe.txt", "x")?;
        fixture.path().to_path_buf()
    };
    assert!(!path.exists());
    Ok(())
}

#[test]
fn test_project_round_trip_through_fixture() -> Result<()> {
    let fixture = TempDirFixture::new()?;
    assert!(fixture.load_project()?.is_none());

    let mut config = ProjectConfig::new("Orbit", BuildMode::Single, "Builds");
    config.setup_complete = true;
    fixture.write_project(&config)?;

    assert!(fixture.file_exists(".buildsmith/project.json"));
    assert_eq!(fixture.load_project()?, Some(config));
    Ok(())
}
