//! Configuration file through to a running game

use std::collections::HashMap;
use std::fs;

use ponens_config::{ConfigError, Overrides, PonensConfig, SeedSetting};
use ponens_engine::{Game, ValidationMode};
use ponens_types::Mode;

fn write_config(dir: &tempfile::TempDir, body: &str) -> PonensConfig {
    let path = dir.path().join("config.toml");
    fs::write(&path, body).unwrap();
    PonensConfig::load_from(&path).unwrap().unwrap()
}

fn lookup(vars: &[(&str, &str)]) -> Overrides {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    Overrides::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn custom_alphabet_reaches_the_board() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        &dir,
        r#"
        [game]
        mode = "custom"
        seed = 9

        [custom]
        n = 6
        alphabet = ["P", "Q", "R", "S"]
        "#,
    );
    let settings = config.resolve(&Overrides::default()).unwrap();
    assert_eq!(settings.profile.target_size(), 6);
    assert_eq!(settings.seed, 9);

    let game = Game::new(settings);
    let allowed = ["P", "Q", "R", "S"];
    for line in game.board() {
        let text = line.display_text();
        assert!(
            text.chars()
                .filter(char::is_ascii_alphabetic)
                .all(|c| allowed.contains(&c.to_string().as_str())),
            "{text}"
        );
    }
}

#[test]
fn environment_overrides_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "[game]\nmode = \"easy\"\nseed = 1\n");
    let overrides = lookup(&[
        ("PONENS_MODE", "hard"),
        ("PONENS_SEED", "77"),
        ("PONENS_STRICT", "true"),
    ]);

    let settings = config.resolve(&overrides).unwrap();
    assert_eq!(settings.profile, Mode::Hard.profile());
    assert_eq!(settings.seed, 77);
    assert_eq!(settings.validation, ValidationMode::Strict);
    assert_eq!(config.mode_name(&overrides), Some("hard"));
}

#[test]
fn random_seed_starts_a_playable_game() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "[game]\nmode = \"medium\"\nseed = \"random\"\n");
    assert_eq!(config.game.as_ref().unwrap().seed, Some(SeedSetting::Random));

    let settings = config.resolve(&Overrides::default()).unwrap();
    let seed = settings.seed;
    let game = Game::new(settings.clone());
    let replay = Game::new(settings);
    assert_eq!(game.board(), replay.board(), "seed {seed}");
    assert!(!game.board().is_empty());

    let overrides = lookup(&[("PONENS_SEED", "RANDOM")]);
    assert_eq!(overrides.seed, Some(SeedSetting::Random));
}

#[test]
fn broken_file_names_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[game\nmode = ").unwrap();
    let err = PonensConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert_eq!(err.path(), Some(path.as_path()));
}
