use clap::Parser;
use dupefind::cli::Cli;
use dupefind::config::{CliOverrides, Config};
use figment::providers::Serialized;
use figment::{Figment, Jail};

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config.min_size, 0);
    assert!(!config.skip_hidden);
    assert!(config.follow_symlinks);
    assert_eq!(config.hash_threads, 1);
}

#[test]
fn test_precedence_defaults_env_cli() {
    Jail::expect_with(|jail| {
        jail.set_env("DUPEFIND_MIN_SIZE", "100");
        jail.set_env("DUPEFIND_FOLLOW_SYMLINKS", "false");
        jail.set_env("DUPEFIND_HASH_THREADS", "2");

        let cli = Cli::try_parse_from(["dupefind", "/data", "--min-size", "1KB", "--skip-hidden"])
            .expect("valid arguments");
        let config = Config::load(&cli.overrides())?;

        // CLI beats env
        assert_eq!(config.min_size, 1_000);
        // CLI-only flag
        assert!(config.skip_hidden);
        // env beats default
        assert!(!config.follow_symlinks);
        assert_eq!(config.hash_threads, 2);
        Ok(())
    });
}

#[test]
fn test_absent_bool_flag_does_not_reset_env() {
    Jail::expect_with(|jail| {
        jail.set_env("DUPEFIND_SKIP_HIDDEN", "true");

        let cli = Cli::try_parse_from(["dupefind"]).expect("valid arguments");
        let config = Config::load(&cli.overrides())?;

        assert!(config.skip_hidden);
        Ok(())
    });
}

#[test]
fn test_walker_config_from_loaded_config() {
    Jail::expect_with(|_jail| {
        let overrides = CliOverrides {
            min_size: Some(64),
            follow_symlinks: Some(false),
            ..Default::default()
        };
        let walker = Config::load(&overrides)?.walker_config();

        assert_eq!(walker.min_size, 64);
        assert!(!walker.follow_symlinks);
        assert!(!walker.skip_hidden);
        Ok(())
    });
}

#[test]
fn test_no_follow_flag_beats_env() {
    Jail::expect_with(|jail| {
        jail.set_env("DUPEFIND_FOLLOW_SYMLINKS", "true");

        let cli =
            Cli::try_parse_from(["dupefind", "--no-follow-symlinks"]).expect("valid arguments");
        let config = Config::load(&cli.overrides())?;

        assert!(!config.follow_symlinks);
        Ok(())
    });
}
