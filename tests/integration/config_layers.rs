//! Integration test for configuration layering through the environment.
//!
//! `CLUBDESK_MEMBER` and `CLUBDESK_ROLE` sit between the command line and
//! the config file. This binary holds a single test because it mutates the
//! process environment.
//!
//! Verification command: `cargo test --test config_layers`

use clap::Parser;
use clubdesk::config::{CliArgs, ClientConfig};
use clubdesk_model::Role;

#[test]
fn environment_sits_between_flags_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[member]\nid = \"file-member\"\nrole = \"EB\"\n").unwrap();
    let config_arg = path.to_str().unwrap();

    // File alone.
    let cli = CliArgs::try_parse_from(["clubdesk", "--config", config_arg]).unwrap();
    let config = ClientConfig::load(&cli).unwrap();
    assert_eq!(config.member_id, "file-member");
    assert_eq!(config.role, Role::Eb);

    // SAFETY: no other thread in this test binary reads the environment.
    unsafe {
        std::env::set_var("CLUBDESK_ROLE", "Core");
        std::env::set_var("CLUBDESK_MEMBER", "env-member");
    }

    let cli = CliArgs::try_parse_from(["clubdesk", "--config", config_arg]).unwrap();
    let config = ClientConfig::load(&cli).unwrap();
    assert_eq!(config.member_id, "env-member");
    assert_eq!(config.role, Role::Core);

    let cli = CliArgs::try_parse_from(["clubdesk", "--config", config_arg, "--role", "EC"]).unwrap();
    let config = ClientConfig::load(&cli).unwrap();
    assert_eq!(config.member_id, "env-member");
    assert_eq!(config.role, Role::Ec);

    // SAFETY: as above.
    unsafe {
        std::env::set_var("CLUBDESK_ROLE", "Treasurer");
    }
    assert!(CliArgs::try_parse_from(["clubdesk", "--config", config_arg]).is_err());

    // SAFETY: as above.
    unsafe {
        std::env::remove_var("CLUBDESK_ROLE");
        std::env::remove_var("CLUBDESK_MEMBER");
    }
}
