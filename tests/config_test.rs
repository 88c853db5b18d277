//! Layered settings loading with explicit config files.
//!
//! Note: these tests assume no global config. Every test holds `ENV_LOCK`,
//! since the env layer reads process-wide `BSTVIZ__*` variables.

use std::env;
use std::fs;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rstest::rstest;
use tempfile::TempDir;

use bstviz::application::ApplicationError;
use bstviz::config::Settings;
use bstviz::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Sets variables for the lifetime of the guard.
struct EnvVars(Vec<&'static str>);

impl EnvVars {
    fn set(vars: &[(&'static str, &str)]) -> Self {
        for (name, value) in vars {
            env::set_var(name, value);
        }
        Self(vars.iter().map(|(name, _)| *name).collect())
    }
}

impl Drop for EnvVars {
    fn drop(&mut self) {
        for name in &self.0 {
            env::remove_var(name);
        }
    }
}

#[rstest]
fn given_explicit_file_when_load_then_overrides_given_fields() {
    let _lock = lock_env();
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("bstviz.toml");
    fs::write(
        &path,
        r#"
[canvas]
width = 900.0

[layout]
top_margin = 25.0

[animation]
interval_ms = 200
"#,
    )
    .expect("write config");

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.canvas.width, 900.0);
    assert_eq!(settings.canvas.height, 500.0);
    assert_eq!(settings.layout.top_margin, 25.0);
    assert_eq!(settings.layout.horizontal_margin, 40.0);
    assert_eq!(settings.animation.interval(), Duration::from_millis(200));
    assert!(settings.animation.enabled);
}

#[rstest]
fn given_missing_explicit_file_when_load_then_config_error() {
    let _lock = lock_env();
    let dir = TempDir::new().expect("tempdir");
    let result = Settings::load(Some(&dir.path().join("absent.toml")));
    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[rstest]
#[case::malformed("[canvas\nwidth = 1")]
#[case::wrong_type("[canvas]\nwidth = \"wide\"")]
#[case::zero_interval("[animation]\ninterval_ms = 0")]
#[case::negative_canvas("[canvas]\nheight = -5.0")]
fn given_bad_file_when_load_then_config_error(#[case] content: &str) {
    let _lock = lock_env();
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("bstviz.toml");
    fs::write(&path, content).expect("write config");

    let result = Settings::load(Some(&path));

    assert!(
        matches!(result, Err(ApplicationError::Config { .. })),
        "{result:?}"
    );
}

#[rstest]
fn given_template_when_written_and_loaded_then_defaults() {
    let _lock = lock_env();
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("bstviz.toml");
    fs::write(&path, Settings::template()).expect("write template");

    let settings = Settings::load(Some(&path)).expect("load template");

    assert_eq!(settings, Settings::default());
}

#[rstest]
fn given_loaded_settings_when_shown_then_reloadable() {
    let _lock = lock_env();
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("shown.toml");
    let mut shown = Settings::default();
    shown.canvas.width = 640.0;
    shown.animation.enabled = false;
    fs::write(&path, shown.to_toml().expect("serialize")).expect("write");

    assert_eq!(Settings::load(Some(&path)).expect("reload"), shown);
}

#[rstest]
fn given_env_vars_and_explicit_file_when_load_then_env_wins() {
    let _lock = lock_env();
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("bstviz.toml");
    fs::write(
        &path,
        r#"
[canvas]
width = 900.0

[layout]
max_level_height = 50.0

[animation]
interval_ms = 300
"#,
    )
    .expect("write config");

    {
        let _vars = EnvVars::set(&[
            ("BSTVIZ__CANVAS__WIDTH", "1024"),
            ("BSTVIZ__LAYOUT__MAX_LEVEL_HEIGHT", "90"),
            ("BSTVIZ__ANIMATION__INTERVAL_MS", "100"),
        ]);

        let settings = Settings::load(Some(&path)).expect("load settings");

        assert_eq!(settings.canvas.width, 1024.0);
        assert_eq!(settings.canvas.height, 500.0);
        assert_eq!(settings.layout.max_level_height, 90.0);
        assert_eq!(settings.animation.interval(), Duration::from_millis(100));
    }

    {
        let _vars = EnvVars::set(&[("BSTVIZ__ANIMATION__INTERVAL_MS", "0")]);

        let result = Settings::load(Some(&path));

        assert!(
            matches!(result, Err(ApplicationError::Config { .. })),
            "{result:?}"
        );
    }

    let settings = Settings::load(Some(&path)).expect("load without env");
    assert_eq!(settings.canvas.width, 900.0);
    assert_eq!(settings.animation.interval(), Duration::from_millis(300));
}
