//! End-to-end start-up from a config directory.
//!
//! `start` installs the global subscriber, so this binary holds one test.

use std::fs;

use fitfeed_application::start;
use fitfeed_core::mode::ModePreference;
use fitfeed_infrastructure::FitfeedPaths;
use tempfile::TempDir;

#[tokio::test]
async fn start_reads_config_and_secrets() {
    let temp = TempDir::new().unwrap();
    let paths = FitfeedPaths::new(Some(temp.path().to_path_buf()));

    let config_dir = paths.config_dir().unwrap();
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        paths.config_file().unwrap(),
        "locale = \"ko\"\n\n[backend]\nurl = \"http://127.0.0.1:9\"\n\n[logging]\nfile_logging = true\n",
    )
    .unwrap();
    fs::write(
        paths.secret_file().unwrap(),
        r#"{ "backend": { "anon_key": "anon" } }"#,
    )
    .unwrap();

    let (context, _guard) = start(&paths).await.unwrap();
    assert_eq!(context.locale.to_string(), "ko");
    assert_eq!(context.mode.mode(), ModePreference::System);
    assert!(paths.logs_dir().unwrap().exists());
}
