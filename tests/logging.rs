// tests/logging.rs

use idlemon::config::LogSettings;
use idlemon::logging::init_logging;
use idlemon::types::LogLevel;

// The subscriber is process-global, so everything lives in one test.
#[test]
fn init_then_apply_config_settings() {
    let handle = init_logging(Some(LogLevel::Warn)).expect("first init succeeds");

    handle.apply(&LogSettings {
        level: LogLevel::Trace,
        time: false,
    });
    tracing::info!("filtered out: level is pinned to warn");
    tracing::warn!("visible, without a timestamp");

    assert!(format!("{handle:?}").contains("pinned: true"));
    assert!(init_logging(None).is_err());
}
