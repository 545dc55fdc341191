mod common;

use std::sync::{Arc, Mutex};

use common::{btc, config, harness};
use embedkit_core::logger::{set_logger, LogLevel, Logger};

#[derive(Default)]
struct RecordingLogger {
    records: Mutex<Vec<(LogLevel, String)>>,
}

impl Logger for RecordingLogger {
    fn log(&self, level: LogLevel, message: String) {
        self.records.lock().unwrap().push((level, message));
    }
}

#[tokio::test]
async fn test_session_logs_reach_installed_logger() {
    let logger = Arc::new(RecordingLogger::default());
    set_logger(logger.clone());

    let h = harness(config(&["BTC"], None), vec![btc("1")]);
    h.controller.start().await.unwrap();
    h.store.deny_access(true);
    h.controller.select_account(Some(btc("1"))).unwrap();
    h.controller.select_account(Some(btc("1"))).unwrap();
    h.controller.select_account(Some(btc("unlisted"))).unwrap();

    let records = logger.records.lock().unwrap();
    assert!(records
        .iter()
        .any(|(level, message)| *level == LogLevel::Info && message.contains("connecting")));
    let warnings = records
        .iter()
        .filter(|(level, message)| *level == LogLevel::Warn && message.contains("denied"))
        .count();
    assert_eq!(warnings, 1);
    assert!(records.iter().any(|(level, message)| {
        *level == LogLevel::Debug && message.contains("unlisted which is not in the listed accounts")
    }));
    drop(records);
    assert_eq!(h.controller.state().selected_account, Some(btc("unlisted")));
}
