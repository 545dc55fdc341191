use wasm_bindgen::JsValue;
use web_sys::console;

use embedkit_core::logger::{LogLevel, Logger};

/// Logger writing to the browser console.
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, level: LogLevel, message: String) {
        let message = JsValue::from_str(&format!("[embedkit] {message}"));
        match level {
            LogLevel::Trace | LogLevel::Debug => console::debug_1(&message),
            LogLevel::Info => console::info_1(&message),
            LogLevel::Warn => console::warn_1(&message),
            LogLevel::Error => console::error_1(&message),
        }
    }
}
