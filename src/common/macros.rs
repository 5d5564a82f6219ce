use std::sync::OnceLock;

static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

// Diagnostics are off unless GRIDCODE_DEBUG is set in the environment
pub fn debug_enabled() -> bool {
    *DEBUG_ENABLED.get_or_init(|| std::env::var("GRIDCODE_DEBUG").is_ok())
}

#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if $crate::common::macros::debug_enabled() {
            eprintln!("[gridcode] {}", format_args!($($arg)*));
        }
    };
}
