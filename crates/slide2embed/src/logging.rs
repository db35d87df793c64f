use std::env;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn init(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
    if enabled {
        stage("log", "verbose logging enabled");
    }
}

pub fn stage(stage: &str, message: impl AsRef<str>) {
    eprintln!("[slide2embed::{}] {}", stage, message.as_ref());
}

pub fn verbose(message: impl AsRef<str>) {
    if VERBOSE.load(Ordering::Relaxed) {
        eprintln!("[slide2embed::verbose] {}", message.as_ref());
    }
}

pub fn env_flag() -> bool {
    env::var("SLIDE2EMBED_VERBOSE")
        .map(|value| {
            matches!(
                value.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(false)
}
