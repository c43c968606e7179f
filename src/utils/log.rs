// src/utils/log.rs

//! Formatting helpers for progress output on top of the `log` facade.
//!
//! The binary decides where records go (see `env_logger` in the CLI); these
//! helpers only keep step and summary lines consistent.

/// Log a step in a process
pub fn step(step_num: usize, total: usize, message: &str) {
    ::log::info!("[STEP {}/{}] {}", step_num, total, message);
}

/// Log a skipped step
pub fn skipped(step_num: usize, total: usize, message: &str) {
    ::log::debug!("[STEP {}/{}] {} (skipped)", step_num, total, message);
}

/// Log a header
pub fn header(title: &str) {
    let border = "═".repeat(60);
    ::log::info!("{}", border);
    ::log::info!("  {}", title);
    ::log::info!("{}", border);
}

/// Log a sub-item (indented)
pub fn sub_item(message: &str) {
    ::log::info!("    {}", message);
}

/// Log a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    ::log::info!("[SUMMARY] {}", title);
    for (key, value) in items {
        ::log::info!("    {}: {}", key, value);
    }
}
