// Environment detection utilities

/// Check if we're running in a headless environment
///
/// Headless mode is detected when:
/// - SSH_TTY or SSH_CONNECTION environment variables are set (SSH session)
/// - CI environment is detected
/// - TERM is set to "dumb" or is empty
/// - On Linux: DISPLAY environment variable is not set (no X11)
///
/// `var` looks up an environment variable; main passes `std::env::var`.
pub fn is_headless_environment<F>(var: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    // Check SSH session (most reliable auto-detection indicator)
    if var("SSH_TTY").is_some() {
        tracing::debug!("Headless detected: SSH_TTY set");
        return true;
    }

    if var("SSH_CONNECTION").is_some() {
        tracing::debug!("Headless detected: SSH_CONNECTION set");
        return true;
    }

    if var("CI").is_some() {
        tracing::debug!("Headless detected: CI environment");
        return true;
    }

    if let Some(term) = var("TERM") {
        if term == "dumb" || term.is_empty() {
            tracing::debug!("Headless detected: TERM is '{}'", term);
            return true;
        }
    }

    // macOS doesn't use X11/DISPLAY, so skip this check on Darwin
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        if var("DISPLAY").is_none() && var("WAYLAND_DISPLAY").is_none() {
            tracing::debug!("Headless detected: no DISPLAY or WAYLAND_DISPLAY");
            return true;
        }
    }

    tracing::debug!("Not headless: detected graphical environment");
    false
}

/// Lookup backed by the process environment
pub fn process_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
