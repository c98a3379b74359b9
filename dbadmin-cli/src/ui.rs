//! Progress feedback for the dbadmin CLI
//!
//! Spinners are suppressed when:
//! - `--quiet` is passed
//! - `DBADMIN_QUIET=1` is set
//! - stderr is not a TTY (piped output)

use std::io::IsTerminal;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

static QUIET_MODE: OnceLock<bool> = OnceLock::new();

fn quiet_from(flag: bool, env_value: Option<&str>, stderr_is_tty: bool) -> bool {
    flag || env_value == Some("1") || !stderr_is_tty
}

/// Call once at startup with the --quiet flag value.
pub fn init_quiet_mode(quiet_flag: bool) {
    let env_value = std::env::var("DBADMIN_QUIET").ok();
    let is_quiet = quiet_from(quiet_flag, env_value.as_deref(), std::io::stderr().is_terminal());
    QUIET_MODE.set(is_quiet).ok();
}

pub fn is_quiet() -> bool {
    *QUIET_MODE.get().unwrap_or(&false)
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Spinner on stderr, or None in quiet mode.
pub fn spinner(msg: impl Into<String>) -> Option<ProgressBar> {
    if is_quiet() {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(style("{spinner:.cyan} {msg}"));
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    Some(pb)
}

pub fn finish_success(pb: Option<ProgressBar>, msg: impl Into<String>) {
    if let Some(pb) = pb {
        pb.set_style(style("{msg}"));
        pb.finish_with_message(format!("✓ {}", msg.into()));
    }
}

pub fn finish_error(pb: Option<ProgressBar>, msg: impl Into<String>) {
    if let Some(pb) = pb {
        pb.set_style(style("{msg}"));
        pb.finish_with_message(format!("✗ {}", msg.into()));
    }
}

/// Await `f` behind a spinner, finishing with success or the error.
pub async fn with_spinner_async<T, E: std::fmt::Display>(
    msg: impl Into<String>,
    success_msg: impl Into<String>,
    f: impl std::future::Future<Output = Result<T, E>>,
) -> Result<T, E> {
    let msg = msg.into();
    let pb = spinner(&msg);

    match f.await {
        Ok(result) => {
            finish_success(pb, success_msg);
            Ok(result)
        }
        Err(e) => {
            finish_error(pb, format!("{}: {}", msg, e));
            Err(e)
        }
    }
}
