// SPDX-License-Identifier: MIT

//! `Logging` (spec §3, SPEC_FULL §4.11): installs the process-wide
//! `tracing_subscriber` layer. A pluggable collaborator per spec §1's
//! Non-goals — no log-shipping wire protocol lives here, only the
//! console + rolling-file sink setup.

use hydrogen_core::AppContext;
use hydrogen_readiness::{ReadinessVerdict, SubsystemPlugin};
use parking_lot::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Holds the `tracing-appender` flush guard: dropping it flushes the
/// non-blocking writer, which is what `land()` does.
#[derive(Default)]
pub struct LoggingPlugin {
    guard: Mutex<Option<WorkerGuard>>,
}

impl LoggingPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SubsystemPlugin for LoggingPlugin {
    fn name(&self) -> &'static str {
        "Logging"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    async fn check_ready(&self, ctx: &AppContext) -> ReadinessVerdict {
        if ctx.config.state_dir.as_os_str().is_empty() {
            return ReadinessVerdict {
                subsystem: self.name().to_string(),
                ready: false,
                messages: vec!["state_dir must be set for the rolling log appender".to_string()],
            };
        }
        ReadinessVerdict::ready(self.name())
    }

    async fn launch(&self, ctx: &AppContext) -> bool {
        let appender = tracing_appender::rolling::never(&ctx.config.state_dir, "hydrogen.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let filter = match &ctx.config.log_filter {
            Some(directive) => EnvFilter::new(directive),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        };
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .finish();
        // `set_global_default` fails if a subscriber is already installed
        // (e.g. a second launch in the same process, or a test harness
        // that installed its own); either way logging is already usable,
        // so this is not a launch failure.
        let _ = tracing::subscriber::set_global_default(subscriber);
        *self.guard.lock() = Some(guard);
        true
    }

    async fn land(&self, _ctx: &AppContext) -> bool {
        // Dropping the guard flushes the non-blocking writer.
        self.guard.lock().take();
        true
    }
}
