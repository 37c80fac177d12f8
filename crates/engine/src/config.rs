//! Engine tunables, loaded from environment variables with defaults.

use std::time::Duration;

use adscreen_core::backoff::BackoffSchedule;

/// Tunable parameters for reconciliation attempts.
///
/// All defaults suit production; override via environment variables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Cap on baseline template items taken into the desired state.
    pub max_baseline_items: usize,
    /// Contract-defined ad slot cap per location.
    pub max_ad_slots: usize,
    /// Screenshots at or below this size are treated as the vendor's
    /// "no content" placeholder. Vendor-version-dependent and
    /// best-effort; keep it configurable, do not assume it is precise.
    pub placeholder_min_bytes: u64,
    /// Timeout applied to every vendor call.
    pub call_timeout: Duration,
    /// Settle wait after the toggle-nudge refresh fallback.
    pub bind_settle: Duration,
    /// Backoff between proof polls.
    pub proof_backoff: BackoffSchedule,
    /// Hard overall deadline for the proof-polling loop.
    pub proof_deadline: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_baseline_items: 10,
            max_ad_slots: 5,
            placeholder_min_bytes: 5 * 1024,
            call_timeout: Duration::from_secs(10),
            bind_settle: Duration::from_secs(8),
            proof_backoff: BackoffSchedule {
                initial_delay: Duration::from_secs(2),
                max_delay: Duration::from_secs(20),
                multiplier: 2.0,
            },
            proof_deadline: Duration::from_secs(90),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default |
    /// |------------------------------|---------|
    /// | `MAX_BASELINE_ITEMS`         | `10`    |
    /// | `MAX_AD_SLOTS`               | `5`     |
    /// | `PLACEHOLDER_MIN_BYTES`      | `5120`  |
    /// | `VENDOR_CALL_TIMEOUT_SECS`   | `10`    |
    /// | `BIND_SETTLE_SECS`           | `8`     |
    /// | `PROOF_INITIAL_DELAY_SECS`   | `2`     |
    /// | `PROOF_MAX_DELAY_SECS`       | `20`    |
    /// | `PROOF_DEADLINE_SECS`        | `90`    |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_baseline_items: env_parse("MAX_BASELINE_ITEMS", defaults.max_baseline_items),
            max_ad_slots: env_parse("MAX_AD_SLOTS", defaults.max_ad_slots),
            placeholder_min_bytes: env_parse(
                "PLACEHOLDER_MIN_BYTES",
                defaults.placeholder_min_bytes,
            ),
            call_timeout: Duration::from_secs(env_parse(
                "VENDOR_CALL_TIMEOUT_SECS",
                defaults.call_timeout.as_secs(),
            )),
            bind_settle: Duration::from_secs(env_parse(
                "BIND_SETTLE_SECS",
                defaults.bind_settle.as_secs(),
            )),
            proof_backoff: BackoffSchedule {
                initial_delay: Duration::from_secs(env_parse(
                    "PROOF_INITIAL_DELAY_SECS",
                    defaults.proof_backoff.initial_delay.as_secs(),
                )),
                max_delay: Duration::from_secs(env_parse(
                    "PROOF_MAX_DELAY_SECS",
                    defaults.proof_backoff.max_delay.as_secs(),
                )),
                multiplier: defaults.proof_backoff.multiplier,
            },
            proof_deadline: Duration::from_secs(env_parse(
                "PROOF_DEADLINE_SECS",
                defaults.proof_deadline.as_secs(),
            )),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
