//! Helpers shared by the integration tests.

use ldap_dn::Dn;

pub fn init_logging() {
    // Initialize tracing based logging. Override with env var RUST_LOG, e.g.
    // RUST_LOG=trace. TRACE level shows every parsed DN, DEBUG level shows
    // rejected input.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .without_time()
        .try_init()
        .ok();
}

/// Parses a DN that the test expects to be valid.
#[allow(dead_code)]
pub fn dn(s: &str) -> Dn {
    init_logging();
    Dn::new(s).unwrap_or_else(|err| panic!("{}", err))
}
