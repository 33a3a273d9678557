#![allow(dead_code)]

use std::sync::Once;

use tracing_subscriber::FmtSubscriber;

static TRACING: Once = Once::new();

/// Install a test subscriber once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing::subscriber::set_global_default(
            FmtSubscriber::builder()
                .with_max_level(tracing::Level::DEBUG)
                .with_test_writer()
                .finish(),
        )
        .expect("tracing subscriber installs once");
    });
}
