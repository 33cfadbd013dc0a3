/*! Integration tests for sortable.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - position: Tests for the PositionManager hooks driven through a Collection
 * - backend: Tests for the SortableBackend trait and its implementations
 * - collection: Tests for the Collection host wiring
 * - config: Tests for configuration files and per-model resolution
 *
 * The position and collection scenarios run against the backend selected by
 * the TEST_BACKEND env var (see `helpers::test_backend`).
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("sortable=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}
