//! Test-body helpers

/// Return early from a test unless the configured cluster version satisfies
/// every constraint expression
///
/// ```ignore
/// #[test]
/// fn test_offset_commit() {
///     let config = HarnessConfig::from_env().unwrap();
///     require_versions!(config, ">=0.8.2", "<1.0");
///     // ...
/// }
/// ```
///
/// Panics if an expression is malformed.
#[macro_export]
macro_rules! require_versions {
    ($config:expr, $($constraint:expr),+ $(,)?) => {
        match $crate::testing::ConstraintSet::parse_all([$($constraint),+]) {
            Ok(constraints) => {
                if let $crate::testing::Gate::Skip(reason) = constraints.gate(&$config.cluster_version) {
                    $crate::tracing::warn!("⏭️ Skipping test: {} ({})", reason, reason.detail());
                    return;
                }
            }
            Err(e) => panic!("{}", e),
        }
    };
}
