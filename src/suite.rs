//! Configuration surface a test harness exposes to localization suites.
//!
//! UI test runs against localized bundles are slow, and their steps depend
//! on each other. The harness is configured explicitly from [`SuiteConfig`]
//! rather than through a global listener.

use std::time::Duration;

use crate::config::SuiteConfig;

/// A test suite whose execution settings can be adjusted before it runs.
pub trait ConfigurableSuite {
    /// Global timeout for the whole suite.
    fn set_timeout(&mut self, timeout: Duration);

    /// Whether tests run in the order they were declared.
    fn set_preserve_order(&mut self, preserve_order: bool);
}

impl SuiteConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Applies the timeout and ordering settings to `suite`.
    pub fn apply_to<S: ConfigurableSuite + ?Sized>(&self, suite: &mut S) {
        tracing::debug!(
            timeout_ms = self.timeout_ms,
            preserve_order = self.preserve_order,
            "Configuring test suite"
        );
        suite.set_timeout(self.timeout());
        suite.set_preserve_order(self.preserve_order);
    }

    /// Applies the settings to every suite of a run.
    pub fn apply_to_all<'a, S, I>(&self, suites: I)
    where
        S: ConfigurableSuite + ?Sized + 'a,
        I: IntoIterator<Item = &'a mut S>,
    {
        for suite in suites {
            self.apply_to(suite);
        }
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[derive(Debug, Default)]
    struct RecordingSuite {
        timeout: Option<Duration>,
        preserve_order: Option<bool>,
    }

    impl ConfigurableSuite for RecordingSuite {
        fn set_timeout(&mut self, timeout: Duration) {
            self.timeout = Some(timeout);
        }

        fn set_preserve_order(&mut self, preserve_order: bool) {
            self.preserve_order = Some(preserve_order);
        }
    }

    #[googletest::test]
    fn default_config_sets_minute_timeout_and_order() {
        let mut suite = RecordingSuite::default();

        SuiteConfig::default().apply_to(&mut suite);

        expect_that!(suite.timeout, some(eq(Duration::from_secs(60))));
        expect_that!(suite.preserve_order, some(eq(true)));
    }

    #[googletest::test]
    fn custom_config_is_applied() {
        let mut suite = RecordingSuite::default();
        let config = SuiteConfig { timeout_ms: 1_500, preserve_order: false };

        config.apply_to(&mut suite);

        expect_that!(suite.timeout, some(eq(Duration::from_millis(1_500))));
        expect_that!(suite.preserve_order, some(eq(false)));
    }

    #[googletest::test]
    fn apply_to_all_configures_every_suite() {
        let mut suites = vec![RecordingSuite::default(), RecordingSuite::default()];

        SuiteConfig::default().apply_to_all(suites.iter_mut());

        for suite in &suites {
            expect_that!(suite.timeout, some(eq(Duration::from_secs(60))));
            expect_that!(suite.preserve_order, some(eq(true)));
        }
    }

    #[googletest::test]
    fn works_through_trait_objects() {
        let mut suite = RecordingSuite::default();
        let dynamic: &mut dyn ConfigurableSuite = &mut suite;

        SuiteConfig::default().apply_to(dynamic);

        expect_that!(suite.preserve_order, some(eq(true)));
    }
}
