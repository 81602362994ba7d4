use super::*;
use crate::config::TuneConfig;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_distinct_ports_with_defaults_are_valid(listen in 1u16.., send in 1u16..) {
        prop_assume!(listen != send);
        let mut config = TuneConfig::default();
        config.network.listen_port = listen;
        config.network.send_port = send;
        prop_assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn prop_initial_points_bounded_by_calls(calls in 1usize..200, initial in 0usize..400) {
        let mut config = TuneConfig::default();
        config.surrogate.n_calls = calls;
        config.surrogate.n_initial_points = initial;
        prop_assert_eq!(validate_config(&config).is_ok(), initial <= calls);
    }

    #[test]
    fn prop_finite_thresholds_accepted(threshold in -1e6f64..1e6) {
        let mut config = TuneConfig::default();
        config.random.threshold = threshold;
        prop_assert!(validate_config(&config).is_ok());
    }
}
