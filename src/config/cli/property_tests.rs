use super::*;
use crate::config::TuneConfig;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_ports_parse(listen in 1u16.., send in 1u16..) {
        let cli = parse_args([
            "afinar".to_string(),
            "run".to_string(),
            "--listen-port".to_string(),
            listen.to_string(),
            "--send-port".to_string(),
            send.to_string(),
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            return Err(TestCaseError::fail("expected run"));
        };
        prop_assert_eq!(args.listen_port, Some(listen));
        prop_assert_eq!(args.send_port, Some(send));
    }

    #[test]
    fn prop_n_calls_override_keeps_budget_consistent(n_calls in 1usize..500) {
        let mut config = TuneConfig::default();
        apply_overrides(&mut config, &RunArgs { n_calls: Some(n_calls), ..Default::default() });
        prop_assert_eq!(config.surrogate.n_calls, n_calls);
        prop_assert!(config.surrogate.n_initial_points <= n_calls);
    }

    #[test]
    fn prop_threshold_parses(threshold in -10.0f64..10.0) {
        let cli = parse_args([
            "afinar".to_string(),
            "run".to_string(),
            "--threshold".to_string(),
            threshold.to_string(),
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            return Err(TestCaseError::fail("expected run"));
        };
        prop_assert_eq!(args.threshold, Some(threshold));
    }
}
