//! # Configuration Validation Tests
//!
//! Covers the required-configuration contract: endpoint and authentication
//! failures are distinct, reported before any side effect, and every
//! derived parameter has its documented default.

#[cfg(test)]
mod tests {
    use baseten_bench::{endpoint, BenchError, Config};

    #[test]
    fn test_defaults_for_test_config_are_valid() {
        let config = Config::for_test();
        assert!(config.validate().is_ok());
        assert_eq!(config.model, "openai/gpt-oss-120b");
        assert_eq!(config.tokenizer, "openai/gpt-oss-120b");
        assert_eq!(config.input_len, 1024);
        assert_eq!(config.output_len, 1024);
        assert_eq!(config.random_range_ratio, 0.0);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.result_filename, "baseten_gptoss_benchmark.json");
    }

    #[test]
    fn test_missing_endpoint_is_a_config_error_naming_both_variables() {
        let mut config = Config::for_test();
        config.base_url = None;
        config.api_url = None;

        let err = endpoint::resolve_base_url(&config).unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
        let message = err.to_string();
        assert!(message.contains("BASETEN_BASE_URL"));
        assert!(message.contains("BASETEN_API_URL"));

        // validate surfaces the same failure
        let validation = config.validate().unwrap_err();
        assert!(validation.contains("BASETEN_BASE_URL"));
    }

    #[test]
    fn test_missing_key_is_an_auth_error_distinct_from_endpoint_error() {
        let mut config = Config::for_test();
        config.api_key = None;
        config.openai_api_key = None;

        let err = config.require_api_key().unwrap_err();
        assert!(matches!(err, BenchError::Auth(_)));
        let message = err.to_string();
        assert!(message.contains("BASETEN_API_KEY"));
        assert!(message.contains("OPENAI_API_KEY"));
        assert!(!message.contains("BASETEN_BASE_URL"));

        let validation = config.validate().unwrap_err();
        assert!(validation.contains("Authentication"));
    }

    #[test]
    fn test_endpoint_error_reported_before_auth_error() {
        let mut config = Config::for_test();
        config.base_url = None;
        config.api_url = None;
        config.api_key = None;
        config.openai_api_key = None;

        // With both missing, the endpoint failure wins.
        let validation = config.validate().unwrap_err();
        assert!(validation.contains("Configuration"));
        assert!(validation.contains("BASETEN_BASE_URL"));
    }

    #[test]
    fn test_api_key_fallback_order() {
        let mut config = Config::for_test();
        config.api_key = Some("baseten-key".to_string());
        config.openai_api_key = Some("openai-key".to_string());
        assert_eq!(config.resolve_api_key().as_deref(), Some("baseten-key"));

        config.api_key = None;
        assert_eq!(config.resolve_api_key().as_deref(), Some("openai-key"));

        config.api_key = Some(String::new());
        assert_eq!(
            config.resolve_api_key().as_deref(),
            Some("openai-key"),
            "empty key should fall through to the generic variable"
        );

        config.openai_api_key = None;
        config.api_key = None;
        assert_eq!(config.resolve_api_key(), None);
    }

    #[test]
    fn test_num_prompts_derivation_is_exact() {
        let mut config = Config::for_test();
        for conc in [1, 4, 8, 16, 32, 64] {
            config.concurrency = conc;
            config.num_prompts = None;
            assert_eq!(config.effective_num_prompts(), conc * 10);
        }

        config.concurrency = 8;
        config.num_prompts = Some(25);
        assert_eq!(config.effective_num_prompts(), 25);
    }

    #[test]
    fn test_invalid_url_schemes_rejected() {
        let mut config = Config::for_test();
        for bad in ["ftp://example.com", "file:///tmp/x", "not a url"] {
            config.base_url = Some(bad.to_string());
            let result = config.validate();
            assert!(result.is_err(), "URL '{}' should be rejected", bad);
        }
    }

    #[test]
    fn test_sequence_length_and_ratio_bounds() {
        let mut config = Config::for_test();
        config.input_len = 0;
        assert!(config.validate().unwrap_err().contains("ISL"));

        config = Config::for_test();
        config.output_len = 0;
        assert!(config.validate().unwrap_err().contains("OSL"));

        config = Config::for_test();
        config.random_range_ratio = 1.5;
        assert!(config.validate().is_err());
        config.random_range_ratio = -0.1;
        assert!(config.validate().is_err());
        config.random_range_ratio = 0.5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_and_prompts_rejected() {
        let mut config = Config::for_test();
        config.concurrency = 0;
        assert!(config.validate().unwrap_err().contains("CONC"));

        config = Config::for_test();
        config.num_prompts = Some(0);
        assert!(config.validate().unwrap_err().contains("NUM_PROMPTS"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(BenchError::Config("x".to_string()).exit_code(), 1);
        assert_eq!(BenchError::Auth("x".to_string()).exit_code(), 1);
        assert_eq!(BenchError::BenchmarkFailed { status: 7 }.exit_code(), 7);
    }
}
