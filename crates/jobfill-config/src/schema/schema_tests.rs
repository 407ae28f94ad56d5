use super::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.matching.acceptance_threshold, 40);
    assert_eq!(config.timing.readiness_tries, 30);
    assert!(config.ai.enabled);
    assert_eq!(config.browser.debug_port, 9222);
    assert!(config.applicant.profile.is_none());
}

#[test]
fn test_matching_config_default() {
    let matching = MatchingConfig::default();
    assert_eq!(matching.exact_score, 100);
    assert_eq!(matching.whole_word_score, 90);
    assert_eq!(matching.prefix_score, 80);
    assert_eq!(matching.reverse_prefix_score, 85);
    assert_eq!(matching.decline_score, 85);
    assert_eq!(matching.contains_score, 70);
    assert_eq!(matching.reverse_contains_score, 50);
    assert_eq!(matching.loose_min_len, 5);
    assert_eq!(matching.overlap_base, 40);
    assert_eq!(matching.overlap_step, 10);
    assert_eq!(matching.overlap_min_tokens, 2);
}

#[test]
fn test_timing_config_default() {
    let timing = TimingConfig::default();
    assert_eq!(timing.readiness_delay, 400);
    assert_eq!(timing.hydration_timeout, 20_000);
    assert_eq!(timing.hydration_stable, 1_000);
    assert_eq!(timing.settle_timeout, 3_000);
    assert_eq!(timing.settle_stable, 500);
    assert_eq!(timing.probe_timeout, 1_500);
    assert_eq!(timing.probe_poll, 80);
    assert_eq!(timing.probe_max_options, 30);
    assert_eq!(timing.retry_delay, 1_800);
    assert_eq!(timing.url_poll, 800);
}

#[test]
fn test_timing_ms() {
    assert_eq!(TimingConfig::ms(250), std::time::Duration::from_millis(250));
}

#[test]
fn test_ai_config_default() {
    let ai = AiConfig::default();
    assert!(ai.enabled);
    assert!(ai.api_key.is_none());
    assert_eq!(ai.base_url, "https://api.anthropic.com");
    assert_eq!(ai.max_tokens, 2048);
    assert!(!ai.is_usable());
}

#[test]
fn test_ai_config_usable() {
    let ai = AiConfig {
        api_key: Some("sk-ant-test".to_string()),
        ..Default::default()
    };
    assert!(ai.is_usable());

    let disabled = AiConfig {
        enabled: false,
        ..ai.clone()
    };
    assert!(!disabled.is_usable());

    let blank = AiConfig {
        api_key: Some("  ".to_string()),
        ..ai
    };
    assert!(!blank.is_usable());
}

#[test]
fn test_partial_timing_section_keeps_defaults() {
    let config: Config = toml::from_str("[timing]\npacing = 50\n").unwrap();
    assert_eq!(config.timing.pacing, 50);
    assert_eq!(config.timing.probe_timeout, 1_500);
}

#[test]
fn test_config_serialization_roundtrip() {
    let config = Config::default();
    let toml_str = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&toml_str).unwrap();
    assert_eq!(parsed.matching, config.matching);
    assert_eq!(parsed.timing, config.timing);
}
