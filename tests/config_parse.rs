use granthika::config::Config;

#[test]
fn parse_example_config() {
    let raw = include_str!("../granthika.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.api.model, "gemini-2.0-flash");
    assert_eq!(cfg.api.key_env, "GEMINI_API_KEY");
    assert!(cfg.prompt.system.contains("hindi_ocr"));
    assert!(!cfg.paths.out_dir.is_empty());
}

#[test]
fn inline_key_wins_over_env() {
    let mut cfg = Config::default();
    cfg.api.key = "inline".into();
    cfg.api.key_env = "PATH".into();
    assert_eq!(cfg.resolve_api_key(), "inline");
}

#[test]
fn normalized_for_hash_blanks_the_key() {
    let mut cfg = Config::default();
    cfg.api.key = "secret".into();
    assert!(!cfg.normalized_for_hash().contains("secret"));
}
