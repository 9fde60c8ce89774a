use robinhood_client::utils::config::{get_env_non_empty, get_env_or_default};

#[test]
fn test_get_env_or_default_parses_and_falls_back() {
    unsafe {
        std::env::set_var("RH_TEST_PARSE_OK", " 42 ");
        std::env::set_var("RH_TEST_PARSE_BAD", "forty-two");
    }
    assert_eq!(get_env_or_default("RH_TEST_PARSE_OK", 7u32), 42);
    assert_eq!(get_env_or_default("RH_TEST_PARSE_BAD", 7u32), 7);
    assert_eq!(get_env_or_default("RH_TEST_PARSE_UNSET", 7u32), 7);
}

#[test]
fn test_get_env_non_empty_treats_blank_as_missing() {
    unsafe {
        std::env::set_var("RH_TEST_BLANK", "   ");
        std::env::set_var("RH_TEST_VALUE", " alice ");
    }
    assert_eq!(get_env_non_empty("RH_TEST_BLANK"), None);
    assert_eq!(get_env_non_empty("RH_TEST_VALUE").as_deref(), Some("alice"));
    assert_eq!(get_env_non_empty("RH_TEST_NOT_SET"), None);
}
