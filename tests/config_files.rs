use std::collections::HashMap;

use order_service::config::{AppConfig, ConfigError};

fn read(env: &str) -> AppConfig {
    let path = format!("{}/config/{}.yaml", env!("CARGO_MANIFEST_DIR"), env);
    let content = std::fs::read_to_string(&path).unwrap();
    AppConfig::from_yaml_str(&content).unwrap()
}

#[test]
fn dev_config_is_complete() {
    let config = read("dev");
    config.validate().unwrap();

    assert_eq!(config.gateway.port, 8080);
    assert!(config.database.run_migrations);
    assert_eq!(config.downstream.shipping_timeout_ms, 5000);
    assert_eq!(config.downstream.cart_timeout_ms, 3000);
}

#[test]
fn prod_config_needs_environment() {
    let config = read("prod");
    assert!(matches!(config.validate(), Err(ConfigError::Missing(_))));
    assert_eq!(config.database.ssl_mode, "require");
    assert!(config.use_json);
}

#[test]
fn prod_config_validates_with_environment() {
    let env: HashMap<&str, &str> = [
        ("DB_HOST", "pgcat.order.svc"),
        ("DB_NAME", "order"),
        ("DB_USER", "order"),
        ("DB_PASSWORD", "secret"),
        ("SHIPPING_SERVICE_URL", "http://shipping.svc/api/v1/shipping"),
        ("CART_SERVICE_URL", "http://cart.svc/api/v1"),
        ("JWT_SECRET", "prod-secret"),
    ]
    .into_iter()
    .collect();

    let mut config = read("prod");
    config
        .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
        .unwrap();
    config.validate().unwrap();

    assert_eq!(config.database.host, "pgcat.order.svc");
    assert_eq!(config.auth.jwt_secret, "prod-secret");
}
