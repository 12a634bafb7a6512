//! Loading the CLI configuration from disk.

use alloy_primitives::address;
use binding::{KromaContract, Layer};
use config::NetworkType;
use kroma_bind::config::{Config, LogFormat};
use std::{io::Write, time::Duration};
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_config() {
    let file = write_config(
        r#"
        l1_rpc_url = "http://localhost:8545"
        l2_rpc_url = "http://localhost:9545"
        network = "sepolia"
        metrics_port = 9100
        log_format = "json"
        poll_interval_secs = 6
        chunk_size = 2000
        remote_signer_url = "http://localhost:9060"

        [contracts]
        L2OutputOracle = "0x4444444444444444444444444444444444444444"
        SecurityCouncil = "0x5555555555555555555555555555555555555555"
        "#,
    );

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.network, NetworkType::Sepolia);
    assert_eq!(config.metrics_port, Some(9100));
    assert_eq!(config.log_format, LogFormat::Json);
    assert_eq!(config.poll_interval(), Duration::from_secs(6));
    assert_eq!(config.chunk_size, 2000);
    assert_eq!(config.remote_signer_url.as_deref(), Some("http://localhost:9060"));
    assert_eq!(config.chain_id(Layer::L2), 2358);
    assert_eq!(
        config.address_of(KromaContract::SecurityCouncil).unwrap(),
        address!("5555555555555555555555555555555555555555")
    );
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(Config::from_file("/nonexistent/kroma-bind.toml").is_err());
}

#[test]
fn test_missing_rpc_url_is_an_error() {
    let file = write_config(r#"l1_rpc_url = "http://localhost:8545""#);
    assert!(Config::from_file(file.path()).is_err());
}
