//! Default value functions for configuration.

use std::net::SocketAddr;

pub(super) const DEFAULT_DATABASE_PATH: &str = "phonebook.db";

pub(super) fn default_server_name() -> String {
    "phonebook".to_string()
}

pub(super) fn default_metrics_port() -> u16 {
    9090
}

pub(super) fn default_listen_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

pub(super) fn default_database_path() -> String {
    DEFAULT_DATABASE_PATH.to_string()
}
