//! Shared, read-only settings handed to every session task

use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthPolicy;
use crate::config::ServerConfig;
use crate::storage::{FsMetadataSource, MetadataSource};

pub struct ServerContext {
    pub policy: Arc<AuthPolicy>,
    pub metadata: Arc<dyn MetadataSource>,
    pub data_timeout: Duration,
    pub max_command_length: usize,
}

impl ServerContext {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            policy: Arc::new(AuthPolicy::from_config(&config.auth)),
            metadata: Arc::new(FsMetadataSource::new(config.network.server_root_path())),
            data_timeout: config.network.data_connect_timeout(),
            max_command_length: config.network.max_command_length,
        }
    }
}
