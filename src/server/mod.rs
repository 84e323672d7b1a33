pub mod api;

use crate::cli::Args;
use crate::gateway::ChatGateway;
use self::api::{ cors_layer, router, AppState };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use log::info;

pub struct Server {
    addr: String,
    gateway: Arc<ChatGateway>,
    args: Args,
}

impl Server {
    pub fn new(
        addr: String,
        gateway: Arc<ChatGateway>,
        args: Args,
    ) -> Self {
        Self {
            addr,
            gateway,
            args,
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.addr.parse::<SocketAddr>()?;
        let state = AppState {
            gateway: self.gateway.clone(),
            service_name: self.args.service_name.clone(),
        };
        let app = router(state, cors_layer(&self.args.cors_allow_origins)?);

        match (self.args.enable_tls, &self.args.tls_cert_path, &self.args.tls_key_path) {
            (true, Some(cert_path), Some(key_path)) => {
                // Fails only when a provider is already installed, which is fine.
                let _ = rustls::crypto::ring::default_provider().install_default();
                let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                    cert_path,
                    key_path
                ).await?;

                info!("Starting HTTPS server on: https://{}", addr);
                axum_server::bind_rustls(addr, tls_config)
                    .serve(app.into_make_service())
                    .await?;
            }
            (true, _, _) => {
                return Err("ENABLE_TLS requires both TLS_CERT_PATH and TLS_KEY_PATH".into());
            }
            _ => {
                let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
                    format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e)
                })?;
                info!("Starting HTTP server on: http://{}", addr);
                axum::serve(listener, app.into_make_service()).await?;
            }
        }

        Ok(())
    }
}
