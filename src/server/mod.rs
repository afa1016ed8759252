pub mod api;

use api::AppState;
use log::info;
use std::error::Error;
use tokio::net::TcpListener;

pub struct Server {
    addr: String,
    state: AppState,
}

impl Server {
    pub fn new(addr: String, state: AppState) -> Self {
        Self { addr, state }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let app = api::router(self.state.clone());
        let listener = TcpListener::bind(&self.addr).await?;
        info!("HTTP server listening on: http://{}", self.addr);
        axum::serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}
