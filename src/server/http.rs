use crate::server::routes::{self, AppState};
use hyper::Request;
use hyper::body::Incoming;
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto::Builder,
    service::TowerToHyperService,
};
use std::sync::Arc;
use tokio::net::TcpListener;

pub async fn run_server(state: AppState, addr: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    serve(listener, Arc::new(state)).await
}

/// Accepts connections until the listener fails, one task per connection.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let service = TowerToHyperService::new(tower::service_fn(move |req: Request<Incoming>| {
        let state = state.clone();
        async move { routes::handle(state, req).await }
    }));

    loop {
        let (stream, peer) = listener.accept().await?;
        log::debug!("Accepted connection from {}", peer);
        let io = TokioIo::new(stream);
        let service = service.clone();

        tokio::spawn(async move {
            if let Err(err) = Builder::new(TokioExecutor::new())
                .serve_connection(io, service)
                .await
            {
                log::error!("Error serving connection: {:?}", err);
            }
        });
    }
}
