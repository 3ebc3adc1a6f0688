use crate::catalogue::{fetch_catalogue, fetch_text, Catalogue};
use crate::export::ExportFormat;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Catalogue { url: String },
    Preamble { url: String, format: ExportFormat },
}

#[derive(Debug)]
pub enum FetchResponse {
    Catalogue(Catalogue),
    Preamble { format: ExportFormat, text: String },
    Error { what: String, error: String },
}

/// Runs downloads one after the other on a dedicated thread.
///
/// The worker stops when the request channel is dropped.
pub fn spawn_fetch_worker(
    response_tx: Sender<FetchResponse>,
    request_rx: Receiver<FetchRequest>,
    timeout: Duration,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("quiz-builder::fetch_worker".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::error!(error = %e, "failed to start fetch runtime");
                    let _ = response_tx.send(FetchResponse::Error {
                        what: "runtime".to_string(),
                        error: e.to_string(),
                    });
                    return;
                }
            };

            while let Ok(request) = request_rx.recv() {
                tracing::debug!(?request, "worker received request");
                let response = rt.block_on(handle_request(request, timeout));
                if response_tx.send(response).is_err() {
                    break;
                }
            }
            tracing::debug!("fetch worker channel disconnected, exiting");
        })
}

async fn handle_request(request: FetchRequest, timeout: Duration) -> FetchResponse {
    match request {
        FetchRequest::Catalogue { url } => match fetch_catalogue(&url, timeout).await {
            Ok(catalogue) => FetchResponse::Catalogue(catalogue),
            Err(e) => {
                tracing::error!(%url, error = %e, "catalogue download failed");
                FetchResponse::Error {
                    what: "catalogue".to_string(),
                    error: e.to_string(),
                }
            }
        },
        FetchRequest::Preamble { url, format } => match fetch_text(&url, timeout).await {
            Ok(text) => FetchResponse::Preamble { format, text },
            Err(e) => {
                tracing::error!(%url, error = %e, "preamble download failed");
                FetchResponse::Error {
                    what: "préambule".to_string(),
                    error: e.to_string(),
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_worker_reports_unreachable_catalogue() {
        let (req_tx, req_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_fetch_worker(resp_tx, req_rx, Duration::from_millis(500)).unwrap();

        req_tx
            .send(FetchRequest::Catalogue {
                url: "http://127.0.0.1:9/catalogue.json".to_string(),
            })
            .unwrap();

        let response = resp_rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert!(matches!(response, FetchResponse::Error { ref what, .. } if what == "catalogue"));

        drop(req_tx);
        handle.join().unwrap();
    }

    #[test]
    fn test_worker_exits_when_requests_dropped() {
        let (req_tx, req_rx) = mpsc::channel::<FetchRequest>();
        let (resp_tx, _resp_rx) = mpsc::channel();
        let handle = spawn_fetch_worker(resp_tx, req_rx, Duration::from_secs(1)).unwrap();
        drop(req_tx);
        handle.join().unwrap();
    }
}
