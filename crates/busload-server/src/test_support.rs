//! Shared test fixtures.

use std::{
  collections::HashMap,
  sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  },
};

use axum::{Router, extract::Query, http::StatusCode, routing::post};
use tokio::{
  net::TcpListener,
  sync::{Semaphore, mpsc},
};

type Params = HashMap<String, String>;

/// Start a local stand-in for the telemetry service on an ephemeral port.
///
/// Every `POST /update` answers with `status` and sends its query
/// parameters down the returned channel. Returns the full endpoint URL.
pub async fn capture_server(status: StatusCode) -> (String, mpsc::UnboundedReceiver<Params>) {
  let (tx, rx) = mpsc::unbounded_channel();

  let app = Router::new().route(
    "/update",
    post(move |Query(params): Query<Params>| {
      let tx = tx.clone();
      async move {
        let _ = tx.send(params);
        status
      }
    }),
  );

  (serve(app).await, rx)
}

/// A telemetry stand-in that holds every request open until released.
pub struct HeldServer {
  pub url:      String,
  /// Query parameters, sent as each request arrives.
  pub arrivals: mpsc::UnboundedReceiver<Params>,
  in_flight:    Arc<AtomicUsize>,
  peak:         Arc<AtomicUsize>,
  gate:         Arc<Semaphore>,
}

impl HeldServer {
  /// Let the next `n` held requests answer.
  pub fn release(&self, n: usize) { self.gate.add_permits(n); }

  /// Requests currently waiting on the gate.
  pub fn in_flight(&self) -> usize { self.in_flight.load(Ordering::SeqCst) }

  /// Most requests ever held at once.
  pub fn peak(&self) -> usize { self.peak.load(Ordering::SeqCst) }
}

/// Like [`capture_server`], but each request waits for [`HeldServer::release`]
/// before answering with `status`. Never releasing gives an endpoint that
/// accepts connections and never responds.
pub async fn held_server(status: StatusCode) -> HeldServer {
  let (tx, arrivals) = mpsc::unbounded_channel();
  let in_flight = Arc::new(AtomicUsize::new(0));
  let peak = Arc::new(AtomicUsize::new(0));
  let gate = Arc::new(Semaphore::new(0));

  let app = Router::new().route("/update", {
    let (in_flight, peak, gate) = (in_flight.clone(), peak.clone(), gate.clone());
    post(move |Query(params): Query<Params>| {
      let (tx, in_flight, peak, gate) =
        (tx.clone(), in_flight.clone(), peak.clone(), gate.clone());
      async move {
        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        let _ = tx.send(params);

        if let Ok(permit) = gate.acquire().await {
          permit.forget();
        }
        in_flight.fetch_sub(1, Ordering::SeqCst);
        status
      }
    })
  });

  HeldServer { url: serve(app).await, arrivals, in_flight, peak, gate }
}

async fn serve(app: Router) -> String {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  format!("http://{addr}/update")
}
