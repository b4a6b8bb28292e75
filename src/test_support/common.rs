use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex, Once, PoisonError};

use actix_web::dev::ServerHandle;
use actix_web::http::{header, StatusCode};
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::registration::AuctioneerEndpoint;

static INIT: Once = Once::new();

pub const REGISTER_PATH: &str = "/v1/bidder";

pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,actix_web=info,bidder=debug"));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_test_writer())
            .try_init();
    });
}

/// How the fake auctioneer answers every registration.
#[derive(Debug, Clone)]
pub enum AuctioneerReply {
    /// 201 with `{data: {id}, meta: {status: 201}}`.
    Created(String),
    /// Any status with a raw body.
    Raw(u16, String),
}

/// One registration request as the fake auctioneer saw it.
#[derive(Debug, Clone)]
pub struct RecordedRegistration {
    pub host: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

struct FakeState {
    reply: AuctioneerReply,
    received: Arc<Mutex<Vec<RecordedRegistration>>>,
}

/// A real auctioneer stand-in listening on an ephemeral local port.
///
/// Must be started from inside an actix runtime, e.g. `#[actix_web::test]`.
pub struct FakeAuctioneer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<RecordedRegistration>>>,
    handle: ServerHandle,
}

impl FakeAuctioneer {
    pub fn start(reply: AuctioneerReply) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = web::Data::new(FakeState {
            reply,
            received: received.clone(),
        });

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .route(REGISTER_PATH, web::post().to(accept_registration))
        })
        .workers(1)
        .listen(listener)?
        .run();

        let handle = server.handle();
        actix_web::rt::spawn(server);

        Ok(Self {
            addr,
            received,
            handle,
        })
    }

    pub fn endpoint(&self) -> AuctioneerEndpoint {
        AuctioneerEndpoint::new(&format!("http://{}", self.addr), REGISTER_PATH)
    }

    pub fn received(&self) -> Vec<RecordedRegistration> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

async fn accept_registration(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<FakeState>,
) -> HttpResponse {
    let header_value = |name: header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(String::from)
    };

    let recorded = RecordedRegistration {
        host: header_value(header::HOST),
        content_type: header_value(header::CONTENT_TYPE),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };
    state
        .received
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(recorded);

    match &state.reply {
        AuctioneerReply::Created(id) => HttpResponse::Created().json(json!({
            "data": { "id": id },
            "meta": { "status": 201 }
        })),
        AuctioneerReply::Raw(status, body) => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            HttpResponse::build(status)
                .content_type("application/json")
                .body(body.clone())
        }
    }
}

/// An endpoint on a local port nothing listens on.
pub fn unreachable_endpoint() -> std::io::Result<AuctioneerEndpoint> {
    let addr = TcpListener::bind("127.0.0.1:0")?.local_addr()?;
    Ok(AuctioneerEndpoint::new(&format!("http://{addr}"), REGISTER_PATH))
}
