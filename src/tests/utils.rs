use crate::app::App;
use crate::db::connection::{init_db, Database};
use crate::domain::models::Coordinates;
use crate::domain::MatchPolicy;
use crate::geocoding::{GeocodeError, Geocoder};
use crate::isochrone::{fixtures, IsochroneError, IsochronePolicy, IsochroneProvider, PolygonSet};
use astra::{Body, Request, Response};
use http::Method;
use std::io::Read;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

pub const IDENTITY_HEADER: &str = "x-remote-user";

static DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Returns a fresh test database using the production schema
pub fn make_db() -> Database {
    let path = std::env::temp_dir().join(format!(
        "couple_map_test_{}_{}_{}.sqlite",
        std::process::id(),
        DB_COUNTER.fetch_add(1, Ordering::SeqCst),
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db, "sql/schema.sql").unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    db
}

#[derive(Clone, Copy)]
enum Answer {
    Found(Coordinates),
    NotFound,
    Failing,
}

pub struct FakeGeocoder {
    answer: Answer,
    queries: Arc<Mutex<Vec<String>>>,
}

impl FakeGeocoder {
    pub fn found(at: Coordinates) -> Self {
        Self::with(Answer::Found(at))
    }

    pub fn not_found() -> Self {
        Self::with(Answer::NotFound)
    }

    pub fn failing() -> Self {
        Self::with(Answer::Failing)
    }

    fn with(answer: Answer) -> Self {
        Self {
            answer,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Geocoder for FakeGeocoder {
    fn lookup(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        self.queries.lock().unwrap().push(query.to_string());
        match self.answer {
            Answer::Found(at) => Ok(Some(at)),
            Answer::NotFound => Ok(None),
            Answer::Failing => Err(GeocodeError::Network("connection refused".into())),
        }
    }
}

pub struct FakeIsochrones {
    calls: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl IsochroneProvider for FakeIsochrones {
    fn fetch(&self, _origin: Coordinates, bands: &[u32]) -> Result<PolygonSet, IsochroneError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(IsochroneError::Network("timed out".into()));
        }
        Ok(fixtures::polygon_set(bands))
    }
}

/// App wired to fakes, plus handles to inspect them.
pub struct TestApp {
    pub app: App,
    queries: Arc<Mutex<Vec<String>>>,
    iso_calls: Arc<AtomicUsize>,
    iso_fail: Arc<AtomicBool>,
}

impl TestApp {
    pub fn geocoder_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn isochrone_calls(&self) -> usize {
        self.iso_calls.load(Ordering::SeqCst)
    }

    pub fn fail_isochrones(&self, fail: bool) {
        self.iso_fail.store(fail, Ordering::SeqCst);
    }
}

pub fn test_app(geocoder: FakeGeocoder) -> TestApp {
    test_app_with_policy(geocoder, MatchPolicy::AllMembers)
}

pub fn test_app_with_policy(geocoder: FakeGeocoder, policy: MatchPolicy) -> TestApp {
    let queries = geocoder.queries.clone();
    let iso_calls = Arc::new(AtomicUsize::new(0));
    let iso_fail = Arc::new(AtomicBool::new(false));

    let app = App::new(
        make_db(),
        Box::new(geocoder),
        Box::new(FakeIsochrones {
            calls: iso_calls.clone(),
            fail: iso_fail.clone(),
        }),
        IsochronePolicy::default(),
        policy,
        "駅".to_string(),
        IDENTITY_HEADER.to_string(),
    );

    TestApp {
        app,
        queries,
        iso_calls,
        iso_fail,
    }
}

/// GET as `user` (anonymous when None).
pub fn get(path: &str, user: Option<&str>) -> Request {
    request(Method::GET, path, user, String::new())
}

/// Form POST as `user`; `body` is already url-encoded.
pub fn post_form(path: &str, user: Option<&str>, body: &str) -> Request {
    request(Method::POST, path, user, body.to_string())
}

fn request(method: Method, path: &str, user: Option<&str>, body: String) -> Request {
    let mut builder = http::Request::builder().method(method).uri(path);
    if let Some(user) = user {
        builder = builder.header(IDENTITY_HEADER, user);
    }
    if !body.is_empty() {
        builder = builder.header("Content-Type", "application/x-www-form-urlencoded");
    }
    builder.body(Body::from(body)).unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn location(resp: &Response) -> &str {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

pub fn form(pairs: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Sato creates "Sato-Suzuki" and Suzuki joins it, through the router.
pub fn couple(app: &App) {
    let create = form(&[("action", "create"), ("name", "Sato-Suzuki"), ("secret", "abc")]);
    let resp = crate::router::handle(post_form("/group/setup", Some("sato"), &create), app).unwrap();
    assert_eq!(resp.status(), 302);

    let join = form(&[("action", "join"), ("name", "Sato-Suzuki"), ("secret", "abc")]);
    let resp = crate::router::handle(post_form("/group/setup", Some("suzuki"), &join), app).unwrap();
    assert_eq!(resp.status(), 302);
}
