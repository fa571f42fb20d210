use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, couple, get, test_app, FakeGeocoder};

#[test]
fn empty_map_centers_on_the_default() {
    let t = test_app(FakeGeocoder::not_found());
    couple(&t.app);

    let resp = handle(get("/", Some("sato")), &t.app).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains(r#""center":{"lat":35.6909,"lon":139.7005}"#));
    assert!(body.contains("leaflet"));
    assert!(body.contains("suzuki"));
}

#[test]
fn stylesheet_is_served_without_identity() {
    let t = test_app(FakeGeocoder::not_found());

    let resp = handle(get("/static/main.css", None), &t.app).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains(".field"));
}

#[test]
fn unknown_path_is_not_found() {
    let t = test_app(FakeGeocoder::not_found());
    couple(&t.app);

    assert!(matches!(
        handle(get("/nope", Some("sato")), &t.app),
        Err(ServerError::NotFound)
    ));
}
