use crate::domain::models::Coordinates;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{
    body_string, couple, form, get, location, post_form, test_app, FakeGeocoder,
};

fn shinjuku_tower() -> String {
    form(&[
        ("name", "Shinjuku Tower"),
        ("address", "東京都新宿区西新宿2-8-1"),
        ("rent", "15万円"),
    ])
}

fn property_count(app: &crate::app::App) -> i64 {
    app.db
        .with_conn(|conn| {
            conn.query_row("select count(*) from properties", [], |r| r.get(0))
                .map_err(|e| ServerError::DbError(e.to_string()))
        })
        .unwrap()
}

fn only_property_id(app: &crate::app::App) -> i64 {
    app.db
        .with_conn(|conn| {
            conn.query_row("select id from properties", [], |r| r.get(0))
                .map_err(|e| ServerError::DbError(e.to_string()))
        })
        .unwrap()
}

#[test]
fn add_form_loads() {
    let t = test_app(FakeGeocoder::not_found());
    couple(&t.app);

    let resp = handle(get("/add", Some("sato")), &t.app).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains(r#"action="/add""#));
    assert!(body.contains(r#"name="address""#));
}

#[test]
fn added_property_shows_up_for_both_members() {
    let t = test_app(FakeGeocoder::found(Coordinates::new(35.6896, 139.6917)));
    couple(&t.app);

    let resp = handle(post_form("/add", Some("sato"), &shinjuku_tower()), &t.app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/");
    assert_eq!(t.geocoder_queries(), vec!["東京都新宿区西新宿2-8-1".to_string()]);

    let body = body_string(handle(get("/properties", Some("suzuki")), &t.app).unwrap());
    assert!(body.contains("Shinjuku Tower"));
    assert!(body.contains("Likes: 0"));
}

#[test]
fn failed_geocode_reshows_the_form_and_stores_nothing() {
    let t = test_app(FakeGeocoder::not_found());
    couple(&t.app);

    let resp = handle(post_form("/add", Some("sato"), &shinjuku_tower()), &t.app).unwrap();
    assert_eq!(resp.status(), 422);
    let body = body_string(resp);
    assert!(body.contains("couldn"));
    assert!(body.contains(r#"value="Shinjuku Tower""#));
    assert_eq!(property_count(&t.app), 0);
}

#[test]
fn missing_fields_skip_the_geocoder() {
    let t = test_app(FakeGeocoder::found(Coordinates::new(35.0, 139.0)));
    couple(&t.app);

    let body = form(&[("name", ""), ("address", ""), ("rent", "")]);
    let resp = handle(post_form("/add", Some("sato"), &body), &t.app).unwrap();
    assert_eq!(resp.status(), 422);
    let body = body_string(resp);
    assert!(body.contains("Enter a name for the property."));
    assert!(body.contains("Enter an address."));
    assert!(t.geocoder_queries().is_empty());
}

#[test]
fn likes_from_both_members_make_a_match() {
    let t = test_app(FakeGeocoder::found(Coordinates::new(35.6896, 139.6917)));
    couple(&t.app);
    handle(post_form("/add", Some("sato"), &shinjuku_tower()), &t.app).unwrap();
    let like_path = format!("/like/{}", only_property_id(&t.app));

    let resp = handle(post_form(&like_path, Some("sato"), ""), &t.app).unwrap();
    assert_eq!(body_string(resp), "liked");
    let body = body_string(handle(get("/properties", Some("sato")), &t.app).unwrap());
    assert!(body.contains("Likes: 1"));

    let resp = handle(post_form(&like_path, Some("suzuki"), ""), &t.app).unwrap();
    assert_eq!(body_string(resp), "liked");
    let body = body_string(handle(get("/properties", Some("sato")), &t.app).unwrap());
    assert!(body.contains("Match!"));

    let resp = handle(post_form(&like_path, Some("suzuki"), ""), &t.app).unwrap();
    assert_eq!(body_string(resp), "unliked");
    let body = body_string(handle(get("/properties", Some("sato")), &t.app).unwrap());
    assert!(!body.contains("Match!"));
}

#[test]
fn liking_outside_the_group_is_not_found() {
    let t = test_app(FakeGeocoder::found(Coordinates::new(35.0, 139.0)));
    couple(&t.app);
    handle(post_form("/add", Some("sato"), &shinjuku_tower()), &t.app).unwrap();
    let like_path = format!("/like/{}", only_property_id(&t.app));

    let other = form(&[("action", "create"), ("name", "Tanaka"), ("secret", "t")]);
    handle(post_form("/group/setup", Some("tanaka"), &other), &t.app).unwrap();

    match handle(post_form(&like_path, Some("tanaka"), ""), &t.app) {
        Err(ServerError::NotFound) => {}
        Err(e) => panic!("expected NotFound, got: {e}"),
        Ok(resp) => panic!("expected NotFound, got status {}", resp.status()),
    }
    assert!(matches!(
        handle(post_form("/like/abc", Some("sato"), ""), &t.app),
        Err(ServerError::NotFound)
    ));
}
