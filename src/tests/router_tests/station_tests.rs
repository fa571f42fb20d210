use crate::db::stations::list_stations;
use crate::domain::models::Coordinates;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{
    body_string, couple, form, get, location, post_form, test_app, FakeGeocoder,
};

fn group_id(app: &crate::app::App) -> i64 {
    app.db
        .with_conn(|conn| {
            conn.query_row("select id from map_groups", [], |r| r.get(0))
                .map_err(|e| ServerError::DbError(e.to_string()))
        })
        .unwrap()
}

#[test]
fn adding_a_station_geocodes_with_suffix_and_prewarms() {
    let t = test_app(FakeGeocoder::found(Coordinates::new(35.6909, 139.7005)));
    couple(&t.app);

    let body = form(&[("name", "新宿")]);
    let resp = handle(post_form("/stations/add", Some("sato"), &body), &t.app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/");
    assert_eq!(t.geocoder_queries(), vec!["新宿駅".to_string()]);
    assert_eq!(t.isochrone_calls(), 1);

    let page = body_string(handle(get("/", Some("suzuki")), &t.app).unwrap());
    assert!(page.contains("新宿"));
    assert!(page.contains("\"overlays\":[{"));
    assert_eq!(t.isochrone_calls(), 1);
}

#[test]
fn unknown_station_is_reported_on_the_form() {
    let t = test_app(FakeGeocoder::not_found());
    couple(&t.app);

    let body = form(&[("name", "どこでもない")]);
    let resp = handle(post_form("/stations/add", Some("sato"), &body), &t.app).unwrap();
    assert_eq!(resp.status(), 422);
    assert!(body_string(resp).contains("No station by that name was found."));
    let gid = group_id(&t.app);
    assert!(t.app.db.with_conn(|c| list_stations(c, gid)).unwrap().is_empty());
}

#[test]
fn map_still_renders_when_isochrones_are_down() {
    let t = test_app(FakeGeocoder::found(Coordinates::new(35.6580, 139.7016)));
    couple(&t.app);
    t.fail_isochrones(true);

    let body = form(&[("name", "渋谷")]);
    let resp = handle(post_form("/stations/add", Some("sato"), &body), &t.app).unwrap();
    assert_eq!(resp.status(), 302);

    let resp = handle(get("/", Some("sato")), &t.app).unwrap();
    assert_eq!(resp.status(), 200);
    let page = body_string(resp);
    assert!(page.contains("渋谷"));
    assert!(page.contains("\"overlays\":[]"));
}

#[test]
fn station_can_be_removed() {
    let t = test_app(FakeGeocoder::found(Coordinates::new(35.6909, 139.7005)));
    couple(&t.app);
    let body = form(&[("name", "新宿")]);
    handle(post_form("/stations/add", Some("sato"), &body), &t.app).unwrap();

    let gid = group_id(&t.app);
    let stations = t.app.db.with_conn(|c| list_stations(c, gid)).unwrap();
    assert_eq!(stations.len(), 1);

    let page = body_string(handle(get("/stations/add", Some("suzuki")), &t.app).unwrap());
    let delete_path = format!("/stations/{}/delete", stations[0].id);
    assert!(page.contains(&delete_path));

    let resp = handle(post_form(&delete_path, Some("suzuki"), ""), &t.app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/stations/add");
    assert!(t.app.db.with_conn(|c| list_stations(c, gid)).unwrap().is_empty());

    assert!(matches!(
        handle(post_form(&delete_path, Some("suzuki"), ""), &t.app),
        Err(ServerError::NotFound)
    ));
}

#[test]
fn malformed_delete_paths_are_not_found() {
    let t = test_app(FakeGeocoder::found(Coordinates::new(35.6909, 139.7005)));
    couple(&t.app);

    for path in ["/stations/delete", "/stations//delete", "/stations/abc/delete"] {
        assert!(
            matches!(
                handle(post_form(path, Some("sato"), ""), &t.app),
                Err(ServerError::NotFound)
            ),
            "{path} should be NotFound"
        );
    }
}
