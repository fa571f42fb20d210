use crate::db::users::ensure_user;
use crate::domain::models::Membership;
use crate::router::handle;
use crate::tests::utils::{
    body_string, couple, form, get, location, post_form, test_app, FakeGeocoder,
};

#[test]
fn anonymous_visitors_are_sent_to_setup() {
    let t = test_app(FakeGeocoder::not_found());

    let resp = handle(get("/", None), &t.app).expect("Failed to handle request");
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/group/setup");

    let resp = handle(get("/group/setup", None), &t.app).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Please sign in"));
    assert!(!body.contains("<form"));
}

#[test]
fn ungrouped_user_is_registered_and_redirected() {
    let t = test_app(FakeGeocoder::not_found());

    let resp = handle(get("/properties", Some("sato")), &t.app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/group/setup");

    let user = t.app.db.with_conn(|c| ensure_user(c, "sato", 0)).unwrap();
    assert_eq!(user.membership, Membership::Unassigned);

    let body = body_string(handle(get("/group/setup", Some("sato")), &t.app).unwrap());
    assert!(body.contains("Signed in as"));
    assert!(body.contains("Create a group"));
    assert!(body.contains("Join your partner"));
}

#[test]
fn create_and_join_lead_to_the_shared_map() {
    let t = test_app(FakeGeocoder::not_found());
    couple(&t.app);

    for user in ["sato", "suzuki"] {
        let resp = handle(get("/", Some(user)), &t.app).unwrap();
        assert_eq!(resp.status(), 200);
        let body = body_string(resp);
        assert!(body.contains("Sato-Suzuki"));
        assert!(body.contains(r#"id="map-data""#));
    }
}

#[test]
fn wrong_secret_is_shown_on_the_join_form() {
    let t = test_app(FakeGeocoder::not_found());
    let create = form(&[("action", "create"), ("name", "Sato-Suzuki"), ("secret", "abc")]);
    handle(post_form("/group/setup", Some("sato"), &create), &t.app).unwrap();

    let join = form(&[("action", "join"), ("name", "Sato-Suzuki"), ("secret", "xyz")]);
    let resp = handle(post_form("/group/setup", Some("suzuki"), &join), &t.app).unwrap();
    assert_eq!(resp.status(), 422);
    assert!(body_string(resp).contains("Group name or secret is incorrect."));

    let resp = handle(get("/", Some("suzuki")), &t.app).unwrap();
    assert_eq!(resp.status(), 302);
}

#[test]
fn taken_group_name_is_reported_on_the_name_field() {
    let t = test_app(FakeGeocoder::not_found());
    let create = form(&[("action", "create"), ("name", "Sato-Suzuki"), ("secret", "abc")]);
    handle(post_form("/group/setup", Some("sato"), &create), &t.app).unwrap();

    let resp = handle(post_form("/group/setup", Some("tanaka"), &create), &t.app).unwrap();
    assert_eq!(resp.status(), 422);
    let body = body_string(resp);
    assert!(body.contains("already taken"));
    assert!(body.contains(r#"value="Sato-Suzuki""#));
}

#[test]
fn blank_create_form_is_rejected() {
    let t = test_app(FakeGeocoder::not_found());
    let create = form(&[("action", "create"), ("name", "  "), ("secret", "")]);

    let resp = handle(post_form("/group/setup", Some("sato"), &create), &t.app).unwrap();
    assert_eq!(resp.status(), 422);
    assert!(body_string(resp).contains("required"));
}

#[test]
fn leaving_returns_to_setup() {
    let t = test_app(FakeGeocoder::not_found());
    couple(&t.app);

    let resp = handle(post_form("/group/leave", Some("suzuki"), ""), &t.app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/group/setup");

    let resp = handle(get("/", Some("suzuki")), &t.app).unwrap();
    assert_eq!(resp.status(), 302);
    let resp = handle(get("/", Some("sato")), &t.app).unwrap();
    assert_eq!(resp.status(), 200);
}
