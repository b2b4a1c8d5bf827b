//! Stall assignment lifecycle driven by an administrator.

#[macro_use]
mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use support::{ADMIN_EMAIL, ADMIN_PASSWORD, Harness, bearer, login_body, token_of};

macro_rules! admin_token {
    ($app:expr) => {{
        let (_, login) = send!(
            $app,
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(login_body(ADMIN_EMAIL, ADMIN_PASSWORD))
        );
        token_of(&login)
    }};
}

fn id_of(body: &Value, key: &str) -> String {
    body[key]["_id"].as_str().expect("created id").to_owned()
}

#[actix_web::test]
async fn assign_release_and_delete_stall() {
    let harness = Harness::new().await;
    let app = stable_app!(harness);
    let token = admin_token!(app);

    let (status, stall) = send!(
        app,
        test::TestRequest::post()
            .uri("/stalls")
            .insert_header(bearer(&token))
            .set_json(json!({ "number": "B2", "size": "medium" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(stall["stall"]["status"], "available");
    let stall_id = id_of(&stall, "stall");

    let mut horse_ids = Vec::new();
    for name in ["Spirit", "Comet"] {
        let (status, horse) = send!(
            app,
            test::TestRequest::post()
                .uri("/horses")
                .insert_header(bearer(&token))
                .set_json(json!({ "name": name, "ownerEmail": ADMIN_EMAIL }))
        );
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(horse["horse"]["status"], "waiting for stall");
        horse_ids.push(id_of(&horse, "horse"));
    }

    let (status, assigned) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/stalls/{stall_id}/assign"))
            .insert_header(bearer(&token))
            .set_json(json!({ "horseId": horse_ids[0] }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assigned["stall"]["status"], "occupied");
    assert_eq!(assigned["stall"]["occupied"], true);
    assert_eq!(assigned["stall"]["horseId"], horse_ids[0].as_str());

    let (_, horse) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/horses/{}", horse_ids[0]))
            .insert_header(bearer(&token))
    );
    assert_eq!(horse["horse"]["status"], "stall granted");
    assert_eq!(horse["horse"]["stallId"], stall_id.as_str());

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/stalls/{stall_id}/assign"))
            .insert_header(bearer(&token))
            .set_json(json!({ "horseId": horse_ids[1] }))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");

    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/stalls/{stall_id}"))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, released) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/stalls/{stall_id}/release"))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(released["stall"]["status"], "available");
    assert!(released["stall"]["horseId"].is_null());

    let (_, horse) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/horses/{}", horse_ids[0]))
            .insert_header(bearer(&token))
    );
    assert_eq!(horse["horse"]["status"], "waiting for stall");

    let (status, deleted) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/stalls/{stall_id}"))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["deletedStall"]["_id"], stall_id.as_str());
}

#[actix_web::test]
async fn maintenance_stall_refuses_horses() {
    let harness = Harness::new().await;
    let app = stable_app!(harness);
    let token = admin_token!(app);

    let (_, stall) = send!(
        app,
        test::TestRequest::post()
            .uri("/stalls")
            .insert_header(bearer(&token))
            .set_json(json!({ "number": "C3", "size": "small", "status": "maintenance" }))
    );
    let (_, horse) = send!(
        app,
        test::TestRequest::post()
            .uri("/horses")
            .insert_header(bearer(&token))
            .set_json(json!({ "name": "Spirit", "ownerEmail": ADMIN_EMAIL }))
    );

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/stalls/{}/assign", id_of(&stall, "stall")))
            .insert_header(bearer(&token))
            .set_json(json!({ "horseId": id_of(&horse, "horse") }))
    );
    assert_eq!(status, StatusCode::CONFLICT);
}
