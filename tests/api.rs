use actix_identity::IdentityMiddleware;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::http::header::{CONTENT_TYPE, LOCATION};
use actix_web::{App, test, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use pushkind_memes::repository::{
    CategoryReader, DieselRepository, MemeReader, ProfileReader, UserReader,
};
use pushkind_memes::routes;
use pushkind_memes::storage::FileSystemStorage;
use serde_json::{Value, json};
use tera::Tera;

mod common;

const BOUNDARY: &str = "memes-test-boundary";

/// Encodes text fields and an optional `(file name, content type, bytes)`
/// avatar as a `multipart/form-data` body.
fn multipart_body(fields: &[(&str, &str)], avatar: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = avatar {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"avatar\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Replaces cookies of the same name with the ones set by `resp`. Removal
/// cookies only drop the previous value.
fn merge_cookies<B>(
    cookies: &mut Vec<Cookie<'static>>,
    resp: &actix_web::dev::ServiceResponse<B>,
) {
    for cookie in resp.response().cookies() {
        cookies.retain(|c| c.name() != cookie.name());
        if !cookie.value().is_empty() {
            cookies.push(cookie.into_owned());
        }
    }
}

fn count_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| {
                    let path = entry.path();
                    if path.is_dir() { count_files(&path) } else { 1 }
                })
                .sum()
        })
        .unwrap_or(0)
}

macro_rules! app {
    ($repo:expr, $media:expr) => {{
        let key = Key::generate();
        test::init_service(
            App::new()
                .wrap(
                    FlashMessagesFramework::builder(CookieMessageStore::builder(key.clone()).build())
                        .build(),
                )
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), key)
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(web::Data::new(
                    Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*"))
                        .expect("templates should parse"),
                ))
                .app_data(web::Data::new($repo))
                .app_data(web::Data::new(FileSystemStorage::new($media)))
                .configure(routes::configure),
        )
        .await
    }};
}

#[actix_web::test]
async fn template_api_filters_by_query_and_category() {
    let test_db = common::TestDb::new();
    let media = tempfile::tempdir().unwrap();
    let app = app!(test_db.repo(), media.path());

    let req = test::TestRequest::get()
        .uri("/memes/api/templates/?q=%D0%B0%D1%80%D0%BD")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["templates"][0]["name"], json!("Арнольд"));
    assert_eq!(
        body["templates"][0]["image_url"],
        json!("/static/meme_templates/arnold.jpg")
    );
    assert_eq!(body["templates"][0]["editor_url"], json!("/memes/editor/1/"));
    assert_eq!(body["selected_category"], json!("all"));
    assert_eq!(body["categories"].as_array().unwrap().len(), 3);

    let req = test::TestRequest::get()
        .uri("/memes/api/templates/?category=%D0%A1%D0%B5%D1%80%D0%B8%D0%B0%D0%BB%D1%8B")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["templates"][0]["name"], json!("Элайн"));
    assert_eq!(body["search_query"], json!(""));
}

#[actix_web::test]
async fn listed_category_ids_filter_the_catalog() {
    let test_db = common::TestDb::new();
    let media = tempfile::tempdir().unwrap();
    let app = app!(test_db.repo(), media.path());

    let req = test::TestRequest::get()
        .uri("/memes/api/templates/")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body["categories"],
        json!([
            {"id": "Кино", "name": "Кино"},
            {"id": "Мемы", "name": "Мемы"},
            {"id": "Сериалы", "name": "Сериалы"}
        ])
    );

    let id = body["categories"][0]["id"].as_str().unwrap().to_string();
    let req = test::TestRequest::get()
        .uri(&format!(
            "/memes/api/templates/?category={}",
            urlencoding::encode(&id)
        ))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["templates"][0]["name"], json!("Арнольд"));
    assert_eq!(body["selected_category"], json!(id));

    let req = test::TestRequest::get()
        .uri("/memes/api/templates/?q=%20")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["search_query"], json!(" "));
    assert_eq!(body["count"], json!(0));
}

#[actix_web::test]
async fn template_detail_and_not_found() {
    let test_db = common::TestDb::new();
    let media = tempfile::tempdir().unwrap();
    let app = app!(test_db.repo(), media.path());

    let req = test::TestRequest::get()
        .uri("/memes/api/template/2/")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["id"], json!(2));
    assert_eq!(body["category"], json!("Сериалы"));
    assert!(body["created_at"].as_str().unwrap().len() == 19);

    let req = test::TestRequest::get()
        .uri("/memes/api/template/404/")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn anonymous_requests_are_rejected() {
    let test_db = common::TestDb::new();
    let media = tempfile::tempdir().unwrap();
    let app = app!(test_db.repo(), media.path());

    let req = test::TestRequest::post()
        .uri("/memes/save/")
        .set_json(json!({"image_data": "data:image/png;base64,iVBORw0KGgo="}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get().uri("/memes/save/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let req = test::TestRequest::get().uri("/memes/delete/1/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/memes/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp.headers().get(LOCATION).unwrap().to_str().unwrap();
    assert!(location.starts_with("/accounts/login/"));
}

#[actix_web::test]
async fn registered_user_saves_and_deletes_a_meme() {
    let test_db = common::TestDb::new();
    let repo: DieselRepository = test_db.repo();
    let media = tempfile::tempdir().unwrap();
    let app = app!(repo.clone(), media.path());

    let req = test::TestRequest::post()
        .uri("/memes/register/")
        .set_form([
            ("username", "arnold"),
            ("email", "arnold@example.com"),
            ("password1", "terminator2"),
            ("password2", "terminator2"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let cookies: Vec<Cookie<'static>> = resp
        .response()
        .cookies()
        .map(|c| c.into_owned())
        .collect();
    let user = repo.get_user_by_username("arnold").unwrap().unwrap();

    let mut req = test::TestRequest::post().uri("/memes/save/").set_json(json!({
        "image_data": "data:image/png;base64,iVBORw0KGgo=",
        "template_id": 1
    }));
    for cookie in &cookies {
        req = req.cookie(cookie.clone());
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    let meme_id = body["meme_id"].as_i64().unwrap();

    let memes = repo.list_memes(user.id).unwrap();
    assert_eq!(memes.len(), 1);
    assert_eq!(memes[0].name.as_str(), "Мем #1");
    let path = memes[0].custom_image.clone().unwrap();
    let stored = media.path().join(path.as_str());
    assert_eq!(
        std::fs::read(&stored).unwrap(),
        vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]
    );

    let mut req = test::TestRequest::post().uri("/memes/save/").set_json(json!({
        "image_data": "data:image/png,iVBORw0KGgo="
    }));
    for cookie in &cookies {
        req = req.cookie(cookie.clone());
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(repo.list_memes(user.id).unwrap().len(), 1);

    let mut req = test::TestRequest::post().uri(&format!("/memes/delete/{meme_id}/"));
    for cookie in &cookies {
        req = req.cookie(cookie.clone());
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(LOCATION).unwrap(), "/memes/");
    assert!(repo.list_memes(user.id).unwrap().is_empty());
    assert!(!stored.exists());

    let mut req = test::TestRequest::post().uri(&format!("/memes/delete/{meme_id}/"));
    for cookie in &cookies {
        req = req.cookie(cookie.clone());
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn profile_edit_redisplays_errors_and_refreshes_identity() {
    let test_db = common::TestDb::new();
    let repo: DieselRepository = test_db.repo();
    let media = tempfile::tempdir().unwrap();
    let app = app!(repo.clone(), media.path());

    let req = test::TestRequest::post()
        .uri("/memes/register/")
        .set_form([
            ("username", "arnold"),
            ("email", "arnold@example.com"),
            ("password1", "terminator2"),
            ("password2", "terminator2"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let mut cookies = Vec::new();
    merge_cookies(&mut cookies, &resp);
    let user = repo.get_user_by_username("arnold").unwrap().unwrap();

    let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    let mut req = test::TestRequest::post()
        .uri("/memes/profile/edit/")
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(
            &[("username", "ab!"), ("bio", "Hasta la vista")],
            Some(("avatar.png", "image/png", &png)),
        ));
    for cookie in &cookies {
        req = req.cookie(cookie.clone());
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains(r#"value="ab!""#));
    assert!(body.contains("Hasta la vista"));
    assert!(body.contains("Имя пользователя может содержать только"));
    assert_eq!(count_files(media.path()), 0);
    let stored = repo.get_user_by_id(user.id).unwrap().unwrap();
    assert_eq!(stored.username.as_str(), "arnold");
    assert!(repo.get_profile(user.id).unwrap().is_none());

    let mut req = test::TestRequest::post()
        .uri("/memes/profile/edit/")
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(
            &[("username", "terminator"), ("bio", "I'll be back")],
            Some(("avatar.png", "image/png", &png)),
        ));
    for cookie in &cookies {
        req = req.cookie(cookie.clone());
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(LOCATION).unwrap(), "/memes/profile/");
    merge_cookies(&mut cookies, &resp);

    let stored = repo.get_user_by_id(user.id).unwrap().unwrap();
    assert_eq!(stored.username.as_str(), "terminator");
    let profile = repo.get_profile(user.id).unwrap().unwrap();
    assert_eq!(profile.bio.as_str(), "I'll be back");
    let avatar = profile.avatar.unwrap();
    assert_eq!(std::fs::read(media.path().join(avatar.as_str())).unwrap(), png);
    assert_eq!(count_files(media.path()), 1);

    let mut req = test::TestRequest::get().uri("/");
    for cookie in &cookies {
        req = req.cookie(cookie.clone());
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains(">terminator</a>"));
    assert!(!body.contains(">arnold</a>"));
}

#[actix_web::test]
async fn catalog_administration_requires_the_admin_flag() {
    let test_db = common::TestDb::new();
    let repo: DieselRepository = test_db.repo();
    let media = tempfile::tempdir().unwrap();
    let app = app!(repo.clone(), media.path());

    let req = test::TestRequest::post()
        .uri("/memes/register/")
        .set_form([
            ("username", "elaine"),
            ("email", "elaine@example.com"),
            ("password1", "seinfeld-99"),
            ("password2", "seinfeld-99"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let mut cookies = Vec::new();
    merge_cookies(&mut cookies, &resp);
    let user = repo.get_user_by_username("elaine").unwrap().unwrap();

    let mut req = test::TestRequest::post()
        .uri("/admin/categories/")
        .set_form([("name", "Аниме")]);
    for cookie in &cookies {
        req = req.cookie(cookie.clone());
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(LOCATION).unwrap(), "/");
    merge_cookies(&mut cookies, &resp);

    assert_eq!(repo.list_categories().unwrap().len(), 3);

    common::grant_admin(&test_db.pool(), user.id);

    let mut req = test::TestRequest::post()
        .uri("/admin/categories/")
        .set_form([("name", "Аниме")]);
    for cookie in &cookies {
        req = req.cookie(cookie.clone());
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(LOCATION).unwrap(), "/admin/");
    merge_cookies(&mut cookies, &resp);

    let mut req = test::TestRequest::get().uri("/admin/");
    for cookie in &cookies {
        req = req.cookie(cookie.clone());
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Аниме"));
    assert!(body.contains("Категория добавлена."));
    let category_id = 4;

    let mut req = test::TestRequest::post()
        .uri("/admin/templates/")
        .set_form([
            ("name", "Наруто"),
            ("category_id", "4"),
            ("image_name", "naruto.jpg"),
        ]);
    for cookie in &cookies {
        req = req.cookie(cookie.clone());
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(LOCATION).unwrap(), "/admin/");

    let req = test::TestRequest::get()
        .uri("/memes/api/templates/?category=%D0%90%D0%BD%D0%B8%D0%BC%D0%B5")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["templates"][0]["name"], json!("Наруто"));
    assert_eq!(body["categories"].as_array().unwrap().len(), 4);

    let mut req =
        test::TestRequest::post().uri(&format!("/admin/categories/{category_id}/delete"));
    for cookie in &cookies {
        req = req.cookie(cookie.clone());
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let req = test::TestRequest::get()
        .uri("/memes/api/templates/?q=%D0%BD%D0%B0%D1%80%D1%83%D1%82%D0%BE")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["templates"][0]["category_name"], Value::Null);
}
