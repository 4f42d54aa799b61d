use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::ContentType;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use notepad_core::{MissingDeletePolicy, NoteStore, StoreConfig};
use notepad_web::controllers::notes::FORM_BODY_LIMIT;
use notepad_web::csrf::{CsrfGuard, CSRF_FIELD, SESSION_COOKIE};
use notepad_web::error::{CSRF_FAILURE_MESSAGE, FORM_FAILURE_MESSAGE, GENERIC_FAILURE_MESSAGE};
use notepad_web::flash::FLASH_COOKIE;
use notepad_web::{configure, AppState};
use tempfile::TempDir;

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure),
        )
        .await
    };
}

fn open_state(dir: &TempDir, missing_delete: MissingDeletePolicy, csrf: Option<CsrfGuard>) -> AppState {
    let store = NoteStore::open(StoreConfig {
        database_path: dir.path().join("notes.db"),
        missing_delete,
    })
    .unwrap();
    AppState::new(store, csrf)
}

fn location(resp: &ServiceResponse) -> String {
    resp.headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

fn response_cookie(resp: &ServiceResponse, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.into_owned())
}

async fn body_text(resp: ServiceResponse) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[actix_web::test]
async fn groceries_end_to_end_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir, MissingDeletePolicy::Report, None);
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/add")
        .set_form([("title", "Groceries"), ("content", "Milk, eggs")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let notes = state.store.list_notes().unwrap();
    assert_eq!(notes.len(), 1);
    let id = notes[0].id;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Groceries"));
    assert!(body.contains("Milk, eggs"));

    let req = test::TestRequest::post()
        .uri(&format!("/edit/{id}"))
        .set_form([("title", "Groceries"), ("content", "Milk, eggs, bread")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let body = body_text(
        test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await,
    )
    .await;
    assert!(body.contains("Milk, eggs, bread"));
    assert_eq!(state.store.list_notes().unwrap()[0].id, id);

    let req = test::TestRequest::post()
        .uri(&format!("/delete/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(state.store.list_notes().unwrap().is_empty());
}

#[actix_web::test]
async fn add_with_blank_title_rerenders_form_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir, MissingDeletePolicy::Report, None);
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/add")
        .set_form([("title", "   "), ("content", "kept body")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("This field is required."));
    assert!(body.contains("kept body"));
    assert!(state.store.list_notes().unwrap().is_empty());
}

#[actix_web::test]
async fn edit_with_blank_content_rerenders_form_and_keeps_note() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir, MissingDeletePolicy::Report, None);
    let created = state.store.create_note("keep", "original").unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/edit/{}", created.id))
        .set_form([("title", "changed"), ("content", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("This field is required."));
    assert_eq!(state.store.get_note(created.id).unwrap(), created);
}

#[actix_web::test]
async fn edit_form_is_prefilled_with_existing_note() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir, MissingDeletePolicy::Report, None);
    let created = state.store.create_note("Groceries", "Milk, eggs").unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/edit/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("value=\"Groceries\""));
    assert!(body.contains(">Milk, eggs</textarea>"));
}

#[actix_web::test]
async fn unknown_ids_redirect_with_not_found_notice() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir, MissingDeletePolicy::Report, None);
    let app = init_app!(state);

    let requests = [
        test::TestRequest::get().uri("/edit/999").to_request(),
        test::TestRequest::post()
            .uri("/edit/999")
            .set_form([("title", "t"), ("content", "c")])
            .to_request(),
        test::TestRequest::post()
            .uri("/edit/999")
            .set_form([("title", ""), ("content", "c")])
            .to_request(),
        test::TestRequest::post().uri("/delete/999").to_request(),
    ];
    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/");
        let flash = response_cookie(&resp, FLASH_COOKIE).unwrap();
        assert_eq!(flash.value(), "note_not_found");
    }
}

#[actix_web::test]
async fn ignore_policy_treats_missing_delete_as_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir, MissingDeletePolicy::Ignore, None);
    let app = init_app!(state);

    let req = test::TestRequest::post().uri("/delete/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let flash = response_cookie(&resp, FLASH_COOKIE).unwrap();
    assert_eq!(flash.value(), "note_deleted");
}

#[actix_web::test]
async fn non_numeric_id_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir, MissingDeletePolicy::Report, None);
    let app = init_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/edit/abc").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn flash_notice_is_shown_once_then_cleared() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir, MissingDeletePolicy::Report, None);
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/add")
        .set_form([("title", "hello"), ("content", "world")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    let flash = response_cookie(&resp, FLASH_COOKIE).unwrap();
    assert_eq!(flash.value(), "note_added");

    let req = test::TestRequest::get().uri("/").cookie(flash).to_request();
    let resp = test::call_service(&app, req).await;
    let removal = response_cookie(&resp, FLASH_COOKIE).unwrap();
    assert_eq!(removal.value(), "");
    assert!(body_text(resp).await.contains("Note added!"));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert!(response_cookie(&resp, FLASH_COOKIE).is_none());
    assert!(!body_text(resp).await.contains("Note added!"));
}

#[actix_web::test]
async fn post_without_csrf_token_is_rejected_before_store_access() {
    let dir = tempfile::tempdir().unwrap();
    let guard = CsrfGuard::new(b"test-secret").unwrap();
    let state = open_state(&dir, MissingDeletePolicy::Report, Some(guard));
    let created = state.store.create_note("keep", "me").unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/add")
        .set_form([("title", "sneaky"), ("content", "write")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(resp).await.contains(CSRF_FAILURE_MESSAGE));

    let req = test::TestRequest::post()
        .uri(&format!("/delete/{}", created.id))
        .cookie(Cookie::new(SESSION_COOKIE, "6f1c1a0e-8c2b-4d7e-9a51-0d2f3b4c5e6f"))
        .set_form([(CSRF_FIELD, "deadbeef")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(state.store.list_notes().unwrap(), vec![created]);
}

#[actix_web::test]
async fn form_token_from_rendered_page_authorizes_post() {
    let dir = tempfile::tempdir().unwrap();
    let guard = CsrfGuard::new(b"test-secret").unwrap();
    let state = open_state(&dir, MissingDeletePolicy::Report, Some(guard.clone()));
    let app = init_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/add").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let session = response_cookie(&resp, SESSION_COOKIE).unwrap();
    let token = guard.token_for(session.value());
    assert!(body_text(resp).await.contains(&token));

    let req = test::TestRequest::post()
        .uri("/add")
        .cookie(session.clone())
        .set_form([("title", "safe"), ("content", "write"), (CSRF_FIELD, token.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(response_cookie(&resp, SESSION_COOKIE).is_none());

    let created = state.store.list_notes().unwrap();
    assert_eq!(created.len(), 1);

    let req = test::TestRequest::post()
        .uri(&format!("/delete/{}", created[0].id))
        .cookie(session)
        .set_form([(CSRF_FIELD, token.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(state.store.list_notes().unwrap().is_empty());
}

#[actix_web::test]
async fn storage_failure_renders_generic_error_page() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir, MissingDeletePolicy::Report, None);
    std::fs::remove_file(dir.path().join("notes.db")).unwrap();
    let app = init_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(resp).await.contains(GENERIC_FAILURE_MESSAGE));
}

#[actix_web::test]
async fn content_beyond_default_form_size_is_saved() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir, MissingDeletePolicy::Report, None);
    let app = init_app!(state);
    let long_content = "x".repeat(20_000);

    let req = test::TestRequest::post()
        .uri("/add")
        .set_form([("title", "big"), ("content", long_content.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let created = state.store.list_notes().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].content, long_content);

    let longer_content = "y".repeat(40_000);
    let req = test::TestRequest::post()
        .uri(&format!("/edit/{}", created[0].id))
        .set_form([("title", "big"), ("content", longer_content.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(state.store.get_note(created[0].id).unwrap().content, longer_content);
}

#[actix_web::test]
async fn oversized_form_body_renders_error_page() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir, MissingDeletePolicy::Report, None);
    let app = init_app!(state);
    let too_long = "x".repeat(FORM_BODY_LIMIT + 1);

    let req = test::TestRequest::post()
        .uri("/add")
        .set_form([("title", "huge"), ("content", too_long.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body_text(resp).await.contains(FORM_FAILURE_MESSAGE));
    assert!(state.store.list_notes().unwrap().is_empty());
}

#[actix_web::test]
async fn non_form_body_renders_error_page() {
    let dir = tempfile::tempdir().unwrap();
    let guard = CsrfGuard::new(b"test-secret").unwrap();
    let state = open_state(&dir, MissingDeletePolicy::Report, Some(guard));
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/add")
        .insert_header(ContentType::json())
        .set_payload(r#"{"title":"t","content":"c"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
    let body = body_text(resp).await;
    assert!(body.contains("<html"));
    assert!(body.contains(FORM_FAILURE_MESSAGE));
    assert!(state.store.list_notes().unwrap().is_empty());
}

#[actix_web::test]
async fn no_session_cookie_when_csrf_is_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir, MissingDeletePolicy::Report, None);
    let created = state.store.create_note("keep", "me").unwrap();
    let app = init_app!(state);

    for uri in ["/".to_string(), "/add".to_string(), format!("/edit/{}", created.id)] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(response_cookie(&resp, SESSION_COOKIE).is_none());
        assert!(!body_text(resp).await.contains(CSRF_FIELD));
    }
}

#[actix_web::test]
async fn session_cookie_is_issued_when_csrf_is_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let guard = CsrfGuard::new(b"test-secret").unwrap();
    let state = open_state(&dir, MissingDeletePolicy::Report, Some(guard));
    let app = init_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(response_cookie(&resp, SESSION_COOKIE).is_some());
}
