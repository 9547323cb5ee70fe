// tests/integration/signup_page_tests.rs

use crate::common::app_helper::{setup_app, setup_app_with_account};
use crate::common::request::*;
use crate::common::test_data::*;
use axum::http::StatusCode;

fn error_message(html: &str, field: &str) -> Option<String> {
    let marker = format!(r#"data-testid="{}-error-message">"#, field);
    let start = html.find(&marker)? + marker.len();
    let end = html[start..].find("</span>")? + start;
    Some(unescape_html(&html[start..end]))
}

#[tokio::test]
async fn test_sign_up_form_renders() {
    let (app, _store) = setup_app();

    let response = get(&app, "/users/sign_up", None).await;
    assert_status(&response, StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains(r#"data-testid="email-input""#));
    assert!(html.contains(r#"data-testid="password-input""#));
    assert!(html.contains(r#"data-testid="password-confirmation-input""#));
    assert!(html.contains(r#"data-testid="signup-button""#));
    assert!(!html.contains(r#"data-testid="email-error-message""#));
    assert!(!html.contains(r#"data-testid="password-error-message""#));
    assert!(!html.contains(r#"data-testid="password_confirmation-error-message""#));
}

#[tokio::test]
async fn test_all_blank_reports_every_field() {
    let (app, store) = setup_app();

    let response = post_form(&app, "/users/sign_up", signup_form("", "", "")).await;
    assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(location(&response).is_none());

    let html = body_string(response).await;
    assert_eq!(error_message(&html, "email").as_deref(), Some("can't be blank"));
    assert_eq!(error_message(&html, "password").as_deref(), Some("can't be blank"));
    // 空欄同士は一致しているので確認欄のエラーは出ない
    assert_eq!(error_message(&html, "password_confirmation"), None);
    assert!(html.contains(r#"data-testid="email-error-icon""#));
    assert!(html.contains(r#"data-testid="password-error-icon""#));
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_missing_fields_are_treated_as_blank() {
    let (app, _store) = setup_app();

    let response = post_form(&app, "/users/sign_up", String::new()).await;
    assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);

    let html = body_string(response).await;
    assert_eq!(error_message(&html, "email").as_deref(), Some("can't be blank"));
    assert_eq!(error_message(&html, "password").as_deref(), Some("can't be blank"));
}

#[tokio::test]
async fn test_registered_email_is_taken() {
    let (app, store) = setup_app_with_account(REGISTERED_EMAIL, VALID_PASSWORD).await;

    let response = post_form(
        &app,
        "/users/sign_up",
        signup_form(REGISTERED_EMAIL, VALID_PASSWORD, VALID_PASSWORD),
    )
    .await;
    assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);

    let html = body_string(response).await;
    assert_eq!(
        error_message(&html, "email").as_deref(),
        Some("has already been taken")
    );
    assert_eq!(error_message(&html, "password"), None);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_registered_email_differing_in_case_is_taken() {
    let (app, _store) = setup_app_with_account(REGISTERED_EMAIL, VALID_PASSWORD).await;

    let response = post_form(
        &app,
        "/users/sign_up",
        signup_form("  Somsak@ODDS.team ", VALID_PASSWORD, VALID_PASSWORD),
    )
    .await;
    assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);

    let html = body_string(response).await;
    assert_eq!(
        error_message(&html, "email").as_deref(),
        Some("has already been taken")
    );
}

#[tokio::test]
async fn test_malformed_email_stays_on_sign_up() {
    let (app, store) = setup_app();

    let response = post_form(
        &app,
        "/users/sign_up",
        signup_form("somsakodds.team", VALID_PASSWORD, VALID_PASSWORD),
    )
    .await;
    assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(location(&response).is_none());
    assert!(cookie_pair(&response, "flash").is_none());

    let html = body_string(response).await;
    assert_eq!(error_message(&html, "email").as_deref(), Some("is invalid"));
    assert!(html.contains(r#"action="/users/sign_up""#));
    // 送信したメールアドレスはフォームに残る
    assert!(html.contains(r#"value="somsakodds.team""#));
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_short_password_reports_only_length() {
    let (app, _store) = setup_app();

    let response = post_form(
        &app,
        "/users/sign_up",
        signup_form("somsak@odds.team", "Ab1!", "Ab1!"),
    )
    .await;
    assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);

    let html = body_string(response).await;
    assert_eq!(
        error_message(&html, "password").as_deref(),
        Some("is too short (minimum is 8 characters)")
    );
    assert!(!html.contains("must be at least 8 characters long"));
    assert_eq!(error_message(&html, "email"), None);
}

#[tokio::test]
async fn test_password_without_complexity() {
    let (app, _store) = setup_app();

    for password in ["abcdefgh", "ABCDEFGH1!", "abcdefgh1!", "Abcdefgh!", "Abcdefgh1"] {
        let response = post_form(
            &app,
            "/users/sign_up",
            signup_form("somsak@odds.team", password, password),
        )
        .await;
        assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);

        let html = body_string(response).await;
        assert_eq!(
            error_message(&html, "password").as_deref(),
            Some(COMPLEXITY_MESSAGE),
            "password {:?} should fail complexity",
            password
        );
    }
}

#[tokio::test]
async fn test_special_character_outside_set_is_rejected() {
    let (app, _store) = setup_app();

    let response = post_form(
        &app,
        "/users/sign_up",
        signup_form("somsak@odds.team", "Abcdefg1?", "Abcdefg1?"),
    )
    .await;
    assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);

    let html = body_string(response).await;
    assert_eq!(
        error_message(&html, "password").as_deref(),
        Some(COMPLEXITY_MESSAGE)
    );
}

#[tokio::test]
async fn test_confirmation_mismatch() {
    let (app, store) = setup_app();

    let response = post_form(
        &app,
        "/users/sign_up",
        signup_form("somsak2@odds.team", VALID_PASSWORD, "BN8qJmeCuCg2zhx$"),
    )
    .await;
    assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);

    let html = body_string(response).await;
    assert_eq!(
        error_message(&html, "password_confirmation").as_deref(),
        Some("doesn't match Password")
    );
    assert!(html.contains(r#"data-testid="password_confirmation-error-icon""#));
    assert_eq!(error_message(&html, "email"), None);
    assert_eq!(error_message(&html, "password"), None);
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_errors_on_several_fields_at_once() {
    let (app, _store) = setup_app();

    let response = post_form(&app, "/users/sign_up", signup_form("", "short", "other")).await;
    assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);

    let html = body_string(response).await;
    assert_eq!(error_message(&html, "email").as_deref(), Some("can't be blank"));
    assert_eq!(
        error_message(&html, "password").as_deref(),
        Some("is too short (minimum is 8 characters)")
    );
    assert_eq!(
        error_message(&html, "password_confirmation").as_deref(),
        Some("doesn't match Password")
    );
}

#[tokio::test]
async fn test_successful_sign_up_redirects_with_notice() {
    let (app, store) = setup_app();

    let response = post_form(
        &app,
        "/users/sign_up",
        signup_form(REGISTERED_EMAIL, VALID_PASSWORD, VALID_PASSWORD),
    )
    .await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/"));

    let flash = cookie_pair(&response, "flash").expect("flash cookie");
    assert!(flash.starts_with("flash=Successfully"));

    let account = store.get(REGISTERED_EMAIL).expect("account stored");
    assert_ne!(account.password_hash, VALID_PASSWORD);
    assert!(account.password_hash.starts_with("$argon2id$"));

    // リダイレクト先で通知が表示される
    let response = get(&app, "/", Some(&flash)).await;
    assert_status(&response, StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains(r#"<span data-testid="flash-message">Successfully!</span>"#));
}

#[tokio::test]
async fn test_flash_is_cleared_after_display() {
    let (app, _store) = setup_app();

    let response = get(&app, "/", Some("flash=Successfully!")).await;
    let removal = set_cookie_header(&response, "flash").expect("removal cookie");
    assert!(removal.contains("Max-Age=0"));

    let response = get(&app, "/", None).await;
    let html = body_string(response).await;
    assert!(!html.contains(r#"data-testid="flash-notice""#));
}

#[tokio::test]
async fn test_second_sign_up_with_same_email_is_taken() {
    let (app, store) = setup_app();
    let form = signup_form("somsak3@odds.team", VALID_PASSWORD, VALID_PASSWORD);

    let response = post_form(&app, "/users/sign_up", form.clone()).await;
    assert_status(&response, StatusCode::SEE_OTHER);

    let response = post_form(&app, "/users/sign_up", form).await;
    assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_string(response).await;
    assert_eq!(
        error_message(&html, "email").as_deref(),
        Some("has already been taken")
    );
    assert_eq!(store.len(), 1);
}
