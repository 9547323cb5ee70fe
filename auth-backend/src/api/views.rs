// auth-backend/src/api/views.rs

//! 埋め込みテンプレートによるHTML描画

use crate::domain::credential::{CredentialField, ValidationResult};
use crate::error::{AppError, AppResult};
use axum::response::Html;
use once_cell::sync::Lazy;
use serde::Serialize;
use tera::{Context, Tera};

static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("layout.html", include_str!("../templates/layout.html")),
        ("sign_up.html", include_str!("../templates/sign_up.html")),
        ("login.html", include_str!("../templates/login.html")),
        ("home.html", include_str!("../templates/home.html")),
        ("dashboard.html", include_str!("../templates/dashboard.html")),
    ])
    .expect("Invalid embedded templates");
    tera
});

/// フォームの1項目
#[derive(Debug, Clone, Serialize)]
struct FormField {
    name: &'static str,
    label: &'static str,
    input_type: &'static str,
    input_testid: &'static str,
    autocomplete: &'static str,
    value: String,
    error: Option<String>,
}

impl FormField {
    fn new(field: CredentialField, value: String, errors: &ValidationResult) -> Self {
        let (label, input_type, input_testid, autocomplete) = match field {
            CredentialField::Email => ("Email", "email", "email-input", "email"),
            CredentialField::Password => ("Password", "password", "password-input", "new-password"),
            CredentialField::PasswordConfirmation => (
                "Password confirmation",
                "password",
                "password-confirmation-input",
                "new-password",
            ),
        };

        Self {
            name: field.as_str(),
            label,
            input_type,
            input_testid,
            autocomplete,
            value,
            error: errors.message_for(field),
        }
    }
}

fn render(name: &str, context: &Context) -> AppResult<Html<String>> {
    TEMPLATES
        .render(name, context)
        .map(Html)
        .map_err(|e| AppError::InternalServerError(format!("Template {} failed: {:?}", name, e)))
}

/// サインアップフォーム（パスワードは再表示しない）
pub fn sign_up_page(email: &str, errors: &ValidationResult) -> AppResult<Html<String>> {
    let fields: Vec<FormField> = CredentialField::ALL
        .iter()
        .map(|&field| {
            let value = match field {
                CredentialField::Email => email.to_string(),
                _ => String::new(),
            };
            FormField::new(field, value, errors)
        })
        .collect();

    let mut context = Context::new();
    context.insert("fields", &fields);
    render("sign_up.html", &context)
}

/// ログインフォーム
pub fn login_page(
    email: &str,
    errors: &ValidationResult,
    alert: Option<&str>,
) -> AppResult<Html<String>> {
    let mut email_field = FormField::new(CredentialField::Email, email.to_string(), errors);
    email_field.autocomplete = "username";
    let mut password_field = FormField::new(CredentialField::Password, String::new(), errors);
    password_field.autocomplete = "current-password";

    let mut context = Context::new();
    context.insert("fields", &vec![email_field, password_field]);
    context.insert("alert", &alert);
    render("login.html", &context)
}

/// トップページ（フラッシュメッセージ付き）
pub fn home_page(flash: Option<&str>) -> AppResult<Html<String>> {
    let mut context = Context::new();
    context.insert("flash", &flash);
    render("home.html", &context)
}

pub fn dashboard_page(display_name: &str, email: &str) -> AppResult<Html<String>> {
    let mut context = Context::new();
    context.insert("display_name", display_name);
    context.insert("email", email);
    render("dashboard.html", &context)
}
