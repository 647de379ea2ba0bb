//! Server-rendered HTML pages.
//!
//! Every interpolated value goes through `escape`.

use std::fmt::Write as _;

use axum::http::StatusCode;
use axum::response::Html;

use crate::{
    models::{note::Note, session::SessionContext, user::User},
    services::flash::Flash,
    validation::errors::FieldErrors,
};

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, ctx: &SessionContext, flash: Option<Flash>, body: &str) -> Html<String> {
    let mut nav = String::new();
    match (ctx.username(), ctx.csrf_token()) {
        (Some(username), Some(csrf)) => {
            let _ = write!(
                nav,
                r#"<a href="/users/{u}">{u}</a>
<form method="post" action="/logout" class="inline">{csrf}<button type="submit">Log out</button></form>"#,
                u = escape(username),
                csrf = csrf_field(csrf),
            );
        }
        _ => nav.push_str(r#"<a href="/register">Register</a> <a href="/login">Log in</a>"#),
    }

    let flash_html = flash
        .map(|f| format!(r#"<p class="flash">{}</p>"#, escape(f.message())))
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<nav>{nav}</nav>
{flash_html}
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    ))
}

fn csrf_field(token: &str) -> String {
    format!(r#"<input type="hidden" name="csrf_token" value="{}">"#, escape(token))
}

fn field_errors(errors: &FieldErrors, name: &str) -> String {
    errors
        .get(name)
        .iter()
        .map(|msg| format!(r#"<span class="error">{}</span>"#, escape(msg)))
        .collect()
}

fn input(label: &str, name: &str, kind: &str, value: &str, errors: &FieldErrors) -> String {
    format!(
        r#"<p><label for="{name}">{label}</label>
<input id="{name}" name="{name}" type="{kind}" value="{value}">{errors}</p>
"#,
        label = escape(label),
        value = escape(value),
        errors = field_errors(errors, name),
    )
}

/// The registration form. The password is never echoed back.
pub fn register_page(
    ctx: &SessionContext,
    username: &str,
    email: &str,
    first_name: &str,
    last_name: &str,
    errors: &FieldErrors,
    flash: Option<Flash>,
) -> Html<String> {
    let body = format!(
        r#"<form method="post" action="/register">
{}{}{}{}{}<button type="submit">Register</button>
</form>"#,
        input("Username", "username", "text", username, errors),
        input("Password", "password", "password", "", errors),
        input("Email", "email", "email", email, errors),
        input("First Name", "first_name", "text", first_name, errors),
        input("Last Name", "last_name", "text", last_name, errors),
    );
    layout("Register", ctx, flash, &body)
}

/// The login form.
pub fn login_page(
    ctx: &SessionContext,
    username: &str,
    errors: &FieldErrors,
    flash: Option<Flash>,
) -> Html<String> {
    let body = format!(
        r#"<form method="post" action="/login">
{}{}<button type="submit">Log in</button>
</form>"#,
        input("Username", "username", "text", username, errors),
        input("Password", "password", "password", "", errors),
    );
    layout("Log in", ctx, flash, &body)
}

/// A user's details and notes, with the owner's actions.
pub fn user_page(ctx: &SessionContext, user: &User, notes: &[Note], flash: Option<Flash>) -> Html<String> {
    let csrf = csrf_field(ctx.csrf_token().unwrap_or_default());
    let username = escape(&user.username);

    let mut body = format!(
        r#"<dl>
<dt>Username</dt><dd>{username}</dd>
<dt>Email</dt><dd>{email}</dd>
<dt>First Name</dt><dd>{first}</dd>
<dt>Last Name</dt><dd>{last}</dd>
</dl>
<h2>Notes</h2>
<ul class="notes">
"#,
        email = escape(&user.email),
        first = escape(&user.first_name),
        last = escape(&user.last_name),
    );

    for note in notes {
        let _ = write!(
            body,
            r#"<li><h3>{title}</h3><p>{content}</p>
<a href="/notes/{id}/update">Edit</a>
<form method="post" action="/notes/{id}/delete" class="inline">{csrf}<button type="submit">Delete</button></form></li>
"#,
            title = escape(&note.title),
            content = escape(&note.content),
            id = note.id,
        );
    }

    let _ = write!(
        body,
        r#"</ul>
<p><a href="/users/{username}/notes/add">Add note</a></p>
<form method="post" action="/users/{username}/delete">{csrf}<button type="submit">Delete account</button></form>"#,
    );

    layout(&user.username, ctx, flash, &body)
}

/// The add/update note form.
pub fn note_form_page(
    ctx: &SessionContext,
    heading: &str,
    action: &str,
    title: &str,
    content: &str,
    errors: &FieldErrors,
) -> Html<String> {
    let body = format!(
        r#"<form method="post" action="{action}">
{csrf}{title_input}<p><label for="content">Content</label>
<textarea id="content" name="content">{content}</textarea>{content_errors}</p>
<button type="submit">Save</button>
</form>"#,
        action = escape(action),
        csrf = csrf_field(ctx.csrf_token().unwrap_or_default()),
        title_input = input("Title", "title", "text", title, errors),
        content = escape(content),
        content_errors = field_errors(errors, "content"),
    );
    layout(heading, ctx, None, &body)
}

/// A bare error page.
pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let reason = status.canonical_reason().unwrap_or("Error");
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{code} {reason}</title></head>
<body>
<h1>{code} {reason}</h1>
<p>{message}</p>
<p><a href="/">Home</a></p>
</body>
</html>
"#,
        code = status.as_u16(),
        message = escape(message),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::Session;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            escape(r#"<b class="x">Tom & 'Jerry'</b>"#),
            "&lt;b class=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn note_content_is_escaped_on_user_page() {
        let ctx = SessionContext::new(
            Uuid::new_v4(),
            Session {
                username: "alice".to_string(),
                csrf_token: "tok".to_string(),
                created_at: Utc::now(),
                expires_at: Utc::now() + Duration::days(1),
            },
        );
        let user = User {
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
            email: "a@x.com".to_string(),
            first_name: "A".to_string(),
            last_name: "L".to_string(),
            created_at: Utc::now(),
        };
        let note = Note {
            id: Uuid::new_v4(),
            title: "<script>alert(1)</script>".to_string(),
            content: "x".to_string(),
            owner: "alice".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let Html(page) = user_page(&ctx, &user, &[note], None);
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains(r#"name="csrf_token" value="tok""#));
        assert!(!page.contains("hash"));
    }

    #[test]
    fn register_page_never_echoes_password() {
        let errors = FieldErrors::single("password", "too short");
        let Html(page) = register_page(&SessionContext::anonymous(), "alice", "a@x.com", "A", "L", &errors, None);
        assert!(page.contains(r#"name="password" type="password" value="""#));
        assert!(page.contains("too short"));
        assert!(page.contains(r#"value="alice""#));
    }

    #[test]
    fn error_page_shows_status() {
        let Html(page) = error_page(StatusCode::NOT_FOUND, "Resource not found");
        assert!(page.contains("404 Not Found"));
    }
}
