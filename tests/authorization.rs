mod common;

use axum::http::StatusCode;
use common::{Client, TestApp};
use uuid::Uuid;

#[tokio::test]
async fn other_users_pages_redirect_to_login() {
    let app = TestApp::new();
    let mut alice = app.register("alice").await;
    let mut bob = app.register("bob").await;
    let note_id = app.add_note(&mut bob, "bob", "Bob's", "private").await;

    for uri in [
        "/users/bob".to_string(),
        "/users/bob/notes/add".to_string(),
        format!("/notes/{}/update", note_id),
    ] {
        let response = app.get(&mut alice, &uri).await;
        response.assert_redirect_to("/login");
        assert!(!response.body.contains("private"), "{} leaked content", uri);
    }
}

#[tokio::test]
async fn forged_mutations_on_other_users_are_rejected() {
    let app = TestApp::new();
    let mut alice = app.register("alice").await;
    let mut bob = app.register("bob").await;
    let note_id = app.add_note(&mut bob, "bob", "Bob's", "private").await;

    // Alice's own token is valid for her session, just not for Bob's data.
    let csrf = app.csrf(&mut alice, "alice").await;

    let add = app
        .post(
            &mut alice,
            "/users/bob/notes/add",
            &[("title", "x"), ("content", "y"), ("csrf_token", csrf.as_str())],
        )
        .await;
    let update = app
        .post(
            &mut alice,
            &format!("/notes/{}/update", note_id),
            &[("title", "pwned"), ("content", "pwned"), ("csrf_token", csrf.as_str())],
        )
        .await;
    let delete_note = app
        .post(
            &mut alice,
            &format!("/notes/{}/delete", note_id),
            &[("csrf_token", csrf.as_str())],
        )
        .await;
    let delete_user = app
        .post(&mut alice, "/users/bob/delete", &[("csrf_token", csrf.as_str())])
        .await;

    for response in [add, update, delete_note, delete_user] {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    let id = Uuid::parse_str(&note_id).unwrap();
    let note = app.state.notes.get(id).await.unwrap().expect("note survives");
    assert_eq!(note.title, "Bob's");
    assert_eq!(note.content, "private");
    assert_eq!(app.state.notes.list_by_owner("bob").await.unwrap().len(), 1);
    assert!(app.state.users.find_by_username("bob").await.unwrap().is_some());
}

#[tokio::test]
async fn anonymous_clients_cannot_view_or_mutate() {
    let app = TestApp::new();
    let mut bob = app.register("bob").await;
    let note_id = app.add_note(&mut bob, "bob", "Bob's", "private").await;
    let mut anon = Client::default();

    app.get(&mut anon, "/users/bob")
        .await
        .assert_redirect_to("/login");
    app.get(&mut anon, &format!("/notes/{}/update", note_id))
        .await
        .assert_redirect_to("/login");

    let response = app
        .post(&mut anon, &format!("/notes/{}/delete", note_id), &[])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    let response = app.post(&mut anon, "/users/bob/delete", &[]).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    assert_eq!(app.state.notes.list_by_owner("bob").await.unwrap().len(), 1);
}

#[tokio::test]
async fn anonymous_is_denied_even_for_missing_resources() {
    let app = TestApp::new();
    let mut anon = Client::default();

    app.get(&mut anon, "/notes/not-a-uuid/update")
        .await
        .assert_redirect_to("/login");
    app.get(&mut anon, "/users/nobody")
        .await
        .assert_redirect_to("/login");
}

#[tokio::test]
async fn missing_notes_are_not_found_for_logged_in_users() {
    let app = TestApp::new();
    let mut alice = app.register("alice").await;

    let response = app.get(&mut alice, "/notes/not-a-uuid/update").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .get(&mut alice, &format!("/notes/{}/update", Uuid::new_v4()))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mutations_without_a_valid_csrf_token_change_nothing() {
    let app = TestApp::new();
    let mut alice = app.register("alice").await;
    let note_id = app.add_note(&mut alice, "alice", "Keep", "me").await;

    let responses = [
        app.post(
            &mut alice,
            "/users/alice/notes/add",
            &[("title", "x"), ("content", "y")],
        )
        .await,
        app.post(
            &mut alice,
            &format!("/notes/{}/update", note_id),
            &[("title", "changed"), ("content", "changed"), ("csrf_token", "forged")],
        )
        .await,
        app.post(&mut alice, &format!("/notes/{}/delete", note_id), &[])
            .await,
        app.post(&mut alice, "/users/alice/delete", &[("csrf_token", "")])
            .await,
    ];
    for response in responses {
        assert_eq!(response.status, StatusCode::FORBIDDEN);
    }

    let notes = app.state.notes.list_by_owner("alice").await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "Keep");
    assert!(app.state.users.find_by_username("alice").await.unwrap().is_some());
}

#[tokio::test]
async fn foreign_page_view_explains_the_denial() {
    let app = TestApp::new();
    let mut alice = app.register("alice").await;
    app.register("bob").await;

    app.get(&mut alice, "/users/bob")
        .await
        .assert_redirect_to("/login");
    app.get(&mut alice, "/login")
        .await
        .assert_redirect_to("/users/alice");

    let page = app.get(&mut alice, "/users/alice").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Cannot access this user."));
    assert!(!page.body.contains("You must be logged in."));
}
