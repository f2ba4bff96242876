mod common;

use common::{Log, echo_error, echo_param, get, note, request};
use ladder::{
    App, VerbRouter,
    http::{Method, StatusCode},
    testing::{Fail, Pass, RecordingHandler, Reply, SkipRoute},
};

// ============================================================================
// Verb Sugar
// ============================================================================

#[tokio::test]
async fn test_get_route_only_answers_get() {
    let app = App::new().get("/foo", Reply::text("foo"));

    assert_eq!(get("/foo").send(&app).await.body_text(), "foo");
    assert_eq!(get("/foo/").send(&app).await.body_text(), "foo");
    assert_eq!(
        request("POST", "/foo").send(&app).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        get("/foo/bar").send(&app).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_every_standard_verb() {
    let app = App::new()
        .get("/", Reply::text("GET"))
        .post("/", Reply::text("POST"))
        .put("/", Reply::text("PUT"))
        .delete("/", Reply::text("DELETE"))
        .patch("/", Reply::text("PATCH"))
        .head("/", Reply::text("HEAD"))
        .options("/", Reply::text("OPTIONS"))
        .trace("/", Reply::text("TRACE"));

    for verb in [
        "GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS", "TRACE",
    ] {
        let res = request(verb, "/").send(&app).await;
        assert_eq!(res.body_text(), verb);
    }

    assert_eq!(
        request("CONNECT", "/").send(&app).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_extension_verb() {
    let purge = Method::from_bytes(b"PURGE").unwrap();
    let app = App::new()
        .on(purge, "/cache", Reply::text("purged"))
        .all("/cache", Reply::text("fallback"));

    assert_eq!(
        request("PURGE", "/cache").send(&app).await.body_text(),
        "purged"
    );
    assert_eq!(get("/cache").send(&app).await.body_text(), "fallback");
}

#[tokio::test]
async fn test_route_params() {
    let app = App::new()
        .get("/users/:id", echo_param("id"))
        .get("/files/:name", echo_param("name"));

    assert_eq!(get("/users/42").send(&app).await.body_text(), "42");
    assert_eq!(
        get("/files/read%20me.txt").send(&app).await.body_text(),
        "read me.txt"
    );
    assert_eq!(
        get("/users").send(&app).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_params_scoped_to_matching_entry() {
    let app = App::new()
        .at("/foo/:a", echo_param("a"))
        .at("/foo", echo_param("a"));

    assert_eq!(get("/foo/google").send(&app).await.body_text(), "google");
    assert_eq!(get("/foo").send(&app).await.body_text(), "undefined");
}

#[tokio::test]
async fn test_invalid_utf8_path_never_matches() {
    let app = App::new()
        .get("/files/:name", echo_param("name"))
        .with(Reply::text("fallthrough"));

    assert_eq!(get("/files/ok").send(&app).await.body_text(), "ok");
    assert_eq!(
        get("/files/%FF").send(&app).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_literals_ignore_case_by_default() {
    let app = App::new().get("/Users", Reply::text("users"));
    assert_eq!(get("/users").send(&app).await.body_text(), "users");

    let app = App::new()
        .case_sensitive(true)
        .get("/Users", Reply::text("users"));
    assert_eq!(
        get("/users").send(&app).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(get("/Users").send(&app).await.body_text(), "users");
}

// ============================================================================
// Verb Routers
// ============================================================================

#[tokio::test]
async fn test_verb_router_runs_matching_pairs_in_order() {
    let log = Log::new();
    let router = VerbRouter::new()
        .all(note(&log, "any"))
        .get(note(&log, "get"))
        .post(note(&log, "post"))
        .get(Reply::text("done"));
    let app = App::new().route("/items", router);

    let res = get("/items").send(&app).await;
    assert_eq!(res.body_text(), "done");
    assert_eq!(log.entries(), vec!["any:/items", "get:/items"]);
}

#[tokio::test]
async fn test_exhausted_verb_router_continues_outer_stack() {
    let recorder = RecordingHandler::new();
    let app = App::new()
        .route("/items", VerbRouter::new().get(Pass))
        .with(recorder.clone());

    let res = request("DELETE", "/items").send(&app).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(recorder.paths(), vec!["/items"]);

    recorder.clear();
    get("/items").send(&app).await;
    assert_eq!(recorder.count(), 1);
}

#[tokio::test]
async fn test_skip_route_leaves_router() {
    let skipped = RecordingHandler::new();
    let router = VerbRouter::new()
        .get(SkipRoute)
        .get(skipped.clone())
        .get(Reply::text("unreachable"));
    let app = App::new()
        .route("/", router)
        .get("/", Reply::text("next route"));

    let res = get("/").send(&app).await;
    assert_eq!(res.body_text(), "next route");
    assert_eq!(skipped.count(), 0);
}

#[tokio::test]
async fn test_skip_route_outside_router_continues() {
    let app = App::new().with(SkipRoute).with(Reply::text("after"));

    assert_eq!(get("/").send(&app).await.body_text(), "after");
}

#[tokio::test]
async fn test_verb_router_error_goes_to_outer_error_handlers() {
    let router = VerbRouter::new()
        .get(Fail::returning("route failed"))
        .get(Reply::text("unreachable"));
    let app = App::new().route("/", router).catch(echo_error());

    assert_eq!(get("/").send(&app).await.body_text(), "route failed");

    let router = VerbRouter::new().get(Fail::panicking("route panicked"));
    let app = App::new().route("/", router).catch(echo_error());

    assert_eq!(
        get("/").send(&app).await.body_text(),
        "handler panicked: route panicked"
    );
}

#[tokio::test]
async fn test_verb_router_skipped_in_error_mode() {
    let handled = RecordingHandler::new();
    let app = App::new()
        .with(Fail::signal("early"))
        .route("/", VerbRouter::new().get(handled.clone()))
        .catch(echo_error());

    assert_eq!(get("/").send(&app).await.body_text(), "early");
    assert_eq!(handled.count(), 0);
}
