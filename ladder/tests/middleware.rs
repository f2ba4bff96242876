mod common;

// ============================================================================
// Logging
// ============================================================================

#[cfg(feature = "tracing")]
mod logging {
    use crate::common::{echo_path, get};
    use ladder::{
        App,
        http::StatusCode,
        middleware::{Logger, REQUEST_ID_HEADER, Traced},
        testing::{Fail, RecordingHandler, Reply},
    };

    #[tokio::test]
    async fn test_logger_sees_every_outcome() {
        let app = App::new()
            .with(Logger)
            .get("/ok", Reply::text("ok"))
            .get("/fail", Fail::returning("broken"));

        assert_eq!(get("/ok").send(&app).await.status(), StatusCode::OK);
        assert_eq!(
            get("/missing").send(&app).await.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get("/fail").send(&app).await.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_traced_mounted_app() {
        let recorder = RecordingHandler::new();
        let api = App::new()
            .with(Traced::new(recorder.clone(), "api"))
            .at("/users", echo_path("users at "));
        let app = App::new().with(Logger).mount("/api", api);

        let res = get("/api/users")
            .header(REQUEST_ID_HEADER, "abc-123")
            .send(&app)
            .await;

        assert_eq!(res.body_text(), "users at /users");
        assert_eq!(recorder.paths(), vec!["/users"]);
    }
}

// ============================================================================
// Timeout
// ============================================================================

#[cfg(feature = "timeout")]
mod timeout {
    use crate::common::get;
    use ladder::{App, handler_fn, middleware::Timeout, testing::RecordingErrorHandler};
    use std::time::Duration;

    #[tokio::test]
    async fn test_timeout_reaches_error_handlers() {
        let slow = handler_fn(|_req, res, _next| {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                res.send("slow");
                Ok(())
            })
        });
        let errors = RecordingErrorHandler::new().responding();
        let app = App::new()
            .get("/slow", Timeout::new(slow, Duration::from_millis(20)))
            .catch(errors.clone());

        let res = get("/slow").send(&app).await;
        assert_eq!(res.body_text(), "handler timed out after 20ms");
        assert_eq!(errors.count(), 1);
    }
}

// ============================================================================
// Tower
// ============================================================================

#[cfg(feature = "tower")]
mod tower_adapters {
    use crate::common::get;
    use bytes::Bytes;
    use ladder::{
        App,
        http::{self, StatusCode},
        service::{AppService, ServiceHandler},
        testing::{Reply, TestRequest},
    };
    use std::convert::Infallible;
    use tower::{ServiceExt, service_fn};

    #[tokio::test]
    async fn test_app_as_service() {
        let service = AppService::new(App::new().get("/hello", Reply::text("world")));

        let request = http::Request::builder()
            .uri("/hello?name=x")
            .body(Bytes::new())
            .unwrap();
        let response = service.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), b"world");

        let request = http::Request::builder()
            .method("POST")
            .uri("/hello")
            .body(Bytes::new())
            .unwrap();
        let response = service.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_app_service_inside_app() {
        let inner = AppService::new(App::new().get("/ping", Reply::text("pong")));
        let app = App::new().mount("/inner", App::new().with(ServiceHandler::new(inner)));

        assert_eq!(get("/inner/ping").send(&app).await.body_text(), "pong");
    }

    #[tokio::test]
    async fn test_service_handler_forwards_body() {
        let echo = service_fn(|request: http::Request<Bytes>| async move {
            Ok::<_, Infallible>(http::Response::new(request.into_body()))
        });
        let app = App::new().post("/echo", ServiceHandler::new(echo));

        let res = TestRequest::post("/echo").body("payload").send(&app).await;
        assert_eq!(res.body_text(), "payload");
    }
}
