//! End-to-end dispatch tests: route file → router → controller.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use serde_json::{json, Value};

use routerunner::config::loader::{build_loader, parse_config};
use routerunner::config::Endpoint;
use routerunner::dispatch::ControllerInstance;
use routerunner::{Dependencies, Router, RouterError};

mod common;
use common::{EchoController, Greeting, HomeController, UserController, UserStore};

fn dependencies() -> Dependencies {
    Dependencies::new()
        .with(UserStore {
            names: vec!["ada", "grace"],
        })
        .with(Greeting("welcome"))
}

fn app(routes: &Path) -> routerunner::dispatch::RouterBuilder {
    let config = parse_config(
        r#"
        [dispatch]
        namespace = "app"
        login = { method = "GET", uri = "/login" }
        "#,
    )
    .unwrap();

    Router::builder()
        .settings(config.dispatch)
        .load_routes(&build_loader(&config.cache), routes)
        .unwrap()
        .dependencies(dependencies())
        .controller("app::HomeController", 2, HomeController::build)
        .controller("app::UserController", 1, UserController::build)
        .controller("app::ItemController", 0, EchoController::build)
        .controller("app::SessionController", 0, EchoController::build)
        .controller("app::AdminController", 0, EchoController::build)
}

#[test]
fn test_routes_resolve_to_controllers() {
    let path = common::write_routes(common::APP_ROUTES);
    let router = app(&path).build();

    assert_eq!(router.execute("GET", "/").unwrap(), json!("welcome"));
    assert_eq!(
        router.execute("GET", "/users/1").unwrap(),
        json!({ "id": 1, "name": "grace" })
    );
    assert_eq!(router.execute("GET", "/users/9").unwrap(), Value::Null);
    assert_eq!(router.execute("POST", "/users").unwrap(), json!({ "created": 2 }));

    for method in ["GET", "POST"] {
        assert_eq!(
            router.execute(method, "/items/widget").unwrap(),
            json!({ "action": "find", "params": ["widget"] })
        );
    }

    fs::remove_file(&path).unwrap_or_default();
}

#[test]
fn test_unmatched_requests_use_fallback() {
    let path = common::write_routes(common::APP_ROUTES);
    let router = app(&path).build();

    // Non-digit segment is rejected by [numeric], then GET / answers.
    assert_eq!(router.execute("GET", "/users/abc").unwrap(), json!("welcome"));
    assert_eq!(router.execute("PUT", "/users").unwrap(), json!("welcome"));

    fs::remove_file(&path).unwrap_or_default();
}

#[test]
fn test_missing_fallback_is_fatal() {
    let path = common::write_routes("GET /users/[numeric] UserController->show\n");
    let router = app(&path).build();

    let err = router.execute("GET", "/nothing").unwrap_err();
    assert!(err.is_not_found());

    fs::remove_file(&path).unwrap_or_default();
}

#[test]
fn test_authorization_switches_to_login_route() {
    let path = common::write_routes(common::APP_ROUTES);
    let verified = Arc::new(AtomicUsize::new(0));
    let seen = verified.clone();

    let router = app(&path)
        .authorizer(move |controller: &ControllerInstance| {
            seen.fetch_add(1, Ordering::SeqCst);
            match controller.type_name() {
                "app::AdminController" | "app::SessionController" => {
                    Err(RouterError::rejected(controller.type_name(), "anonymous"))
                }
                _ => Ok(()),
            }
        })
        .build();

    // The login controller would also be rejected, but it is not re-verified.
    let value = router.execute("GET", "/admin").unwrap();
    assert_eq!(value, json!({ "action": "login", "params": null }));
    assert_eq!(verified.load(Ordering::SeqCst), 1);

    assert_eq!(router.execute("GET", "/").unwrap(), json!("welcome"));
    assert_eq!(verified.load(Ordering::SeqCst), 2);

    fs::remove_file(&path).unwrap_or_default();
}

#[test]
fn test_login_route_missing_falls_back_then_fails() {
    let path = common::write_routes("GET /admin AdminController->dashboard\n");
    let router = app(&path)
        .login_fallback(Endpoint::new("GET", "/signin"))
        .authorizer(|c: &ControllerInstance| -> routerunner::Result<()> {
            Err(RouterError::rejected(c.type_name(), "no"))
        })
        .build();

    let err = router.execute("GET", "/admin").unwrap_err();
    assert!(err.is_not_found());

    fs::remove_file(&path).unwrap_or_default();
}

#[test]
fn test_dependency_vector_too_short() {
    let path = common::write_routes(common::APP_ROUTES);
    let router = app(&path)
        .dependencies(Dependencies::new().with(UserStore { names: vec![] }))
        .build();

    match router.execute("GET", "/").unwrap_err() {
        RouterError::Construction {
            controller,
            required,
            provided,
        } => {
            assert_eq!(controller, "app::HomeController");
            assert_eq!(required, 2);
            assert_eq!(provided, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    // Controllers needing fewer positions still work.
    assert!(router.execute("POST", "/users").is_ok());

    fs::remove_file(&path).unwrap_or_default();
}

#[test]
fn test_resolve_exposes_route_and_params() {
    let path = common::write_routes(common::APP_ROUTES);
    let router = app(&path).build();

    let resolved = router.resolve("GET", "/users/0").unwrap();
    assert_eq!(resolved.route.to_string(), "GET /users/[numeric] UserController->show");
    assert_eq!(resolved.controller.type_name(), "app::UserController");
    assert_eq!(resolved.action, "show");
    assert_eq!(resolved.params, Some(vec!["0".to_string()]));
    assert_eq!(resolved.invoke().unwrap()["name"], "ada");

    let home = router.resolve("GET", "/").unwrap();
    assert_eq!(home.route.anchor(), Some("landing"));
    assert_eq!(home.params, None);

    fs::remove_file(&path).unwrap_or_default();
}

#[test]
fn test_missing_route_file_aborts_build() {
    let missing = common::temp_path("routes");
    let result = Router::builder().load_routes(&routerunner::RouteLoader::new(), &missing);
    assert!(matches!(result, Err(RouterError::SourceUnavailable { .. })));
}
