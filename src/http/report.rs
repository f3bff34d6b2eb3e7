//! JSON reports for the `routes` and `resolve` commands.
//!
//! Both build the same dispatcher the server would and inspect it without
//! invoking any handler.

use axum::http::Method;
use serde_json::{json, Map, Value};

use crate::config::RouterConfig;
use crate::http::handlers::{build_dispatcher, BuildError};
use crate::http::request::normalize_path;
use crate::routing::{Params, Resolution, TokenValue};

/// Every registered route, GET class first.
pub fn list_routes(config: &RouterConfig) -> Result<Value, BuildError> {
    let dispatcher = build_dispatcher(config)?;
    let routes = dispatcher
        .table()
        .routes()
        .into_iter()
        .map(|(verb, entry)| {
            json!({
                "method": verb.as_str(),
                "pattern": entry.pattern(),
                "base_path": entry.base_path(),
                "tokens": entry.tokens(),
            })
        })
        .collect();
    Ok(Value::Array(routes))
}

/// How `method` and `target` (path, optionally with a query) would resolve.
pub fn resolve_report(
    config: &RouterConfig,
    method: &Method,
    target: &str,
) -> Result<Value, BuildError> {
    let dispatcher = build_dispatcher(config)?;
    let path = target.split('?').next().unwrap_or(target);
    let path = normalize_path(path);

    let report = match dispatcher.resolve(method, path) {
        Resolution::Matched { entry, params } => json!({
            "method": method.as_str(),
            "path": path,
            "matched": true,
            "route": entry.pattern(),
            "base_path": entry.base_path(),
            "params": params_json(&params),
        }),
        Resolution::NotFound(reason) => json!({
            "method": method.as_str(),
            "path": path,
            "matched": false,
            "reason": reason.to_string(),
        }),
    };
    Ok(report)
}

/// Absent tokens become `null`.
fn params_json(params: &Params) -> Value {
    let values: Map<String, Value> = params
        .iter()
        .map(|(name, value)| {
            let value = match value {
                TokenValue::Present(v) => Value::String(v.clone()),
                TokenValue::Absent => Value::Null,
            };
            (name.to_string(), value)
        })
        .collect();
    Value::Object(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;

    fn config() -> RouterConfig {
        let mut config = RouterConfig::default();
        config.routes.push(RouteConfig::post("/users/{id}", "saved"));
        config.routes.push(RouteConfig::get("/users/{id}", "user"));
        config.routes.push(RouteConfig::get("/item/{id}/{sub}", "item"));
        config.routes.push(RouteConfig::get("/", "home"));
        config
    }

    #[test]
    fn test_resolve_strips_query_and_reports_absent_as_null() {
        let report = resolve_report(&config(), &Method::GET, "/item/5?x=1").unwrap();
        assert_eq!(report["matched"], true);
        assert_eq!(report["path"], "/item/5");
        assert_eq!(report["route"], "/item/{id}/{sub}");
        assert_eq!(report["params"], json!({"id": "5", "sub": null}));
    }

    #[test]
    fn test_resolve_trailing_slash_and_root() {
        let report = resolve_report(&config(), &Method::HEAD, "/users/42/").unwrap();
        assert_eq!(report["matched"], true);
        assert_eq!(report["params"], json!({"id": "42"}));

        let report = resolve_report(&config(), &Method::GET, "/?page=2").unwrap();
        assert_eq!(report["route"], "/");
        assert_eq!(report["params"], json!({}));
    }

    #[test]
    fn test_resolve_not_found_reasons() {
        let report = resolve_report(&config(), &Method::GET, "/users/42/edit").unwrap();
        assert_eq!(report["matched"], false);
        assert_eq!(report["reason"], "2 segments supplied, route declares 1");

        let report = resolve_report(&config(), &Method::PUT, "/users/42").unwrap();
        assert_eq!(report["matched"], false);
        assert_eq!(report["reason"], "unsupported method");

        let report = resolve_report(&config(), &Method::GET, "/nope/1").unwrap();
        assert_eq!(report["reason"], "no route");
    }

    #[test]
    fn test_list_routes_get_class_first() {
        let listed = list_routes(&config()).unwrap();
        let summary: Vec<(String, String)> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|route| {
                (
                    route["method"].as_str().unwrap().to_string(),
                    route["pattern"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            [
                ("GET".to_string(), "/".to_string()),
                ("GET".to_string(), "/item/{id}/{sub}".to_string()),
                ("GET".to_string(), "/users/{id}".to_string()),
                ("POST".to_string(), "/users/{id}".to_string()),
            ]
        );
        assert_eq!(listed[1]["tokens"], json!(["id", "sub"]));
        assert_eq!(listed[1]["base_path"], "/item/");
    }

    #[test]
    fn test_report_surfaces_build_errors() {
        let mut config = RouterConfig::default();
        config.routes.push(RouteConfig::get("/x/{id", "x"));
        assert!(matches!(list_routes(&config), Err(BuildError::Pattern(_))));
        assert!(resolve_report(&config, &Method::GET, "/x").is_err());
    }
}
