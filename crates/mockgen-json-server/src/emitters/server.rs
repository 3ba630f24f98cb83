use minijinja::context;
use mockgen_core::config::{Scheme, ServerConfig};
use mockgen_core::error::GeneratorError;
use mockgen_core::ir::{CompiledRoutes, HttpMethod, RouteRecord};
use serde::Serialize;

use super::{CERT_FILE, KEY_FILE, render};

/// Status a handler answers with when its operation declared no success code.
const DEFAULT_STATUS: &str = "200";

/// One `"from": "to"` line of the rewriter block, both sides as JS string literals.
#[derive(Debug, Serialize)]
struct Rewrite {
    from: String,
    to: String,
}

#[derive(Debug, Serialize)]
struct Handler {
    method: &'static str,
    /// Backing path as a JS string literal.
    path: String,
    log_line: String,
    status: String,
    body: String,
    writes_db: bool,
}

/// Emit the json-server script: rewriter table plus one handler per
/// backing route.
pub fn emit_server(routes: &CompiledRoutes, server: &ServerConfig) -> Result<String, GeneratorError> {
    let rewrites = routes
        .rewrites
        .iter()
        .map(|(from, to)| rewrite(from, to))
        .collect::<Result<Vec<_>, _>>()?;
    let handlers = routes
        .backing_routes
        .iter()
        .map(handler)
        .collect::<Result<Vec<_>, _>>()?;

    render(
        "server.js.j2",
        context! {
            https => server.scheme == Scheme::Https,
            db_file => &server.db_file,
            port => server.port,
            key_file => KEY_FILE,
            cert_file => CERT_FILE,
            rewrites => rewrites,
            handlers => handlers,
        },
    )
}

fn rewrite(from: &str, to: &str) -> Result<Rewrite, GeneratorError> {
    Ok(Rewrite {
        from: serde_json::to_string(from)?,
        to: serde_json::to_string(to)?,
    })
}

fn handler(record: &RouteRecord) -> Result<Handler, GeneratorError> {
    let verb = record.method.as_str().to_uppercase();
    let params: String = record
        .path_parameters
        .iter()
        .map(|param| format!("/${{req.params.{param}}}"))
        .collect();
    let request_line = format!("{verb} /{}{params}", record.storage_key);
    let log_line = if record.request_body.is_some() {
        format!("`{request_line} with body ${{JSON.stringify(req.body)}}`")
    } else {
        format!("`{request_line}`")
    };

    let body = match &record.response_body {
        Some(body) => body.to_json_pretty()?.lines().collect::<Vec<_>>().join("\n  "),
        None => "undefined".to_string(),
    };

    Ok(Handler {
        method: record.method.as_str(),
        path: serde_json::to_string(&record.backing_path())?,
        log_line,
        status: record
            .response_status
            .clone()
            .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        body,
        writes_db: record.method != HttpMethod::Get,
    })
}

#[cfg(test)]
mod tests {
    use mockgen_core::ir::{ExampleValue, RouteTable};
    use mockgen_core::transform::compile;

    use super::*;

    fn record(method: HttpMethod, path: &str, params: &[&str]) -> RouteRecord {
        RouteRecord {
            path: path.to_string(),
            method,
            storage_key: "orders".to_string(),
            response_status: None,
            response_body: None,
            path_parameters: params.iter().map(|p| p.to_string()).collect(),
            request_body: None,
            query_parameter: None,
        }
    }

    fn routes() -> CompiledRoutes {
        let mut table = RouteTable::new();
        let mut get = record(HttpMethod::Get, "/orders/:orderId", &["orderId"]);
        get.response_status = Some("200".to_string());
        get.response_body = Some(ExampleValue::Object(
            [("id".to_string(), ExampleValue::from("o-1"))].into_iter().collect(),
        ));
        let mut variant = get.clone();
        variant.path = "/orders/:orderId?status=".to_string();
        variant.query_parameter = Some("status".to_string());
        let mut post = record(HttpMethod::Post, "/orders", &[]);
        post.request_body = Some(ExampleValue::empty_object());
        table.push(get);
        table.push(variant);
        table.push(post);
        compile(table)
    }

    #[test]
    fn test_http_server_script() {
        let script = emit_server(&routes(), &ServerConfig::default()).unwrap();
        assert!(script.starts_with("const fs = require('fs');\n"));
        assert!(script.contains("const db = require('./db.json');"));
        assert!(script.contains("const port = process.env.PORT || 5000;"));
        assert!(script.contains("  \"/orders/:orderId?status=\": \"/orders/:orderId\",\n"));
        assert!(script.contains("server.get(\"/orders/:orderId\", (req, res) => {"));
        assert!(script.contains("console.log(`GET /orders/${req.params.orderId}`);"));
        assert!(script.contains("const responseBody = {\n    \"id\": \"o-1\"\n  };"));
        assert!(script.ends_with("server.listen(port);\n"));
        assert!(!script.contains("https"));
    }

    #[test]
    fn test_handlers_without_status_or_body() {
        let script = emit_server(&routes(), &ServerConfig::default()).unwrap();
        let post = script
            .split("server.post(\"/orders\", (req, res) => {")
            .nth(1)
            .expect("post handler");
        assert!(post.contains("console.log(`POST /orders with body ${JSON.stringify(req.body)}`);"));
        assert!(post.contains("const statusCode = 200;"));
        assert!(post.contains("const responseBody = undefined;"));
        assert!(post.contains("checkWriteToDb();"));
        assert_eq!(script.matches("checkWriteToDb();").count(), 1);
        assert_eq!(script.matches("server.get(").count(), 1);
    }

    #[test]
    fn test_https_server_script() {
        let server = ServerConfig {
            scheme: Scheme::Https,
            port: 8443,
            ..ServerConfig::default()
        };
        let script = emit_server(&routes(), &server).unwrap();
        assert!(script.starts_with("const https = require('https');\n"));
        assert!(script.contains("key: fs.readFileSync('./key.pem'),"));
        assert!(script.contains("cert: fs.readFileSync('./cert.pem'),"));
        assert!(script.ends_with("https.createServer(options, server).listen(port);\n"));
    }

    #[test]
    fn test_handler_path_is_a_quoted_literal() {
        let mut table = RouteTable::new();
        table.push(RouteRecord {
            storage_key: "o'brien".to_string(),
            ..record(HttpMethod::Get, "/o'brien/:id", &["id"])
        });
        let script = emit_server(&compile(table), &ServerConfig::default()).unwrap();
        assert!(script.contains("server.get(\"/o'brien/:id\", (req, res) => {"));
        assert!(!script.contains("'/o'brien"));
    }
}
