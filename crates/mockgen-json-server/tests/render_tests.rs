use mockgen_core::config::{Scheme, ServerConfig};
use mockgen_core::transform::{self, CompileOptions};
use mockgen_core::{CodeGenerator, GeneratedFile, parse};
use mockgen_json_server::JsonServerGenerator;

const ORDERS: &str = include_str!("../../mockgen-core/tests/fixtures/orders-v3.yaml");
const PRODUCTS: &str = include_str!("../../mockgen-core/tests/fixtures/products-v2.yaml");

fn render(yaml: &str, server: &ServerConfig) -> Vec<GeneratedFile> {
    let document = parse::from_yaml(yaml).unwrap();
    let routes = transform::compile_document(&document, &CompileOptions::default());
    let options = JsonServerGenerator::build_options(&document.info().title, server);
    JsonServerGenerator.generate(&routes, &options).unwrap()
}

fn file<'a>(files: &'a [GeneratedFile], path: &str) -> &'a str {
    &files
        .iter()
        .find(|f| f.path == path)
        .unwrap_or_else(|| panic!("missing {path}"))
        .content
}

#[test]
fn render_order_database() {
    let files = render(ORDERS, &ServerConfig::default());
    insta::assert_snapshot!(file(&files, "db.json"), @r#"
    {
      "orders": [],
      "customers-orders": []
    }
    "#);
}

#[test]
fn render_order_server() {
    let files = render(ORDERS, &ServerConfig::default());
    let script = file(&files, "server.js");

    for rewrite in [
        "\"/orders?limit=\": \"/orders\",",
        "\"/orders/:orderId?status=\": \"/orders/:orderId\",",
        "\"/customers/:customerid/orders\": \"/customers-orders/:customerid\",",
    ] {
        assert!(script.contains(rewrite), "{rewrite}");
    }
    assert!(script.contains("server.get(\"/customers-orders/:customerid\", (req, res) => {"));
    assert!(script.contains("console.log(`GET /customers-orders/${req.params.customerid}`);"));
    assert!(script.contains("server.delete(\"/orders/:orderId\", (req, res) => {"));
    assert!(script.contains("const statusCode = 204;"));
    assert!(script.contains("const statusCode = 201;"));
    assert_eq!(script.matches("(req, res) => {").count(), 5);
    assert_eq!(script.matches("checkWriteToDb();").count(), 2);

    let package: serde_json::Value = serde_json::from_str(file(&files, "package.json")).unwrap();
    assert_eq!(package["name"], "order-service");
}

#[test]
fn render_https_swagger_project() {
    let server = ServerConfig {
        scheme: Scheme::Https,
        port: 8443,
        server_file: "catalog.js".to_string(),
        db_file: "catalog.json".to_string(),
        ..ServerConfig::default()
    };
    let files = render(PRODUCTS, &server);
    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(
        paths,
        [
            "catalog.js",
            "catalog.json",
            "package.json",
            "Dockerfile",
            "compose.yaml",
            "Makefile"
        ]
    );

    let script = file(&files, "catalog.js");
    assert!(script.contains("const router = jsonServer.router('./catalog.json');"));
    assert!(script.contains("\"/v1/products/:productId\": \"/products/:productId\","));
    assert!(script.contains("https.createServer(options, server).listen(port);"));
    assert!(script.contains("console.log(`PUT /products/${req.params.productId} with body ${JSON.stringify(req.body)}`);"));

    insta::assert_snapshot!(file(&files, "catalog.json"), @r#"
    {
      "products": []
    }
    "#);
    assert!(file(&files, "compose.yaml").contains("  catalog:\n"));
    assert!(file(&files, "Makefile").contains("create.certificate:"));
}
