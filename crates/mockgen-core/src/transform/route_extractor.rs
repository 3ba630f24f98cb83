use log::debug;
use rand::Rng;

use crate::ir::{HttpMethod, RouteRecord, RouteTable};
use crate::parse::openapi::{self, OpenApiSpec, first_content_schema};
use crate::parse::swagger::{self, SwaggerSpec};

use super::body_builder::BodyBuilder;
use super::example_synthesizer::Synthesizer;
use super::path_template::PathTemplate;
use super::schema_resolver::{OpenApiDialect, SchemaDialect, SwaggerDialect};

/// One operation reduced to what route extraction needs, independent of
/// the document dialect.
#[derive(Debug)]
pub struct OperationSource<'a, N> {
    pub method: HttpMethod,
    /// Declared status codes with their body schema, in document order.
    pub responses: Vec<(&'a str, Option<&'a N>)>,
    pub request_body: Option<&'a N>,
    pub query_parameters: Vec<&'a str>,
}

/// Append the records of one operation: the base route, then one variant
/// per query parameter sharing its bodies.
pub fn extract_operation<'a, D: SchemaDialect, R: Rng>(
    template: &PathTemplate,
    source: &OperationSource<'a, D::Node>,
    builder: &mut BodyBuilder<'a, '_, D, R>,
    table: &mut RouteTable,
) {
    let (response_status, response_schema) = match success_response(&source.responses) {
        Some((code, schema)) => (Some(code.to_string()), schema),
        None => (None, None),
    };
    let response_body = response_schema.and_then(|schema| builder.build_body(schema));
    let request_body = source
        .request_body
        .and_then(|schema| builder.build_body(schema));

    let record = RouteRecord {
        path: template.route.clone(),
        method: source.method,
        storage_key: template.storage_key.clone(),
        response_status,
        response_body,
        path_parameters: template.parameters.clone(),
        request_body,
        query_parameter: None,
    };
    let variants: Vec<RouteRecord> = source
        .query_parameters
        .iter()
        .map(|name| RouteRecord {
            path: format!("{}?{name}=", template.route),
            query_parameter: Some(name.to_string()),
            ..record.clone()
        })
        .collect();

    table.push(record);
    for variant in variants {
        table.push(variant);
    }
}

/// The smallest status code under 300 that has a schema, or failing that
/// the smallest one without. Non-numeric codes are ignored.
fn success_response<'a, N>(
    responses: &[(&'a str, Option<&'a N>)],
) -> Option<(&'a str, Option<&'a N>)> {
    let mut candidates: Vec<(u16, &'a str, Option<&'a N>)> = responses
        .iter()
        .filter_map(|&(code, schema)| {
            let numeric: u16 = code.parse().ok()?;
            (numeric < 300).then_some((numeric, code, schema))
        })
        .collect();
    candidates.sort_by_key(|&(numeric, ..)| numeric);
    candidates
        .iter()
        .find(|(_, _, schema)| schema.is_some())
        .or_else(|| candidates.first())
        .map(|&(_, code, schema)| (code, schema))
}

/// Path-level parameters the operation does not redeclare, then the
/// operation's own.
fn merge_parameters<'a, P>(
    path_level: Vec<&'a P>,
    operation: Vec<&'a P>,
    same: impl Fn(&P, &P) -> bool,
) -> Vec<&'a P> {
    let mut merged: Vec<&'a P> = path_level
        .into_iter()
        .filter(|inherited| !operation.iter().any(|own| same(*inherited, *own)))
        .collect();
    merged.extend(operation);
    merged
}

/// Routes of a Swagger 2.0 document. Paths are prefixed with `basePath`;
/// the request body comes from the `in: body` parameter.
pub fn extract_swagger<R: Rng>(
    spec: &SwaggerSpec,
    synthesizer: &mut Synthesizer<R>,
    max_depth: usize,
) -> RouteTable {
    let dialect = SwaggerDialect::new(&spec.definitions);
    let mut builder = BodyBuilder::new(&dialect, synthesizer, max_depth);
    let mut table = RouteTable::new();

    for (raw, item) in &spec.paths {
        let template = PathTemplate::parse(raw, spec.base_path.as_deref());
        let path_level: Vec<_> = item
            .parameters
            .iter()
            .filter_map(|p| spec.parameter(p))
            .collect();

        for (method, operation) in item.operations() {
            debug!("{method} {raw} -> {}", template.route);
            let own: Vec<_> = operation
                .parameters
                .iter()
                .filter_map(|p| spec.parameter(p))
                .collect();
            let parameters = merge_parameters(path_level.clone(), own, |a, b| {
                a.name == b.name && a.location == b.location
            });

            let source = OperationSource {
                method,
                responses: operation
                    .responses
                    .iter()
                    .filter_map(|(code, response)| {
                        spec.response(response)
                            .map(|r| (code.as_str(), r.schema.as_ref()))
                    })
                    .collect(),
                request_body: parameters
                    .iter()
                    .find(|p| p.location == swagger::ParameterLocation::Body)
                    .and_then(|p| p.schema.as_ref()),
                query_parameters: parameters
                    .iter()
                    .filter(|p| p.location == swagger::ParameterLocation::Query)
                    .map(|p| p.name.as_str())
                    .collect(),
            };
            extract_operation(&template, &source, &mut builder, &mut table);
        }
    }
    table
}

/// Routes of an OpenAPI 3.x document. Bodies use the schema of the first
/// declared content type.
pub fn extract_openapi<R: Rng>(
    spec: &OpenApiSpec,
    synthesizer: &mut Synthesizer<R>,
    max_depth: usize,
) -> RouteTable {
    let dialect = OpenApiDialect::new(spec.schemas());
    let mut builder = BodyBuilder::new(&dialect, synthesizer, max_depth);
    let mut table = RouteTable::new();

    for (raw, item) in &spec.paths {
        let template = PathTemplate::parse(raw, None);
        let path_level: Vec<_> = item
            .parameters
            .iter()
            .filter_map(|p| spec.parameter(p))
            .collect();

        for (method, operation) in item.operations() {
            debug!("{method} {raw} -> {}", template.route);
            let own: Vec<_> = operation
                .parameters
                .iter()
                .filter_map(|p| spec.parameter(p))
                .collect();
            let parameters = merge_parameters(path_level.clone(), own, |a, b| {
                a.name == b.name && a.location == b.location
            });

            let source = OperationSource {
                method,
                responses: operation
                    .responses
                    .iter()
                    .filter_map(|(code, response)| {
                        spec.response(response)
                            .map(|r| (code.as_str(), first_content_schema(&r.content)))
                    })
                    .collect(),
                request_body: operation
                    .request_body
                    .as_ref()
                    .and_then(|body| spec.request_body(body))
                    .and_then(|body| first_content_schema(&body.content)),
                query_parameters: parameters
                    .iter()
                    .filter(|p| p.location == openapi::ParameterLocation::Query)
                    .map(|p| p.name.as_str())
                    .collect(),
            };
            extract_operation(&template, &source, &mut builder, &mut table);
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    use super::*;
    use crate::parse::{self, ApiDocument};

    fn extract(yaml: &str, max_depth: usize) -> RouteTable {
        let mut synthesizer = Synthesizer::new(StdRng::seed_from_u64(11), false);
        match parse::from_yaml(yaml).unwrap() {
            ApiDocument::Swagger(spec) => extract_swagger(&spec, &mut synthesizer, max_depth),
            ApiDocument::OpenApi(spec) => extract_openapi(&spec, &mut synthesizer, max_depth),
        }
    }

    fn body(value: &Option<crate::ir::ExampleValue>) -> serde_json::Value {
        serde_json::to_value(value).unwrap()
    }

    const ORDERS: &str = r#"
openapi: 3.0.3
info:
  title: Orders
  version: 1.0.0
paths:
  /orders/{orderId}:
    get:
      parameters:
        - name: orderId
          in: path
          required: true
          schema:
            type: string
        - name: status
          in: query
          schema:
            type: string
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Order'
        '404':
          description: missing
components:
  schemas:
    Order:
      type: object
      properties:
        id:
          type: string
        items:
          type: array
          items:
            $ref: '#/components/schemas/Item'
    Item:
      type: object
      properties:
        sku:
          type: string
"#;

    #[test]
    fn test_query_parameter_adds_a_variant() {
        let table = extract(ORDERS, 0);
        let records = table.get(HttpMethod::Get, "/orders/:orderId").unwrap();
        assert_eq!(records.len(), 2);

        let base = &records[0];
        assert_eq!(base.path, "/orders/:orderId");
        assert_eq!(base.path_parameters, vec!["orderId"]);
        assert_eq!(base.storage_key, "orders");
        assert_eq!(base.response_status.as_deref(), Some("200"));
        assert_eq!(body(&base.response_body), json!({"id": "", "items": []}));
        assert_eq!(base.request_body, None);

        let variant = &records[1];
        assert_eq!(variant.path, "/orders/:orderId?status=");
        assert_eq!(variant.query_parameter.as_deref(), Some("status"));
        assert_eq!(variant.response_body, base.response_body);
        assert_eq!(variant.request_body, base.request_body);
    }

    #[test]
    fn test_response_selection() {
        let yaml = r#"
openapi: 3.0.0
info: {title: T, version: '1'}
paths:
  /jobs:
    post:
      responses:
        202:
          description: accepted
          content:
            application/json:
              schema:
                type: object
                properties:
                  queued: {type: boolean}
        200:
          description: no body
        default:
          description: error
    get:
      responses:
        204:
          description: empty
        301:
          description: moved
    delete:
      responses:
        default:
          description: error
"#;
        let table = extract(yaml, 0);
        let post = &table.get(HttpMethod::Post, "/jobs").unwrap()[0];
        assert_eq!(post.response_status.as_deref(), Some("202"));
        assert_eq!(body(&post.response_body), json!({"queued": false}));

        let get = &table.get(HttpMethod::Get, "/jobs").unwrap()[0];
        assert_eq!(get.response_status.as_deref(), Some("204"));
        assert_eq!(get.response_body, None);

        let delete = &table.get(HttpMethod::Delete, "/jobs").unwrap()[0];
        assert_eq!(delete.response_status, None);
        assert_eq!(delete.response_body, None);
    }

    #[test]
    fn test_openapi_request_body_uses_first_content_type() {
        let yaml = r#"
openapi: 3.1.0
info: {title: T, version: '1'}
paths:
  /pets:
    post:
      requestBody:
        $ref: '#/components/requestBodies/NewPet'
      responses:
        '201':
          description: created
components:
  requestBodies:
    NewPet:
      content:
        application/json:
          schema:
            type: object
            properties:
              name: {type: string}
        application/xml:
          schema:
            type: object
            properties:
              ignored: {type: string}
"#;
        let table = extract(yaml, 0);
        let post = &table.get(HttpMethod::Post, "/pets").unwrap()[0];
        assert_eq!(body(&post.request_body), json!({"name": ""}));
        assert_eq!(post.response_status.as_deref(), Some("201"));
    }

    #[test]
    fn test_swagger_base_path_and_body_parameter() {
        let yaml = r#"
swagger: '2.0'
info: {title: Shop, version: '1'}
basePath: /v1
paths:
  /products/{product-id}:
    parameters:
      - name: product-id
        in: path
        required: true
        type: string
      - name: locale
        in: query
        type: string
    put:
      parameters:
        - name: payload
          in: body
          schema:
            $ref: '#/definitions/Product'
        - name: locale
          in: query
          type: string
          required: true
      responses:
        200:
          description: ok
          schema:
            $ref: '#/definitions/Product'
definitions:
  Product:
    type: object
    properties:
      title: {type: string}
      stock: {type: integer}
"#;
        let table = extract(yaml, 0);
        let records = table.get(HttpMethod::Put, "/v1/products/:productid").unwrap();
        assert_eq!(records.len(), 2);
        let base = &records[0];
        assert_eq!(base.storage_key, "products");
        assert_eq!(base.path_parameters, vec!["productid"]);
        assert_eq!(body(&base.request_body), json!({"title": "", "stock": 0}));
        assert_eq!(body(&base.response_body), json!({"title": "", "stock": 0}));
        assert_eq!(records[1].path, "/v1/products/:productid?locale=");
    }

    #[test]
    fn test_operations_follow_method_order() {
        let yaml = r#"
openapi: 3.0.0
info: {title: T, version: '1'}
paths:
  /things:
    post:
      responses: {'201': {description: created}}
    get:
      responses: {'200': {description: ok}}
"#;
        let table = extract(yaml, 0);
        assert_eq!(
            table.methods().collect::<Vec<_>>(),
            vec![HttpMethod::Get, HttpMethod::Post]
        );
    }
}
