use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^}]+)\}").unwrap());
static HYPHEN_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());

/// A document path rewritten for the mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    /// `/v1/orders/:orderId` for `/orders/{order-id}` under base path `/v1`.
    pub route: String,
    /// Placeholder names with hyphens removed, in path order.
    pub parameters: Vec<String>,
    pub storage_key: String,
}

impl PathTemplate {
    /// Normalise `{name}` placeholders to `:name` and prefix the optional
    /// base path. A hyphenated placeholder name is rewritten everywhere it
    /// occurs in the path, not only inside its braces. The storage key only
    /// looks at `raw`.
    pub fn parse(raw: &str, base_path: Option<&str>) -> Self {
        let mut path = raw.to_string();
        for caps in PLACEHOLDER.captures_iter(raw) {
            let name = &caps[1];
            if name.contains('-') {
                path = path.replace(name, &name.replace('-', ""));
            }
        }
        let mut parameters = Vec::new();
        let normalized = PLACEHOLDER.replace_all(&path, |caps: &Captures<'_>| {
            parameters.push(caps[1].to_string());
            format!(":{}", &caps[1])
        });
        let prefix = base_path.map_or("", |base| base.trim_end_matches('/'));
        Self {
            route: format!("{prefix}{normalized}"),
            parameters,
            storage_key: storage_key(raw),
        }
    }
}

/// Collection name for a path: placeholders dropped, separators turned into
/// single hyphens, no leading or trailing hyphen, nothing after `?`.
pub fn storage_key(path: &str) -> String {
    let path = path.split_once('?').map_or(path, |(path, _)| path);
    let slug = PLACEHOLDER.replace_all(path, "").replace('/', "-");
    HYPHEN_RUN
        .replace_all(&slug, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_normalized() {
        let template = PathTemplate::parse("/orders/{orderId}", None);
        assert_eq!(template.route, "/orders/:orderId");
        assert_eq!(template.parameters, vec!["orderId"]);
        assert_eq!(template.storage_key, "orders");
    }

    #[test]
    fn test_hyphens_are_stripped_from_parameter_names() {
        let template = PathTemplate::parse("/line-items/{line-item-id}/sub-parts/{part_no}", None);
        assert_eq!(template.route, "/line-items/:lineitemid/sub-parts/:part_no");
        assert_eq!(template.parameters, vec!["lineitemid", "part_no"]);
        assert_eq!(template.storage_key, "line-items-sub-parts");
    }

    #[test]
    fn test_hyphenated_name_is_rewritten_across_the_whole_path() {
        let template = PathTemplate::parse("/user-id/{user-id}", None);
        assert_eq!(template.route, "/userid/:userid");
        assert_eq!(template.parameters, vec!["userid"]);
        assert_eq!(template.storage_key, "user-id");
    }

    #[test]
    fn test_base_path_prefixes_route_but_not_storage_key() {
        let template = PathTemplate::parse("/products/{productId}", Some("/v1/"));
        assert_eq!(template.route, "/v1/products/:productId");
        assert_eq!(template.storage_key, "products");

        let root = PathTemplate::parse("/products", Some("/"));
        assert_eq!(root.route, "/products");
    }

    #[test]
    fn test_storage_key_slugging() {
        assert_eq!(storage_key("/users/{userId}/orders"), "users-orders");
        assert_eq!(storage_key("/users/{userId}/orders/{orderId}"), "users-orders");
        assert_eq!(storage_key("/search?kind=all"), "search");
        assert_eq!(storage_key("/a//b/"), "a-b");
        assert_eq!(storage_key("/"), "");
    }
}
