/// Query parameters for the set endpoint
///
/// Missing parameters become empty strings and are passed to the store
/// unchanged. When a parameter is repeated, the first occurrence wins.
#[derive(Debug, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SetQuery {
    /// Key to write
    pub key: String,
    /// Value to store under the key
    pub value: String,
}

impl SetQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            key: first_value(&pairs, "key"),
            value: first_value(&pairs, "value"),
        }
    }
}

/// Query parameters for the get endpoint
#[derive(Debug, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetQuery {
    /// Key to read
    pub key: String,
}

impl GetQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            key: first_value(&pairs, "key"),
        }
    }
}

fn first_value(pairs: &[(String, String)], name: &str) -> String {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.clone())
        .unwrap_or_default()
}
