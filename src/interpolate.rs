//! Credential reference discovery in JSON documents
//!
//! A reference is an object whose only key is `credhub-ref` and whose value
//! is a credential name, as found in `VCAP_SERVICES`:
//!
//! ```json
//! {"p-config-server": [{"credentials": {"credhub-ref": "/service/cfg"}}]}
//! ```
//!
//! [`Client::interpolate_value`](crate::Client::interpolate_value) resolves
//! each reference and replaces the whole object with the credential value.

use serde_json::Value;

/// Key that marks an object as a credential reference
pub const REFERENCE_KEY: &str = "credhub-ref";

/// A credential reference found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// JSON pointer (RFC 6901) to the referencing object
    pub pointer: String,
    /// Name of the referenced credential
    pub name: String,
}

/// The credential name if `value` is a reference object
pub fn reference_name(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) if map.len() == 1 => map.get(REFERENCE_KEY)?.as_str(),
        _ => None,
    }
}

/// Collect every reference in `document`
///
/// Object members are visited in sorted key order and array elements by
/// index, which is also the order `serde_json` serializes them in.
/// References are not searched for inside other references.
pub fn collect_references(document: &Value) -> Vec<Reference> {
    let mut found = Vec::new();
    walk(document, &mut String::new(), &mut found);
    found
}

fn walk(value: &Value, pointer: &mut String, found: &mut Vec<Reference>) {
    if let Some(name) = reference_name(value) {
        found.push(Reference {
            pointer: pointer.clone(),
            name: name.to_string(),
        });
        return;
    }

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let len = pointer.len();
                pointer.push('/');
                pointer.push_str(&escape_token(key));
                walk(child, pointer, found);
                pointer.truncate(len);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let len = pointer.len();
                pointer.push('/');
                pointer.push_str(&index.to_string());
                walk(child, pointer, found);
                pointer.truncate(len);
            }
        }
        _ => {}
    }
}

fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
