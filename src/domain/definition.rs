//! API definition domain types
//!
//! Wire-compatible records exchanged with the gateway's `/apis` collection.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::Target;

/// Proxy settings of a definition
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Proxy {
    /// Externally visible route prefix; unique across the gateway
    #[serde(default)]
    pub listen_path: String,

    /// Upstream the gateway forwards to
    #[serde(default)]
    pub target_url: String,

    /// Remove the listen path before forwarding
    #[serde(default)]
    pub strip_listen_path: bool,
}

/// A routing record stored in the remote gateway.
///
/// `api_id`, `proxy.listen_path` and `slug` must each be unique across the
/// whole remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default)]
    pub api_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    #[serde(default)]
    pub proxy: Proxy,

    #[serde(default)]
    pub protocol: String,

    #[serde(default, rename = "use_keyless")]
    pub use_keyless_access: bool,

    #[serde(default)]
    pub active: bool,

    /// Shared operator context this definition draws its configuration from
    #[serde(default, rename = "contextRef", skip_serializing_if = "Option::is_none")]
    pub context: Option<Target>,
}

impl Definition {
    /// Create an active keyless HTTP definition
    pub fn new<N, L, U>(name: N, listen_path: L, target_url: U) -> Self
    where
        N: Into<String>,
        L: Into<String>,
        U: Into<String>,
    {
        Self {
            name: name.into(),
            proxy: Proxy {
                listen_path: listen_path.into(),
                target_url: target_url.into(),
                strip_listen_path: true,
            },
            protocol: "http".to_string(),
            use_keyless_access: true,
            active: true,
            ..Default::default()
        }
    }

    pub fn with_api_id<S: Into<String>>(mut self, api_id: S) -> Self {
        self.api_id = api_id.into();
        self
    }

    pub fn with_slug<S: Into<String>>(mut self, slug: S) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_context(mut self, context: Target) -> Self {
        self.context = Some(context);
        self
    }

    pub fn listen_path(&self) -> &str {
        &self.proxy.listen_path
    }

    /// Slug, treating an empty string the same as an absent one.
    ///
    /// Slugs are optional, so an empty slug is not an identity and is skipped
    /// by the create-time collision check.
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref().filter(|s| !s.is_empty())
    }
}

/// Derive a stable gateway identity from the owning resource.
///
/// The same namespace/name always maps to the same id, so a resource that is
/// re-applied after a restart resolves to its existing remote record.
pub fn derive_api_id(owner: &Target) -> String {
    URL_SAFE_NO_PAD.encode(owner.to_string())
}

/// Response envelope of a mutating gateway call
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MutationResult {
    #[serde(default)]
    pub status: String,

    /// Identity assigned by the gateway on create
    #[serde(default)]
    pub key: String,

    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl MutationResult {
    pub const STATUS_OK: &'static str = "ok";

    pub fn is_ok(&self) -> bool {
        self.status == Self::STATUS_OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_wire_format() {
        let def = Definition::new("test-http", "/httpbin", "http://httpbin.default.svc:8000")
            .with_api_id("abc")
            .with_context(Target::new("default", "mycontext"));

        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["api_id"], "abc");
        assert_eq!(json["proxy"]["listen_path"], "/httpbin");
        assert_eq!(json["proxy"]["strip_listen_path"], true);
        assert_eq!(json["use_keyless"], true);
        assert_eq!(json["contextRef"]["name"], "mycontext");
        assert!(json.get("slug").is_none());
    }

    #[test]
    fn test_definition_tolerates_sparse_gateway_records() {
        let json = r#"{
            "api_id": "1",
            "slug": "",
            "proxy": { "listen_path": "/a/" },
            "org_id": "ignored",
            "version_data": { "not_versioned": true }
        }"#;

        let def: Definition = serde_json::from_str(json).unwrap();
        assert_eq!(def.api_id, "1");
        assert_eq!(def.listen_path(), "/a/");
        assert_eq!(def.slug(), None);
        assert!(def.context.is_none());
    }

    #[test]
    fn test_derive_api_id_is_stable_and_distinct() {
        let a = derive_api_id(&Target::new("team-a", "test-http"));
        assert_eq!(a, derive_api_id(&Target::new("team-a", "test-http")));
        assert_ne!(a, derive_api_id(&Target::new("team-b", "test-http")));
        assert!(!a.contains('/'));
    }

    #[test]
    fn test_mutation_result_status() {
        let ok: MutationResult =
            serde_json::from_str(r#"{"key":"k1","status":"ok","action":"added"}"#).unwrap();
        assert!(ok.is_ok());
        assert_eq!(ok.key, "k1");

        let failed: MutationResult =
            serde_json::from_str(r#"{"status":"error","message":"bad listen path"}"#).unwrap();
        assert!(!failed.is_ok());
        assert_eq!(failed.message, "bad listen path");
    }
}
