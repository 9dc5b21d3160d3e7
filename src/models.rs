use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// Response records keep every field optional and decode each one on its own,
// so a partial, newer or partly mistyped payload still produces a typed view.
// A value of the wrong type reads as `None`. Unknown keys are ignored.

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Like [`lenient`], per element. Elements that do not decode are skipped.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}

// ---------------------------------------------------------------------------
// API keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeyCreateRequest {
    pub key_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeyCreateResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    /// The secret token. Only returned once, at creation time.
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeysListResponseItem {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_used_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_used_from_addr: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeyRevokeResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub revoked: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_used_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_used_from_addr: Option<String>,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentUserInfoResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub login: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub plan: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub projects_limit: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub branches_limit: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub max_autoscaling_limit: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub compute_seconds_limit: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub active_seconds_limit: Option<i64>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub auth_accounts: Vec<AuthAccount>,
    #[serde(default, deserialize_with = "lenient")]
    pub billing_account: Option<BillingAccount>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthAccount {
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub login: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingAccount {
    #[serde(default, deserialize_with = "lenient")]
    pub subscription_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub quota_reset_at_last: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub address_country: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub address_city: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub tax_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub tax_id_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectListItem {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub platform_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub region_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub provisioner: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub pg_version: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub proxy_host: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub store_passwords: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub branch_logical_size_limit: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub branch_logical_size_limit_bytes: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub active_time: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub cpu_used_sec: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub creation_source: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub owner_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub maintenance_starts_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub compute_last_active_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub synthetic_storage_size: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub quota_reset_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub default_endpoint_settings: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub settings: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Branch {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub project_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub parent_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub parent_lsn: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub parent_timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub current_state: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub pending_state: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub logical_size: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub creation_source: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub primary: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub default: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub protected: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub cpu_used_sec: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub compute_time_seconds: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub active_time_seconds: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub written_data_bytes: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub data_transfer_bytes: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_reset_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointType {
    ReadOnly,
    ReadWrite,
}

/// Compute endpoint to start alongside a new branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchCreateRequestEndpointOptions {
    #[serde(rename = "type")]
    pub endpoint_type: EndpointType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoscaling_limit_min_cu: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoscaling_limit_max_cu: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspend_timeout_seconds: Option<i64>,
}

impl BranchCreateRequestEndpointOptions {
    pub fn new(endpoint_type: EndpointType) -> Self {
        Self {
            endpoint_type,
            autoscaling_limit_min_cu: None,
            autoscaling_limit_max_cu: None,
            provisioner: None,
            suspend_timeout_seconds: None,
        }
    }
}

/// Branch settings for a new branch. Omitted fields are chosen by the server
/// (e.g. the parent defaults to the project's primary branch).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchCreateRequestBranch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_lsn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected: Option<bool>,
}

/// Body of `POST projects/{project_id}/branches`.
///
/// `extra` carries any additional top-level fields and is flattened into the
/// body next to `endpoints` and `branch`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchCreateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<Vec<BranchCreateRequestEndpointOptions>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<BranchCreateRequestBranch>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BranchCreateRequest {
    /// Whether the request carries anything worth sending as a body.
    ///
    /// An empty `endpoints` list counts as absent; `extra` alone does not.
    pub fn has_body(&self) -> bool {
        self.endpoints.as_ref().is_some_and(|e| !e.is_empty()) || self.branch.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub branch: Option<Branch>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub endpoints: Vec<Endpoint>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub operations: Vec<Operation>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub roles: Vec<Role>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub databases: Vec<Database>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub connection_uris: Vec<ConnectionDetails>,
}

// ---------------------------------------------------------------------------
// Endpoints, roles, databases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub host: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub project_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub branch_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub region_id: Option<String>,
    #[serde(rename = "type")]
    #[serde(default, deserialize_with = "lenient")]
    pub endpoint_type: Option<EndpointType>,
    #[serde(default, deserialize_with = "lenient")]
    pub current_state: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub pending_state: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub autoscaling_limit_min_cu: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub autoscaling_limit_max_cu: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub provisioner: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub suspend_timeout_seconds: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub pooler_enabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub pooler_mode: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub disabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub passwordless_access: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Role {
    #[serde(default, deserialize_with = "lenient")]
    pub branch_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub protected: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub branch_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub owner_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionDetails {
    #[serde(default, deserialize_with = "lenient")]
    pub connection_uri: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub connection_parameters: Option<ConnectionParameters>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionParameters {
    #[serde(default, deserialize_with = "lenient")]
    pub database: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub host: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub pooler_host: Option<String>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub project_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub branch_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub endpoint_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub failures_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub retry_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_duration_ms: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<String>,
}
