//! One type per API entity, each exposing the endpoints of that entity.
//!
//! Every operation makes exactly one request and wraps the decoded body in a
//! [`Resource`] typed against the matching model.

use reqwest::Method;
use serde_json::Value;

use crate::client::{compact_query, NeonClient, RequestOptions};
use crate::error::{NeonError, Result};
use crate::models::{
    self, ApiKeyCreateRequest, ApiKeyCreateResponse, ApiKeyRevokeResponse,
    ApiKeysListResponseItem, BranchCreateRequest, BranchResponse, CurrentUserInfoResponse,
    ProjectListItem,
};
use crate::resource::{Resource, Schema};

/// Wrap each element of a JSON array, optionally found under `field`.
fn wrap_list<'a, T: Schema>(
    client: &'a NeonClient,
    value: Value,
    field: Option<&str>,
) -> Result<Vec<Resource<'a, T>>> {
    let items = match field {
        None => value,
        Some(field) => match value {
            Value::Object(mut map) => map.remove(field).ok_or_else(|| {
                NeonError::UnexpectedResponse(format!("missing `{field}` in response"))
            })?,
            _ => {
                return Err(NeonError::UnexpectedResponse(format!(
                    "expected an object with `{field}`"
                )))
            }
        },
    };

    match items {
        Value::Array(items) => Ok(items
            .into_iter()
            .map(|item| Resource::new(client, item))
            .collect()),
        _ => Err(NeonError::UnexpectedResponse("expected an array".into())),
    }
}

// ---- API keys -------------------------------------------------------------

/// API keys of the current user.
pub struct ApiKey;

impl ApiKey {
    /// Create a new API key. The secret is only present in this response.
    pub fn create<'a>(
        client: &'a NeonClient,
        key_name: &str,
    ) -> Result<Resource<'a, ApiKeyCreateResponse>> {
        let body = ApiKeyCreateRequest {
            key_name: key_name.to_string(),
        };
        let data = client.request(
            Method::POST,
            "api_keys",
            RequestOptions::json(serde_json::to_value(&body)?),
        )?;
        Ok(Resource::new(client, data))
    }

    /// List API keys, in the order the server returns them.
    pub fn list(client: &NeonClient) -> Result<Vec<Resource<'_, ApiKeysListResponseItem>>> {
        let data = client.request(Method::GET, "api_keys", RequestOptions::default())?;
        wrap_list(client, data, None)
    }

    /// Revoke an API key by id.
    pub fn revoke(client: &NeonClient, key_id: i64) -> Result<Resource<'_, ApiKeyRevokeResponse>> {
        let id = key_id.to_string();
        let path = client.url_join(&["api_keys", id.as_str()]);
        let data = client.request(Method::DELETE, &path, RequestOptions::default())?;
        Ok(Resource::new(client, data))
    }
}

/// Models that identify an API key.
pub trait ApiKeyId {
    fn key_id(&self) -> Option<i64>;
}

impl ApiKeyId for ApiKeysListResponseItem {
    fn key_id(&self) -> Option<i64> {
        self.id
    }
}

impl ApiKeyId for ApiKeyCreateResponse {
    fn key_id(&self) -> Option<i64> {
        self.id
    }
}

impl<'a, T: Schema + ApiKeyId> Resource<'a, T> {
    /// Revoke this API key.
    pub fn revoke(&self) -> Result<Resource<'a, ApiKeyRevokeResponse>> {
        let id = self
            .obj()
            .key_id()
            .ok_or_else(|| NeonError::AttributeNotFound("id".into()))?;
        ApiKey::revoke(self.client(), id)
    }
}

// ---- Users ----------------------------------------------------------------

pub struct User;

impl User {
    /// Get the user the API key belongs to.
    pub fn get_current_user_info(
        client: &NeonClient,
    ) -> Result<Resource<'_, CurrentUserInfoResponse>> {
        let data = client.request(Method::GET, "users/me", RequestOptions::default())?;
        Ok(Resource::new(client, data))
    }
}

// ---- Projects -------------------------------------------------------------

/// Parameters for listing projects.
#[derive(Debug, Clone, Default)]
pub struct ListProjectsParams {
    /// List projects shared with the user instead of owned ones.
    pub shared: bool,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

pub struct Project;

impl Project {
    /// List projects. Absent `cursor`/`limit` are left out of the query.
    pub fn list<'a>(
        client: &'a NeonClient,
        params: &ListProjectsParams,
    ) -> Result<Vec<Resource<'a, ProjectListItem>>> {
        let path = if params.shared {
            "projects/shared"
        } else {
            "projects"
        };
        let query = compact_query(&[
            ("cursor", params.cursor.clone()),
            ("limit", params.limit.map(|l| l.to_string())),
        ]);

        let data = client.request(Method::GET, path, RequestOptions::query(query))?;
        wrap_list(client, data, Some("projects"))
    }
}

// ---- Branches -------------------------------------------------------------

/// Parameters for listing branches.
#[derive(Debug, Clone, Default)]
pub struct ListBranchesParams {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

pub struct Branch;

impl Branch {
    /// List the branches of a project.
    pub fn list<'a>(
        client: &'a NeonClient,
        project_id: &str,
        params: &ListBranchesParams,
    ) -> Result<Vec<Resource<'a, models::Branch>>> {
        let path = client.url_join(&["projects", project_id, "branches"]);
        let query = compact_query(&[
            ("cursor", params.cursor.clone()),
            ("limit", params.limit.map(|l| l.to_string())),
        ]);

        let data = client.request(Method::GET, &path, RequestOptions::query(query))?;
        wrap_list(client, data, Some("branches"))
    }

    /// Create a branch.
    ///
    /// When the request has neither endpoints nor branch settings, the POST
    /// is sent without a body and the server applies its defaults. Any
    /// `extra` fields are not sent in that case.
    pub fn create<'a>(
        client: &'a NeonClient,
        project_id: &str,
        request: BranchCreateRequest,
    ) -> Result<Resource<'a, BranchResponse>> {
        for key in ["endpoints", "branch"] {
            if request.extra.contains_key(key) {
                return Err(NeonError::InvalidRequest(format!(
                    "`{key}` must be set through its own field"
                )));
            }
        }

        let path = client.url_join(&["projects", project_id, "branches"]);
        let options = if request.has_body() {
            RequestOptions::json(serde_json::to_value(&request)?)
        } else {
            if request.extra.is_empty() {
                tracing::debug!(project_id, "creating branch without a request body");
            } else {
                let dropped: Vec<&str> = request.extra.keys().map(String::as_str).collect();
                tracing::debug!(
                    project_id,
                    ?dropped,
                    "creating branch without a request body, extra fields are not sent"
                );
            }
            RequestOptions::default()
        };

        let data = client.request(Method::POST, &path, options)?;
        Ok(Resource::new(client, data))
    }
}

// ---- Operations -----------------------------------------------------------

/// Operations started by the server in response to a mutation.
pub struct Operation;

impl Operation {
    /// Wrap the `operations` array of a response, if it has one.
    pub fn from_response<'a, T: Schema>(
        resource: &Resource<'a, T>,
    ) -> Vec<Resource<'a, models::Operation>> {
        resource
            .raw()
            .get("operations")
            .and_then(Value::as_array)
            .map(|ops| {
                ops.iter()
                    .map(|op| Resource::new(resource.client(), op.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
