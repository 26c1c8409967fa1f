//! Client-side view of the ESO P2 observation preparation API.
//!
//! The OB generator only needs a handful of calls; they are collected in the [`P2Api`] trait
//! so that the HTTP client, the in-memory [`LocalP2Api`] and test doubles are interchangeable.
//! Every call returns the new object together with its version tag, which must be passed back
//! on the next update of that object.

#[cfg(feature = "local-p2")]
pub mod local;

#[cfg(feature = "local-p2")]
pub use local::LocalP2Api;

use serde::{Deserialize, Serialize};

use crate::error::ObResult;

crate::define_id_type!(
    /// Identifier of a P2 container (run or folder).
    ContainerId,
    "ContainerId"
);
crate::define_id_type!(
    /// Identifier of an observation block.
    ObId,
    "ObId"
);
crate::define_id_type!(
    /// Identifier of a template attached to an OB.
    TemplateId,
    "TemplateId"
);

/// Opaque version tag (ETag) of a P2 object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(pub String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    #[serde(rename = "containerId")]
    pub container_id: ContainerId,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObsDescription {
    pub name: String,
    #[serde(rename = "userComments", default)]
    pub user_comments: String,
}

/// Observation block document as returned by `createOB` / `getOB`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObDocument {
    #[serde(rename = "obId")]
    pub ob_id: ObId,
    pub name: String,
    #[serde(rename = "obsDescription", default)]
    pub obs_description: ObsDescription,
    #[serde(default)]
    pub target: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub constraints: serde_json::Map<String, serde_json::Value>,
}

/// Local sidereal time window, `HH:MM` bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiderealTimeInterval {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "templateId")]
    pub template_id: TemplateId,
    #[serde(rename = "templateName")]
    pub template_name: String,
}

/// Outcome of `verifyOB`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub observable: bool,
    #[serde(default)]
    pub messages: Vec<String>,
}

/// Calls of the P2 API used to create and fill observation blocks.
///
/// Calls are blocking and may fail; failures are returned as [`crate::ObError::Api`] and
/// are not retried.
pub trait P2Api {
    fn create_folder(&mut self, container_id: ContainerId, name: &str) -> ObResult<(Folder, Version)>;

    fn create_ob(&mut self, container_id: ContainerId, name: &str) -> ObResult<(ObDocument, Version)>;

    fn save_ob(&mut self, ob: &ObDocument, version: &Version) -> ObResult<(ObDocument, Version)>;

    fn get_sidereal_time_constraints(
        &mut self,
        ob_id: ObId,
    ) -> ObResult<(Vec<SiderealTimeInterval>, Version)>;

    fn save_sidereal_time_constraints(
        &mut self,
        ob_id: ObId,
        intervals: &[SiderealTimeInterval],
        version: &Version,
    ) -> ObResult<(Vec<SiderealTimeInterval>, Version)>;

    fn create_template(&mut self, ob_id: ObId, name: &str) -> ObResult<(Template, Version)>;

    fn set_template_params(
        &mut self,
        ob_id: ObId,
        template: &Template,
        params: &serde_json::Map<String, serde_json::Value>,
        version: &Version,
    ) -> ObResult<(Template, Version)>;

    fn verify_ob(&mut self, ob_id: ObId, submit: bool) -> ObResult<(VerifyResponse, Version)>;
}
