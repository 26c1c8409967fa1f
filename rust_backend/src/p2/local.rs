//! In-memory P2 implementation.
//!
//! Stores folders, OBs and templates in memory and records every call, which makes it
//! suitable for unit tests and for rehearsing a submission offline.

use std::collections::HashMap;

use super::*;
use crate::error::ObError;

/// An OB created through [`LocalP2Api`], with everything attached to it.
#[derive(Debug, Clone)]
pub struct StoredOb {
    pub container_id: ContainerId,
    pub document: ObDocument,
    pub sidereal_time_constraints: Vec<SiderealTimeInterval>,
    pub templates: Vec<StoredTemplate>,
    pub verified: bool,
}

#[derive(Debug, Clone)]
pub struct StoredTemplate {
    pub template: Template,
    pub params: serde_json::Map<String, serde_json::Value>,
}

/// In-memory P2 backend.
///
/// # Example
/// ```
/// use vlti_ob::p2::{ContainerId, LocalP2Api, P2Api};
///
/// let mut api = LocalP2Api::new();
/// let (ob, _version) = api.create_ob(ContainerId(1), "SCI_HD1234").unwrap();
/// assert_eq!(api.ob(ob.ob_id).unwrap().document.name, "SCI_HD1234");
/// ```
#[derive(Debug)]
pub struct LocalP2Api {
    folders: HashMap<ContainerId, Folder>,
    obs: HashMap<ObId, StoredOb>,
    calls: Vec<String>,
    next_id: i64,
    next_version: u64,
    observable: bool,
    verify_messages: Vec<String>,
    fail_on: Option<&'static str>,
}

impl Default for LocalP2Api {
    fn default() -> Self {
        Self {
            folders: HashMap::new(),
            obs: HashMap::new(),
            calls: Vec::new(),
            next_id: 1000,
            next_version: 1,
            observable: true,
            verify_messages: Vec::new(),
            fail_on: None,
        }
    }
}

impl LocalP2Api {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result returned by the next `verify_ob` calls.
    pub fn set_verify_response(&mut self, observable: bool, messages: Vec<String>) {
        self.observable = observable;
        self.verify_messages = messages;
    }

    /// Make every call of the named operation (e.g. `"createTemplate"`) fail.
    pub fn fail_on(&mut self, operation: &'static str) {
        self.fail_on = Some(operation);
    }

    /// Names of the operations called so far, in order.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.folders.values()
    }

    pub fn ob(&self, ob_id: ObId) -> Option<&StoredOb> {
        self.obs.get(&ob_id)
    }

    /// OBs sorted by id, i.e. in creation order.
    pub fn obs(&self) -> Vec<&StoredOb> {
        let mut obs: Vec<&StoredOb> = self.obs.values().collect();
        obs.sort_by_key(|ob| ob.document.ob_id);
        obs
    }

    fn record(&mut self, operation: &'static str) -> ObResult<()> {
        self.calls.push(operation.to_string());
        if self.fail_on == Some(operation) {
            return Err(ObError::Api(format!("{} rejected by local backend", operation)));
        }
        Ok(())
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn version(&mut self) -> Version {
        let v = Version(format!("\"{}\"", self.next_version));
        self.next_version += 1;
        v
    }

    fn stored_ob(&mut self, ob_id: ObId) -> ObResult<&mut StoredOb> {
        self.obs
            .get_mut(&ob_id)
            .ok_or_else(|| ObError::Api(format!("OB {} not found", ob_id.value())))
    }
}

impl P2Api for LocalP2Api {
    fn create_folder(&mut self, container_id: ContainerId, name: &str) -> ObResult<(Folder, Version)> {
        self.record("createFolder")?;
        let folder = Folder {
            container_id: ContainerId(self.allocate_id()),
            name: name.to_string(),
        };
        log::debug!("Local P2: folder '{}' created in {}", name, container_id);
        self.folders.insert(folder.container_id, folder.clone());
        Ok((folder, self.version()))
    }

    fn create_ob(&mut self, container_id: ContainerId, name: &str) -> ObResult<(ObDocument, Version)> {
        self.record("createOB")?;
        let document = ObDocument {
            ob_id: ObId(self.allocate_id()),
            name: name.to_string(),
            obs_description: ObsDescription {
                name: name.to_string(),
                user_comments: String::new(),
            },
            target: serde_json::Map::new(),
            constraints: serde_json::Map::new(),
        };
        self.obs.insert(
            document.ob_id,
            StoredOb {
                container_id,
                document: document.clone(),
                sidereal_time_constraints: Vec::new(),
                templates: Vec::new(),
                verified: false,
            },
        );
        Ok((document, self.version()))
    }

    fn save_ob(&mut self, ob: &ObDocument, _version: &Version) -> ObResult<(ObDocument, Version)> {
        self.record("saveOB")?;
        self.stored_ob(ob.ob_id)?.document = ob.clone();
        Ok((ob.clone(), self.version()))
    }

    fn get_sidereal_time_constraints(
        &mut self,
        ob_id: ObId,
    ) -> ObResult<(Vec<SiderealTimeInterval>, Version)> {
        self.record("getSiderealTimeConstraints")?;
        let intervals = self.stored_ob(ob_id)?.sidereal_time_constraints.clone();
        Ok((intervals, self.version()))
    }

    fn save_sidereal_time_constraints(
        &mut self,
        ob_id: ObId,
        intervals: &[SiderealTimeInterval],
        _version: &Version,
    ) -> ObResult<(Vec<SiderealTimeInterval>, Version)> {
        self.record("saveSiderealTimeConstraints")?;
        self.stored_ob(ob_id)?.sidereal_time_constraints = intervals.to_vec();
        Ok((intervals.to_vec(), self.version()))
    }

    fn create_template(&mut self, ob_id: ObId, name: &str) -> ObResult<(Template, Version)> {
        self.record("createTemplate")?;
        let template = Template {
            template_id: TemplateId(self.allocate_id()),
            template_name: name.to_string(),
        };
        self.stored_ob(ob_id)?.templates.push(StoredTemplate {
            template: template.clone(),
            params: serde_json::Map::new(),
        });
        Ok((template, self.version()))
    }

    fn set_template_params(
        &mut self,
        ob_id: ObId,
        template: &Template,
        params: &serde_json::Map<String, serde_json::Value>,
        _version: &Version,
    ) -> ObResult<(Template, Version)> {
        self.record("setTemplateParams")?;
        let stored = self
            .stored_ob(ob_id)?
            .templates
            .iter_mut()
            .find(|t| t.template.template_id == template.template_id)
            .ok_or_else(|| {
                ObError::Api(format!(
                    "template {} not found in OB {}",
                    template.template_id.value(),
                    ob_id.value()
                ))
            })?;
        for (k, v) in params {
            stored.params.insert(k.clone(), v.clone());
        }
        Ok((template.clone(), self.version()))
    }

    fn verify_ob(&mut self, ob_id: ObId, _submit: bool) -> ObResult<(VerifyResponse, Version)> {
        self.record("verifyOB")?;
        self.stored_ob(ob_id)?.verified = true;
        let response = VerifyResponse {
            observable: self.observable,
            messages: self.verify_messages.clone(),
        };
        Ok((response, self.version()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_params_merge() {
        let mut api = LocalP2Api::new();
        let (ob, _) = api.create_ob(ContainerId(1), "OB").unwrap();
        let (tpl, v) = api.create_template(ob.ob_id, "GRAVITY_single_acq").unwrap();

        let mut params = serde_json::Map::new();
        params.insert("INS.SPEC.RES".to_string(), serde_json::json!("MED"));
        api.set_template_params(ob.ob_id, &tpl, &params, &v).unwrap();

        let stored = api.ob(ob.ob_id).unwrap();
        assert_eq!(stored.templates.len(), 1);
        assert_eq!(stored.templates[0].params["INS.SPEC.RES"], "MED");
        assert_eq!(api.calls(), &["createOB", "createTemplate", "setTemplateParams"]);
    }

    #[test]
    fn test_injected_failure() {
        let mut api = LocalP2Api::new();
        api.fail_on("createOB");
        let err = api.create_ob(ContainerId(1), "OB").unwrap_err();
        assert!(matches!(err, ObError::Api(_)));
        assert!(api.obs().is_empty());
    }

    #[test]
    fn test_unknown_ob() {
        let mut api = LocalP2Api::new();
        assert!(api.verify_ob(ObId(1), true).is_err());
    }
}
