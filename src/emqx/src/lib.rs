//! Client for the broker's `/api/v5` management endpoints. Actions and rules
//! are upserted by name/id so re-running the provisioner against an unchanged
//! catalog updates in place instead of piling up duplicates.

use common::{config::Config, ProvisionResult};
use reqwest::StatusCode;
use serde_json::{json, Map, Value};
use tracing::{info, warn};
use types::{
    artifact::Artifact,
    emqx::{ActionParameters, CreateActionReq, ResourceOpts, RuleReq, ACTION_TYPE},
};

pub const CONNECTOR: &str = "Influx1";
const PRECISION: &str = "ms";
const HEALTH_CHECK_INTERVAL: &str = "30s";

pub struct EmqxClient {
    base_url: String,
    user: String,
    password: String,
    http: reqwest::Client,
}

impl EmqxClient {
    pub fn new(conf: &Config) -> Self {
        Self {
            base_url: conf.base_url(),
            user: conf.emqx_user.clone(),
            password: conf.emqx_password.clone(),
            http: reqwest::Client::new(),
        }
    }

    /// Pushes one action/rule pair. Returns whether the broker accepted both;
    /// rejections are logged, never retried.
    pub async fn sync(&self, artifact: &Artifact) -> ProvisionResult<bool> {
        let action_ok = self.upsert_action(artifact).await?;
        let rule_ok = self.upsert_rule(artifact).await?;
        Ok(action_ok && rule_ok)
    }

    pub async fn list_actions(&self) -> ProvisionResult<Vec<Value>> {
        let resp = self
            .http
            .get(format!("{}/api/v5/actions", self.base_url))
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await?;
        Ok(resp.json().await?)
    }

    pub async fn upsert_action(&self, artifact: &Artifact) -> ProvisionResult<bool> {
        let existing = self.list_actions().await?;
        match plan_action_sync(&existing, &artifact.action_name) {
            ActionSync::Update(current) => {
                let body = action_update_body(current, artifact);
                let resp = self
                    .http
                    .put(format!(
                        "{}/api/v5/actions/{}:{}",
                        self.base_url, ACTION_TYPE, artifact.action_name
                    ))
                    .basic_auth(&self.user, Some(&self.password))
                    .json(&body)
                    .send()
                    .await?;
                log_response("updating action", &artifact.action_name, resp).await
            }
            ActionSync::Create => {
                let body = action_create_body(artifact);
                let resp = self
                    .http
                    .post(format!("{}/api/v5/actions", self.base_url))
                    .basic_auth(&self.user, Some(&self.password))
                    .json(&body)
                    .send()
                    .await?;
                log_response("creating action", &artifact.action_name, resp).await
            }
        }
    }

    pub async fn upsert_rule(&self, artifact: &Artifact) -> ProvisionResult<bool> {
        let rule_url = format!("{}/api/v5/rules/{}", self.base_url, artifact.rule_id);
        let status = self
            .http
            .get(&rule_url)
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await?
            .status();

        match plan_rule_sync(status) {
            RuleSync::Update => {
                let resp = self
                    .http
                    .put(&rule_url)
                    .basic_auth(&self.user, Some(&self.password))
                    .json(&rule_body(artifact, false))
                    .send()
                    .await?;
                log_response("updating rule", &artifact.rule_name, resp).await
            }
            RuleSync::Create => {
                let resp = self
                    .http
                    .post(format!("{}/api/v5/rules", self.base_url))
                    .basic_auth(&self.user, Some(&self.password))
                    .json(&rule_body(artifact, true))
                    .send()
                    .await?;
                log_response("creating rule", &artifact.rule_name, resp).await
            }
            RuleSync::Abort => {
                warn!("checking rule {}: status {status}", artifact.rule_name);
                Ok(false)
            }
        }
    }
}

pub enum ActionSync<'a> {
    Create,
    Update(&'a Value),
}

/// Decides between create and update by looking the action up by name in the
/// broker's current action list.
pub fn plan_action_sync<'a>(existing: &'a [Value], name: &str) -> ActionSync<'a> {
    match existing.iter().find(|action| action["name"] == name) {
        Some(current) => ActionSync::Update(current),
        None => ActionSync::Create,
    }
}

#[derive(Debug)]
pub enum RuleSync {
    Update,
    Create,
    Abort,
}

/// Maps the existence-check status to a sync decision. Only a definite 404
/// means the rule is absent; auth or server errors abort the entry instead
/// of masquerading as create attempts.
pub fn plan_rule_sync(status: StatusCode) -> RuleSync {
    if status.is_success() {
        RuleSync::Update
    } else if status == StatusCode::NOT_FOUND {
        RuleSync::Create
    } else {
        RuleSync::Abort
    }
}

pub fn action_create_body(artifact: &Artifact) -> CreateActionReq {
    CreateActionReq {
        connector: CONNECTOR.to_owned(),
        description: artifact.action_description.clone(),
        enable: true,
        name: artifact.action_name.clone(),
        parameters: ActionParameters {
            precision: PRECISION.to_owned(),
            write_syntax: artifact.write_syntax.clone(),
        },
        resource_opts: ResourceOpts {
            health_check_interval: HEALTH_CHECK_INTERVAL.to_owned(),
        },
        action_type: ACTION_TYPE.to_owned(),
    }
}

/// Update body derived from the broker's current view of the action, so
/// creation/modification timestamps survive the update. The broker rejects
/// `name` and `type` on PUT, so both are stripped.
pub fn action_update_body(current: &Value, artifact: &Artifact) -> Value {
    let mut body = current.clone();
    if let Some(obj) = body.as_object_mut() {
        obj.remove("name");
        obj.remove("type");
        obj.insert("connector".to_owned(), json!(CONNECTOR));
        obj.insert(
            "description".to_owned(),
            json!(artifact.action_description),
        );
        obj.insert("enable".to_owned(), json!(true));
        obj.insert(
            "parameters".to_owned(),
            json!({
                "precision": PRECISION,
                "write_syntax": artifact.write_syntax,
            }),
        );
        obj.insert(
            "resource_opts".to_owned(),
            json!({ "health_check_interval": HEALTH_CHECK_INTERVAL }),
        );
    }
    body
}

pub fn rule_body(artifact: &Artifact, with_id: bool) -> RuleReq {
    RuleReq {
        sql: artifact.sql.clone(),
        actions: vec![format!("{}:{}", ACTION_TYPE, artifact.action_name)],
        description: artifact.rule_description.clone(),
        enable: true,
        metadata: Map::new(),
        id: with_id.then(|| artifact.rule_id.clone()),
        name: artifact.rule_name.clone(),
    }
}

async fn log_response(op: &str, name: &str, resp: reqwest::Response) -> ProvisionResult<bool> {
    let status = resp.status();
    let body = resp.text().await?;
    if status.is_success() {
        info!("{op} {name}: status {status}, response {body}");
    } else {
        warn!("{op} {name}: status {status}, response {body}");
    }
    Ok(status.is_success())
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;
    use types::artifact::Artifact;

    use super::{
        action_update_body, plan_action_sync, plan_rule_sync, rule_body, ActionSync, RuleSync,
    };

    fn artifact() -> Artifact {
        Artifact {
            measurement: "dev_imu".to_owned(),
            action_name: "action_dev_imu".to_owned(),
            action_description: "InfluxDB action for Dev - IMU".to_owned(),
            rule_id: "rule_id_dev_imu".to_owned(),
            rule_name: "rule_dev_imu".to_owned(),
            rule_description: "Rule for Dev - IMU".to_owned(),
            sql: "SELECT * FROM \"ble/dev/imu\"".to_owned(),
            write_syntax: "dev_imu,deviceName=${payload.deviceName} a=${payload.a}i".to_owned(),
        }
    }

    #[test]
    fn test_existing_action_is_updated_not_created() {
        let existing = vec![
            json!({"name": "action_other", "type": "influxdb"}),
            json!({"name": "action_dev_imu", "type": "influxdb"}),
        ];
        assert!(matches!(
            plan_action_sync(&existing, "action_dev_imu"),
            ActionSync::Update(_)
        ));
        assert!(matches!(
            plan_action_sync(&existing, "action_dev_gyro"),
            ActionSync::Create
        ));
        assert!(matches!(plan_action_sync(&[], "action_dev_imu"), ActionSync::Create));
    }

    #[test]
    fn test_action_update_body_preserves_timestamps_and_strips_name_type() {
        let current = json!({
            "name": "action_dev_imu",
            "type": "influxdb",
            "created_at": "2025-05-01T10:00:00.000+00:00",
            "last_modified_at": "2025-05-02T10:00:00.000+00:00",
            "enable": false,
            "parameters": {"precision": "ms", "write_syntax": "old"},
        });
        let body = action_update_body(&current, &artifact());

        assert!(body.get("name").is_none());
        assert!(body.get("type").is_none());
        assert_eq!(body["created_at"], "2025-05-01T10:00:00.000+00:00");
        assert_eq!(body["last_modified_at"], "2025-05-02T10:00:00.000+00:00");
        assert_eq!(body["enable"], true);
        assert_eq!(
            body["parameters"]["write_syntax"],
            "dev_imu,deviceName=${payload.deviceName} a=${payload.a}i"
        );
        assert_eq!(body["resource_opts"]["health_check_interval"], "30s");
    }

    #[test]
    fn test_rule_sync_only_404_means_create() {
        assert!(matches!(plan_rule_sync(StatusCode::OK), RuleSync::Update));
        assert!(matches!(
            plan_rule_sync(StatusCode::NOT_FOUND),
            RuleSync::Create
        ));
        assert!(matches!(
            plan_rule_sync(StatusCode::UNAUTHORIZED),
            RuleSync::Abort
        ));
        assert!(matches!(
            plan_rule_sync(StatusCode::INTERNAL_SERVER_ERROR),
            RuleSync::Abort
        ));
    }

    #[test]
    fn test_rule_body_references_action() {
        let create = rule_body(&artifact(), true);
        assert_eq!(create.actions, vec!["influxdb:action_dev_imu".to_owned()]);
        assert_eq!(create.id.as_deref(), Some("rule_id_dev_imu"));

        let update = rule_body(&artifact(), false);
        assert!(update.id.is_none());
    }
}
