/// One action/rule pair derived from a catalog source, ready to be pushed to
/// the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub measurement: String,
    pub action_name: String,
    pub action_description: String,
    pub rule_id: String,
    pub rule_name: String,
    pub rule_description: String,
    pub sql: String,
    pub write_syntax: String,
}
