use serde::{Deserialize, Serialize};

/// The user element of a run request.
///
/// Identifies who the flow is running as. Services receive it untouched
/// from the host and may use it for authorization decisions of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub authentication_id: Option<String>,
    #[serde(default)]
    pub attribute: Option<String>,
    /// True when this is the user currently running the flow.
    #[serde(default)]
    pub running_user: bool,
}
