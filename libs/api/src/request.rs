use serde::{Deserialize, Serialize};

use crate::response::{AlertKind, CameraStatus, IncidentStatus, Severity, UpdateKind};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Login {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UpdateCameraStatus {
    pub status: CameraStatus,
}

// Wire field is snake_case, unlike the entity DTOs.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AssignAlert {
    pub guard_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_id: Option<String>,
    pub premise_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UpdateIncident {
    pub status: IncidentStatus,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewIncidentUpdate {
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}
