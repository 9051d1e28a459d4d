//! Gateway-side paths. Everything under [`PREFIX`] is forwarded to the
//! upstream API with the prefix stripped.

pub const PREFIX: &str = "/api";

pub const LOGIN: &str = "/api/auth/login";
pub const LOGOUT: &str = "/api/auth/logout";
pub const ME: &str = "/api/auth/me";

pub const PREMISES: &str = "/api/premises";
pub const CAMERAS: &str = "/api/cameras";
pub const ALERTS: &str = "/api/alerts";
pub const INCIDENTS: &str = "/api/incidents";
pub const GUARDS: &str = "/api/guards";
pub const HEALTH: &str = "/api/health";

pub fn premise(id: &str) -> String {
    format!("/api/premises/{}", id)
}
pub fn premise_cameras(id: &str) -> String {
    format!("/api/premises/{}/cameras", id)
}

pub fn camera(id: &str) -> String {
    format!("/api/cameras/{}", id)
}
pub fn camera_stream(id: &str) -> String {
    format!("/api/cameras/{}/stream", id)
}
pub fn camera_status(id: &str) -> String {
    format!("/api/cameras/{}/status", id)
}

pub fn alert(id: &str) -> String {
    format!("/api/alerts/{}", id)
}
pub fn alert_acknowledge(id: &str) -> String {
    format!("/api/alerts/{}/acknowledge", id)
}
pub fn alert_assign(id: &str) -> String {
    format!("/api/alerts/{}/assign", id)
}

pub fn incident(id: &str) -> String {
    format!("/api/incidents/{}", id)
}
pub fn incident_updates(id: &str) -> String {
    format!("/api/incidents/{}/updates", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_stay_under_the_forward_prefix() {
        for path in [
            premise("p1"),
            premise_cameras("p1"),
            camera("c1"),
            camera_stream("c1"),
            camera_status("c1"),
            alert("a1"),
            alert_acknowledge("a1"),
            alert_assign("a1"),
            incident("i1"),
            incident_updates("i1"),
        ] {
            assert!(path.starts_with(PREFIX));
        }
    }

    #[test]
    fn stripping_the_prefix_yields_the_upstream_path() {
        assert_eq!(
            alert_acknowledge("a1").strip_prefix(PREFIX),
            Some("/alerts/a1/acknowledge")
        );
        assert_eq!(LOGIN.strip_prefix(PREFIX), Some("/auth/login"));
    }
}
