//! CLI Commands

pub mod config;
pub mod faq;
pub mod forms;
pub mod home;
pub mod site_lock;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;

/// API client
pub struct ApiClient {
    pub base_url: String,
    pub token: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
            // a locked site answers with a redirect to the coming-soon page
            client: reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .unwrap_or_default(),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, String> {
        let req = self.client.get(self.url(path));
        self.send(req).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, String> {
        let req = self.client.put(self.url(path)).json(body);
        self.send(req).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, mut req: reqwest::RequestBuilder) -> Result<T, String> {
        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let resp = req.send().await.map_err(|e| e.to_string())?;
        let status = resp.status();
        if status.is_redirection() {
            return Err(format!("{status}: the site is locked; use an admin token"));
        }
        let json: serde_json::Value = resp.json().await.map_err(|e| format!("{status}: {e}"))?;
        unwrap_envelope(json)
    }
}

/// `data` of a success envelope, or the error message of a failed one.
fn unwrap_envelope<T: DeserializeOwned>(json: serde_json::Value) -> Result<T, String> {
    if json.get("success").and_then(serde_json::Value::as_bool) == Some(false) {
        let message = json
            .pointer("/error/message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("request failed");
        return Err(match json.get("data").and_then(serde_json::Value::as_array) {
            Some(details) if !details.is_empty() => {
                let lines: Vec<String> = details
                    .iter()
                    .map(|d| d.get("message").and_then(|m| m.as_str()).map(String::from).unwrap_or_else(|| d.to_string()))
                    .collect();
                format!("{message}\n  {}", lines.join("\n  "))
            }
            _ => message.to_string(),
        });
    }

    match json.get("data") {
        Some(data) => serde_json::from_value(data.clone()).map_err(|e| e.to_string()),
        None => Err("No data in response".into()),
    }
}

/// Read a JSON or YAML document, chosen by extension.
pub fn read_document(file: &str) -> Result<serde_json::Value, String> {
    let content = fs::read_to_string(file).map_err(|e| format!("{file}: {e}"))?;
    if file.ends_with(".yaml") || file.ends_with(".yml") {
        serde_yaml::from_str(&content).map_err(|e| format!("{file}: {e}"))
    } else {
        serde_json::from_str(&content).map_err(|e| format!("{file}: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope() {
        let ok: bool = unwrap_envelope(json!({"success": true, "data": true, "error": null})).unwrap();
        assert!(ok);

        let err = unwrap_envelope::<serde_json::Value>(json!({
            "success": false,
            "data": [{"message": "Field 1: label is empty"}],
            "error": {"code": "validation_failed", "message": "1 field problem(s)"}
        }))
        .unwrap_err();
        assert!(err.starts_with("1 field problem(s)"));
        assert!(err.contains("Field 1: label is empty"));
    }

    #[test]
    fn test_read_document_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("join.yaml");
        fs::write(&yaml, "title: Play with us.\nfields:\n  - name: stage_name\n    label: Stage name\n").unwrap();
        let doc = read_document(yaml.to_str().unwrap()).unwrap();
        assert_eq!(doc["fields"][0]["name"], "stage_name");

        let json_file = dir.path().join("join.json");
        fs::write(&json_file, "{not json").unwrap();
        assert!(read_document(json_file.to_str().unwrap()).is_err());
    }
}
