// src/remote.rs
//
// Remote endpoints: primary search, fallback search, telemetry side-channel.
// Blocking reqwest; callers run searches off the UI thread.

use std::{sync::Arc, thread, time::Duration};

use reqwest::blocking::{multipart, Client};
use serde::Serialize;
use serde_json::Value;

use crate::{
    attachment::Attachment,
    config::consts::USER_AGENT,
    error::RemoteFailure,
    lead::{Criteria, Field, LeadRecord},
};

/// JSON body for both search endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub name: String,
    pub location: String,
    pub technology: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_mime_type: Option<String>,
}

impl SearchRequest {
    pub fn new(criteria: &Criteria, attachment: Option<&Attachment>) -> Self {
        Self {
            name: criteria.name.clone(),
            location: criteria.location.clone(),
            technology: criteria.technology.clone(),
            file_data: attachment.map(|a| a.base64_payload()),
            file_name: attachment.map(|a| a.file_name.clone()),
            file_mime_type: attachment.map(|a| a.mime_type.clone()),
        }
    }

    pub fn criteria_only(criteria: &Criteria) -> Self {
        Self::new(criteria, None)
    }

    pub fn has_file(&self) -> bool {
        self.file_data.is_some()
    }
}

/// Anything that answers a search request with lead records.
pub trait LeadSource: Send + Sync {
    fn search(&self, req: &SearchRequest) -> Result<Vec<LeadRecord>, RemoteFailure>;
}

pub struct HttpLeadSource {
    client: Client,
    url: String,
}

impl HttpLeadSource {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, RemoteFailure> {
        Ok(Self { client: build_client(timeout)?, url: s!(url) })
    }
}

impl LeadSource for HttpLeadSource {
    fn search(&self, req: &SearchRequest) -> Result<Vec<LeadRecord>, RemoteFailure> {
        logf!("Remote: POST {} (file={})", self.url, req.has_file());

        let resp = self.client.post(&self.url).json(req).send()?;
        let status = resp.status();
        if !status.is_success() {
            loge!("Remote: {} → HTTP {}", self.url, status);
            return Err(RemoteFailure::Status(status.as_u16()));
        }

        let body: Value = resp.json()?;
        let leads = parse_leads(body)?;
        logf!("Remote: {} → {} lead(s)", self.url, leads.len());
        Ok(leads)
    }
}

fn build_client(timeout: Duration) -> Result<Client, RemoteFailure> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| RemoteFailure::Network(e.to_string()))
}

/// JSON array of lead-shaped objects → records.
/// Missing/null fields become "", scalars are stringified, non-objects skipped.
pub fn parse_leads(body: Value) -> Result<Vec<LeadRecord>, RemoteFailure> {
    let Value::Array(items) = body else {
        return Err(RemoteFailure::Payload(s!("expected a JSON array")));
    };

    Ok(items
        .iter()
        .filter_map(Value::as_object)
        .map(|obj| {
            let mut rec = LeadRecord::default();
            for field in Field::ALL {
                rec.set(field, obj.get(field.key()).map(text_of).unwrap_or_default());
            }
            rec
        })
        .collect())
}

fn text_of(v: &Value) -> String {
    match v {
        Value::Null => s!(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) => v.to_string(),
        // nested values are shown as compact JSON rather than dropped
        Value::Array(_) | Value::Object(_) => v.to_string(),
    }
}

/* ---------------- Telemetry side-channel ---------------- */

/// Fire-and-forget submission log. `submit` returns nothing and never fails;
/// implementations must not block the caller.
pub trait Telemetry: Send + Sync {
    fn submit(&self, criteria: &Criteria, attachment: Option<&Attachment>);
}

/// Telemetry disabled.
pub struct NoTelemetry;

impl Telemetry for NoTelemetry {
    fn submit(&self, _criteria: &Criteria, _attachment: Option<&Attachment>) {}
}

/// Multipart POST on a detached thread. The JoinHandle is dropped on purpose:
/// nobody waits for it and nobody can cancel it.
pub struct HttpTelemetry {
    client: Client,
    url: Arc<str>,
}

impl HttpTelemetry {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, RemoteFailure> {
        Ok(Self { client: build_client(timeout)?, url: Arc::from(url) })
    }
}

impl Telemetry for HttpTelemetry {
    fn submit(&self, criteria: &Criteria, attachment: Option<&Attachment>) {
        spawn_telemetry(
            self.client.clone(),
            Arc::clone(&self.url),
            criteria.clone(),
            attachment.cloned(),
        );
    }
}

/// Detached, uncancellable POST. Returns nothing the caller could wait on.
pub fn spawn_telemetry(
    client: Client,
    url: Arc<str>,
    criteria: Criteria,
    attachment: Option<Attachment>,
) {
    let spawned = thread::Builder::new()
        .name(s!("telemetry"))
        .spawn(move || {
            if let Err(e) = post_telemetry(&client, &url, &criteria, attachment) {
                logd!("Telemetry: dropped ({})", e);
            }
        });
    if let Err(e) = spawned {
        logd!("Telemetry: could not spawn ({})", e);
    }
}

fn post_telemetry(
    client: &Client,
    url: &str,
    criteria: &Criteria,
    attachment: Option<Attachment>,
) -> Result<(), RemoteFailure> {
    let mut form = multipart::Form::new()
        .text("name", criteria.name.clone())
        .text("location", criteria.location.clone())
        .text("technology", criteria.technology.clone());

    if let Some(att) = attachment {
        let part = multipart::Part::bytes(att.content)
            .file_name(att.file_name)
            .mime_str(&att.mime_type)?;
        form = form.part("file", part);
    }

    let status = client.post(url).multipart(form).send()?.status();
    logd!("Telemetry: {} → HTTP {}", url, status);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_has_camel_case_file_fields() {
        let c = Criteria::new("", "Austin", "");
        let att = Attachment::new(b"%PDF".to_vec(), "cv.pdf", "application/pdf");
        let body = serde_json::to_value(SearchRequest::new(&c, Some(&att))).unwrap();
        assert_eq!(body["location"], "Austin");
        assert_eq!(body["name"], "");
        assert_eq!(body["fileName"], "cv.pdf");
        assert_eq!(body["fileMimeType"], "application/pdf");
        assert_eq!(body["fileData"], "JVBERg==");
    }

    #[test]
    fn criteria_only_body_omits_file_fields() {
        let body = serde_json::to_value(SearchRequest::criteria_only(&Criteria::default())).unwrap();
        let obj = body.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert!(!obj.contains_key("fileData"));
    }

    #[test]
    fn parse_leads_defaults_and_stringifies() {
        let leads = parse_leads(json!([
            { "name": "Jane", "phone": 5551234, "email": null },
            "not an object",
            { "technology": "Rust", "extra": true }
        ]))
        .unwrap();
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].phone, "5551234");
        assert_eq!(leads[0].email, "");
        assert_eq!(leads[0].location, "");
        assert_eq!(leads[1].technology, "Rust");
        assert_eq!(leads[1].name, "");
    }

    #[test]
    fn parse_leads_rejects_non_arrays() {
        assert!(matches!(parse_leads(json!({"leads": []})), Err(RemoteFailure::Payload(_))));
    }
}
