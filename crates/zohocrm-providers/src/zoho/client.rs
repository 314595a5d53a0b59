//! Zoho CRM Contacts API client.
//!
//! A [`ZohoContactsClient`] is bound to one [`AccessGrant`] and lives for the
//! duration of a single operation. Every response body is classified into a
//! [`ZohoResponse`] before anything else looks at it.

use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};
use zohocrm_core::NormalizedContact;

use crate::credential::AccessGrant;
use crate::error::{ProviderError, ProviderResult};

use super::mapper::to_normalized;
use super::record::{MutationOutcome, ZohoContact, ZohoResponse};

/// Path of the Contacts module below the API domain.
const CONTACTS_PATH: &str = "/crm/v2/Contacts";

/// Authorization scheme Zoho expects on resource calls.
const AUTH_SCHEME: &str = "Zoho-oauthtoken";

/// Request body of a create or update: always a single record.
#[derive(Debug, Serialize)]
struct MutationRequest<'a> {
    data: [&'a ZohoContact; 1],
}

/// Contacts API client bound to one access grant.
#[derive(Debug)]
pub struct ZohoContactsClient {
    http_client: reqwest::Client,
    grant: AccessGrant,
}

impl ZohoContactsClient {
    /// Creates a client for the given grant.
    pub fn new(http_client: reqwest::Client, grant: AccessGrant) -> Self {
        Self { http_client, grant }
    }

    fn contacts_url(&self) -> String {
        format!("{}{}", self.grant.api_domain.trim_end_matches('/'), CONTACTS_PATH)
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/{}", self.contacts_url(), urlencoding::encode(id))
    }

    /// Fetches every page of the Contacts list.
    ///
    /// Pages are requested strictly in order, starting at 1, until one
    /// reports `more_records: false`. Records without an id are skipped. If
    /// any page comes back empty or in an unexpected shape the whole listing
    /// yields no contacts.
    pub async fn list_all(&self) -> ProviderResult<Vec<NormalizedContact>> {
        let mut contacts = Vec::new();
        let mut page: u32 = 1;

        loop {
            match self.list_page(page).await? {
                ZohoResponse::Contacts(body) => {
                    contacts.extend(body.data.iter().filter_map(to_normalized));
                    if !body.info.more_records {
                        break;
                    }
                    page += 1;
                }
                other => {
                    warn!(page, kind = other.kind(), "unexpected contacts page, returning no contacts");
                    return Ok(Vec::new());
                }
            }
        }

        debug!(pages = page, count = contacts.len(), "fetched contacts");
        Ok(contacts)
    }

    /// Fetches a single page of the Contacts list.
    async fn list_page(&self, page: u32) -> ProviderResult<ZohoResponse> {
        let request = self
            .http_client
            .get(self.contacts_url())
            .query(&[("page", page)]);

        let (status, response) = self.send(request).await?;

        if let ZohoResponse::Error(ref error) = response {
            let mut err = ProviderError::transport(format!(
                "error in Zoho response: {}",
                error.describe()
            ))
            .with_status(status.as_u16());
            if let Some(code) = error.code.as_ref().or(error.error.as_ref()) {
                err = err.with_remote_code(code.clone());
            }
            return Err(err);
        }
        if !status.is_success() {
            return Err(status_error(status, "contacts list"));
        }

        Ok(response)
    }

    /// Creates a record and returns the id Zoho assigned to it.
    pub async fn create(&self, record: &ZohoContact) -> ProviderResult<String> {
        let request = self
            .http_client
            .post(self.contacts_url())
            .json(&MutationRequest { data: [record] });

        let outcome = self.mutate(request, "create").await?;
        outcome
            .record_id()
            .ok_or_else(|| ProviderError::parse("create response did not include the new record id"))
    }

    /// Patches the record whose id is set on `record`.
    pub async fn update(&self, record: &ZohoContact) -> ProviderResult<()> {
        let request = self
            .http_client
            .put(self.contacts_url())
            .json(&MutationRequest { data: [record] });

        self.mutate(request, "update").await.map(|_| ())
    }

    /// Deletes the record with the given id.
    pub async fn delete(&self, id: &str) -> ProviderResult<()> {
        let request = self.http_client.delete(self.record_url(id));
        self.mutate(request, "delete").await.map(|_| ())
    }

    /// Reads a single record back and maps it.
    ///
    /// Fails with a parse error if the record cannot be mapped.
    pub async fn get(&self, id: &str) -> ProviderResult<NormalizedContact> {
        let request = self.http_client.get(self.record_url(id));
        let (status, response) = self.send(request).await?;

        match response {
            ZohoResponse::Contacts(page) => page
                .data
                .first()
                .and_then(to_normalized)
                .ok_or_else(|| {
                    ProviderError::parse(format!("could not parse contact {} from Zoho", id))
                }),
            _ if !status.is_success() => Err(status_error(status, "contact read-back")),
            other => Err(ProviderError::parse(format!(
                "unexpected {} response reading contact {}",
                other.kind(),
                id
            ))),
        }
    }

    /// Sends a mutation and validates its single outcome.
    async fn mutate(&self, request: RequestBuilder, what: &str) -> ProviderResult<MutationOutcome> {
        let (status, response) = self.send(request).await?;

        let mut outcomes = match response {
            ZohoResponse::Mutation(body) => body.data,
            // `{"data": []}` carries no outcome to tell the shapes apart
            ZohoResponse::Contacts(page) if status.is_success() && page.data.is_empty() => Vec::new(),
            ZohoResponse::Malformed(reason) if status.is_success() => {
                return Err(ProviderError::parse(format!(
                    "could not parse {} response: {}",
                    what, reason
                )));
            }
            _ if !status.is_success() => return Err(status_error(status, what)),
            other => {
                return Err(ProviderError::parse(format!(
                    "unexpected {} response to {}",
                    other.kind(),
                    what
                )));
            }
        };

        if outcomes.len() != 1 {
            return Err(ProviderError::mutation(format!(
                "expected exactly one outcome for {}, got {}",
                what,
                outcomes.len()
            ))
            .with_status(status.as_u16()));
        }

        let outcome = outcomes.remove(0);
        if !outcome.is_success() {
            return Err(ProviderError::mutation(format!(
                "could not {} contact: {}",
                what, outcome.message
            ))
            .with_remote_code(outcome.code)
            .with_status(status.as_u16()));
        }

        debug!(
            what,
            id = ?outcome.record_id(),
            status = outcome.status.as_deref().unwrap_or("unknown"),
            "mutation succeeded"
        );
        Ok(outcome)
    }

    /// Sends an authenticated request and classifies the response body.
    async fn send(&self, request: RequestBuilder) -> ProviderResult<(StatusCode, ZohoResponse)> {
        let response = request
            .header(
                reqwest::header::AUTHORIZATION,
                format!("{} {}", AUTH_SCHEME, self.grant.access_token),
            )
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let classified = ZohoResponse::decode(&body);

        debug!(%status, kind = classified.kind(), "zoho response");
        Ok((status, classified))
    }
}

fn status_error(status: StatusCode, what: &str) -> ProviderError {
    ProviderError::transport(format!(
        "{} failed: {}",
        what,
        status.canonical_reason().unwrap_or("unexpected status")
    ))
    .with_status(status.as_u16())
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use zohocrm_core::PhoneLabel;

    use super::*;
    use crate::error::ProviderErrorCode;

    fn client(server: &MockServer) -> ZohoContactsClient {
        ZohoContactsClient::new(reqwest::Client::new(), AccessGrant::new("1000.at", server.uri()))
    }

    #[tokio::test]
    async fn requests_carry_zoho_auth_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/crm/v2/Contacts"))
            .and(query_param("page", "1"))
            .and(header("authorization", "Zoho-oauthtoken 1000.at"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"id": "1", "Full_Name": "Ada Lovelace", "Phone": "222"}],
                "info": {"page": 1, "per_page": 200, "count": 1, "more_records": false}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let contacts = client(&server).list_all().await.unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].phone(PhoneLabel::Work), Some("222"));
    }

    #[tokio::test]
    async fn list_error_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/crm/v2/Contacts"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "code": "INVALID_TOKEN",
                "details": {},
                "message": "invalid oauth token",
                "status": "error"
            })))
            .mount(&server)
            .await;

        let err = client(&server).list_all().await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::TransportError);
        assert_eq!(err.remote_code(), Some("INVALID_TOKEN"));
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn malformed_page_yields_no_contacts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"id": "1"}],
                "info": {"more_records": true}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let contacts = client(&server).list_all().await.unwrap();
        assert!(contacts.is_empty());
    }

    #[tokio::test]
    async fn record_ids_are_url_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/crm/v2/Contacts/a%2Fb"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"code": "SUCCESS", "details": {"id": "a/b"}, "message": "record deleted", "status": "success"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).delete("a/b").await.unwrap();
    }

    #[tokio::test]
    async fn non_success_outcome_carries_remote_code() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/crm/v2/Contacts"))
            .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({
                "data": [{"code": "INVALID_DATA", "details": {"id": "7"}, "message": "the id given seems to be invalid", "status": "error"}]
            })))
            .mount(&server)
            .await;

        let record = ZohoContact {
            id: Some("7".to_string()),
            ..Default::default()
        };
        let err = client(&server).update(&record).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::MutationFailed);
        assert_eq!(err.remote_code(), Some("INVALID_DATA"));
        assert!(err.message().contains("the id given seems to be invalid"));
    }

    #[tokio::test]
    async fn create_without_returned_id_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/crm/v2/Contacts"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": [{"code": "SUCCESS", "details": {}, "message": "record added", "status": "success"}]
            })))
            .mount(&server)
            .await;

        let err = client(&server).create(&ZohoContact::default()).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ParseError);
    }

    #[tokio::test]
    async fn mutation_server_error_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client(&server).delete("1").await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::TransportError);
        assert_eq!(err.status(), Some(503));
    }
}
