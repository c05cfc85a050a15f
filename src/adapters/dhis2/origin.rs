//! Origin-side tracker adapter
//!
//! Read-only access to the origin instance: the paginated enrollment
//! search, the full tracked-entity fetch, and the per-program attribute
//! schema.

use super::client::Dhis2Client;
use super::models::{EnrollmentPage, EnrollmentStub, ProgramMetadata};
use crate::domain::ids::{AttributeId, ProgramId, TrackedEntityId};
use crate::domain::{OriginError, Result, SyncError, TrackedEntityRecord};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Fields requested on the full tracked-entity fetch. Everything the
/// translator and deduplicator need, nothing more.
const TRACKED_ENTITY_FIELDS: &str =
    "trackedEntity,orgUnit,attributes,enrollments[enrollment,program,createdAt,enrolledAt,status,attributes]";

/// Client for the origin tracker instance.
pub struct OriginClient {
    client: Dhis2Client,
    page_size: usize,
}

impl OriginClient {
    /// Create an origin client with the given fetch page size.
    pub fn new(client: Dhis2Client, page_size: usize) -> Self {
        Self { client, page_size }
    }

    /// Credential/connectivity probe against the origin.
    pub async fn probe(&self) -> Result<()> {
        self.client.probe().await
    }

    /// Base URL of the origin instance
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Fetch all enrollments of a program enrolled on or after `enrolled_after`,
    /// page by page.
    ///
    /// Server-side total-count computation is disabled (`totalPages=false`)
    /// to avoid a known class of server errors under concurrent load; the
    /// fetch terminates naturally on an empty or short page instead.
    ///
    /// A network or decode failure on a single page logs the failure and
    /// terminates the fetch: callers receive whatever was collected before
    /// the failure, not an error, since downstream processing of partial
    /// results is still useful operationally.
    pub async fn fetch_enrollments(
        &self,
        program: &ProgramId,
        enrolled_after: NaiveDate,
    ) -> Vec<EnrollmentStub> {
        let mut collected = Vec::new();
        let mut page = 1usize;
        let enrolled_after = enrolled_after.format("%Y-%m-%d").to_string();

        loop {
            let request = self.client.get("tracker/enrollments").query(&[
                ("program", program.as_str()),
                ("ouMode", "ALL"),
                ("enrolledAfter", enrolled_after.as_str()),
                ("page", &page.to_string()),
                ("pageSize", &self.page_size.to_string()),
                ("totalPages", "false"),
            ]);

            let items = match self.fetch_page(request, page).await {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(
                        program = %program,
                        page = page,
                        error = %e,
                        "Enrollment page fetch failed, continuing with partial results"
                    );
                    break;
                }
            };

            if items.is_empty() {
                break;
            }

            let count = items.len();
            collected.extend(items);

            // A short page is the last page
            if count < self.page_size {
                break;
            }

            page += 1;
        }

        tracing::debug!(
            program = %program,
            count = collected.len(),
            pages = page,
            "Fetched enrollments from origin"
        );

        collected
    }

    async fn fetch_page(
        &self,
        request: reqwest::RequestBuilder,
        page: usize,
    ) -> Result<Vec<EnrollmentStub>> {
        let response = request
            .send()
            .await
            .map_err(|e| OriginError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Origin(OriginError::ServerError {
                status,
                message: format!("enrollment page {page}: {body}"),
            }));
        }

        let parsed: EnrollmentPage = response
            .json()
            .await
            .map_err(|e| OriginError::InvalidResponse(e.to_string()))?;

        Ok(parsed.into_items())
    }

    /// Fetch the full tracked entity record for one case.
    ///
    /// # Errors
    ///
    /// Returns an origin error on connection failure, a missing entity,
    /// or an undecodable response.
    pub async fn fetch_tracked_entity(
        &self,
        id: &TrackedEntityId,
    ) -> Result<TrackedEntityRecord> {
        let response = self
            .client
            .get(&format!("tracker/trackedEntities/{id}"))
            .query(&[("fields", TRACKED_ENTITY_FIELDS)])
            .send()
            .await
            .map_err(|e| OriginError::ConnectionFailed(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<TrackedEntityRecord>()
                .await
                .map_err(|e| OriginError::InvalidResponse(e.to_string()).into()),
            reqwest::StatusCode::NOT_FOUND => {
                Err(OriginError::TrackedEntityNotFound(id.to_string()).into())
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(OriginError::ServerError {
                    status: status.as_u16(),
                    message: body,
                }
                .into())
            }
        }
    }

    /// Fetch the set of attribute ids declared on a source program.
    ///
    /// Only attributes in this set are eligible for translation; the rest
    /// are filtered out of every record of the program.
    pub async fn fetch_program_attributes(
        &self,
        program: &ProgramId,
    ) -> Result<HashSet<AttributeId>> {
        let response = self
            .client
            .get(&format!("programs/{program}"))
            .query(&[(
                "fields",
                "programTrackedEntityAttributes[trackedEntityAttribute[id]]",
            )])
            .send()
            .await
            .map_err(|e| OriginError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OriginError::ProgramFetchFailed(format!(
                "program {program} metadata fetch returned {status}: {body}"
            ))
            .into());
        }

        let metadata: ProgramMetadata = response
            .json()
            .await
            .map_err(|e| OriginError::InvalidResponse(e.to_string()))?;

        let ids = metadata
            .program_tracked_entity_attributes
            .into_iter()
            .filter_map(|a| AttributeId::new(a.tracked_entity_attribute.id).ok())
            .collect();

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{secret_string, ServerConfig};

    fn origin_client(base_url: &str, page_size: usize) -> OriginClient {
        let config = ServerConfig {
            base_url: base_url.to_string(),
            username: "admin".to_string(),
            password: secret_string("district".to_string()),
            timeout_seconds: 5,
        };
        OriginClient::new(Dhis2Client::new(&config).unwrap(), page_size)
    }

    fn stub_body(ids: &[&str]) -> String {
        let items: Vec<String> = ids
            .iter()
            .map(|id| format!(r#"{{"trackedEntity": "{id}"}}"#))
            .collect();
        format!(r#"{{"instances": [{}]}}"#, items.join(","))
    }

    #[tokio::test]
    async fn test_pagination_terminates_on_short_page() {
        let mut server = mockito::Server::new_async().await;

        // Pages of 2, 2, 1 at page size 2: exactly three requests
        let p1 = server
            .mock("GET", "/api/tracker/enrollments")
            .match_query(mockito::Matcher::UrlEncoded("page".into(), "1".into()))
            .with_body(stub_body(&["a", "b"]))
            .create_async()
            .await;
        let p2 = server
            .mock("GET", "/api/tracker/enrollments")
            .match_query(mockito::Matcher::UrlEncoded("page".into(), "2".into()))
            .with_body(stub_body(&["c", "d"]))
            .create_async()
            .await;
        let p3 = server
            .mock("GET", "/api/tracker/enrollments")
            .match_query(mockito::Matcher::UrlEncoded("page".into(), "3".into()))
            .with_body(stub_body(&["e"]))
            .create_async()
            .await;

        let client = origin_client(&server.url(), 2);
        let program = ProgramId::new("prog1").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let items = client.fetch_enrollments(&program, date).await;
        assert_eq!(items.len(), 5);

        p1.assert_async().await;
        p2.assert_async().await;
        p3.assert_async().await;
    }

    #[tokio::test]
    async fn test_pagination_empty_first_page() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/tracker/enrollments")
            .match_query(mockito::Matcher::UrlEncoded("page".into(), "1".into()))
            .with_body(r#"{"instances": []}"#)
            .expect(1)
            .create_async()
            .await;

        let client = origin_client(&server.url(), 50);
        let program = ProgramId::new("prog1").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let items = client.fetch_enrollments(&program, date).await;
        assert!(items.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_pagination_degrades_on_page_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/tracker/enrollments")
            .match_query(mockito::Matcher::UrlEncoded("page".into(), "1".into()))
            .with_body(stub_body(&["a", "b"]))
            .create_async()
            .await;
        server
            .mock("GET", "/api/tracker/enrollments")
            .match_query(mockito::Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(500)
            .with_body("conflict computing pager")
            .create_async()
            .await;

        let client = origin_client(&server.url(), 2);
        let program = ProgramId::new("prog1").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        // Partial results, not an error
        let items = client.fetch_enrollments(&program, date).await;
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_tracked_entity() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/tracker/trackedEntities/tei1")
            .match_query(mockito::Matcher::Any)
            .with_body(
                r#"{"trackedEntity": "tei1", "orgUnit": "ou1",
                    "attributes": [], "enrollments": []}"#,
            )
            .create_async()
            .await;

        let client = origin_client(&server.url(), 50);
        let record = client
            .fetch_tracked_entity(&TrackedEntityId::new("tei1").unwrap())
            .await
            .unwrap();
        assert_eq!(record.org_unit.as_str(), "ou1");
    }

    #[tokio::test]
    async fn test_fetch_tracked_entity_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/tracker/trackedEntities/missing")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let client = origin_client(&server.url(), 50);
        let result = client
            .fetch_tracked_entity(&TrackedEntityId::new("missing").unwrap())
            .await;
        assert!(matches!(
            result,
            Err(SyncError::Origin(OriginError::TrackedEntityNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_fetch_program_attributes() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/programs/prog1")
            .match_query(mockito::Matcher::Any)
            .with_body(
                r#"{"programTrackedEntityAttributes": [
                    {"trackedEntityAttribute": {"id": "attrA"}},
                    {"trackedEntityAttribute": {"id": "attrB"}}
                ]}"#,
            )
            .create_async()
            .await;

        let client = origin_client(&server.url(), 50);
        let ids = client
            .fetch_program_attributes(&ProgramId::new("prog1").unwrap())
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&AttributeId::new("attrA").unwrap()));
    }
}
