//! API router.
//!
//! Returns a composable `Router` with all routes nested under `/api/`.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the attestation API router.
///
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
/// CORS is permissive: the upload form is served from a separate origin.
pub fn attestation_router(ctx: ApiContext) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/attestations", post(endpoints::attestations::upload))
        .with_state(ctx);

    Router::new()
        .nest("/api", routes)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::analyzer::client::MockAnalyzer;
    use crate::analyzer::types::{FieldValue, RawAnalysis};
    use crate::messages::Language;
    use crate::outbound::{service, OutboundError};
    use crate::pipeline::types::{
        CaseStore, DoctorRegistry, FraudCase, RegistryDoctor,
    };
    use crate::pipeline::AttestationProcessor;

    struct StaticRegistry {
        doctor: RegistryDoctor,
    }

    impl DoctorRegistry for StaticRegistry {
        fn find_by_registry_number(
            &self,
            number: &str,
        ) -> Result<Option<RegistryDoctor>, OutboundError> {
            Ok((number == self.doctor.registry_number).then(|| self.doctor.clone()))
        }

        fn find_by_name_and_location(
            &self,
            last_name: &str,
            _city_hint: Option<&str>,
        ) -> Result<Option<RegistryDoctor>, OutboundError> {
            Ok(
                (last_name.eq_ignore_ascii_case(&self.doctor.last_name))
                    .then(|| self.doctor.clone()),
            )
        }
    }

    struct NullStore;

    impl CaseStore for NullStore {
        fn insert_case(&self, case: &FraudCase) -> Result<Uuid, OutboundError> {
            Ok(case.case_id)
        }
    }

    fn registered_doctor() -> RegistryDoctor {
        RegistryDoctor {
            registry_number: "12345-67".into(),
            first_name: Some("An".into()),
            last_name: "Peeters".into(),
            city: Some("Gent".into()),
        }
    }

    fn clean_analysis() -> RawAnalysis {
        let mut raw = RawAnalysis::default();
        let fields = &mut raw.fields;
        fields.insert("PatientName".into(), FieldValue::string("Jan Jansen"));
        fields.insert("DoctorName".into(), FieldValue::string("Dr. An Peeters"));
        fields.insert(
            "DoctorRegistryNumber".into(),
            FieldValue::string("12345-67"),
        );
        fields.insert("IncapacityStartDate".into(), FieldValue::date("2024-03-01"));
        fields.insert("IncapacityEndDate".into(), FieldValue::date("2024-03-10"));
        fields.insert("CertificateDate".into(), FieldValue::date("2024-03-01"));
        fields.insert("DoctorHasSigned".into(), FieldValue::boolean(true));
        raw
    }

    fn app_with(analyzer: MockAnalyzer) -> Router {
        let processor = AttestationProcessor::new(
            Box::new(analyzer),
            Box::new(StaticRegistry {
                doctor: registered_doctor(),
            }),
            Box::new(NullStore),
        );
        attestation_router(ApiContext::new(Arc::new(processor), Language::Nl))
    }

    const BOUNDARY: &str = "attest-test-boundary";

    fn multipart_request(uri: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, file_name, content) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match file_name {
                Some(f) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                         Content-Type: application/pdf\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 65536).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_responds_ok() {
        let app = app_with(MockAnalyzer::returning(clean_analysis()));

        let req = Request::builder()
            .method("GET")
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert!(!json["version"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_file_part_returns_400() {
        let app = app_with(MockAnalyzer::returning(clean_analysis()));

        let req = multipart_request("/api/attestations", &[("note", None, b"hello")]);
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert_eq!(json["error"]["message"], "Geen bestand geüpload");
    }

    #[tokio::test]
    async fn missing_file_message_follows_lang_query() {
        let app = app_with(MockAnalyzer::returning(clean_analysis()));

        let req = multipart_request("/api/attestations?lang=fr", &[("note", None, b"x")]);
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"]["message"], "Aucun fichier téléchargé");
    }

    #[tokio::test]
    async fn clean_document_approves_end_to_end() {
        let app = app_with(MockAnalyzer::returning(clean_analysis()));

        let req = multipart_request(
            "/api/attestations",
            &[("file", Some("attest.pdf"), b"%PDF-1.4 stub")],
        );
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["valid"], true);
        assert_eq!(json["error_category"], "none");
        assert_eq!(json["details"][0]["label"], "Bestandsnaam");
        assert_eq!(json["details"][0]["value"], "attest.pdf");
        // 13-byte upload, rendered in kilobytes with two decimals.
        let size = json["details"]
            .as_array()
            .unwrap()
            .iter()
            .find(|d| d["label"] == "Bestandsgrootte")
            .unwrap();
        assert_eq!(size["value"], "0.01 KB");
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }

    #[tokio::test]
    async fn lang_query_switches_result_language() {
        let app = app_with(MockAnalyzer::returning(clean_analysis()));

        let req = multipart_request(
            "/api/attestations?lang=en",
            &[("file", Some("attest.pdf"), b"%PDF-1.4 stub")],
        );
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(
            json["message"],
            "Your absence certificate is valid and approved."
        );
    }

    #[tokio::test]
    async fn analyzer_timeout_maps_to_504() {
        let app = app_with(MockAnalyzer::failing(OutboundError::Timeout {
            service: service::ANALYZER,
            after_secs: 120,
        }));

        let req = multipart_request(
            "/api/attestations",
            &[("file", Some("attest.pdf"), b"%PDF-1.4 stub")],
        );
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        let json = response_json(response).await;
        assert_eq!(json["valid"], false);
        assert_eq!(json["error_category"], "technical");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = app_with(MockAnalyzer::returning(clean_analysis()));

        let req = Request::builder()
            .method("GET")
            .uri("/api/nonexistent")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
