//! `XnatClient` against a local mock XNAT server.

use qap_model::{ScanKey, SchemaId};
use qap_xnat::{
    AssessmentTarget, Credentials, DocumentSink, ScanTypeResolver, XnatClient, XnatError,
};
use tokio::runtime::Runtime;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ASSESSOR_PATH: &str = "/data/projects/QAP/subjects/S01/experiments/MR1/assessors/S01_MR1_s3_anatQA";
const SCANS_PATH: &str = "/data/projects/QAP/subjects/S01/experiments/MR1/scans";
/// `admin:secret`
const AUTHORIZATION: &str = "Basic YWRtaW46c2VjcmV0";
const DOCUMENT: &str = "<AMCZ0:anatQA/>";

/// Mock server driven from synchronous tests; the blocking client must not
/// run inside the async runtime.
struct MockXnat {
    server: MockServer,
    runtime: Runtime,
}

impl MockXnat {
    fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("Failed to build runtime");
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    fn client(&self) -> XnatClient {
        XnatClient::new(&self.server.uri(), Credentials::new("admin", "secret"))
            .expect("Failed to create client")
    }

    fn verify(&self) {
        self.runtime.block_on(self.server.verify());
    }
}

fn target() -> AssessmentTarget {
    AssessmentTarget::new("QAP", ScanKey::new("S01", "MR1", "3"), SchemaId::AnatQa)
}

#[test]
fn existing_assessment_is_not_overwritten() {
    let xnat = MockXnat::start();
    xnat.mount(
        Mock::given(method("GET"))
            .and(path(ASSESSOR_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(1),
    );
    xnat.mount(
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0),
    );

    let err = xnat.client().submit(&target(), DOCUMENT).unwrap_err();

    assert!(matches!(err, XnatError::AlreadyExists { ref label } if label == "S01_MR1_s3_anatQA"));
    xnat.verify();
}

#[test]
fn new_assessment_is_put_in_body() {
    let xnat = MockXnat::start();
    xnat.mount(
        Mock::given(method("GET"))
            .and(path(ASSESSOR_PATH))
            .and(header("authorization", AUTHORIZATION))
            .respond_with(ResponseTemplate::new(404))
            .expect(1),
    );
    xnat.mount(
        Mock::given(method("PUT"))
            .and(path(ASSESSOR_PATH))
            .and(query_param("inbody", "true"))
            .and(header("content-type", "text/xml"))
            .and(header("authorization", AUTHORIZATION))
            .and(body_string(DOCUMENT))
            .respond_with(ResponseTemplate::new(201).set_body_string("XNAT_E00042\n"))
            .expect(1),
    );

    let uid = xnat.client().submit(&target(), DOCUMENT).expect("submit");

    assert_eq!(uid, "XNAT_E00042");
    xnat.verify();
}

#[test]
fn put_answered_with_ok_is_accepted() {
    let xnat = MockXnat::start();
    xnat.mount(
        Mock::given(method("GET"))
            .and(path(ASSESSOR_PATH))
            .respond_with(ResponseTemplate::new(404)),
    );
    xnat.mount(
        Mock::given(method("PUT"))
            .and(path(ASSESSOR_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("XNAT_E00007")),
    );

    assert_eq!(
        xnat.client().submit(&target(), DOCUMENT).expect("submit"),
        "XNAT_E00007"
    );
}

#[test]
fn rejected_put_reports_status() {
    let xnat = MockXnat::start();
    xnat.mount(
        Mock::given(method("GET"))
            .and(path(ASSESSOR_PATH))
            .respond_with(ResponseTemplate::new(404)),
    );
    xnat.mount(
        Mock::given(method("PUT"))
            .and(path(ASSESSOR_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden")),
    );

    let err = xnat.client().submit(&target(), DOCUMENT).unwrap_err();

    match err {
        XnatError::Status { status, url, message } => {
            assert_eq!(status, 403);
            assert!(url.ends_with("S01_MR1_s3_anatQA?inbody=true"));
            assert_eq!(message, "Forbidden");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn scan_type_is_read_from_listing() {
    let xnat = MockXnat::start();
    xnat.mount(
        Mock::given(method("GET"))
            .and(path(SCANS_PATH))
            .and(query_param("format", "json"))
            .and(header("authorization", AUTHORIZATION))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"ResultSet":{"Result":[
                    {"ID":"1","type":"localizer"},
                    {"ID":"3","type":"MPRAGE"}
                ]}}"#,
            )),
    );
    let client = xnat.client();

    assert_eq!(
        client
            .scan_type("QAP", &ScanKey::new("S01", "MR1", "3"))
            .expect("scan type"),
        "MPRAGE"
    );
    assert!(matches!(
        client.scan_type("QAP", &ScanKey::new("S01", "MR1", "9")),
        Err(XnatError::ScanNotFound { .. })
    ));
}

#[test]
fn failed_scan_listing_reports_status() {
    let xnat = MockXnat::start();
    xnat.mount(
        Mock::given(method("GET"))
            .and(path(SCANS_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("Login required")),
    );

    let err = xnat
        .client()
        .scan_type("QAP", &ScanKey::new("S01", "MR1", "3"))
        .unwrap_err();

    assert!(matches!(err, XnatError::Status { status: 401, .. }));
}
