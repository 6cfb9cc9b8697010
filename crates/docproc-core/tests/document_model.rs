#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use bytes::Bytes;
use docproc_core::{ClientCode, DocProcError, DocumentId, DocumentUpload};

#[test]
fn document_id_accepts_uuid_like_values() {
    let id = DocumentId::parse("3f2a9c1e-7b4d-4e0a-9d2f-1c6b8e5a0f42").expect("valid id");
    assert_eq!(id.as_str(), "3f2a9c1e-7b4d-4e0a-9d2f-1c6b8e5a0f42");
    assert_eq!(id.to_string(), id.as_str());
}

#[test]
fn document_id_rejects_bad_input() {
    let long = "x".repeat(65);
    for raw in ["", "../etc/passwd", "a b", long.as_str()] {
        let err = DocumentId::parse(raw).expect_err("must fail");
        assert_eq!(err.client_code(), ClientCode::BadRequest, "raw={raw:?}");
    }
}

#[test]
fn client_codes_are_stable() {
    let cases = [
        (DocProcError::BadRequest("x".into()), "BAD_REQUEST", 400),
        (DocProcError::NotFound("x".into()), "NOT_FOUND", 404),
        (DocProcError::PayloadTooLarge { size: 2, limit: 1 }, "PAYLOAD_TOO_LARGE", 413),
        (DocProcError::Unavailable("x".into()), "UNAVAILABLE", 503),
        (DocProcError::Timeout(std::time::Duration::from_secs(30)), "TIMEOUT", 504),
        (DocProcError::Internal("x".into()), "INTERNAL", 500),
    ];
    for (err, code, status) in cases {
        assert_eq!(err.client_code().as_str(), code);
        assert_eq!(err.client_code().http_status(), status);
    }
}

#[test]
fn document_id_serializes_transparently() {
    let id = DocumentId::parse("doc_1").unwrap();
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"doc_1\"");
}

#[test]
fn upload_size_is_body_length() {
    let upload = DocumentUpload {
        filename: None,
        content_type: "text/plain".into(),
        body: Bytes::from_static(b"hello world"),
    };
    assert_eq!(upload.size_bytes(), 11);
}
