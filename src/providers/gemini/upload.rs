use crate::attachment::{Attachment, LocalFile};
use crate::core::error::UploadError;
use crate::providers::base_client::HttpClient;
use crate::providers::gemini::types::UploadResponse;
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

const UPLOAD_PATH: &str = "upload/v1beta/files";

/// Headers of a single-request resumable upload.
pub fn upload_headers(file: &LocalFile) -> Vec<(&'static str, String)> {
    vec![
        ("X-Goog-Upload-Command", "start, upload, finalize".to_string()),
        ("X-Goog-Upload-Header-Content-Length", file.size().to_string()),
        ("X-Goog-Upload-Header-Content-Type", file.mime_type.clone()),
    ]
}

/// Turns an upload response body into an attachment for `file`.
pub fn parse_upload_response(body: &str, file: &LocalFile) -> Result<Attachment, UploadError> {
    let parsed: UploadResponse = serde_json::from_str(body)
        .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

    let reference = parsed
        .file
        .and_then(|f| f.uri)
        .filter(|uri| !uri.is_empty())
        .ok_or_else(|| UploadError::MalformedResponse("missing file.uri".to_string()))?;

    Ok(Attachment {
        reference,
        mime_type: file.mime_type.clone(),
        display_name: file.name.clone(),
    })
}

pub async fn upload_file(client: &HttpClient, file: &LocalFile) -> Result<Attachment, UploadError> {
    debug!(file = %file.name, mime_type = %file.mime_type, size = file.size(), "uploading");

    let part = Part::bytes(file.bytes.clone())
        .file_name(file.name.clone())
        .mime_str(&file.mime_type)?;
    let form = Form::new().part("file", part);

    let response = client
        .post_multipart(UPLOAD_PATH, form, &upload_headers(file))
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        warn!(file = %file.name, status = status.as_u16(), "upload failed");
        return Err(UploadError::Status {
            status: status.as_u16(),
            body,
        });
    }

    parse_upload_response(&body, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_server::serve_once;

    fn keyed_client(base_url: String) -> HttpClient {
        let mut client = HttpClient::new(base_url);
        client.set_query_param("key", "test-key".to_string());
        client
    }

    #[tokio::test]
    async fn upload_sends_key_and_upload_headers() {
        let (base_url, server) = serve_once(200, r#"{"file":{"uri":"files/abc"}}"#).await;
        let file = LocalFile::new("cat.png", "image/png", b"\x89PNG".to_vec());

        let attachment = upload_file(&keyed_client(base_url), &file).await.unwrap();
        assert_eq!(attachment.reference, "files/abc");
        assert_eq!(attachment.mime_type, "image/png");
        assert_eq!(attachment.display_name, "cat.png");

        let request = server.await.unwrap();
        assert_eq!(
            request.request_line(),
            "POST /upload/v1beta/files?key=test-key HTTP/1.1"
        );
        assert_eq!(
            request.header("x-goog-upload-command"),
            Some("start, upload, finalize")
        );
        assert_eq!(request.header("x-goog-upload-header-content-length"), Some("4"));
        assert_eq!(request.header("x-goog-upload-header-content-type"), Some("image/png"));
        assert!(
            request
                .header("content-type")
                .is_some_and(|v| v.starts_with("multipart/form-data"))
        );
        assert!(request.body_text().contains(r#"name="file"; filename="cat.png""#));
    }

    #[tokio::test]
    async fn non_success_status_is_upload_error() {
        let (base_url, server) = serve_once(403, r#"{"error":{"code":403}}"#).await;
        let file = LocalFile::new("cat.png", "image/png", vec![1, 2, 3]);

        let err = upload_file(&keyed_client(base_url), &file).await.unwrap_err();
        assert!(matches!(err, UploadError::Status { status: 403, .. }), "{err}");
        server.await.unwrap();
    }

    #[test]
    fn upload_response_becomes_attachment() {
        let file = LocalFile::new("cat.png", "image/png", vec![0; 16]);
        let body = r#"{"file":{"name":"files/abc","uri":"files/abc","mimeType":"image/png","sizeBytes":"16"}}"#;

        let attachment = parse_upload_response(body, &file).unwrap();
        assert_eq!(
            attachment,
            Attachment {
                reference: "files/abc".to_string(),
                mime_type: "image/png".to_string(),
                display_name: "cat.png".to_string(),
            }
        );
    }

    #[test]
    fn missing_uri_is_malformed() {
        let file = LocalFile::new("cat.png", "image/png", Vec::new());
        for body in [r#"{}"#, r#"{"file":{"name":"files/abc"}}"#, r#"{"file":{"uri":""}}"#, "not json"] {
            let err = parse_upload_response(body, &file).unwrap_err();
            assert!(matches!(err, UploadError::MalformedResponse(_)), "{body}");
        }
    }

    #[test]
    fn headers_declare_size_and_type() {
        let file = LocalFile::new("report.pdf", "application/pdf", vec![7; 42]);
        let headers = upload_headers(&file);
        assert_eq!(headers[0], ("X-Goog-Upload-Command", "start, upload, finalize".to_string()));
        assert_eq!(headers[1].1, "42");
        assert_eq!(headers[2].1, "application/pdf");
    }
}
