use mail_digest::*;
use serde_json::json;

fn provider_payload() -> serde_json::Value {
    json!({
        "partId": "",
        "mimeType": "multipart/alternative",
        "filename": "",
        "headers": [
            {"name": "From", "value": "Alice <alice@example.com>"},
            {"name": "Subject", "value": "Quarterly numbers"},
            {"name": "Date", "value": "Mon, 02 Jan 2023 10:00:00 +0000"}
        ],
        "body": {"size": 0},
        "parts": [
            {
                "partId": "0",
                "mimeType": "text/plain",
                "filename": "",
                "headers": [{"name": "Content-Type", "value": "text/plain; charset=\"UTF-8\""}],
                "body": {"size": 5, "data": "aGVsbG8="}
            },
            {
                "partId": "1",
                "mimeType": "text/html",
                "filename": "",
                "headers": [{"name": "Content-Type", "value": "text/html; charset=\"UTF-8\""}],
                "body": {"size": 12, "data": "PGI-aGVsbG88L2I-"}
            }
        ]
    })
}

#[test]
fn test_ingest_provider_json() {
    let part = MessagePart::from_value(provider_payload()).unwrap();

    assert!(part.is_multipart());
    assert_eq!(part.parts.len(), 2);
    assert_eq!(part.header("subject"), Some("Quarterly numbers"));
    assert_eq!(part.parts[0].part_id.as_deref(), Some("0"));
    assert!(
        part.parts[0]
            .charset()
            .is_some_and(|c| c.eq_ignore_ascii_case("utf-8"))
    );
    assert_eq!(part.parts[1].content_type(), "text/html");
    assert_eq!(decode_body(&part), "hello");
}

#[test]
fn test_ingest_from_text() {
    let text = provider_payload().to_string();
    let part = MessagePart::from_json(&text).unwrap();

    assert_eq!(part, MessagePart::from_value(provider_payload()).unwrap());
}

#[test]
fn test_serialization_uses_provider_field_names() {
    let part = MessagePart::from_value(provider_payload()).unwrap();
    let value = serde_json::to_value(&part).unwrap();

    assert_eq!(value["mimeType"], "multipart/alternative");
    assert_eq!(value["parts"][1]["partId"], "1");
    assert_eq!(value["parts"][0]["body"]["data"], "aGVsbG8=");
}

#[test]
fn test_missing_fields_use_defaults() {
    let part = MessagePart::from_value(json!({})).unwrap();

    assert!(part.mime_type.is_empty());
    assert_eq!(part.content_type(), "text/plain");
    assert!(part.headers.is_empty());
    assert!(part.body.data.is_none());
    assert!(!part.is_multipart());
}

#[test]
fn test_content_type_normalized() {
    let part = MessagePart::from_value(json!({"mimeType": "TEXT/Plain"})).unwrap();
    assert_eq!(part.content_type(), "text/plain");

    let from_header = MessagePart::from_value(json!({
        "mimeType": "",
        "headers": [{"name": "Content-Type", "value": "text/html; charset=utf-8"}]
    }))
    .unwrap();
    assert_eq!(from_header.content_type(), "text/html");
}

#[test]
fn test_missing_mime_type_uses_content_type_header() {
    let part = MessagePart::from_value(json!({
        "headers": [{"name": "Content-Type", "value": "text/html; charset=utf-8"}]
    }))
    .unwrap();

    assert_eq!(part.content_type(), "text/html");
}

#[test]
fn test_charset_absent_without_header() {
    let part = MessagePart::leaf("text/plain", Vec::new(), b"x");

    assert!(part.charset().is_none());
    assert!(!part.is_attachment());
}

#[test]
fn test_attachment_disposition() {
    let part = MessagePart::leaf(
        "application/pdf",
        vec![Header::new(
            "content-disposition",
            "attachment; filename=\"report.pdf\"",
        )],
        b"%PDF",
    );

    assert!(part.is_attachment());
}

#[test]
fn test_inline_disposition_not_attachment() {
    let part = MessagePart::leaf(
        "image/png",
        vec![Header::new("Content-Disposition", "inline")],
        b"png",
    );

    assert!(!part.is_attachment());
}

#[test]
fn test_wrong_shape_rejected() {
    let result = MessagePart::from_value(json!({"headers": "From: a@x.com"}));
    assert!(matches!(result, Err(Error::Structure(_))));

    let result = MessagePart::from_value(json!("From: a@x.com"));
    assert!(matches!(result, Err(Error::Structure(_))));

    assert!(matches!(
        MessagePart::from_json("{not json"),
        Err(Error::Structure(_))
    ));
}

#[test]
fn test_container_with_inline_data_rejected() {
    let result = MessagePart::from_value(json!({
        "mimeType": "multipart/mixed",
        "parts": [{
            "partId": "0",
            "mimeType": "multipart/alternative",
            "body": {"size": 5, "data": "aGVsbG8"},
            "parts": [{"partId": "0.0", "mimeType": "text/plain"}]
        }]
    }));

    match result {
        Err(Error::Structure(msg)) => assert!(msg.contains("part 0 ")),
        other => panic!("expected structure error, got {other:?}"),
    }
}

#[test]
fn test_leaf_records_size() {
    let part = MessagePart::leaf("text/plain", Vec::new(), b"hello");

    assert_eq!(part.body.size, 5);
    assert_eq!(decode_part(&part).unwrap(), "hello");
}

#[test]
fn test_from_rfc822_multipart() {
    let raw = b"From: Alice <alice@example.com>\r\n\
                Subject: Raw message\r\n\
                Date: Mon, 02 Jan 2023 10:00:00 +0000\r\n\
                MIME-Version: 1.0\r\n\
                Content-Type: multipart/alternative; boundary=\"b1\"\r\n\
                \r\n\
                --b1\r\n\
                Content-Type: text/html; charset=utf-8\r\n\
                \r\n\
                <p>Hello</p>\r\n\
                --b1\r\n\
                Content-Type: text/plain; charset=utf-8\r\n\
                Content-Transfer-Encoding: quoted-printable\r\n\
                \r\n\
                Caf=C3=A9 is open\r\n\
                --b1--\r\n";

    let part = MessagePart::from_rfc822(raw).unwrap();

    assert_eq!(part.content_type(), "multipart/alternative");
    assert_eq!(part.parts.len(), 2);
    assert_eq!(part.header("Subject"), Some("Raw message"));
    assert_eq!(decode_body(&part).trim_end(), "Caf\u{e9} is open");
}

#[test]
fn test_from_rfc822_single_part() {
    let raw = b"From: bob@example.com\r\n\
                Subject: Plain\r\n\
                \r\n\
                Just text.";

    let part = MessagePart::from_rfc822(raw).unwrap();

    assert!(!part.is_multipart());
    assert_eq!(decode_body(&part), "Just text.");
}
