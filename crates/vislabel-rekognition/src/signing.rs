//! AWS Signature Version 4 for JSON protocol requests.
//!
//! Only what the client sends is supported: `POST /` without a query string.

use hmac::{Hmac, Mac};
use jiff::Timestamp;
use sha2::{Digest, Sha256};

use crate::Credentials;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Headers a signed request has to carry in addition to its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SignedHeaders {
    pub amz_date: String,
    pub authorization: String,
    pub security_token: Option<String>,
}

/// Request to sign.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SigningRequest<'a> {
    pub host: &'a str,
    pub content_type: &'a str,
    pub target: &'a str,
    pub payload: &'a [u8],
}

/// Signs a `POST /` request for `service` in `region` at time `now`.
pub(crate) fn sign(
    credentials: &Credentials,
    region: &str,
    service: &str,
    request: SigningRequest<'_>,
    now: Timestamp,
) -> SignedHeaders {
    let amz_date = now.strftime("%Y%m%dT%H%M%SZ").to_string();
    let date_stamp = &amz_date[..8];

    let mut headers = vec![
        ("content-type", request.content_type.trim()),
        ("host", request.host.trim()),
        ("x-amz-date", amz_date.as_str()),
        ("x-amz-target", request.target.trim()),
    ];
    if let Some(token) = credentials.session_token() {
        headers.push(("x-amz-security-token", token.trim()));
    }
    headers.sort_by(|a, b| a.0.cmp(b.0));

    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect();
    let signed_headers = headers
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(";");

    let canonical_request = format!(
        "POST\n/\n\n{canonical_headers}\n{signed_headers}\n{}",
        hex::encode(Sha256::digest(request.payload))
    );

    let scope = format!("{date_stamp}/{region}/{service}/aws4_request");
    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
        hex::encode(Sha256::digest(canonical_request.as_bytes()))
    );

    let key = signing_key(credentials.secret_access_key(), date_stamp, region, service);
    let signature = hex::encode(hmac(&key, string_to_sign.as_bytes()));

    let authorization = format!(
        "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
        credentials.access_key_id()
    );

    SignedHeaders {
        amz_date,
        authorization,
        security_token: credentials.session_token().map(str::to_owned),
    }
}

/// Derives the per-day, per-region, per-service signing key.
fn signing_key(secret: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac(format!("AWS4{secret}").as_bytes(), date_stamp.as_bytes());
    let k_region = hmac(&k_date, region.as_bytes());
    let k_service = hmac(&k_region, service.as_bytes());
    hmac(&k_service, b"aws4_request")
}

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

    fn request(payload: &[u8]) -> SigningRequest<'_> {
        SigningRequest {
            host: "rekognition.eu-west-2.amazonaws.com",
            content_type: "application/x-amz-json-1.1",
            target: "RekognitionService.DetectLabels",
            payload,
        }
    }

    fn fixed_time() -> Timestamp {
        "2024-03-05T10:20:30Z".parse().unwrap()
    }

    #[test]
    fn test_signing_key_derivation() {
        let k_date = hmac(format!("AWS4{SECRET}").as_bytes(), b"20120215");
        assert_eq!(
            hex::encode(&k_date),
            "969fbb94feb542b71ede6f87fe4d5fa29c789342b0f407474670f0c2489e0a0d"
        );

        let k_region = hmac(&k_date, b"us-east-1");
        assert_eq!(
            hex::encode(&k_region),
            "69daa0209cd9c5ff5c8ced464a696fd4252e981430b10e3d3fd8e2f197d7a70c"
        );

        let k_service = hmac(&k_region, b"iam");
        assert_eq!(
            hex::encode(&k_service),
            "f72cfd46f26bc4643f06a11eabb6c0ba18780c19a8da0c31ace671265e3c87fa"
        );

        assert_eq!(
            hex::encode(signing_key(SECRET, "20120215", "us-east-1", "iam")),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn test_authorization_header_shape() {
        let credentials = Credentials::new("AKIDEXAMPLE", SECRET);
        let signed = sign(
            &credentials,
            "eu-west-2",
            "rekognition",
            request(b"{}"),
            fixed_time(),
        );

        assert_eq!(signed.amz_date, "20240305T102030Z");
        assert!(signed.authorization.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240305/eu-west-2/rekognition/aws4_request, "
        ));
        assert!(
            signed
                .authorization
                .contains("SignedHeaders=content-type;host;x-amz-date;x-amz-target, ")
        );

        let signature = signed.authorization.rsplit("Signature=").next().unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(signed.security_token, None);
    }

    const DETECT_BODY: &[u8] = br#"{"Image":{"S3Object":{"Bucket":"photos","Name":"car.jpg"}},"MaxLabels":10,"MinConfidence":55.0}"#;

    // Expected values computed with botocore's `SigV4Auth` over the same
    // request, credentials and timestamp.
    #[test]
    fn test_known_authorization_header() {
        let credentials = Credentials::new("AKIDEXAMPLE", SECRET);
        let signed = sign(
            &credentials,
            "eu-west-2",
            "rekognition",
            request(DETECT_BODY),
            fixed_time(),
        );

        assert_eq!(
            signed.authorization,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240305/eu-west-2/rekognition/aws4_request, \
             SignedHeaders=content-type;host;x-amz-date;x-amz-target, \
             Signature=ccfd5dd9430e4fea3b45dbfbdf076192e2ca69ff995d5410bc407355082955ce"
        );
    }

    #[test]
    fn test_known_authorization_header_with_session_token() {
        let credentials =
            Credentials::new("AKIDEXAMPLE", SECRET).with_session_token("session-token-value");
        let signed = sign(
            &credentials,
            "eu-west-2",
            "rekognition",
            request(DETECT_BODY),
            fixed_time(),
        );

        assert_eq!(
            signed.authorization,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240305/eu-west-2/rekognition/aws4_request, \
             SignedHeaders=content-type;host;x-amz-date;x-amz-security-token;x-amz-target, \
             Signature=803724500e114599d9dfe1ba505d4d04fb713e5999b081db43ebe508c6f815f5"
        );
        assert_eq!(signed.security_token.as_deref(), Some("session-token-value"));
    }

    #[test]
    fn test_signature_covers_payload_and_time() {
        let credentials = Credentials::new("AKIDEXAMPLE", SECRET);
        let a = sign(&credentials, "eu-west-2", "rekognition", request(b"{}"), fixed_time());
        let b = sign(&credentials, "eu-west-2", "rekognition", request(b"{}"), fixed_time());
        let c = sign(&credentials, "eu-west-2", "rekognition", request(b"{\"x\":1}"), fixed_time());
        let d = sign(
            &credentials,
            "eu-west-2",
            "rekognition",
            request(b"{}"),
            "2024-03-05T10:20:31Z".parse().unwrap(),
        );

        assert_eq!(a, b);
        assert_ne!(a.authorization, c.authorization);
        assert_ne!(a.authorization, d.authorization);
    }

    #[test]
    fn test_session_token_is_signed() {
        let credentials = Credentials::new("ASIAEXAMPLE", SECRET).with_session_token("session");
        let signed = sign(
            &credentials,
            "us-east-1",
            "rekognition",
            request(b"{}"),
            fixed_time(),
        );

        assert_eq!(signed.security_token.as_deref(), Some("session"));
        assert!(
            signed
                .authorization
                .contains("SignedHeaders=content-type;host;x-amz-date;x-amz-security-token;x-amz-target,")
        );
    }
}
