use base64::Engine;
use base64::engine::general_purpose;
use hmac::Hmac;
use hmac::Mac;
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

const TOKEN_PREFIX: &str = "PL ";

pub fn b64_encode(data: &[u8]) -> String {
    general_purpose::STANDARD.encode(data)
}

pub fn b64_decode(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

#[derive(Debug, PartialEq, Eq)]
pub struct DecodedToken {
    pub user_id: String,
    pub is_expired: bool,
    pub key_type: String,
}

fn hmac_sha256_b64(message: &str, signature_key: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signature_key.as_bytes()).unwrap();
    mac.update(message.as_bytes());
    let result = mac.finalize().into_bytes();
    general_purpose::STANDARD.encode(result)
}

fn verify_hmac_b64(message: &str, sig_b64: &str, signature_key: &str) -> bool {
    hmac_sha256_b64(message, signature_key).eq(sig_b64)
}

/// Tokens are minted by the identity service; this mirrors its format so
/// locally issued ones (tests, dev tooling) verify the same way.
pub fn generate_token(user_id: &str, key_type: &str, ttl_secs: u64, signature_key: &str) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let expiration = now + ttl_secs;

    let combined = format!("{}\0{}\0{}", user_id, expiration, key_type);
    let payload = b64_encode(combined.as_bytes());
    let signature = hmac_sha256_b64(&payload, signature_key);

    format!("{}{}.{}", TOKEN_PREFIX, payload, signature)
}

pub fn decode_token(
    token: &str,
    verify_type: Option<&str>,
    signature_key: &str,
) -> Result<DecodedToken, &'static str> {
    let Some(t) = token.strip_prefix(TOKEN_PREFIX) else {
        return Err("INVALID_TOKEN");
    };

    // the signature sits after the last '.'
    let parts_rev: Vec<&str> = t.rsplitn(2, '.').collect();
    if parts_rev.len() != 2 {
        return Err("INVALID_TOKEN_FORMAT");
    }
    let signature = parts_rev[0];
    let payload = parts_rev[1];

    if !verify_hmac_b64(payload, signature, signature_key) {
        return Err("INVALID_SIGNATURE");
    }

    let decoded = b64_decode(payload).map_err(|_| "DECODE_ERROR")?;
    let decoded_str = String::from_utf8(decoded).map_err(|_| "DECODE_ERROR")?;

    let parts: Vec<&str> = decoded_str.split('\0').collect();
    if parts.len() != 3 {
        return Err("DECODE_ERROR");
    }

    let user_id = parts[0].to_string();
    let expiration_ts = parts[1].parse::<u64>().map_err(|_| "DECODE_ERROR")?;
    let key_type = parts[2].to_string();

    if let Some(expected) = verify_type {
        if expected != key_type {
            return Err("INVALID_TOKEN");
        }
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Ok(DecodedToken {
        user_id,
        is_expired: now > expiration_ts,
        key_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "test-signature-key";

    #[test]
    fn token_round_trip() {
        let token = generate_token("1234", "access", 3600, KEY);
        let decoded = decode_token(&token, Some("access"), KEY).unwrap();
        assert_eq!(decoded.user_id, "1234");
        assert_eq!(decoded.key_type, "access");
        assert!(!decoded.is_expired);
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let token = generate_token("1234", "access", 3600, KEY);
        let forged = token.replace('.', "A.");
        assert!(decode_token(&forged, Some("access"), KEY).is_err());
    }

    #[test]
    fn wrong_signing_key_is_rejected() {
        let token = generate_token("1234", "access", 3600, KEY);
        assert_eq!(
            decode_token(&token, Some("access"), "other-key"),
            Err("INVALID_SIGNATURE")
        );
    }

    #[test]
    fn wrong_key_type_is_rejected() {
        let token = generate_token("1234", "refresh", 3600, KEY);
        assert_eq!(decode_token(&token, Some("access"), KEY), Err("INVALID_TOKEN"));
    }

    #[test]
    fn expired_token_is_flagged() {
        let token = generate_token("1234", "access", 0, KEY);
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let decoded = decode_token(&token, Some("access"), KEY).unwrap();
        assert!(decoded.is_expired);
    }
}
