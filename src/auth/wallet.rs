//! Sign-In with Ethereum (EIP-4361) verification.

use serde::Deserialize;
use siwe::Message;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct SiweLogin {
    /// The full EIP-4361 message text the wallet signed.
    pub message: String,
    /// 65-byte `r || s || v` signature, hex encoded with or without `0x`.
    pub signature: String,
}

/// Verifies the EIP-191 signature over the message and returns the signing
/// wallet address, lowercased with a `0x` prefix.
pub fn verify_siwe(login: &SiweLogin) -> Result<String, AppError> {
    let message: Message = login
        .message
        .parse()
        .map_err(|err| AppError::InvalidSignature(format!("malformed message: {err}")))?;
    let signature = decode_signature(&login.signature)?;

    if !message.valid_now() {
        return Err(AppError::InvalidSignature(
            "message is expired or not yet valid".into(),
        ));
    }
    message
        .verify_eip191(&signature)
        .map_err(|err| AppError::InvalidSignature(err.to_string()))?;

    Ok(format!("0x{}", hex::encode(message.address)))
}

fn decode_signature(raw: &str) -> Result<[u8; 65], AppError> {
    let raw = raw.trim();
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    let bytes = hex::decode(digits)
        .map_err(|err| AppError::InvalidSignature(format!("signature is not hex: {err}")))?;
    <[u8; 65]>::try_from(bytes.as_slice()).map_err(|_| {
        AppError::InvalidSignature(format!("signature must be 65 bytes, got {}", bytes.len()))
    })
}
