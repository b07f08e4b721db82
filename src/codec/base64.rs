//! Base64 in the standard (padded) and URL-safe (unpadded) alphabets.
//!
//! # Examples
//! ```
//! # use shared_lib::codec::base64;
//! let encoded = base64::encode("Man");
//! assert_eq!(encoded, "TWFu");
//! assert_eq!(base64::decode(&encoded).unwrap(), "Man");
//! ```

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::{DecodeSliceError, Engine};
use derive_more::{Display, Error, From};

use crate::collections::contiguous::SharedString;
use crate::util::error::AllocError;
use crate::util::result::ResultExtension;

/// The reason some input couldn't be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum DecodeError {
    /// The input isn't valid in the chosen alphabet. The message names the offending symbol or
    /// length.
    #[display("malformed base64: {message}")]
    #[from(ignore)]
    Malformed { message: String },
    /// The output buffer couldn't be allocated.
    #[display("{_0}")]
    Alloc(AllocError),
}

impl From<DecodeSliceError> for DecodeError {
    fn from(value: DecodeSliceError) -> Self {
        DecodeError::Malformed {
            message: value.to_string(),
        }
    }
}

/// Encodes `input` with the standard alphabet, padding the output to a multiple of four.
///
/// # Panics
/// Panics if allocation fails.
pub fn encode(input: impl AsRef<[u8]>) -> SharedString {
    try_encode(input).throw()
}

pub fn try_encode(input: impl AsRef<[u8]>) -> Result<SharedString, AllocError> {
    encode_with(&STANDARD, input.as_ref(), true)
}

/// Encodes `input` with the URL and filename safe alphabet, without padding.
///
/// # Panics
/// Panics if allocation fails.
pub fn encode_url(input: impl AsRef<[u8]>) -> SharedString {
    try_encode_url(input).throw()
}

pub fn try_encode_url(input: impl AsRef<[u8]>) -> Result<SharedString, AllocError> {
    encode_with(&URL_SAFE_NO_PAD, input.as_ref(), false)
}

/// Decodes padded, standard alphabet base64.
pub fn decode(input: impl AsRef<[u8]>) -> Result<SharedString, DecodeError> {
    decode_with(&STANDARD, input.as_ref())
}

/// Decodes unpadded, URL-safe base64. Padding is rejected.
pub fn decode_url(input: impl AsRef<[u8]>) -> Result<SharedString, DecodeError> {
    decode_with(&URL_SAFE_NO_PAD, input.as_ref())
}

fn encode_with<E: Engine>(engine: &E, input: &[u8], padding: bool) -> Result<SharedString, AllocError> {
    let len = base64::encoded_len(input.len(), padding).ok_or(AllocError::CapacityOverflow)?;
    let mut output = SharedString::try_repeat([0u8], len)?;

    match engine.encode_slice(input, &mut output) {
        Ok(written) => {
            debug_assert_eq!(written, len);
            Ok(output)
        },
        Err(_) => unreachable!("Output is sized by encoded_len."),
    }
}

fn decode_with<E: Engine>(engine: &E, input: &[u8]) -> Result<SharedString, DecodeError> {
    let estimate = base64::decoded_len_estimate(input.len());
    let mut output = SharedString::try_repeat([0u8], estimate)?;

    let written = engine.decode_slice(input, &mut output)?;
    output.truncate(written);
    Ok(output)
}
