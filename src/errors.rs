// Copyright 2019 Stichting Organism
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Errors which may occur when parsing keys and/or signatures to or from wire formats,
//! or when signing.

use thiserror::Error;

/// Internal errors.  Most application-level developers will likely not
/// need to pay any attention to these.
///
/// Verification never hands one of these to the caller, it answers `false`.
#[derive(Eq, PartialEq, Debug, Error, Clone)]
pub enum SchnorrError {
    /// A byte string had the wrong length for what it claims to be.
    #[error("{name} must be {length} bytes in length")]
    BytesLengthError {
        /// The name of the type or argument.
        name: &'static str,
        /// The expected length in bytes.
        length: usize,
    },

    /// Integer does not fit its fixed-size encoding.
    #[error("Integer does not fit in its encoding")]
    ScalarFormatError,

    /// Invalid point provided.
    #[error("Cannot decode curve point")]
    PointDecompressionError,

    /// The private scalar is zero or not below the group order.
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// The derived nonce reduced to zero.
    #[error("Signing failed (k' = 0)")]
    NonceZero,

    /// The verification equation wasn't satisfied
    #[error("Signature verification failed")]
    InvalidSignature,

    /// This error occurs when a set of signatures failed to verify as a batch
    #[error("Batch signature verification failed")]
    InvalidBatch,

    /// Invalid ser provided.
    #[error("Issue When Serilizing Data")]
    SerError,
}

/// Convert `SchnorrError` into `::serde::de::Error` aka `SerdeError`
///
/// We should do this with `From` but right now the orphan rules prohibit
/// `impl From<SchnorrError> for E where E: ::serde::de::Error`.
pub(crate) fn serde_error_from_signature_error<E>(err: SchnorrError) -> E
where
    E: ::serde::de::Error,
{
    match err {
        SchnorrError::PointDecompressionError => E::custom("secp256k1 point decompression failed"),
        SchnorrError::InvalidPrivateKey => E::custom("secret scalar out of range"),
        other => E::custom(other),
    }
}
