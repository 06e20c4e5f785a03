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

//
// Schnorr via secp256k1
//

//! Deterministic Schnorr signatures over secp256k1 with batch verification.
//!
//! The protocol layer ([`sign`], [`verify`], [`batch_verify`]) works on raw
//! byte buffers and is generic over a [`Curve`]. The typed layer
//! ([`SecretKey`], [`PublicKey`], [`Keypair`], [`Signature`]) wraps those
//! buffers for secp256k1.
//!
//! ```
//! use bip_schnorr::*;
//! use rand::thread_rng;
//!
//! let keypair = Keypair::generate(&mut thread_rng());
//! let message = [7u8; MESSAGE_LENGTH];
//!
//! let signature = keypair.sign(&message).unwrap();
//! assert!(signature.verify(&message, &keypair.public).is_ok());
//!
//! let raw = signature.to_bytes();
//! let item = BatchItem::new(&message, &raw, keypair.public.as_bytes());
//! assert!(batch_verify(&Secp256k1, &[item, item], &mut thread_rng()));
//! ```

//Useful links:
//https://github.com/sipa/bips/blob/bip-schnorr/bip-schnorr.mediawiki
//https://medium.com/cryptoadvance/how-schnorr-signatures-may-improve-bitcoin-91655bcb4744

#[macro_use]
mod ser;

mod errors;
pub use errors::SchnorrError;
pub mod tools;
pub mod curve;
pub mod keys;
pub mod signature;
pub mod batch;

pub use crate::curve::{Curve, CurveParams, Secp256k1};

// Export everything public in schnorr.
pub use crate::signature::{
    public_key_of,
    sign,
    verify,
    Signature,
    MESSAGE_LENGTH,
    SIGNATURE_LENGTH,
};

pub use crate::batch::{
    batch_verify,
    verify_batch,
    BatchItem,
    BatchVerifier,
    CoefficientSource,
};

pub use crate::keys::*;
