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

//! Batch verification.
//!
//! A batch of `u` signatures is accepted iff
//!
//! ```text
//! (s1 + a2*s2 + ... + au*su) * G == R1 + e1*P1 + a2*(R2 + e2*P2) + ... + au*(Ru + eu*Pu)
//! ```
//!
//! where `a2..au` are fresh random scalars in `[1, n-1]`. The nonce points
//! `Ri` are recovered from `x(Ri)` through the curve equation, which is
//! why this only works for curves with a `p ≡ 3 (mod 4)` square root.

use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use tracing::{debug, trace};

use crate::curve::{Curve, Secp256k1};
use crate::errors::SchnorrError;
use crate::keys::PublicKey;
use crate::signature::Signature;
use crate::tools::decode_int;

/// One `(message, signature, public key)` triple of a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchItem<'a> {
    /// The `size` byte pre-hashed message.
    pub message: &'a [u8],
    /// The `2*size` byte signature.
    pub signature: &'a [u8],
    /// The encoded public key.
    pub key: &'a [u8],
}

impl<'a> BatchItem<'a> {
    /// Bundle a triple.
    pub fn new(message: &'a [u8], signature: &'a [u8], key: &'a [u8]) -> BatchItem<'a> {
        BatchItem {
            message,
            signature,
            key,
        }
    }
}

/// Where the batch coefficients come from.
///
/// Every call must return an independent, uniformly distributed value in
/// `[1, n-1]` that nobody who could have produced the signatures can
/// predict.
pub trait CoefficientSource {
    /// A scalar in `[1, n-1]`.
    fn random_scalar(&mut self, n: &BigUint) -> BigUint;
}

impl<R: RngCore + CryptoRng + ?Sized> CoefficientSource for R {
    fn random_scalar(&mut self, n: &BigUint) -> BigUint {
        loop {
            let a = self.gen_biguint_below(n);
            if !a.is_zero() {
                return a;
            }
        }
    }
}

struct Prepared<P> {
    public: P,
    nonce: P,
    s: BigUint,
    e: BigUint,
}

/// Verify a batch of signatures at once.
///
/// An empty batch is accepted. A batch holding a single item gives the
/// same answer as [`crate::signature::verify`]. Every malformed input
/// and every failed check answers `false`.
pub fn batch_verify<C, S>(curve: &C, batch: &[BatchItem<'_>], source: &mut S) -> bool
where
    C: Curve,
    S: CoefficientSource + ?Sized,
{
    let size = curve.params().size;

    for (index, item) in batch.iter().enumerate() {
        if item.message.len() != size || item.signature.len() != size * 2 {
            debug!(index, "malformed batch item");
            return false;
        }
    }

    if batch.is_empty() {
        return true;
    }

    match batch_verify_checked(curve, batch, source) {
        Ok(()) => true,
        Err(err) => {
            debug!(%err, len = batch.len(), "schnorr batch rejected");
            false
        }
    }
}

fn prepare<C: Curve>(curve: &C, item: &BatchItem<'_>) -> Result<Prepared<C::Point>, SchnorrError> {
    let params = curve.params();
    let size = params.size;
    let p = &params.p;

    let public = curve.decode_point(item.key)?;

    let (r_raw, s_raw) = item.signature.split_at(size);
    let r = decode_int(r_raw, size)?;
    let s = decode_int(s_raw, size)?;

    if &r >= p || s >= params.n {
        return Err(SchnorrError::ScalarFormatError);
    }

    let e = curve.challenge_hash(&[r_raw, item.key, item.message]);

    // c = r^3 + b, y = c^((p+1)/4)
    let c = (r.modpow(&BigUint::from(3u32), p) + &params.b) % p;
    let y = curve.sqrt(&c).ok_or(SchnorrError::PointDecompressionError)?;

    if (&y * &y) % p != c {
        return Err(SchnorrError::PointDecompressionError);
    }

    let nonce = curve.point_from_affine(&r, &y)?;

    Ok(Prepared {
        public,
        nonce,
        s,
        e,
    })
}

fn batch_verify_checked<C, S>(
    curve: &C,
    batch: &[BatchItem<'_>],
    source: &mut S,
) -> Result<(), SchnorrError>
where
    C: Curve,
    S: CoefficientSource + ?Sized,
{
    let n = &curve.params().n;

    let prepared = batch
        .iter()
        .map(|item| prepare(curve, item))
        .collect::<Result<Vec<_>, _>>()?;

    let (first, rest) = match prepared.split_first() {
        Some(split) => split,
        None => return Ok(()),
    };

    let mut lhs = first.s.clone();
    let mut rhs = curve.add(&first.nonce, &curve.mul(&first.public, &first.e));

    for item in rest {
        let a = source.random_scalar(n);

        if a.is_zero() || &a >= n {
            debug!("coefficient source returned an out of range scalar");
            return Err(SchnorrError::InvalidBatch);
        }

        lhs = (lhs + &a * &item.s) % n;

        let ae = (&a * &item.e) % n;
        rhs = curve.add(&rhs, &curve.mul_add(&item.nonce, &a, &item.public, &ae));
    }

    trace!(len = batch.len(), "checking combined batch equation");

    if curve.mul(&curve.generator(), &lhs) == rhs {
        Ok(())
    } else {
        Err(SchnorrError::InvalidBatch)
    }
}

/// Verify a batch of `signatures` on `messages` with their respective `public_keys`.
///
/// # Inputs
///
/// * `messages` is a slice of 32 byte pre-hashed messages.
/// * `signatures` is a slice of `Signature`s.
/// * `public_keys` is a slice of `PublicKey`s.
/// * `csprng` is an implementation of `Rng + CryptoRng`, such as `rand::ThreadRng`.
///
/// # Returns
///
/// `Ok(())` if every signature is valid. Slices of different lengths give
/// `InvalidBatch`, the same as a bad signature.
pub fn verify_batch<R>(
    messages: &[&[u8]],
    signatures: &[Signature],
    public_keys: &[PublicKey],
    csprng: &mut R,
) -> Result<(), SchnorrError>
where
    R: RngCore + CryptoRng,
{
    if messages.len() != signatures.len() || signatures.len() != public_keys.len() {
        return Err(SchnorrError::InvalidBatch);
    }

    let raw: Vec<[u8; 64]> = signatures.iter().map(Signature::to_bytes).collect();

    let batch: Vec<BatchItem<'_>> = messages
        .iter()
        .zip(raw.iter())
        .zip(public_keys.iter())
        .map(|((message, signature), key)| BatchItem::new(message, &signature[..], key.as_bytes()))
        .collect();

    if batch_verify(&Secp256k1, &batch, csprng) {
        Ok(())
    } else {
        Err(SchnorrError::InvalidBatch)
    }
}

/// Collects owned signatures and checks them together.
pub struct BatchVerifier<R> {
    rng: R,
    entries: Vec<(Vec<u8>, Signature, PublicKey)>,
}

impl<R: RngCore + CryptoRng> BatchVerifier<R> {
    /// An empty batch drawing coefficients from `rng`.
    pub fn new(rng: R) -> BatchVerifier<R> {
        BatchVerifier {
            rng,
            entries: Vec::new(),
        }
    }

    /// Queue a signature for verification.
    pub fn queue(&mut self, message: &[u8], signature: Signature, public_key: PublicKey) {
        self.entries.push((message.to_vec(), signature, public_key));
    }

    /// Number of queued signatures.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check every queued signature, consuming the batch.
    pub fn verify(mut self) -> Result<(), SchnorrError> {
        let raw: Vec<[u8; 64]> = self.entries.iter().map(|(_, sig, _)| sig.to_bytes()).collect();

        let batch: Vec<BatchItem<'_>> = self
            .entries
            .iter()
            .zip(raw.iter())
            .map(|((message, _, key), signature)| BatchItem::new(message, &signature[..], key.as_bytes()))
            .collect();

        if batch_verify(&Secp256k1, &batch, &mut self.rng) {
            Ok(())
        } else {
            Err(SchnorrError::InvalidBatch)
        }
    }
}
