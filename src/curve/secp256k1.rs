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

//! secp256k1 via the RustCrypto `k256` crate.
//!
//! Public keys are 33 byte SEC1 compressed points, the challenge hash is
//! plain SHA-256 over the concatenated inputs.

use std::sync::OnceLock;

use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::ops::{LinearCombination, Reduce};
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar, U256};
use num_bigint::BigUint;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use super::{Curve, CurveParams};
use crate::errors::SchnorrError;
use crate::tools::{check_length, encode_int};

/// Byte length of scalars and coordinates.
pub const SIZE: usize = 32;

/// Byte length of a compressed SEC1 point.
pub const POINT_SIZE: usize = 33;

const P_BYTES: [u8; SIZE] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xfc, 0x2f,
];

const N_BYTES: [u8; SIZE] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b,
    0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

const B: u32 = 7;

/// The secp256k1 curve, `y² = x³ + 7` over a 256 bit prime field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Secp256k1;

impl Secp256k1 {
    /// Domain parameters, built on first use.
    pub fn parameters() -> &'static CurveParams {
        static PARAMS: OnceLock<CurveParams> = OnceLock::new();

        PARAMS.get_or_init(|| CurveParams {
            p: BigUint::from_bytes_be(&P_BYTES),
            n: BigUint::from_bytes_be(&N_BYTES),
            b: BigUint::from(B),
            size: SIZE,
            point_size: POINT_SIZE,
        })
    }

    // `k` may be a private key or nonce, so the byte copies are wiped.
    fn scalar(&self, k: &BigUint) -> Scalar {
        let reduced = k % &self.params().n;
        let mut raw = reduced.to_bytes_be();

        let mut repr = FieldBytes::default();
        repr[SIZE - raw.len()..].copy_from_slice(&raw);

        let scalar = <Scalar as Reduce<U256>>::reduce_bytes(&repr);

        raw.zeroize();
        repr.as_mut_slice().zeroize();

        scalar
    }

    fn coordinates(point: &ProjectivePoint) -> EncodedPoint {
        point.to_affine().to_encoded_point(false)
    }
}

impl Curve for Secp256k1 {
    type Point = ProjectivePoint;

    fn params(&self) -> &CurveParams {
        Self::parameters()
    }

    fn generator(&self) -> ProjectivePoint {
        ProjectivePoint::GENERATOR
    }

    fn decode_point(&self, bytes: &[u8]) -> Result<ProjectivePoint, SchnorrError> {
        check_length("public key", bytes, POINT_SIZE)?;

        let encoded =
            EncodedPoint::from_bytes(bytes).map_err(|_| SchnorrError::PointDecompressionError)?;

        if !encoded.is_compressed() {
            return Err(SchnorrError::PointDecompressionError);
        }

        Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .map(ProjectivePoint::from)
            .ok_or(SchnorrError::PointDecompressionError)
    }

    fn encode_point(&self, point: &ProjectivePoint) -> Result<Vec<u8>, SchnorrError> {
        if self.is_infinity(point) {
            return Err(SchnorrError::PointDecompressionError);
        }

        Ok(point.to_affine().to_encoded_point(true).as_bytes().to_vec())
    }

    fn point_from_affine(&self, x: &BigUint, y: &BigUint) -> Result<ProjectivePoint, SchnorrError> {
        let x = encode_int(x, SIZE)?;
        let y = encode_int(y, SIZE)?;

        let encoded = EncodedPoint::from_affine_coordinates(
            FieldBytes::from_slice(&x),
            FieldBytes::from_slice(&y),
            false,
        );

        Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .map(ProjectivePoint::from)
            .ok_or(SchnorrError::PointDecompressionError)
    }

    fn affine_x(&self, point: &ProjectivePoint) -> Option<BigUint> {
        Self::coordinates(point)
            .x()
            .map(|x| BigUint::from_bytes_be(x.as_slice()))
    }

    fn affine_y(&self, point: &ProjectivePoint) -> Option<BigUint> {
        Self::coordinates(point)
            .y()
            .map(|y| BigUint::from_bytes_be(y.as_slice()))
    }

    fn add(&self, a: &ProjectivePoint, b: &ProjectivePoint) -> ProjectivePoint {
        *a + *b
    }

    fn mul(&self, point: &ProjectivePoint, k: &BigUint) -> ProjectivePoint {
        *point * self.scalar(k)
    }

    fn mul_add(
        &self,
        a: &ProjectivePoint,
        x: &BigUint,
        b: &ProjectivePoint,
        y: &BigUint,
    ) -> ProjectivePoint {
        ProjectivePoint::lincomb(a, &self.scalar(x), b, &self.scalar(y))
    }

    fn is_infinity(&self, point: &ProjectivePoint) -> bool {
        bool::from(point.is_identity())
    }

    fn challenge_hash(&self, parts: &[&[u8]]) -> BigUint {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }

        BigUint::from_bytes_be(hasher.finalize().as_slice()) % &self.params().n
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use num_traits::{One, Zero};

    const G_COMPRESSED: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    #[test]
    fn generator_encoding() {
        let curve = Secp256k1;
        let g = curve.encode_point(&curve.generator()).unwrap();
        assert_eq!(hex::encode(&g), G_COMPRESSED);

        let decoded = curve.decode_point(&g).unwrap();
        assert_eq!(decoded, curve.generator());
    }

    #[test]
    fn params_are_consistent() {
        let params = Secp256k1::parameters();
        assert!(params.has_simple_sqrt());
        assert!(params.n < params.p);
        assert_eq!(params.b, BigUint::from(7u32));

        // n * G is the identity
        let curve = Secp256k1;
        let order_minus_one = &params.n - 1u32;
        let almost = curve.mul(&curve.generator(), &order_minus_one);
        assert!(curve.is_infinity(&curve.add(&almost, &curve.generator())));
    }

    #[test]
    fn decode_point_rejects_garbage() {
        let curve = Secp256k1;
        let mut g = hex::decode(G_COMPRESSED).unwrap();

        assert!(curve.decode_point(&g[..32]).is_err());

        // unknown tag
        g[0] = 0x05;
        assert_eq!(
            curve.decode_point(&g),
            Err(SchnorrError::PointDecompressionError)
        );

        // x beyond the field
        let mut big = vec![0x02u8];
        big.extend_from_slice(&[0xffu8; 32]);
        assert!(curve.decode_point(&big).is_err());
    }

    #[test]
    fn encode_point_rejects_infinity() {
        let curve = Secp256k1;
        assert!(curve
            .encode_point(&curve.mul(&curve.generator(), &BigUint::zero()))
            .is_err());
    }

    #[test]
    fn affine_round_trip_and_sqrt() {
        let curve = Secp256k1;
        let params = curve.params();
        let point = curve.mul(&curve.generator(), &BigUint::from(12345u32));

        let x = curve.affine_x(&point).unwrap();
        let y = curve.affine_y(&point).unwrap();
        assert_eq!(curve.point_from_affine(&x, &y).unwrap(), point);

        // y² = x³ + 7
        let c = (x.modpow(&BigUint::from(3u32), &params.p) + &params.b) % &params.p;
        let root = curve.sqrt(&c).unwrap();
        assert_eq!((&root * &root) % &params.p, c);
        assert!(root == y || root == &params.p - &y);

        // the other sign is also on the curve, a nudged y is not
        assert!(curve.point_from_affine(&x, &(&params.p - &y)).is_ok());
        assert!(curve.point_from_affine(&x, &((&y + 1u32) % &params.p)).is_err());

        assert!(curve.affine_x(&curve.mul(&point, &BigUint::zero())).is_none());
    }

    #[test]
    fn mul_add_matches_add_of_muls() {
        let curve = Secp256k1;
        let g = curve.generator();
        let h = curve.mul(&g, &BigUint::from(99u32));
        let x = BigUint::from(31337u32);
        let y = &curve.params().n - BigUint::from(5u32);

        let fast = curve.mul_add(&g, &x, &h, &y);
        let slow = curve.add(&curve.mul(&g, &x), &curve.mul(&h, &y));
        assert_eq!(fast, slow);
    }

    #[test]
    fn scalar_conversion_handles_every_width() {
        let curve = Secp256k1;
        let g = curve.generator();
        let n = &curve.params().n;

        // one byte, a leading zero byte, and full width
        let small = BigUint::from(7u32);
        let mut short = [0xabu8; SIZE];
        short[0] = 0;
        let short = BigUint::from_bytes_be(&short);
        let wide = n - 1u32;

        for k in [small, short, wide].iter() {
            let fast = curve.mul(&g, k);
            let via_affine = curve
                .point_from_affine(&curve.affine_x(&fast).unwrap(), &curve.affine_y(&fast).unwrap())
                .unwrap();
            assert_eq!(fast, via_affine);
            assert_eq!(curve.add(&fast, &curve.mul(&g, &(n - k))), curve.mul(&g, &BigUint::zero()));
        }
    }

    #[test]
    fn mul_reduces_scalars() {
        let curve = Secp256k1;
        let g = curve.generator();
        let n_plus_one = &curve.params().n + BigUint::one();
        assert_eq!(curve.mul(&g, &n_plus_one), g);
    }

    #[test]
    fn challenge_hash_is_sha256_mod_n() {
        let curve = Secp256k1;
        let joined = curve.challenge_hash(&[b"hello ", b"world"]);
        let digest = Sha256::digest(b"hello world");
        assert_eq!(
            joined,
            BigUint::from_bytes_be(digest.as_slice()) % &curve.params().n
        );
        assert!(joined < curve.params().n);
    }
}
