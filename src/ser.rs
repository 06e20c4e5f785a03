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

//! Serde Support
//!
//! Keys and signatures serialize as plain byte strings and are validated
//! by their `from_bytes` on the way back in.

macro_rules! serde_boilerplate { ($t:ty) => {
    impl ::serde::Serialize for $t {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: ::serde::Serializer {
            serializer.serialize_bytes(&self.to_bytes()[..])
        }
    }

    impl<'d> ::serde::Deserialize<'d> for $t {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error> where D: ::serde::Deserializer<'d> {
            struct MyVisitor;

            impl<'d> ::serde::de::Visitor<'d> for MyVisitor {
                type Value = $t;

                fn expecting(&self, formatter: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    formatter.write_str(<$t>::DESCRIPTION)
                }

                fn visit_bytes<E>(self, bytes: &[u8]) -> Result<$t, E> where E: ::serde::de::Error {
                    <$t>::from_bytes(bytes).map_err(crate::errors::serde_error_from_signature_error)
                }
            }
            deserializer.deserialize_bytes(MyVisitor)
        }
    }
} } // macro_rules! serde_boilerplate


#[cfg(test)]
mod test {
    use bincode::{deserialize, serialize, serialized_size};

    use crate::*;

    static SIGNATURE_HEX: &str = "2a298dacae57395a15d0795ddbfd1dcb564da82b0f269bc70a74f8220429ba1d1e51a22ccec35599b8f266912281f8365ffc2d035a230434a1a64dc59f7013fd";

    static PUBLIC_KEY_HEX: &str = "02dff1d77f2a671c5f36183726db2341be58feae1da2deced843240f7b502ba659";

    static SECRET_KEY_HEX: &str = "b7e151628aed2a6abf7158809cf4f3c762e7160f38b4da56a784d9045190cfef";

    fn signature() -> Signature {
        Signature::from_bytes(&hex::decode(SIGNATURE_HEX).unwrap()).unwrap()
    }

    fn public_key() -> PublicKey {
        PublicKey::from_bytes(&hex::decode(PUBLIC_KEY_HEX).unwrap()).unwrap()
    }

    #[test]
    fn serialize_deserialize_signature() {
        let signature = signature();
        let encoded_signature: Vec<u8> = serialize(&signature).unwrap();
        let decoded_signature: Signature = deserialize(&encoded_signature).unwrap();

        assert_eq!(signature, decoded_signature);
    }

    #[test]
    fn serialize_deserialize_public_key() {
        let public_key = public_key();
        let encoded_public_key: Vec<u8> = serialize(&public_key).unwrap();
        let decoded_public_key: PublicKey = deserialize(&encoded_public_key).unwrap();

        assert_eq!(public_key, decoded_public_key);
    }

    #[test]
    fn serialize_deserialize_secret_key() {
        let secret_key = SecretKey::from_bytes(&hex::decode(SECRET_KEY_HEX).unwrap()).unwrap();
        let encoded_secret_key: Vec<u8> = serialize(&secret_key).unwrap();
        let decoded_secret_key: SecretKey = deserialize(&encoded_secret_key).unwrap();

        assert_eq!(secret_key, decoded_secret_key);
        assert_eq!(PublicKey::from_secret(&decoded_secret_key), public_key());
    }

    #[test]
    fn deserialize_rejects_invalid_keys() {
        let zero: Vec<u8> = serialize(&serde_bytes_of(&[0u8; SECRET_KEY_LENGTH])).unwrap();
        assert!(deserialize::<SecretKey>(&zero).is_err());

        let mut off_curve = [0xffu8; PUBLIC_KEY_LENGTH];
        off_curve[0] = 0x02;
        let off_curve: Vec<u8> = serialize(&serde_bytes_of(&off_curve)).unwrap();
        assert!(deserialize::<PublicKey>(&off_curve).is_err());

        let short: Vec<u8> = serialize(&serde_bytes_of(&[0u8; 63])).unwrap();
        assert!(deserialize::<Signature>(&short).is_err());
    }

    #[test]
    fn serialize_public_key_size() {
        assert_eq!(serialized_size(&public_key()).unwrap() as usize, 33 + 8); // Size specific to bincode==1
    }

    #[test]
    fn serialize_signature_size() {
        assert_eq!(serialized_size(&signature()).unwrap() as usize, 64 + 8); // Size specific to bincode==1
    }

    /// Bytes serialized the same way the boilerplate does it.
    struct RawBytes<'a>(&'a [u8]);

    impl<'a> serde::Serialize for RawBytes<'a> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_bytes(self.0)
        }
    }

    fn serde_bytes_of(bytes: &[u8]) -> RawBytes<'_> {
        RawBytes(bytes)
    }
}
