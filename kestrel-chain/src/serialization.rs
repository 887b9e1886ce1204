//! Serialization errors and hashing primitives shared by the relay wire
//! format.

mod error;

pub mod sha256d;

pub use error::SerializationError;

/// Implement `Display`, `Debug`, and `FromStr` for a 32-byte id newtype.
///
/// Both of kestrel's ids (block and transaction) are SHA256d digests and
/// render identically: hex in big-endian order, the reverse of the
/// internal byte order, following the u256 convention.
macro_rules! impl_id_hex {
    ($id:ident, $label:literal) => {
        impl ::std::fmt::Display for $id {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                let mut bytes = self.0;
                bytes.reverse();
                f.write_str(&::hex::encode(&bytes))
            }
        }

        impl ::std::fmt::Debug for $id {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                f.debug_tuple($label).field(&self.to_string()).finish()
            }
        }

        impl ::std::str::FromStr for $id {
            type Err = $crate::serialization::SerializationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let mut bytes = [0u8; 32];
                if ::hex::decode_to_slice(s, &mut bytes[..]).is_err() {
                    return Err($crate::serialization::SerializationError::Parse(
                        "hex decoding error",
                    ));
                }
                bytes.reverse();
                Ok($id(bytes))
            }
        }
    };
}

pub(crate) use impl_id_hex;
