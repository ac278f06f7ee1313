use crate::codec::{uint_from_le_bytes, uint_to_le_bytes};
use crate::error::{RlnError, RlnResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const EPOCH_SIZE: usize = 32;

/// Epoch numbers occupy the low 8 bytes of the 32-byte field; the rest is zero.
pub const EPOCH_INT_SIZE: usize = 8;

pub const DEFAULT_EPOCH_UNIT_SECS: u64 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Epoch(pub u64);

impl Epoch {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn prev(&self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    pub fn from_unix_secs(unix_secs: i64, unit_secs: u64) -> RlnResult<Self> {
        if unit_secs == 0 {
            return Err(RlnError::InvalidArgument("epoch unit must be positive".into()));
        }
        let secs = u64::try_from(unix_secs).map_err(|_| {
            RlnError::EncodingRange(format!("timestamp {} predates the unix epoch", unix_secs))
        })?;
        Ok(Self(secs / unit_secs))
    }

    pub fn from_datetime(at: &DateTime<Utc>, unit_secs: u64) -> RlnResult<Self> {
        Self::from_unix_secs(at.timestamp(), unit_secs)
    }

    pub fn now(unit_secs: u64) -> RlnResult<Self> {
        Self::from_datetime(&Utc::now(), unit_secs)
    }

    pub fn to_bytes(&self) -> [u8; EPOCH_SIZE] {
        let mut out = [0u8; EPOCH_SIZE];
        out[..EPOCH_INT_SIZE].copy_from_slice(&self.0.to_le_bytes());
        out
    }

    /// Reads the low 8 bytes; padding beyond them is ignored.
    pub fn from_bytes(bytes: &[u8]) -> RlnResult<Self> {
        if bytes.len() != EPOCH_SIZE {
            return Err(RlnError::InvalidArgument(format!(
                "epoch must be {} bytes, got {}",
                EPOCH_SIZE,
                bytes.len()
            )));
        }
        let value = uint_from_le_bytes(&bytes[..EPOCH_INT_SIZE])?;
        Ok(Self(value as u64))
    }

    /// Encodes an arbitrary signed integer, rejecting values that do not fit.
    pub fn encode_int(value: i128) -> RlnResult<[u8; EPOCH_SIZE]> {
        let low = uint_to_le_bytes(value, EPOCH_INT_SIZE)?;
        let mut out = [0u8; EPOCH_SIZE];
        out[..EPOCH_INT_SIZE].copy_from_slice(&low);
        Ok(out)
    }
}

impl From<u64> for Epoch {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Epoch#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn test_epoch_from_timestamp() {
        let at = Utc.timestamp_opt(1_577_836_800, 0).unwrap();
        let epoch = Epoch::from_datetime(&at, DEFAULT_EPOCH_UNIT_SECS).unwrap();
        assert_eq!(epoch, Epoch(157_783_680));

        let later = Utc.timestamp_opt(1_577_836_809, 999_000_000).unwrap();
        assert_eq!(
            Epoch::from_datetime(&later, DEFAULT_EPOCH_UNIT_SECS).unwrap(),
            Epoch(157_783_680)
        );
        assert_eq!(Epoch::from_unix_secs(1_577_836_810, 10).unwrap(), Epoch(157_783_681));
    }

    #[test]
    fn test_epoch_rejects_bad_inputs() {
        assert!(matches!(
            Epoch::from_unix_secs(100, 0),
            Err(RlnError::InvalidArgument(_))
        ));
        assert!(matches!(
            Epoch::from_unix_secs(-1, 10),
            Err(RlnError::EncodingRange(_))
        ));
        assert!(Epoch::from_bytes(&[0u8; 31]).is_err());
        assert!(Epoch::from_bytes(&[0u8; 33]).is_err());
        assert!(matches!(Epoch::encode_int(-5), Err(RlnError::EncodingRange(_))));
    }

    #[test]
    fn test_epoch_layout() {
        let bytes = Epoch(1).to_bytes();
        assert_eq!(bytes[0], 1);
        assert!(bytes[1..].iter().all(|b| *b == 0));

        let bytes = Epoch(0x0102).to_bytes();
        assert_eq!(&bytes[..2], &[0x02, 0x01]);
    }

    #[test]
    fn test_epoch_32_bit_boundary() {
        let below = Epoch(u64::from(u32::MAX));
        let above = Epoch(u64::from(u32::MAX) + 1);

        assert_eq!(&below.to_bytes()[..5], &[0xff, 0xff, 0xff, 0xff, 0x00]);
        assert_eq!(&above.to_bytes()[..5], &[0x00, 0x00, 0x00, 0x00, 0x01]);

        assert_eq!(Epoch::from_bytes(&below.to_bytes()).unwrap(), below);
        assert_eq!(Epoch::from_bytes(&above.to_bytes()).unwrap(), above);
    }

    #[test]
    fn test_epoch_ordering() {
        let e = Epoch(10);
        assert_eq!(e.next(), Epoch(11));
        assert_eq!(e.prev(), Epoch(9));
        assert_eq!(Epoch(0).prev(), Epoch(0));
        assert_eq!(format!("{}", e), "Epoch#10");
    }

    #[test]
    fn test_epoch_next_saturates() {
        assert_eq!(Epoch(u64::MAX).next(), Epoch(u64::MAX));
        assert_eq!(Epoch(u64::MAX - 1).next(), Epoch(u64::MAX));
    }

    proptest! {
        #[test]
        fn epoch_bytes_round_trip(value in any::<u64>()) {
            let bytes = Epoch(value).to_bytes();
            prop_assert_eq!(Epoch::from_bytes(&bytes).unwrap(), Epoch(value));
            prop_assert_eq!(Epoch::encode_int(i128::from(value)).unwrap(), bytes);
        }
    }
}
