use serde::de::{Error as DeError, Unexpected};
use std::{
    fmt::{Debug, Display},
    hash::Hash,
    marker::PhantomData,
    num::NonZeroU64,
    str::FromStr,
};
use thiserror::Error;

use self::marker::Marker;

pub mod marker;

/// Numeric identifier of a row, typed by the table it belongs to.
///
/// The value is always positive and fits in a Postgres `bigint`,
/// so it never exceeds [`Id::MAX`]. It is serialized as a string in
/// JSON so that JavaScript clients do not lose precision.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Id<T: Marker> {
    value: NonZeroU64,
    phantom: PhantomData<T>,
}

pub type PostId = Id<marker::PostMarker>;
pub type NotificationId = Id<marker::NotificationMarker>;

impl<T: Marker> Id<T> {
    /// Largest id a `bigint` column can hold.
    pub const MAX: u64 = i64::MAX.unsigned_abs();

    /// # Panics
    ///
    /// It will panic if the value is 0 or above [`Id::MAX`].
    #[must_use]
    #[track_caller]
    pub const fn new(n: u64) -> Self {
        if let Some(id) = Self::new_checked(n) {
            id
        } else {
            panic!("value is zero or out of range")
        }
    }

    #[must_use]
    pub const fn new_checked(n: u64) -> Option<Self> {
        if n > Self::MAX {
            return None;
        }

        if let Some(value) = NonZeroU64::new(n) {
            Some(Self {
                value,
                phantom: PhantomData,
            })
        } else {
            None
        }
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.value.get()
    }

    #[allow(clippy::cast_possible_wrap)]
    const fn as_i64(self) -> i64 {
        // never above `Id::MAX`
        self.value.get() as i64
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("ids must be positive integers no greater than {}", i64::MAX)]
pub struct ParseIdError;

impl<T: Marker> FromStr for Id<T> {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(Self::new_checked)
            .ok_or(ParseIdError)
    }
}

impl<T: Marker> Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Id::<{}>({})", T::name(), self.value.get())
    }
}

impl<T: Marker> Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.value.get(), f)
    }
}

impl<T: Marker> Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.value.get());
    }
}

impl<'de, T: Marker> serde::Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Visitor<T: Marker>(PhantomData<T>);

        impl<'de, T: Marker> serde::de::Visitor<'de> for Visitor<T> {
            type Value = Id<T>;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a positive integer id")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                let value = u64::try_from(v)
                    .map_err(|_| DeError::invalid_value(Unexpected::Signed(v), &"a valid id"))?;

                self.visit_u64(value)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Id::<T>::new_checked(v)
                    .ok_or_else(|| DeError::invalid_value(Unexpected::Unsigned(v), &"a valid id"))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                let value = v.parse().map_err(|_| {
                    DeError::invalid_value(Unexpected::Str(v), &"nonzero u64 string")
                })?;

                self.visit_u64(value)
            }
        }

        deserializer.deserialize_any(Visitor(PhantomData))
    }
}

impl<T: Marker> serde::Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&self.value.get())
    }
}

impl<'q, T: Marker + Copy> sqlx::Encode<'q, sqlx::Postgres> for Id<T> {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::database::HasArguments<'q>>::ArgumentBuffer,
    ) -> sqlx::encode::IsNull {
        <i64 as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_i64(), buf)
    }
}

impl<'r, T: Marker> sqlx::Decode<'r, sqlx::Postgres> for Id<T> {
    fn decode(
        value: <sqlx::Postgres as sqlx::database::HasValueRef<'r>>::ValueRef,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        #[derive(Debug, Error)]
        #[error("all ids must be positive")]
        struct NonPositiveIdError;

        let value = <i64 as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        u64::try_from(value)
            .ok()
            .and_then(Self::new_checked)
            .ok_or_else(|| NonPositiveIdError.into())
    }
}

impl<T: Marker> sqlx::Type<sqlx::Postgres> for Id<T> {
    fn type_info() -> <sqlx::Postgres as sqlx::Database>::TypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

impl<T: Marker> sqlx::postgres::PgHasArrayType for Id<T> {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        <i64 as sqlx::postgres::PgHasArrayType>::array_type_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::id::marker::{AnyMarker, PostMarker};
    use serde_test::Token;
    use static_assertions::{assert_eq_size, assert_impl_all};

    assert_eq_size!(Id<AnyMarker>, u64);
    assert_impl_all!(Id<AnyMarker>:
        Debug, Display, Clone, Copy, Send, Sync, Hash, sqlx::Decode<'static, sqlx::Postgres>,
        sqlx::Encode<'static, sqlx::Postgres>, sqlx::Type<sqlx::Postgres>
    );

    #[test]
    #[should_panic = "value is zero"]
    fn test_new_with_zero() {
        _ = Id::<AnyMarker>::new(0);
    }

    #[test]
    fn test_initializers() {
        assert!(Id::<AnyMarker>::new_checked(0).is_none());
        assert_eq!(Some(1), Id::<AnyMarker>::new_checked(1).map(Id::get));
        assert_eq!(
            Some(Id::<AnyMarker>::MAX),
            Id::<AnyMarker>::new_checked(Id::<AnyMarker>::MAX).map(Id::get)
        );
        assert!(Id::<AnyMarker>::new_checked(Id::<AnyMarker>::MAX + 1).is_none());
        assert!(Id::<AnyMarker>::new_checked(u64::MAX).is_none());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Ok(PostId::new(789)), " 789".parse::<PostId>());
        assert_eq!(Err(ParseIdError), "0".parse::<PostId>());
        assert_eq!(Err(ParseIdError), "-4".parse::<PostId>());
        assert_eq!(Err(ParseIdError), "abc".parse::<PostId>());
        assert_eq!(
            Ok(PostId::new(9_223_372_036_854_775_807)),
            "9223372036854775807".parse::<PostId>()
        );
        assert_eq!(Err(ParseIdError), "9223372036854775808".parse::<PostId>());
    }

    #[test]
    fn test_fmt_impls() {
        assert_eq!("1234567890", Id::<AnyMarker>::new(1_234_567_890).to_string());
        assert_eq!(
            "Id::<PostMarker>(789)",
            format!("{:?}", Id::<PostMarker>::new(789))
        );
    }

    #[test]
    fn test_serde_impl() {
        let id = Id::<AnyMarker>::new(1_234_567_890);
        serde_test::assert_de_tokens(&id, &[Token::U64(1_234_567_890)]);
        serde_test::assert_de_tokens(&id, &[Token::Str("1234567890")]);
        serde_test::assert_de_tokens(&id, &[Token::I64(1_234_567_890)]);
        serde_test::assert_ser_tokens(&id, &[Token::Str("1234567890")]);

        serde_test::assert_de_tokens_error::<Id<AnyMarker>>(
            &[Token::U64(9_223_372_036_854_775_808)],
            "invalid value: integer `9223372036854775808`, expected a valid id",
        );
    }
}
