//! Values that can be bound to a PostgreSQL query built at runtime.

use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

/// A bind parameter. Statements cast each placeholder to the column type (`$n::date`),
/// so textual values only need to be in the column's input format.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null,
    I64(i64),
    Text(String),
}

impl From<i64> for PgBindValue {
    fn from(n: i64) -> Self {
        PgBindValue::I64(n)
    }
}

impl From<&str> for PgBindValue {
    fn from(s: &str) -> Self {
        PgBindValue::Text(s.to_string())
    }
}

impl From<String> for PgBindValue {
    fn from(s: String) -> Self {
        PgBindValue::Text(s)
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            PgBindValue::Null => <Option<String> as Encode<Postgres>>::encode_by_ref(&None, buf)?,
            PgBindValue::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::Text(s) => <&str as Encode<Postgres>>::encode_by_ref(&s.as_str(), buf)?,
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        match self {
            PgBindValue::I64(_) => Some(<i64 as sqlx::Type<Postgres>>::type_info()),
            PgBindValue::Null | PgBindValue::Text(_) => Some(<String as sqlx::Type<Postgres>>::type_info()),
        }
    }
}

impl sqlx::Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_declared_as_int8() {
        let v = PgBindValue::from(7_i64);
        assert_eq!(v.produces(), Some(<i64 as sqlx::Type<Postgres>>::type_info()));
    }

    #[test]
    fn text_and_null_are_declared_as_text() {
        let text = <String as sqlx::Type<Postgres>>::type_info();
        assert_eq!(PgBindValue::from("Linux").produces(), Some(text.clone()));
        assert_eq!(PgBindValue::Null.produces(), Some(text));
    }
}
