pub trait Raw {
    fn raw(&self) -> &str;
}

pub trait Redact: Raw {
    fn redact(&self) -> String {
        let visible: String = self.raw().chars().take(4).collect();
        format!("{visible}****")
    }
}

/// Implements the common surface of a uuid-backed identifier: construction,
/// `Display`, and the diesel mapping onto the Postgres `uuid` type.
///
/// The target must be a tuple struct over `uuid::Uuid` deriving `FromSqlRow`
/// and `AsExpression` with `#[diesel(sql_type = diesel::sql_types::Uuid)]`.
#[macro_export]
macro_rules! uuid_id {
    ($name:ident) => {
        impl $name {
            pub fn random() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl diesel::serialize::ToSql<diesel::sql_types::Uuid, diesel::pg::Pg> for $name {
            fn to_sql<'b>(
                &'b self,
                out: &mut diesel::serialize::Output<'b, '_, diesel::pg::Pg>,
            ) -> diesel::serialize::Result {
                <uuid::Uuid as diesel::serialize::ToSql<diesel::sql_types::Uuid, diesel::pg::Pg>>::to_sql(
                    &self.0, out,
                )
            }
        }

        impl diesel::deserialize::FromSql<diesel::sql_types::Uuid, diesel::pg::Pg> for $name {
            fn from_sql(bytes: diesel::pg::PgValue<'_>) -> diesel::deserialize::Result<Self> {
                <uuid::Uuid as diesel::deserialize::FromSql<diesel::sql_types::Uuid, diesel::pg::Pg>>::from_sql(
                    bytes,
                )
                .map(Self)
            }
        }
    };
}
