//! Data-lake naming constants.
//!
//! Buckets, catalogs, schemas and tables are closed sets of named string
//! constants. Formatting a constant yields its value (`Schema::Bronze` prints
//! `bronze`), so they compose directly into object keys.

use chrono::NaiveDate;
use std::fmt;

macro_rules! lake_name {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// The underlying string value.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }
    };
}

lake_name! {
    /// Object storage bucket.
    Bucket {
        LakeSmartbetting => "lake-smartbetting",
    }
}

lake_name! {
    /// Data catalog (top-level namespace).
    Catalog {
        Nba => "nba",
    }
}

lake_name! {
    /// Data quality tier.
    Schema {
        /// Raw source data with minimal transformation.
        Bronze => "bronze",
    }
}

lake_name! {
    /// Entity table.
    Table {
        Teams => "teams",
    }
}

/// Object key for one table snapshot on one calendar day.
///
/// Renders as `{catalog}/{schema}/{table}/{table}_{YYYY-MM-DD}.json`. The key
/// carries no time component, so a rerun on the same day overwrites the
/// earlier object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationKey {
    pub catalog: Catalog,
    pub schema: Schema,
    pub table: Table,
    pub date: NaiveDate,
}

impl DestinationKey {
    pub fn new(catalog: Catalog, schema: Schema, table: Table, date: NaiveDate) -> Self {
        Self {
            catalog,
            schema,
            table,
            date,
        }
    }
}

impl fmt::Display for DestinationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}_{}.json",
            self.catalog,
            self.schema,
            self.table,
            self.table,
            self.date.format("%Y-%m-%d")
        )
    }
}
