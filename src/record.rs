//! # Records
//!
//! A record is a typed shape stored as a document in one [`Collection`]. Records are built
//! from untrusted JSON through [`Record::from_value`], which checks the value against the
//! derived [`JsonSchema`] before deserializing it, so a record that exists in memory has
//! already satisfied every constraint its schema declares.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Collection, DataStoreError, JsonSchema, ValidationError, validate_value};

/// A validated document shape that lives in a single collection.
pub trait Record: JsonSchema + Serialize + DeserializeOwned + Sized {
    /// The collection holding documents of this shape.
    const COLLECTION: Collection;

    /// Validates `value` against [`JsonSchema::json_schema`] and deserializes it.
    ///
    /// # Examples
    /// ```rust
    /// use sectorguide::{Record, Sector};
    /// use serde_json::json;
    ///
    /// let sector = Sector::from_value(json!({"name": "Sales", "slug": "sales"})).unwrap();
    /// assert_eq!(sector.description, None);
    ///
    /// assert!(Sector::from_value(json!({"name": "", "slug": "sales"})).is_err());
    /// ```
    fn from_value(value: Value) -> Result<Self, ValidationError> {
        validate_value(&value, &Self::json_schema())?;
        let record: Self =
            serde_json::from_value(value).map_err(|e| ValidationError::Malformed(e.to_string()))?;
        Ok(record.normalized())
    }

    /// Hook applied after deserialization. The default leaves the record untouched.
    fn normalized(self) -> Self {
        self
    }

    /// The JSON body stored for this record.
    fn to_body(&self) -> Result<Value, DataStoreError> {
        Ok(serde_json::to_value(self)?)
    }
}
