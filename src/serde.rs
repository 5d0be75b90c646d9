//! # Serde module for CardinalityEstimator
//!
//! This module provides serde-based (serialization and deserialization) features for
//! `CardinalityEstimator`. It carries the same information as the binary snapshot:
//! the estimator is serialized as a `(precision, registers)` tuple and the bias
//! correction constant is derived again on deserialization.
//!
//! Deserialization runs the same validation as `restore`, so out of range precisions,
//! wrong register counts and unreachable register values are rejected.
//!
//! Refer to the serde documentation for more details on custom serialization and deserialization:
//! - [Serialization](https://serde.rs/impl-serialize.html)
//! - [Deserialization](https://serde.rs/impl-deserialize.html)
use serde::de::Error;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize};

use crate::estimator::CardinalityEstimator;
use crate::hash::Hash32;

impl<H: Hash32> Serialize for CardinalityEstimator<H> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut tup = serializer.serialize_tuple(2)?;
        tup.serialize_element(&self.precision)?;
        tup.serialize_element(&*self.registers)?;
        tup.end()
    }
}

impl<'de, H: Hash32> Deserialize<'de> for CardinalityEstimator<H> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (precision, registers): (u8, Vec<u8>) = Deserialize::deserialize(deserializer)?;
        CardinalityEstimator::from_snapshot_parts(precision, registers).map_err(Error::custom)
    }
}
