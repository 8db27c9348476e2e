// Copyright 2025 eraflo
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

//! The `$type` discriminant carried by every engine record.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Associates a Rust record type with its engine type name.
pub trait RedType {
    /// The value written to the record's `$type` field.
    const TYPE_NAME: &'static str;
}

/// Zero-sized `$type` field.
///
/// Serializes as the record's [`RedType::TYPE_NAME`] and refuses to
/// deserialize any other value, so a record's tag always matches its shape.
pub struct TypeTag<T>(PhantomData<fn() -> T>);

impl<T> TypeTag<T> {
    /// Creates the tag.
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for TypeTag<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypeTag<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypeTag<T> {}

impl<T> PartialEq for TypeTag<T> {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl<T> Eq for TypeTag<T> {}

impl<T: RedType> fmt::Debug for TypeTag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({})", T::TYPE_NAME)
    }
}

impl<T: RedType> Serialize for TypeTag<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(T::TYPE_NAME)
    }
}

impl<'de, T: RedType> Deserialize<'de> for TypeTag<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        if name == T::TYPE_NAME {
            Ok(Self::new())
        } else {
            Err(de::Error::custom(format_args!(
                "expected $type \"{}\", found \"{}\"",
                T::TYPE_NAME,
                name
            )))
        }
    }
}

/// Implements [`RedType`] for one or more record structs.
macro_rules! red_type {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl $crate::red::tag::RedType for $ty {
                const TYPE_NAME: &'static str = $name;
            }
        )+
    };
}

pub(crate) use red_type;
