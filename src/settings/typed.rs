//! Serde view over resolved settings.
//!
//! Every setting stays a string until the target type asks for something
//! else, so `version=1.0` can fill a `String` field as well as an `f64` one.

use std::str::FromStr;

use serde::de::value::{Error as ValueError, MapDeserializer, SeqDeserializer, StrDeserializer};
use serde::de::{self, DeserializeOwned, Deserializer, IntoDeserializer, Unexpected, Visitor};
use serde::forward_to_deserialize_any;

use super::{Settings, SettingsError};

impl Settings {
    /// Deserializes the settings into `T`.
    ///
    /// Values are parsed according to the field they land in: numbers,
    /// booleans (case-insensitive) and enum variants are parsed from the
    /// string, everything else receives it unchanged. Dotted keys such as
    /// `colors.0` are gathered, in file order, into a sequence under
    /// `colors`.
    ///
    /// ## Example
    ///
    /// ```
    /// use propbind::Settings;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Server {
    ///     host: String,
    ///     port: u16,
    ///     tags: Vec<String>,
    /// }
    ///
    /// let settings = Settings::parse_str(
    ///     "host=example.com\nport=8080\ntags.0=web\ntags.1=edge",
    /// )?;
    /// let server: Server = settings.deserialize()?;
    /// assert_eq!(server.port, 8080);
    /// assert_eq!(server.tags, vec!["web", "edge"]);
    /// # Ok::<(), propbind::SettingsError>(())
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, SettingsError> {
        let nodes = group(self)?;
        let map: MapDeserializer<'_, _, ValueError> = MapDeserializer::new(nodes.into_iter());
        T::deserialize(map).map_err(SettingsError::DeserializeError)
    }
}

/// One setting, as seen by serde.
#[derive(Debug, Clone, Copy)]
struct Field<'a> {
    key: &'a str,
    value: &'a str,
}

/// A top-level entry: a plain setting or the items of a dotted list.
#[derive(Debug)]
enum Node<'a> {
    Scalar(Field<'a>),
    List(Vec<Field<'a>>),
}

fn group(settings: &Settings) -> Result<Vec<(&str, Node<'_>)>, SettingsError> {
    let mut nodes: Vec<(&str, Node<'_>)> = Vec::new();

    for (key, value) in settings.iter() {
        let field = Field { key, value };
        let name = key.split_once('.').map_or(key, |(list, _)| list);
        let dotted = name.len() != key.len();

        match nodes.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, Node::List(items))) if dotted => items.push(field),
            Some(_) => {
                return Err(SettingsError::ListConflict {
                    name: name.to_owned(),
                });
            }
            None if dotted => nodes.push((name, Node::List(vec![field]))),
            None => nodes.push((name, Node::Scalar(field))),
        }
    }

    Ok(nodes)
}

impl<'a> Field<'a> {
    fn parse<T: FromStr>(self, expected: &str) -> Result<T, ValueError> {
        self.value.parse().map_err(|_| {
            de::Error::custom(format!(
                "invalid {expected} for '{}': '{}'",
                self.key, self.value
            ))
        })
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident: $ty:ty),+ $(,)?) => {$(
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
            visitor.$visit(self.parse::<$ty>(stringify!($ty))?)
        }
    )+};
}

impl<'de, 'a> Deserializer<'de> for Field<'a> {
    type Error = ValueError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_str(self.value)
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        if self.value.eq_ignore_ascii_case("true") {
            visitor.visit_bool(true)
        } else if self.value.eq_ignore_ascii_case("false") {
            visitor.visit_bool(false)
        } else {
            Err(de::Error::invalid_value(Unexpected::Str(self.value), &visitor))
        }
    }

    deserialize_parsed! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
        deserialize_char => visit_char: char,
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        let variant: StrDeserializer<'_, ValueError> = self.value.into_deserializer();
        visitor.visit_enum(variant)
    }

    forward_to_deserialize_any! {
        str string bytes byte_buf unit unit_struct seq tuple tuple_struct
        map struct identifier ignored_any
    }
}

impl<'de, 'a> IntoDeserializer<'de, ValueError> for Field<'a> {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

macro_rules! forward_to_field {
    ($($method:ident)+) => {$(
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
            match self {
                Node::Scalar(field) => field.$method(visitor),
                Node::List(_) => self.deserialize_any(visitor),
            }
        }
    )+};
}

impl<'de, 'a> Deserializer<'de> for Node<'a> {
    type Error = ValueError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self {
            Node::Scalar(field) => field.deserialize_any(visitor),
            Node::List(items) => {
                let mut seq: SeqDeserializer<_, ValueError> = SeqDeserializer::new(items.into_iter());
                let value = visitor.visit_seq(&mut seq)?;
                seq.end()?;
                Ok(value)
            }
        }
    }

    forward_to_field! {
        deserialize_bool deserialize_i8 deserialize_i16 deserialize_i32
        deserialize_i64 deserialize_i128 deserialize_u8 deserialize_u16
        deserialize_u32 deserialize_u64 deserialize_u128 deserialize_f32
        deserialize_f64 deserialize_char
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        match self {
            Node::Scalar(field) => field.deserialize_enum(name, variants, visitor),
            Node::List(_) => self.deserialize_any(visitor),
        }
    }

    forward_to_deserialize_any! {
        str string bytes byte_buf unit unit_struct seq tuple tuple_struct
        map struct identifier ignored_any
    }
}

impl<'de, 'a> IntoDeserializer<'de, ValueError> for Node<'a> {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}
