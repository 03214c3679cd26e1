//! Conversion of setting strings into typed field values.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use super::BindError;

/// Parses a single value of `Self` from a setting string.
pub trait FromSetting: Sized {
    fn from_setting(key: &str, value: &str) -> Result<Self, BindError>;
}

/// A field that can receive a setting.
///
/// Scalars are replaced. Lists (`Vec<T>`, `Option<Vec<T>>`) receive one
/// element per setting, so several dotted keys accumulate into one list.
pub trait Slot {
    fn assign(&mut self, key: &str, value: &str) -> Result<(), BindError>;
}

/// A single-valued setting type.
///
/// Scalars replace the field's value, and `Option<T>` of a scalar becomes
/// `Some`. Implement it with [`scalar_slot!`](crate::scalar_slot).
pub trait Scalar: FromSetting {}

/// Implements [`Scalar`] and [`Slot`] for types that implement [`FromSetting`].
#[macro_export]
macro_rules! scalar_slot {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Scalar for $ty {}

        impl $crate::Slot for $ty {
            fn assign(
                &mut self,
                key: &str,
                value: &str,
            ) -> ::std::result::Result<(), $crate::BindError> {
                *self = <$ty as $crate::FromSetting>::from_setting(key, value)?;
                ::std::result::Result::Ok(())
            }
        }
    )+};
}

/// Declares an enum that binds from its member names.
///
/// Matching is case-sensitive. The enum can be used directly, in an `Option`,
/// or as a list element.
///
/// ```
/// propbind::setting_enum! {
///     #[derive(Debug, PartialEq)]
///     pub enum Color { Red, Blue, Green }
/// }
///
/// use propbind::FromSetting;
/// assert_eq!(Color::from_setting("color", "Blue").unwrap(), Color::Blue);
/// assert!(Color::from_setting("color", "blue").is_err());
/// ```
#[macro_export]
macro_rules! setting_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $crate::FromSetting for $name {
            fn from_setting(
                key: &str,
                value: &str,
            ) -> ::std::result::Result<Self, $crate::BindError> {
                $(
                    if value == stringify!($variant) {
                        return ::std::result::Result::Ok($name::$variant);
                    }
                )+
                ::std::result::Result::Err($crate::BindError::InvalidEnumValue {
                    key: key.to_owned(),
                    value: value.to_owned(),
                    type_name: stringify!($name),
                    variants: &[$(stringify!($variant)),+],
                })
            }
        }

        $crate::scalar_slot!($name);
    };
}

macro_rules! number_from_setting {
    ($($ty:ty),+) => {$(
        impl FromSetting for $ty {
            fn from_setting(key: &str, value: &str) -> Result<Self, BindError> {
                value.parse().map_err(|_| BindError::InvalidNumberFormat {
                    key: key.to_owned(),
                    value: value.to_owned(),
                    expected: stringify!($ty),
                })
            }
        }
    )+};
}

number_from_setting!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl FromSetting for bool {
    fn from_setting(key: &str, value: &str) -> Result<Self, BindError> {
        if value.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if value.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(BindError::InvalidBoolean {
                key: key.to_owned(),
                value: value.to_owned(),
            })
        }
    }
}

impl FromSetting for String {
    fn from_setting(_key: &str, value: &str) -> Result<Self, BindError> {
        Ok(value.to_owned())
    }
}

impl FromSetting for PathBuf {
    fn from_setting(_key: &str, value: &str) -> Result<Self, BindError> {
        Ok(PathBuf::from(value))
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

// `%b` also accepts full month names when parsing.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %b %Y",
    "%A, %b %d, %Y",
];

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| parse_date(value).and_then(|date| date.and_hms_opt(0, 0, 0)))
}

fn invalid_date(key: &str, value: &str) -> BindError {
    BindError::InvalidDateFormat {
        key: key.to_owned(),
        value: value.to_owned(),
    }
}

impl FromSetting for NaiveDateTime {
    fn from_setting(key: &str, value: &str) -> Result<Self, BindError> {
        parse_datetime(value).ok_or_else(|| invalid_date(key, value))
    }
}

impl FromSetting for NaiveDate {
    fn from_setting(key: &str, value: &str) -> Result<Self, BindError> {
        parse_date(value)
            .or_else(|| parse_datetime(value).map(|dt| dt.date()))
            .ok_or_else(|| invalid_date(key, value))
    }
}

impl FromSetting for DateTime<FixedOffset> {
    fn from_setting(key: &str, value: &str) -> Result<Self, BindError> {
        DateTime::parse_from_rfc3339(value)
            .or_else(|_| DateTime::parse_from_rfc2822(value))
            .map_err(|_| invalid_date(key, value))
    }
}

scalar_slot!(
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    bool,
    String,
    PathBuf,
    NaiveDate,
    NaiveDateTime,
    DateTime<FixedOffset>,
);

impl<T: Scalar> Slot for Option<T> {
    fn assign(&mut self, key: &str, value: &str) -> Result<(), BindError> {
        *self = Some(T::from_setting(key, value)?);
        Ok(())
    }
}

impl<T: FromSetting> Slot for Vec<T> {
    fn assign(&mut self, key: &str, value: &str) -> Result<(), BindError> {
        self.push(T::from_setting(key, value)?);
        Ok(())
    }
}

impl<T: FromSetting> Slot for Option<Vec<T>> {
    fn assign(&mut self, key: &str, value: &str) -> Result<(), BindError> {
        let list = self.get_or_insert_with(Vec::new);
        list.push(T::from_setting(key, value)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::setting_enum! {
        #[derive(Debug, Clone, Copy, PartialEq)]
        enum Size { Small, Medium, Large }
    }

    #[test]
    fn test_numbers() {
        assert_eq!(i32::from_setting("n", "1234").unwrap(), 1234);
        assert_eq!(f64::from_setting("n", "-2.5").unwrap(), -2.5);
        assert!(matches!(
            i32::from_setting("n", "12.5"),
            Err(BindError::InvalidNumberFormat { expected: "i32", .. })
        ));
        assert!(matches!(
            f64::from_setting("n", "abc"),
            Err(BindError::InvalidNumberFormat { .. })
        ));
        assert!(matches!(
            u8::from_setting("n", "300"),
            Err(BindError::InvalidNumberFormat { .. })
        ));
    }

    #[test]
    fn test_bool_is_case_insensitive() {
        assert!(bool::from_setting("b", "TRUE").unwrap());
        assert!(!bool::from_setting("b", "False").unwrap());
        assert!(matches!(
            bool::from_setting("b", "yes"),
            Err(BindError::InvalidBoolean { .. })
        ));
    }

    #[test]
    fn test_enum_is_case_sensitive() {
        assert_eq!(Size::from_setting("size", "Medium").unwrap(), Size::Medium);

        match Size::from_setting("size", "medium") {
            Err(BindError::InvalidEnumValue {
                key,
                value,
                type_name,
                variants,
            }) => {
                assert_eq!(key, "size");
                assert_eq!(value, "medium");
                assert_eq!(type_name, "Size");
                assert_eq!(variants, &["Small", "Medium", "Large"]);
            }
            other => panic!("expected InvalidEnumValue, got {other:?}"),
        }
    }

    #[test]
    fn test_dates() {
        let expected = NaiveDate::from_ymd_opt(2016, 3, 21).unwrap();
        for value in [
            "2016-03-21",
            "2016/03/21",
            "03/21/2016",
            "2016-03-21 10:30:00",
            "March 21, 2016",
            "Mar 21 2016",
            "21 Mar 2016",
            "21 March 2016",
            "Monday, March 21, 2016",
        ] {
            assert_eq!(NaiveDate::from_setting("d", value).unwrap(), expected, "{value}");
        }

        let dt = NaiveDateTime::from_setting("d", "2016-03-21T08:15:00").unwrap();
        assert_eq!(dt, expected.and_hms_opt(8, 15, 0).unwrap());

        let midnight = NaiveDateTime::from_setting("d", "2016-03-21").unwrap();
        assert_eq!(midnight, expected.and_hms_opt(0, 0, 0).unwrap());

        let zoned = DateTime::<FixedOffset>::from_setting("d", "2016-03-21T08:15:00+02:00").unwrap();
        assert_eq!(zoned.naive_local(), expected.and_hms_opt(8, 15, 0).unwrap());

        assert!(matches!(
            NaiveDate::from_setting("d", "21st of March"),
            Err(BindError::InvalidDateFormat { .. })
        ));
        assert!(matches!(
            NaiveDate::from_setting("d", "2016-02-30"),
            Err(BindError::InvalidDateFormat { .. })
        ));
    }

    #[test]
    fn test_scalar_slot_replaces() {
        let mut n = 1_i64;
        n.assign("n", "7").unwrap();
        assert_eq!(n, 7);

        let mut name: Option<String> = None;
        name.assign("name", "Ada").unwrap();
        assert_eq!(name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_optional_enum_slot() {
        let mut size: Option<Size> = None;
        size.assign("size", "Small").unwrap();
        assert_eq!(size, Some(Size::Small));

        assert!(matches!(
            size.assign("size", "Tiny"),
            Err(BindError::InvalidEnumValue { .. })
        ));
        assert_eq!(size, Some(Size::Small));
    }

    #[test]
    fn test_list_slot_appends() {
        let mut sizes: Vec<Size> = vec![Size::Small];
        sizes.assign("sizes.1", "Large").unwrap();
        assert_eq!(sizes, vec![Size::Small, Size::Large]);

        let mut numbers: Option<Vec<u32>> = None;
        numbers.assign("numbers.0", "3").unwrap();
        numbers.assign("numbers.1", "4").unwrap();
        assert_eq!(numbers, Some(vec![3, 4]));
    }

    #[test]
    fn test_failed_scalar_leaves_value() {
        let mut n = 5_u16;
        assert!(n.assign("n", "x").is_err());
        assert_eq!(n, 5);
    }
}
