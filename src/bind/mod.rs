//! Binding resolved settings onto the fields of a target value.
//!
//! A [`Binding`] lists the fields of a type by name, each with an accessor.
//! For every setting, the field is found by:
//!
//! 1. a case-insensitive match on the setting name;
//! 2. otherwise the name with a leading `_` (`count` binds to `_count`);
//! 3. otherwise, for a dotted name, the part before the first `.`
//!    (`colors.0` and `colors.1` both append to `colors`).
//!
//! Settings that match no field are skipped unless the binding is
//! [`strict`](Binding::strict).
//!
//! ## Example
//!
//! ```
//! use propbind::{Bind, Binding, Settings};
//!
//! propbind::setting_enum! {
//!     #[derive(Debug, Default, PartialEq)]
//!     enum Color { #[default] Red, Blue }
//! }
//!
//! #[derive(Default)]
//! struct Program {
//!     my_integer: i32,
//!     color: Color,
//!     sizes: Vec<u32>,
//! }
//!
//! impl Bind for Program {
//!     fn binding() -> Binding<Self> {
//!         Binding::<Self>::new()
//!             .field("myInteger", |p| &mut p.my_integer)
//!             .field("color", |p| &mut p.color)
//!             .field("sizes", |p| &mut p.sizes)
//!     }
//! }
//!
//! let settings = Settings::parse_str("myinteger=7\ncolor=Blue\nsizes.0=1\nsizes.1=2")?;
//! let mut program = Program::default();
//! propbind::bind::apply(&settings, &mut program)?;
//!
//! assert_eq!(program.my_integer, 7);
//! assert_eq!(program.color, Color::Blue);
//! assert_eq!(program.sizes, vec![1, 2]);
//! # Ok::<(), propbind::Error>(())
//! ```

mod error;
mod value;

pub use error::BindError;
pub use value::{FromSetting, Scalar, Slot};

use crate::Settings;

type Setter<T> = Box<dyn Fn(&mut T, &str, &str) -> Result<(), BindError>>;

struct FieldDescriptor<T> {
    name: String,
    set: Setter<T>,
}

/// Types that describe how settings bind onto them.
pub trait Bind: Sized + 'static {
    fn binding() -> Binding<Self>;
}

/// The bindable fields of `T`, in registration order.
#[must_use]
pub struct Binding<T> {
    fields: Vec<FieldDescriptor<T>>,
    strict: bool,
}

impl<T: 'static> Binding<T> {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            strict: false,
        }
    }

    /// Registers a field under `name`.
    ///
    /// The field's type decides how values are converted; see [`Slot`].
    pub fn field<V: Slot + 'static>(
        mut self,
        name: impl Into<String>,
        accessor: fn(&mut T) -> &mut V,
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            set: Box::new(move |target: &mut T, key: &str, value: &str| {
                accessor(target).assign(key, value)
            }),
        });
        self
    }

    /// Fails with [`BindError::UnmatchedSetting`] on settings without a field.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Assigns every matching setting onto `target`, in file order.
    ///
    /// Stops at the first conversion error; fields assigned before it keep
    /// their new values.
    pub fn apply(&self, settings: &Settings, target: &mut T) -> Result<(), BindError> {
        for (key, value) in settings.iter() {
            match self.find(key) {
                Some(field) => {
                    tracing::trace!(key, field = %field.name, "binding setting");
                    (field.set)(target, key, value)?;
                }
                None if self.strict => {
                    return Err(BindError::UnmatchedSetting {
                        key: key.to_owned(),
                    });
                }
                None => tracing::debug!(key, "no field for setting, skipped"),
            }
        }
        Ok(())
    }

    fn find(&self, key: &str) -> Option<&FieldDescriptor<T>> {
        self.lookup(key)
            .or_else(|| self.lookup(&format!("_{key}")))
            .or_else(|| {
                key.split_once('.')
                    .and_then(|(list, _)| self.lookup(list))
            })
    }

    fn lookup(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }
}

impl<T: 'static> Default for Binding<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field(
                "fields",
                &self.fields.iter().map(|field| &field.name).collect::<Vec<_>>(),
            )
            .field("strict", &self.strict)
            .finish()
    }
}

/// Binds `settings` onto `target` using `T`'s [`Binding`].
pub fn apply<T: Bind>(settings: &Settings, target: &mut T) -> Result<(), BindError> {
    T::binding().apply(settings, target)
}
