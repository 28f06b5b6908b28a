/// Builds a [`Dict`](crate::value::Dict) from `key => value` pairs.
///
/// ```rust
/// use siteconf::{dict, value::Value};
///
/// let dict = dict! { "which_fake_page" => "Rendering a fake page", "count" => 3 };
/// assert_eq!(dict["count"], Value::from(3));
///
/// let value = Value::from(dict! { "autolink" => true });
/// assert_eq!(value.as_dict().map(|d| d.len()), Some(1));
/// ```
#[macro_export]
macro_rules! dict {
    ($($key:expr => $value:expr),* $(,)?) => ({
        #[allow(unused_mut)]
        let mut dict: $crate::value::Dict = $crate::value::Dict::new();
        $(dict.insert($key.into(), $value.into());)*
        dict
    });
}

/// Defines a fieldless enum whose variants are named by string literals,
/// with `ALL`, `as_str()`, `FromStr`, `Display`, and `Serialize`.
macro_rules! string_enum {
    ($(#[$attr:meta])* $v:vis enum $T:ident {
        $($(#[$vattr:meta])* $V:ident => $name:literal),+ $(,)?
    }) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        #[serde(rename_all = "snake_case")]
        $v enum $T {
            $($(#[$vattr])* $V),+
        }

        impl $T {
            pub const ALL: &'static [$T] = &[$($T::$V),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($T::$V => $name),+
                }
            }
        }

        impl std::str::FromStr for $T {
            type Err = ();

            fn from_str(s: &str) -> std::result::Result<Self, ()> {
                match s {
                    $($name => Ok($T::$V),)+
                    _ => Err(()),
                }
            }
        }

        impl std::fmt::Display for $T {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    }
}

pub(crate) use string_enum;
