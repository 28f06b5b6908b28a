use std::{fmt, io};
use std::panic::Location;
use std::error::Error as StdError;
use std::sync::Arc;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub struct Error {
    detail: Vec<Box<dyn ErrorDetail>>,
    prev: Option<Box<Error>>,
    _location: &'static Location<'static>,
}

pub trait ErrorDetail: fmt::Display + fmt::Debug + Send + Sync {
    fn context(&self) -> Vec<(Option<String>, String)> { vec![] }

    fn as_config_error(&self) -> Option<&ConfigError> { None }
}

impl Error {
    /// Returns the first [`ConfigError`] in `self` or any error it chains.
    pub fn config_error(&self) -> Option<&ConfigError> {
        self.detail.iter()
            .find_map(|detail| detail.as_config_error())
            .or_else(|| self.prev.as_ref().and_then(|prev| prev.config_error()))
    }

    pub fn chain(self, mut other: Error) -> Self {
        #[inline]
        fn _chain(error: Error, behind: &mut Error) {
            if let Some(prev) = behind.prev.as_mut() {
                _chain(error, prev);
            } else {
                behind.prev = Some(Box::new(error));
            }
        }

        _chain(self, &mut other);
        other
    }
}

impl ErrorDetail for &(dyn StdError + Send + Sync) {
    fn context(&self) -> Vec<(Option<String>, String)> {
        let mut ctxt = vec![];
        let mut error = self.source();
        while let Some(e) = error {
            ctxt.push((None, e.to_string()));
            error = e.source();
        }

        ctxt
    }
}

macro_rules! impl_error_detail_with_std_error {
    ($T:ty) => {
        impl $crate::error::ErrorDetail for $T {
            fn context(&self) -> Vec<(Option<String>, String)> {
                let error: &(dyn std::error::Error + Send + Sync) = self;
                error.context()
            }
        }
    }
}

impl_error_detail_with_std_error!(io::Error);
impl_error_detail_with_std_error!(toml::de::Error);
impl_error_detail_with_std_error!(serde_json::Error);

impl ErrorDetail for String { }
impl ErrorDetail for &str { }

impl<T: ErrorDetail + 'static> From<T> for Error {
    #[track_caller]
    fn from(detail: T) -> Self {
        Error {
            prev: None,
            detail: vec![Box::new(detail)],
            _location: std::panic::Location::caller(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[derive(Copy, Clone)] struct Indent(usize);

        impl fmt::Display for Indent {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for _ in 0..(self.0 * 4) { write!(f, " ")? }
                Ok(())
            }
        }

        struct NestedError<'a>(Indent, &'a Error);

        impl fmt::Display for NestedError<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let NestedError(indent, e) = self;

                for detail in &e.detail {
                    let indent_line = format!("\n{indent}");

                    writeln!(f, "{indent}{}", format!("{:#}", detail).replace('\n', &indent_line))?;
                    if let Some(prev) = &e.prev {
                        fmt::Display::fmt(&NestedError(Indent(indent.0 + 1), prev), f)?;
                    }

                    for (key, value) in detail.context() {
                        let value = value.to_string().replace('\n', &indent_line);
                        if let Some(key) = key {
                            writeln!(f, "{indent}{key}: {value}")?;
                        } else {
                            writeln!(f, "{indent}{value}")?;
                        }
                    }

                    if std::env::var_os("RUST_BACKTRACE").is_some() {
                        writeln!(f, "{indent}[{}]", e._location)?;
                    }
                }

                Ok(())
            }
        }

        fmt::Display::fmt(&NestedError(Indent(0), self), f)
    }
}

#[derive(Debug)]
pub struct MakeshiftError {
    pub message: String,
    pub parameters: Vec<(Option<String>, String)>,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($msg:expr, $($rest:tt)*) => (
        $crate::error::Error::from($crate::error::MakeshiftError {
            message: $msg.to_string(),
            parameters: {
                #[allow(unused_mut)]
                let mut v: Vec<(Option<String>, String)> = Vec::new();
                $crate::error!(@param v $($rest)*);
                v
            },
        })
    );

    ($msg:expr) => ( error!($msg,) );

    (@param $v:ident if $cond:expr => $value:expr $(, $rest:tt)*) => {
        if $cond {
            $v.push((None, $value.to_string()));
        }

        error!(@param $v $($rest)*);
    };

    (@param $v:ident if $cond:expr => $key:expr => $value:expr, $($rest:tt)*) => {
        $crate::error!(@param $v if $cond => $key => $value);
        $crate::error!(@param $v $($rest)*);
    };

    (@param $v:ident if $cond:expr => $key:expr => $value:expr) => {
        if $cond {
            $crate::error!(@param $v $key => $value);
        }
    };

    (@param $v:ident $key:expr => $value:expr, $($rest:tt)*) => {
        $crate::error!(@param $v $key => $value);
        $crate::error!(@param $v $($rest)*);
    };

    (@param $v:ident $key:expr => $value:expr) => {
        $v.push((Some($key.to_string()), $value.to_string()));
    };

    (@param $v:ident $value:expr, $($rest:tt)*) => {
        $crate::error!(@param $v $value);
        $crate::error!(@param $v $($rest)*);
    };

    (@param $v:ident $value:expr) => {
        $v.push((None, $value.to_string()));
    };

    (@param $v:ident $(,)?) => { };
}

impl fmt::Display for MakeshiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl ErrorDetail for MakeshiftError {
    fn context(&self) -> Vec<(Option<String>, String)> {
        self.parameters.clone()
    }
}

pub trait Chainable<T> {
    fn chain(self, other: impl Into<Error>) -> Result<T>;

    fn chain_with<F, E>(self, f: F) -> Result<T>
        where F: FnOnce() -> E, E: Into<Error>;
}

impl<T, E: Into<Error>> Chainable<T> for Result<T, E> {
    #[track_caller]
    fn chain(self, other: impl Into<Error>) -> Result<T> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().chain(other.into()))
        }
    }

    fn chain_with<F, Err>(self, f: F) -> Result<T>
        where F: FnOnce() -> Err, Err: Into<Error>,
     {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().chain(f().into()))
        }
    }
}

/// A malformed or mistyped configuration statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The value's type is incompatible with the option's expected type.
    TypeMismatch {
        option: Arc<str>,
        expected: &'static str,
        found: &'static str,
    },
    /// The value has the right type but is not acceptable for the option.
    InvalidValue {
        option: Arc<str>,
        value: String,
        reason: &'static str,
    },
    /// A key inside a record-like option (`markdown`, deploy options) that
    /// the record doesn't define.
    UnknownOption {
        option: Arc<str>,
        within: &'static str,
    },
    UnknownExtension(Arc<str>),
    UnknownEnvironment(Arc<str>),
    UndefinedReference {
        option: Arc<str>,
        reference: Arc<str>,
    },
    InvalidPattern {
        pattern: Arc<str>,
        reason: &'static str,
    },
}

impl ConfigError {
    pub fn mismatch(option: &str, expected: &'static str, found: &crate::value::Value) -> Self {
        ConfigError::TypeMismatch { option: option.into(), expected, found: found.kind() }
    }

    pub fn invalid<V: fmt::Display>(option: &str, value: V, reason: &'static str) -> Self {
        ConfigError::InvalidValue { option: option.into(), value: value.to_string(), reason }
    }

    /// The option, extension, or pattern the error is about.
    pub fn subject(&self) -> &str {
        match self {
            ConfigError::TypeMismatch { option, .. }
            | ConfigError::InvalidValue { option, .. }
            | ConfigError::UnknownOption { option, .. }
            | ConfigError::UndefinedReference { option, .. } => option,
            ConfigError::UnknownExtension(name) => name,
            ConfigError::UnknownEnvironment(name) => name,
            ConfigError::InvalidPattern { pattern, .. } => pattern,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::TypeMismatch { option, .. } => {
                write!(f, "invalid value type for option `{option}`")
            }
            ConfigError::InvalidValue { option, .. } => {
                write!(f, "invalid value for option `{option}`")
            }
            ConfigError::UnknownOption { option, within } => {
                write!(f, "unknown {within} option `{option}`")
            }
            ConfigError::UnknownExtension(name) => write!(f, "unknown extension `{name}`"),
            ConfigError::UnknownEnvironment(name) => write!(f, "unknown environment `{name}`"),
            ConfigError::UndefinedReference { option, reference } => {
                write!(f, "option `{option}` references undefined option `{reference}`")
            }
            ConfigError::InvalidPattern { pattern, .. } => {
                write!(f, "invalid page pattern `{pattern}`")
            }
        }
    }
}

impl ErrorDetail for ConfigError {
    fn context(&self) -> Vec<(Option<String>, String)> {
        match self {
            ConfigError::TypeMismatch { expected, found, .. } => vec![
                (Some("expected type".into()), expected.to_string()),
                (Some("found type".into()), found.to_string()),
            ],
            ConfigError::InvalidValue { value, reason, .. } => vec![
                (Some("value".into()), value.clone()),
                (None, reason.to_string()),
            ],
            ConfigError::InvalidPattern { reason, .. } => vec![(None, reason.to_string())],
            _ => vec![],
        }
    }

    fn as_config_error(&self) -> Option<&ConfigError> {
        Some(self)
    }
}
