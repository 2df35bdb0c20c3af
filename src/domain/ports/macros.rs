//! Helper macro generating port error enums with snake_case constructors.
//!
//! Port errors in this crate all share one shape: a few variants, each bare
//! or carrying a single `String` payload that the message template
//! interpolates. The macro takes that shape directly, so a declaration reads
//! as a table of `Variant => "message"` rows.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $payload:ident } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $payload: String } )?,
            )*
        }

        $(
            define_port_error!(@constructor $name, $variant $( { $payload } )?);
        )*
    };

    (@constructor $name:ident, $variant:ident) => {
        ::paste::paste! {
            impl $name {
                #[doc = concat!("Shorthand for [`", stringify!($name), "::", stringify!($variant), "`].")]
                pub fn [<$variant:snake>]() -> Self {
                    Self::$variant
                }
            }
        }
    };

    (@constructor $name:ident, $variant:ident { $payload:ident }) => {
        ::paste::paste! {
            impl $name {
                #[doc = concat!("Shorthand for [`", stringify!($name), "::", stringify!($variant), "`] from anything string-like.")]
                pub fn [<$variant:snake>]($payload: impl Into<String>) -> Self {
                    Self::$variant { $payload: $payload.into() }
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Unavailable { message } => "unavailable: {message}",
            Missing => "missing",
        }
    }

    #[test]
    fn payload_constructors_accept_into_string() {
        let err = SamplePortError::unavailable("socket closed");
        assert_eq!(
            err,
            SamplePortError::Unavailable {
                message: "socket closed".to_owned()
            }
        );
        assert_eq!(err.to_string(), "unavailable: socket closed");
    }

    #[test]
    fn bare_constructors_build_unit_variants() {
        assert_eq!(SamplePortError::missing(), SamplePortError::Missing);
    }
}
