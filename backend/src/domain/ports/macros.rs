//! Helper macro generating the port error enums.
//!
//! Port errors share a shape: a `thiserror` enum plus snake_case constructor
//! functions whose parameters accept `impl Into<FieldType>`, so adapters can
//! pass `&str` or `String` interchangeably.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            ::paste::paste! {
                $(
                    pub fn [<$variant:snake>]($($($field: impl Into<$ty>),*)?) -> Self {
                        Self::$variant $({ $($field: $field.into()),* })?
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        /// Exercised only by this test module.
        pub enum SamplePortError {
            Connection { message: String } => "connection failed: {message}",
            Missing => "row missing",
            Mixed { message: String, attempts: u32 } => "{message} after {attempts} attempts",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SamplePortError::connection("refused");
        assert_eq!(err.to_string(), "connection failed: refused");
    }

    #[test]
    fn unit_variants_get_constructors_too() {
        assert_eq!(SamplePortError::missing().to_string(), "row missing");
    }

    #[test]
    fn mixed_field_types_convert_independently() {
        let err = SamplePortError::mixed("gave up", 3u32);
        assert_eq!(err.to_string(), "gave up after 3 attempts");
    }
}
