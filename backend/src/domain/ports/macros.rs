//! Helper macro for generating domain port error enums.
//!
//! Port errors share a shape: a thiserror enum plus snake_case constructor
//! functions whose `String` fields accept any `impl Into<String>`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
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
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum ExamplePortError {
            Unit => "unit failure",
            Message { message: String } => "failed: {message}",
            Mixed { message: String, attempts: u32 } => "failed: {message} ({attempts})",
        }
    }

    #[test]
    fn unit_constructor_builds_variant() {
        assert_eq!(ExamplePortError::unit().to_string(), "unit failure");
    }

    #[test]
    fn string_fields_accept_str() {
        let err = ExamplePortError::message("timed out");
        assert_eq!(err.to_string(), "failed: timed out");
    }

    #[test]
    fn mixed_fields_preserve_types() {
        let err = ExamplePortError::mixed("timed out", 3_u32);
        assert_eq!(err.to_string(), "failed: timed out (3)");
    }
}
