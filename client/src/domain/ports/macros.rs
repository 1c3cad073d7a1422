//! Macro for port error enums whose variants each carry a diagnostic.

/// Declare a port error enum.
///
/// Every variant holds a `message: String` and displays as
/// `"<summary>: <message>"`. Each variant also gets a snake_case constructor
/// taking `impl Into<String>`, and the enum gets a [`message`] accessor.
///
/// [`message`]: #method.message
macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $summary:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error("{}: {message}", $summary)]
                $variant {
                    /// Diagnostic from the adapter.
                    message: String,
                },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant {
                            message: message.into(),
                        }
                    }
                }
            )+

            /// Diagnostic carried by any variant.
            #[must_use]
            pub fn message(&self) -> &str {
                match self {
                    $( Self::$variant { message } )|+ => message.as_str(),
                }
            }
        }
    };
}

pub(crate) use define_port_error;
