macro_rules! sensitive_debug {
    ($ident:ident $(<$($generic:ident),*>)?) => {
        impl $(<$($generic),*>)? ::core::fmt::Debug for $ident $(<$($generic),*>)? {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str("[sensitive]")
            }
        }
    };
}

/// Declares a trimmed, length-limited string newtype for form input.
macro_rules! nutype_string {
    ($(#[doc=$doc:literal])* $ident:ident(len_char_max = $max:literal)) => {
        $(#[doc=$doc])*
        #[::nutype::nutype(
            sanitize(trim),
            validate(len_char_max = $max),
            derive(Debug, Clone, PartialEq, Eq, Default, TryFrom, Deref, Serialize, Deserialize),
            default = ""
        )]
        pub struct $ident(String);
    };
}

pub(crate) use nutype_string;
pub(crate) use sensitive_debug;
