/// Match on a key, producing `Some(variant)` for every variant of an enum.
///
/// Every variant of the target enum must appear in at least one arm: adding a
/// variant without teaching the parser about it is a compile error, checked
/// with `assert_enum_variants!`. The variants are brought into scope, so arms
/// name them bare.
///
/// ```rust
/// use sift::exhaustive_match;
///
/// #[derive(Debug, PartialEq)]
/// enum Mode { Fuzzy, Exact }
///
/// fn parse(name: &str) -> Option<Mode> {
///     exhaustive_match! {
///         name => Option<Mode>;
///         {
///             "fuzzy" | "fz" => Some(Fuzzy),
///             "exact" => Some(Exact),
///         }
///         default _ => None
///     }
/// }
///
/// assert_eq!(parse("fz"), Some(Mode::Fuzzy));
/// assert_eq!(parse("regex"), None);
/// ```
#[macro_export]
macro_rules! exhaustive_match {
    (
        $expr:expr => Option<$return_ty:ty>;
        {
            $($pattern:pat => Some($variant:ident $($rest:tt)*)),+ $(,)?
        }
        default $default_pattern:pat => $default:expr
    ) => {{
        use $return_ty::*;
        ::assert_enum_variants::assert_enum_variants!($return_ty, { $($variant),+ });

        match $expr {
            $($pattern => Some($variant $($rest)*),)+
            $default_pattern => $default
        }
    }};
}
