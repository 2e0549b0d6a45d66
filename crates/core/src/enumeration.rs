//! Label enumerations with 1-based integer codes.
//!
//! Each enum variant's code is its 1-based position in the label list, which
//! is also the value written to the store.

/// Enumeration code type as persisted.
pub type EnumCode = u8;

macro_rules! define_enumeration {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = ($val:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Labels in code order; `LABELS[code - 1]` is the label of `code`.
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            /// Highest valid code.
            pub const MAX: EnumCode = Self::LABELS.len() as EnumCode;

            /// Return the persisted code.
            pub fn code(self) -> EnumCode {
                self as EnumCode
            }

            pub fn label(self) -> &'static str {
                Self::LABELS[(self.code() - 1) as usize]
            }

            pub fn from_code(code: EnumCode) -> Option<Self> {
                match code {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }

            pub fn from_label(label: &str) -> Option<Self> {
                Self::all().find(|v| v.label() == label)
            }

            /// All variants in code order.
            pub fn all() -> impl Iterator<Item = Self> {
                (1..=Self::MAX).filter_map(Self::from_code)
            }

            /// Comma-separated labels for `codes`, skipping unknown ones.
            pub fn labels_for_codes(codes: &[EnumCode]) -> String {
                codes
                    .iter()
                    .filter_map(|c| Self::from_code(*c))
                    .map(Self::label)
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl From<$name> for EnumCode {
            fn from(value: $name) -> Self {
                value as EnumCode
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

define_enumeration! {
    /// Movie category. Drives which category-specific fields are allowed.
    MovieCategory {
        TvSeriesEpisode = (1, "TV series episode"),
        Biography = (2, "Biography"),
    }
}
