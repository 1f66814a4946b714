use std::fmt;
use std::hash::Hash;

use crate::error::{Result, SaveError};

/// Pseudo-name accepted by [`resolve_names`] meaning every declared member.
pub const ALL_NAME: &str = "all";

/// A closed catalog of named raw values.
///
/// Used both as the member type of flag sets (raw value is a bit mask) and as
/// the projection type of choice fields (raw value is an exact match).
pub trait LabelEnum: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + 'static {
    /// Human-readable catalog name, used in error messages.
    const KIND: &'static str;
    /// Every member, in declaration order.
    const ALL: &'static [Self];

    fn raw(self) -> u64;
    /// Lower-case command-line name.
    fn name(self) -> &'static str;
    /// Display label.
    fn label(self) -> &'static str;

    fn from_raw(raw: u64) -> Option<Self> {
        Self::ALL.iter().copied().find(|member| member.raw() == raw)
    }

    fn from_name(name: &str) -> Option<Self> {
        let wanted = normalize(name);
        Self::ALL
            .iter()
            .copied()
            .find(|member| member.name() == wanted)
    }

    fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|member| member.name()).collect()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('-', "_")
}

/// Parses a single symbolic name for a choice catalog.
pub fn parse_name<C: LabelEnum>(name: &str) -> Result<C> {
    C::from_name(name).ok_or_else(|| SaveError::UnknownChoice {
        kind: C::KIND,
        name: name.to_string(),
    })
}

/// Resolves a list of flag names for `field`, expanding [`ALL_NAME`].
///
/// Duplicates are dropped; order follows the input, with `all` expanding in
/// declaration order.
pub fn resolve_names<F, S>(field: &'static str, names: &[S]) -> Result<Vec<F>>
where
    F: LabelEnum,
    S: AsRef<str>,
{
    let mut resolved: Vec<F> = Vec::new();
    for name in names {
        let name = name.as_ref();
        if normalize(name) == ALL_NAME {
            for member in F::ALL {
                if !resolved.contains(member) {
                    resolved.push(*member);
                }
            }
            continue;
        }
        let member = F::from_name(name).ok_or_else(|| SaveError::UnknownFlag {
            field,
            name: name.to_string(),
        })?;
        if !resolved.contains(&member) {
            resolved.push(member);
        }
    }
    Ok(resolved)
}

/// Declares a [`LabelEnum`] catalog.
///
/// ```ignore
/// label_enum! {
///     pub enum Teleport: "teleport" {
///         Frog = (0x02, "frog", "Frog"),
///     }
/// }
/// ```
macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $kind:literal {
            $($variant:ident = ($raw:expr, $cli:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::label::LabelEnum for $name {
            const KIND: &'static str = $kind;
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn raw(self) -> u64 {
                match self {
                    $(Self::$variant => $raw),+
                }
            }

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $cli),+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::label::LabelEnum::label(*self))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::label::LabelEnum::name(*self))
            }
        }
    };
}

pub(crate) use label_enum;

#[cfg(test)]
mod tests {
    use super::*;

    label_enum! {
        enum Shape: "shape" {
            Square = (0x1, "square", "Square"),
            Round = (0x2, "round", "Round"),
            TallBox = (0x4, "tall_box", "Tall Box"),
        }
    }

    #[test]
    fn lookup_by_raw_and_name() {
        assert_eq!(Shape::from_raw(0x2), Some(Shape::Round));
        assert_eq!(Shape::from_raw(0x3), None);
        assert_eq!(Shape::from_name("TALL-BOX"), Some(Shape::TallBox));
        assert_eq!(Shape::TallBox.to_string(), "Tall Box");
        assert_eq!(Shape::names(), vec!["square", "round", "tall_box"]);
    }

    #[test]
    fn parse_name_reports_catalog() {
        let err = parse_name::<Shape>("triangle").expect_err("unknown name");
        assert!(matches!(
            err,
            SaveError::UnknownChoice { kind: "shape", ref name } if name == "triangle"
        ));
    }

    #[test]
    fn resolve_names_expands_all_and_dedups() {
        let resolved: Vec<Shape> =
            resolve_names("Shapes", &["round", "all", "round"]).expect("known names");
        assert_eq!(resolved, vec![Shape::Round, Shape::Square, Shape::TallBox]);

        let err = resolve_names::<Shape, _>("Shapes", &["square", "blob"]).expect_err("unknown");
        assert!(matches!(err, SaveError::UnknownFlag { field: "Shapes", .. }));
    }
}
